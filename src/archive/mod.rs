//! Archive building: turn a staged directory tree into a single archive.
//!
//! The rest of the crate only needs "format in, archive file out". The
//! format is picked from the destination's file name suffix; compound
//! extensions (`.tar.gz`, `.tgz`) are recognized explicitly instead of
//! guessing from the last dot.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::CompressionMethod;

use crate::error::SaverError;

/// Archive formats recognized from the save destination's file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// A deflate-compressed `.zip` archive.
    Zip,
    /// An uncompressed `.tar` archive.
    Tar,
    /// A gzip-compressed `.tar.gz` (or `.tgz`) archive.
    TarGz,
}

impl ArchiveFormat {
    /// Derives the format from the destination path's suffix.
    ///
    /// Returns [`SaverError::UnsupportedFormat`] for anything else, so a
    /// misconfigured destination is caught before any staging I/O.
    pub fn from_destination(path: &Path) -> Result<Self, SaverError> {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Ok(ArchiveFormat::TarGz)
        } else if name.ends_with(".tar") {
            Ok(ArchiveFormat::Tar)
        } else if name.ends_with(".zip") {
            Ok(ArchiveFormat::Zip)
        } else {
            Err(SaverError::UnsupportedFormat { path: path.to_path_buf() })
        }
    }
}

/// Builds an archive of `format` at `output` from the contents of `src_dir`.
///
/// The directory's contents sit at the archive root; entries are written in
/// sorted order so two runs over identical trees produce the same layout.
pub fn create_archive(format: ArchiveFormat, src_dir: &Path, output: &Path) -> Result<(), SaverError> {
    match format {
        ArchiveFormat::Zip => create_zip(src_dir, output),
        ArchiveFormat::Tar => {
            let file = create_output(output)?;
            write_tar(src_dir, file)?;
            Ok(())
        }
        ArchiveFormat::TarGz => {
            let file = create_output(output)?;
            let encoder = write_tar(src_dir, GzEncoder::new(file, Compression::default()))?;
            encoder
                .finish()
                .map_err(|e| SaverError::Io { source: e, path: output.to_path_buf() })?;
            Ok(())
        }
    }
}

fn create_output(output: &Path) -> Result<File, SaverError> {
    File::create(output).map_err(|e| SaverError::Io { source: e, path: output.to_path_buf() })
}

fn create_zip(src_dir: &Path, output: &Path) -> Result<(), SaverError> {
    let file = create_output(output)?;
    let mut writer = zip::ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(src_dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let name = entry_name(src_dir, entry.path())?;
        if entry.file_type().is_dir() {
            writer.add_directory(name, options)?;
        } else {
            writer.start_file(name, options)?;
            let mut source = File::open(entry.path())
                .map_err(|e| SaverError::Io { source: e, path: entry.path().to_path_buf() })?;
            io::copy(&mut source, &mut writer)
                .map_err(|e| SaverError::Io { source: e, path: entry.path().to_path_buf() })?;
        }
    }
    writer.finish()?;
    Ok(())
}

fn write_tar<W: Write>(src_dir: &Path, writer: W) -> Result<W, SaverError> {
    let mut builder = tar::Builder::new(writer);
    for entry in WalkDir::new(src_dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let rel = relative_to(src_dir, entry.path())?;
        if entry.file_type().is_dir() {
            builder
                .append_dir(&rel, entry.path())
                .map_err(|e| SaverError::Io { source: e, path: entry.path().to_path_buf() })?;
        } else {
            builder
                .append_path_with_name(entry.path(), &rel)
                .map_err(|e| SaverError::Io { source: e, path: entry.path().to_path_buf() })?;
        }
    }
    builder
        .into_inner()
        .map_err(|e| SaverError::Io { source: e, path: src_dir.to_path_buf() })
}

fn relative_to(base: &Path, path: &Path) -> Result<PathBuf, SaverError> {
    path.strip_prefix(base)
        .map(Path::to_path_buf)
        .map_err(|_| SaverError::StripPrefix { prefix: base.to_path_buf(), path: path.to_path_buf() })
}

/// Zip entry names always use forward slashes, regardless of platform.
fn entry_name(base: &Path, path: &Path) -> Result<String, SaverError> {
    let rel = relative_to(base, path)?;
    let segments: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(segments.join("/"))
}
