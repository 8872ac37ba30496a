//! The backup run itself: staging, ignore filtering and archive swap.
//!
//! A run stages every configured element into `<destination>_tmp`, and only
//! touches the destination once the whole staging pass has succeeded. A run
//! that dies halfway therefore leaves the previous archive exactly as it
//! was; the staging directory is left behind for inspection and cleared at
//! the start of the next run.

use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::archive::{self, ArchiveFormat};
use crate::error::SaverError;

/// Orchestrates one backup run over an ordered list of elements.
#[derive(Debug)]
pub struct DataSaver {
    elements: Vec<PathBuf>,
    destination: PathBuf,
    format: ArchiveFormat,
    ignore: HashSet<OsString>,
}

impl DataSaver {
    /// Creates a saver for the given elements and destination.
    ///
    /// Fails if the destination's suffix names no supported archive format,
    /// so a misconfiguration is rejected before any filesystem mutation.
    pub fn new<I, S>(elements: Vec<PathBuf>, destination: PathBuf, ignore: I) -> Result<Self, SaverError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let format = ArchiveFormat::from_destination(&destination)?;
        Ok(Self {
            elements,
            destination,
            format,
            ignore: ignore.into_iter().map(Into::into).collect(),
        })
    }

    /// Stages every element in order, then replaces the previous archive.
    pub fn save_elements(&self) -> Result<(), SaverError> {
        let staging = self.temp_destination();
        remove_if_exists(&staging)?;

        let total = self.elements.len();
        for (index, element) in self.elements.iter().enumerate() {
            self.save_element(element, &staging)?;
            println!("- {}/{} {} saved", index + 1, total, element.display());
        }

        // No error so far, so the previous save can now be replaced.
        println!("Creating file archive ...");
        self.replace_save_archive(&staging)?;
        println!("Everything saved in {}", self.destination.display());
        Ok(())
    }

    /// The staging directory, `<destination>_tmp`.
    fn temp_destination(&self) -> PathBuf {
        let mut raw = self.destination.clone().into_os_string();
        raw.push("_tmp");
        PathBuf::from(raw)
    }

    /// Copies one element into the staging directory, recreating its path
    /// relative to the root placeholder.
    fn save_element(&self, element: &Path, staging: &Path) -> Result<(), SaverError> {
        let target = staging.join(strip_root(element)?);
        if element.is_dir() {
            self.copy_dir_filtered(element, &target)
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| SaverError::Io { source: e, path: parent.to_path_buf() })?;
            }
            fs::copy(element, &target)
                .map_err(|e| SaverError::Io { source: e, path: element.to_path_buf() })?;
            Ok(())
        }
    }

    /// Recursive directory copy with the ignore filter applied at every
    /// level. Pruning is structural: an ignored directory's subtree is
    /// never visited.
    fn copy_dir_filtered(&self, src: &Path, dest: &Path) -> Result<(), SaverError> {
        let walker = WalkDir::new(src)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.should_ignore(entry.file_name()));
        for entry in walker {
            let entry = entry?;
            let rel = entry.path().strip_prefix(src).map_err(|_| SaverError::StripPrefix {
                prefix: src.to_path_buf(),
                path: entry.path().to_path_buf(),
            })?;
            let target = dest.join(rel);
            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)
                    .map_err(|e| SaverError::Io { source: e, path: target.clone() })?;
            } else {
                fs::copy(entry.path(), &target)
                    .map_err(|e| SaverError::Io { source: e, path: entry.path().to_path_buf() })?;
            }
        }
        Ok(())
    }

    /// Exact filename match against the ignore set. Never applied to an
    /// element's own root.
    fn should_ignore(&self, name: &OsStr) -> bool {
        self.ignore.contains(name)
    }

    /// Swaps the freshly built archive in for the previous one.
    ///
    /// The archive is built at `<destination>.partial` first; the old
    /// destination entry is removed only after the build succeeded, and the
    /// partial file is then renamed into place. There is no point at which
    /// neither a previous nor a new archive exists.
    fn replace_save_archive(&self, staging: &Path) -> Result<(), SaverError> {
        let partial = {
            let mut raw = self.destination.clone().into_os_string();
            raw.push(".partial");
            PathBuf::from(raw)
        };
        remove_if_exists(&partial)?;
        archive::create_archive(self.format, staging, &partial)?;

        remove_if_exists(&self.destination)?;
        fs::rename(&partial, &self.destination)
            .map_err(|e| SaverError::Io { source: e, path: partial.clone() })?;
        remove_if_exists(staging)?;
        Ok(())
    }
}

/// Strips the leading root placeholder (`.`, or `/` for absolute elements)
/// from an element path, yielding the path it occupies under the staging
/// directory.
fn strip_root(element: &Path) -> Result<PathBuf, SaverError> {
    let mut components = element.components();
    components.next();
    let stripped: PathBuf = components.collect();
    if stripped.as_os_str().is_empty() {
        return Err(SaverError::Config(format!(
            "element '{}' names nothing beyond the root placeholder",
            element.display()
        )));
    }
    Ok(stripped)
}

/// Removes a file or a whole directory tree; a missing entry is fine.
fn remove_if_exists(path: &Path) -> Result<(), SaverError> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => {
            fs::remove_dir_all(path).map_err(|e| SaverError::Io { source: e, path: path.to_path_buf() })
        }
        Ok(_) => fs::remove_file(path).map_err(|e| SaverError::Io { source: e, path: path.to_path_buf() }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(SaverError::Io { source: e, path: path.to_path_buf() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write as _;
    use tempfile::tempdir;

    #[test]
    fn temp_destination_appends_to_the_file_name() {
        let saver = DataSaver::new(vec![], PathBuf::from("saves/backup.zip"), Vec::<String>::new()).unwrap();
        assert_eq!(saver.temp_destination(), PathBuf::from("saves/backup.zip_tmp"));
    }

    #[test]
    fn new_rejects_unsupported_destinations() {
        let err = DataSaver::new(vec![], PathBuf::from("backup.rar"), Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, SaverError::UnsupportedFormat { .. }), "got {err:?}");
    }

    #[test]
    fn strip_root_drops_the_first_segment() {
        assert_eq!(strip_root(Path::new("./a/b.txt")).unwrap(), PathBuf::from("a/b.txt"));
        assert_eq!(strip_root(Path::new("/var/data")).unwrap(), PathBuf::from("var/data"));
    }

    #[test]
    fn strip_root_rejects_a_bare_root() {
        let err = strip_root(Path::new(".")).unwrap_err();
        assert!(matches!(err, SaverError::Config(_)), "got {err:?}");
    }

    #[test]
    fn remove_if_exists_handles_files_dirs_and_absences() {
        let dir = tempdir().unwrap();

        let file = dir.path().join("f.txt");
        File::create(&file).unwrap().write_all(b"x").unwrap();
        remove_if_exists(&file).unwrap();
        assert!(!file.exists());

        let sub = dir.path().join("sub");
        fs::create_dir_all(sub.join("nested")).unwrap();
        remove_if_exists(&sub).unwrap();
        assert!(!sub.exists());

        remove_if_exists(&dir.path().join("missing")).unwrap();
    }

    #[test]
    fn ignored_names_match_exactly() {
        let saver = DataSaver::new(
            vec![],
            PathBuf::from("backup.zip"),
            vec![".git".to_string(), "skip.tmp".to_string()],
        )
        .unwrap();
        assert!(saver.should_ignore(OsStr::new(".git")));
        assert!(saver.should_ignore(OsStr::new("skip.tmp")));
        assert!(!saver.should_ignore(OsStr::new("keep.txt")));
        assert!(!saver.should_ignore(OsStr::new("git")));
    }
}
