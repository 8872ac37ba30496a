use std::path::PathBuf;

/// The primary error type for all operations in the `packrat` crate.
#[derive(Debug)]
pub enum SaverError {
    /// An I/O error occurred, typically while copying a file or removing a
    /// stale entry. Includes the path where the error happened.
    Io { source: std::io::Error, path: PathBuf },

    /// An error occurred when trying to strip a prefix from a file path.
    StripPrefix { prefix: PathBuf, path: PathBuf },

    /// The loaded configuration could not be parsed as YAML.
    Yaml(serde_yaml::Error),

    /// The configuration was well-formed YAML but semantically invalid,
    /// e.g. a `save` tree node that is neither a string, a list nor a mapping.
    Config(String),

    /// The save destination's suffix names no supported archive format.
    UnsupportedFormat { path: PathBuf },

    /// An error from the underlying `zip` crate while writing the archive.
    Zip(zip::result::ZipError),
}

impl std::fmt::Display for SaverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaverError::Io { source, path } => write!(f, "I/O error on path '{}': {}", path.display(), source),
            SaverError::StripPrefix { prefix, path } => write!(f, "Could not strip prefix '{}' from path '{}'", prefix.display(), path.display()),
            SaverError::Yaml(e) => write!(f, "Configuration error: {}", e),
            SaverError::Config(msg) => write!(f, "Configuration error: {}", msg),
            SaverError::UnsupportedFormat { path } => write!(f, "Unsupported archive format for destination '{}' (expected .zip, .tar, .tar.gz or .tgz)", path.display()),
            SaverError::Zip(e) => write!(f, "Zip archive error: {}", e),
        }
    }
}

impl std::error::Error for SaverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SaverError::Io { source, .. } => Some(source),
            SaverError::Yaml(e) => Some(e),
            SaverError::Zip(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_yaml::Error> for SaverError {
    fn from(err: serde_yaml::Error) -> Self {
        SaverError::Yaml(err)
    }
}

impl From<zip::result::ZipError> for SaverError {
    fn from(err: zip::result::ZipError) -> Self {
        SaverError::Zip(err)
    }
}

impl From<walkdir::Error> for SaverError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(PathBuf::from).unwrap_or_default();
        match err.into_io_error() {
            Some(source) => SaverError::Io { source, path },
            None => SaverError::Io {
                source: std::io::Error::new(std::io::ErrorKind::Other, "filesystem loop detected"),
                path,
            },
        }
    }
}

impl From<std::io::Error> for SaverError {
    fn from(err: std::io::Error) -> Self {
        SaverError::Io { source: err, path: PathBuf::new() } // Generic path
    }
}
