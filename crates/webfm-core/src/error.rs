//! Error types for `webfm-core`.
//!
//! All fallible operations in the core library return [`CoreResult<T>`],
//! which is an alias for `Result<T, CoreError>`.

use std::path::{Path, PathBuf};

/// Unified error type for all core operations.
///
/// Each variant captures just enough context for the caller to display
/// a short status line followed by the failing detail.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The target path does not exist.
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// The process lacks permission to access the path.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// A directory was expected but the path points to something else.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A file was expected but the path points to a directory.
    #[error("not a file: {0}")]
    NotAFile(PathBuf),

    /// The path to be created already exists.
    #[error("already exists: {0}")]
    AlreadyExists(PathBuf),

    /// A file or directory name is invalid (empty, `.`/`..`, contains NUL, etc.).
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// A search pattern (regular expression or glob) failed to compile.
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A permission mode string is not a valid octal number.
    #[error("invalid mode: {0}")]
    InvalidMode(String),

    /// A required input was empty.
    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    /// A tagged value (search mode, copy policy) was not recognised.
    #[error("unknown {kind}: {tag}")]
    UnknownTag { kind: &'static str, tag: String },

    /// Failed to parse a TOML configuration file.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// Creating or unpacking a tarball failed.
    #[error("archive error: {0}")]
    Archive(String),

    /// A command was refused by the execution policy.
    #[error("command rejected: {0}")]
    CommandRejected(String),

    /// An I/O error that doesn't fit a more specific variant.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Maps an I/O error on `path` onto the most specific variant.
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => CoreError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => CoreError::PermissionDenied(path.to_path_buf()),
            std::io::ErrorKind::AlreadyExists => CoreError::AlreadyExists(path.to_path_buf()),
            _ => CoreError::Io(err),
        }
    }
}

/// Convenience alias used throughout `webfm-core`.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn not_found_displays_path() {
        let err = CoreError::NotFound(PathBuf::from("/missing/file"));
        assert_eq!(err.to_string(), "path not found: /missing/file");
    }

    #[test]
    fn permission_denied_displays_path() {
        let err = CoreError::PermissionDenied(PathBuf::from("/secret"));
        assert_eq!(err.to_string(), "permission denied: /secret");
    }

    #[test]
    fn invalid_pattern_displays_pattern_and_message() {
        let err = CoreError::InvalidPattern {
            pattern: "([".to_string(),
            message: "unclosed group".to_string(),
        };
        assert_eq!(err.to_string(), "invalid pattern '([': unclosed group");
    }

    #[test]
    fn unknown_tag_displays_kind() {
        let err = CoreError::UnknownTag {
            kind: "copy policy",
            tag: "merge".to_string(),
        };
        assert_eq!(err.to_string(), "unknown copy policy: merge");
    }

    #[test]
    fn empty_input_displays_what() {
        let err = CoreError::EmptyInput("search text");
        assert_eq!(err.to_string(), "empty input: search text");
    }

    #[test]
    fn from_io_maps_not_found() {
        let err = CoreError::from_io(
            Path::new("/gone"),
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, CoreError::NotFound(p) if p == Path::new("/gone")));
    }

    #[test]
    fn from_io_maps_permission_denied() {
        let err = CoreError::from_io(
            Path::new("/root"),
            io::Error::new(io::ErrorKind::PermissionDenied, "nope"),
        );
        assert!(matches!(err, CoreError::PermissionDenied(_)));
    }

    #[test]
    fn from_io_maps_already_exists() {
        let err = CoreError::from_io(
            Path::new("/tmp"),
            io::Error::new(io::ErrorKind::AlreadyExists, "exists"),
        );
        assert!(matches!(err, CoreError::AlreadyExists(_)));
    }

    #[test]
    fn from_io_keeps_other_kinds() {
        let err = CoreError::from_io(
            Path::new("/x"),
            io::Error::new(io::ErrorKind::Other, "weird"),
        );
        assert!(matches!(err, CoreError::Io(_)));
        assert!(err.to_string().contains("weird"));
    }

    #[test]
    fn io_error_from_std() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let core_err: CoreError = io_err.into();
        assert!(matches!(core_err, CoreError::Io(_)));
    }

    #[test]
    fn error_is_debug() {
        let err = CoreError::NotFound(PathBuf::from("/test"));
        let debug = format!("{:?}", err);
        assert!(debug.contains("NotFound"));
    }
}
