pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by filesystem operations.
///
/// Observational lookups report plain absence as `Ok(None)` / `Ok(false)`
/// rather than `NotFound`; the raising variants below are reserved for
/// structural mutations and for mismatches a lookup cannot silently
/// resolve.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("not a directory: {0}")]
    NotADirectory(String),

    #[error("not a file: {0}")]
    NotAFile(String),

    #[error("not a symlink: {0}")]
    NotASymlink(String),

    #[error("entry already exists: {0}")]
    AlreadyExists(String),

    #[error("directory not empty: {0}")]
    NotEmpty(String),

    #[error("operation not permitted on root: {0}")]
    RootViolation(String),

    #[error("too many levels of symbolic links: {0}")]
    LinkCycle(String),

    #[error("cannot link to another symbolic link: {0}")]
    LinkToLink(String),

    #[error("destination {dest} is inside source {src}")]
    NestedDestination { src: String, dest: String },

    #[error("file content is not valid utf-8: {0}")]
    Utf8(String),

    #[error("storage engine error: {message}")]
    Storage { message: String },
}

impl Error {
    pub fn not_found(path: impl Into<String>) -> Self {
        Error::NotFound(path.into())
    }

    pub fn not_a_directory(path: impl Into<String>) -> Self {
        Error::NotADirectory(path.into())
    }

    pub fn not_a_file(path: impl Into<String>) -> Self {
        Error::NotAFile(path.into())
    }

    pub fn not_a_symlink(path: impl Into<String>) -> Self {
        Error::NotASymlink(path.into())
    }

    pub fn already_exists(path: impl Into<String>) -> Self {
        Error::AlreadyExists(path.into())
    }

    pub fn not_empty(path: impl Into<String>) -> Self {
        Error::NotEmpty(path.into())
    }

    pub fn root_violation(path: impl Into<String>) -> Self {
        Error::RootViolation(path.into())
    }

    pub fn link_cycle(path: impl Into<String>) -> Self {
        Error::LinkCycle(path.into())
    }

    pub fn link_to_link(path: impl Into<String>) -> Self {
        Error::LinkToLink(path.into())
    }

    pub fn nested_destination(src: impl Into<String>, dest: impl Into<String>) -> Self {
        Error::NestedDestination {
            src: src.into(),
            dest: dest.into(),
        }
    }

    pub fn utf8(path: impl Into<String>) -> Self {
        Error::Utf8(path.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Error::Storage {
            message: message.into(),
        }
    }
}
