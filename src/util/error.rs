// sls-logs - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation. All errors preserve the causal chain
// for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all sls-logs operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum SlsLogsError {
    /// User-supplied paths are invalid or nothing could be discovered.
    Configuration(ConfigurationError),

    /// Scanning a definition tree failed.
    Filesystem(FilesystemError),

    /// The interactive selection did not complete.
    Prompt(PromptError),

    /// Self-install into a host project failed or was refused.
    Install(InstallError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for SlsLogsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(e) => write!(f, "{e}"),
            Self::Filesystem(e) => write!(f, "Filesystem error: {e}"),
            Self::Prompt(e) => write!(f, "{e}"),
            Self::Install(e) => write!(f, "{e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for SlsLogsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Configuration(e) => Some(e),
            Self::Filesystem(e) => Some(e),
            Self::Prompt(e) => Some(e),
            Self::Install(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors caused by what the user asked for rather than by the filesystem.
#[derive(Debug)]
pub enum ConfigurationError {
    /// `--lambdaDir` points at a path that does not exist.
    DirectoryNotFound { path: PathBuf },

    /// No route produced a single candidate function.
    NoFunctionsFound { checked: Vec<PathBuf> },
}

impl ConfigurationError {
    /// Paths that were inspected before giving up (empty when not relevant).
    pub fn checked_paths(&self) -> &[PathBuf] {
        match self {
            Self::DirectoryNotFound { .. } => &[],
            Self::NoFunctionsFound { checked } => checked,
        }
    }
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectoryNotFound { path } => {
                write!(f, "Specified directory does not exist: {}", path.display())
            }
            Self::NoFunctionsFound { checked } if checked.len() == 1 => {
                write!(f, "Found no lambdas at: {}", checked[0].display())
            }
            Self::NoFunctionsFound { .. } => write!(f, "Could not find any lambdas"),
        }
    }
}

impl std::error::Error for ConfigurationError {}

impl From<ConfigurationError> for SlsLogsError {
    fn from(e: ConfigurationError) -> Self {
        Self::Configuration(e)
    }
}

// ---------------------------------------------------------------------------
// Filesystem errors
// ---------------------------------------------------------------------------

/// Errors raised while listing or reading a definition tree.
#[derive(Debug)]
pub enum FilesystemError {
    /// The scan root does not exist.
    RootNotFound { path: PathBuf },

    /// The scan root is not a directory.
    NotADirectory { path: PathBuf },

    /// Permission denied or another I/O failure accessing the root.
    RootUnreadable { path: PathBuf, source: io::Error },

    /// Walkdir traversal error below the root.
    Traversal {
        path: PathBuf,
        source: walkdir::Error,
    },

    /// A definition file could not be read.
    Read { path: PathBuf, source: io::Error },
}

impl fmt::Display for FilesystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootNotFound { path } => {
                write!(f, "Scan path '{}' does not exist", path.display())
            }
            Self::NotADirectory { path } => {
                write!(f, "Scan path '{}' is not a directory", path.display())
            }
            Self::RootUnreadable { path, source } => {
                write!(f, "Cannot access '{}': {source}", path.display())
            }
            Self::Traversal { path, source } => {
                write!(f, "Error traversing '{}': {source}", path.display())
            }
            Self::Read { path, source } => {
                write!(f, "Cannot read '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for FilesystemError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::RootUnreadable { source, .. } => Some(source),
            Self::Traversal { source, .. } => Some(source),
            Self::Read { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<FilesystemError> for SlsLogsError {
    fn from(e: FilesystemError) -> Self {
        Self::Filesystem(e)
    }
}

// ---------------------------------------------------------------------------
// Prompt errors
// ---------------------------------------------------------------------------

/// Errors from the interactive selector and confirmation prompts.
#[derive(Debug)]
pub enum PromptError {
    /// The user aborted the prompt (escape, `q`, or end of input).
    Cancelled,

    /// A typed answer could not be understood.
    InvalidAnswer { answer: String, reason: String },

    /// Reading keys or writing to the terminal failed.
    Terminal(io::Error),
}

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "Selection cancelled"),
            Self::InvalidAnswer { answer, reason } => {
                write!(f, "Invalid answer '{answer}': {reason}")
            }
            Self::Terminal(e) => write!(f, "Terminal error: {e}"),
        }
    }
}

impl std::error::Error for PromptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Terminal(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for PromptError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::Interrupted {
            Self::Cancelled
        } else {
            Self::Terminal(e)
        }
    }
}

impl From<PromptError> for SlsLogsError {
    fn from(e: PromptError) -> Self {
        Self::Prompt(e)
    }
}

// ---------------------------------------------------------------------------
// Install errors
// ---------------------------------------------------------------------------

/// Errors related to installing the tool into a host project.
#[derive(Debug)]
pub enum InstallError {
    /// The current directory has no project manifest.
    ManifestNotFound { path: PathBuf },

    /// The user answered the confirmation with something other than `y`.
    Declined,

    /// The manifest is not valid JSON or its `scripts` field is not an object.
    ManifestParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The manifest's top level or `scripts` field has the wrong shape.
    ManifestShape { path: PathBuf, reason: &'static str },

    /// I/O error while copying the executable or rewriting the manifest.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for InstallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ManifestNotFound { path } => write!(
                f,
                "Current directory has no {} file",
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string())
            ),
            Self::Declined => write!(f, "Chose not to install. Exiting..."),
            Self::ManifestParse { path, source } => {
                write!(f, "Cannot parse '{}': {source}", path.display())
            }
            Self::ManifestShape { path, reason } => {
                write!(f, "Unexpected manifest shape in '{}': {reason}", path.display())
            }
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "Install failed during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for InstallError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ManifestParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<InstallError> for SlsLogsError {
    fn from(e: InstallError) -> Self {
        Self::Install(e)
    }
}

/// Convenience type alias for sls-logs results.
pub type Result<T> = std::result::Result<T, SlsLogsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_single_checked_path_names_the_directory() {
        let e = ConfigurationError::NoFunctionsFound {
            checked: vec![PathBuf::from("fns")],
        };
        assert_eq!(e.to_string(), "Found no lambdas at: fns");
    }

    #[test]
    fn test_many_checked_paths_use_generic_message() {
        let e = ConfigurationError::NoFunctionsFound {
            checked: vec![PathBuf::from("a"), PathBuf::from("b")],
        };
        assert_eq!(e.to_string(), "Could not find any lambdas");
        assert_eq!(e.checked_paths().len(), 2);
    }

    #[test]
    fn test_io_source_is_preserved() {
        let err: SlsLogsError = FilesystemError::Read {
            path: PathBuf::from("x.yml"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        }
        .into();
        let fs = err.source().expect("filesystem source");
        assert!(fs.source().is_some(), "io error must stay in the chain");
    }
}
