// sls-logs - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no terminal,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use std::fmt;
use std::path::PathBuf;

/// Identifier of one deployable function, taken from the first line of its
/// definition file. Not validated: duplicates and odd names pass through.
pub type FunctionName = String;

// =============================================================================
// Target resolution
// =============================================================================

/// Where a candidate pool came from. Used for logging and user messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateSource {
    /// `--lambdaList` on the command line.
    ExplicitList,
    /// A scan of `--lambdaDir`.
    ExplicitDir(PathBuf),
    /// A scan of the first conventional path that yielded anything.
    ConventionalPath(PathBuf),
}

/// Outcome of target resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Names given as positional arguments. This is the final selection and
    /// the interactive selector must not run.
    Selected(Vec<FunctionName>),

    /// A pool of names to offer the user.
    Candidates {
        names: Vec<FunctionName>,
        source: CandidateSource,
    },
}

// =============================================================================
// Log streaming
// =============================================================================

/// Per-invocation streaming options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamOptions {
    /// Continuous tail (true) or a single fetch (false).
    pub tail_mode: bool,
    /// Raw text appended verbatim to the log command.
    pub extra_args: Option<String>,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            tail_mode: true,
            extra_args: None,
        }
    }
}

/// Which pipe of a child process a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl StreamKind {
    /// Label printed between the function name and the relayed text.
    pub fn label(self) -> &'static str {
        match self {
            Self::Stdout => "stdout:",
            Self::Stderr => "stderr:",
        }
    }
}

/// How a session's child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionExit {
    /// Normal exit with a status code.
    Code(i32),
    /// Terminated by a signal (Unix only).
    Signal(i32),
    /// The platform reported neither a code nor a signal.
    Unknown,
}

impl SessionExit {
    /// Only an exit code of exactly 0 counts as success.
    pub fn is_success(self) -> bool {
        matches!(self, Self::Code(0))
    }
}

impl fmt::Display for SessionExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "code {code}"),
            Self::Signal(sig) => write!(f, "signal {sig}"),
            Self::Unknown => write!(f, "unknown status"),
        }
    }
}

/// Messages sent from session threads to the printing thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// The child process for `name` was spawned.
    Started { name: FunctionName, command: String },

    /// One relayed line (without its trailing newline).
    Line {
        name: FunctionName,
        stream: StreamKind,
        text: String,
    },

    /// The child process could not be spawned or waited on.
    Failed { name: FunctionName, message: String },

    /// The child exited. Sent exactly once per spawned session, after both
    /// of its pipes reached end-of-stream.
    Exited { name: FunctionName, status: SessionExit },
}

impl StreamEvent {
    /// Function this event belongs to.
    pub fn name(&self) -> &str {
        match self {
            Self::Started { name, .. }
            | Self::Line { name, .. }
            | Self::Failed { name, .. }
            | Self::Exited { name, .. } => name,
        }
    }

    /// True for the last event a session ever sends.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Failed { .. } | Self::Exited { .. })
    }
}

// =============================================================================
// Presentation
// =============================================================================

/// Colour role of a piece of rendered text. Mapped to concrete terminal
/// colours by ui::theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Success,
    Warning,
    Error,
}
