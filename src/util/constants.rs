// sls-logs - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

use std::time::Duration;

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "sls-logs";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "sls-logs";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Discovery
// =============================================================================

/// Directories (relative to the working directory) probed in order when no
/// explicit lambda directory or list is given.
pub const DEFAULT_CONVENTIONAL_PATHS: &[&str] = &[
    "serverless/lambdas",
    "serverless/lambda",
    "serverless/functions",
    "serverless/function",
];

/// Filename globs identifying function definition files.
pub const DEFAULT_DEFINITION_PATTERNS: &[&str] = &["*.yml"];

/// Largest `[discovery] max_depth` accepted from config. Scans are unbounded
/// unless a depth is configured; symlink loops are caught by walkdir.
pub const ABSOLUTE_MAX_DEPTH: usize = 4096;

// =============================================================================
// Log command
// =============================================================================

/// Shell used to run the log command (`<shell> -c "<command>"`).
#[cfg(not(windows))]
pub const DEFAULT_SHELL: &str = "sh";

/// Shell used to run the log command (`<shell> /C "<command>"`).
#[cfg(windows)]
pub const DEFAULT_SHELL: &str = "cmd";

/// Base of the framework's native log command.
pub const DEFAULT_LOG_COMMAND: &str = "yarn sls logs";

/// Flag that switches the log command into continuous tail mode.
pub const DEFAULT_TAIL_FLAG: &str = "-t";

/// Flag that precedes the function name.
pub const DEFAULT_FUNCTION_FLAG: &str = "-f";

// =============================================================================
// Stream relay limits
// =============================================================================

/// Size of each read from a child's stdout/stderr pipe.
pub const READ_CHUNK_SIZE: usize = 8 * 1024; // 8 KiB

/// Maximum size of a buffered partial line. A child that writes this many
/// bytes without a newline has the fragment flushed as its own line.
pub const MAX_LINE_BYTES: usize = 64 * 1024; // 64 KiB

/// How long a session waits, after its process exited, for the pipes to reach
/// end-of-stream before printing the summary. Only a background process that
/// inherited the pipes keeps them open longer.
pub const PIPE_DRAIN_GRACE: Duration = Duration::from_millis(250);

/// Substring (matched case-insensitively) that marks a stdout line as an error.
pub const ERROR_MARKER: &str = "error";

// =============================================================================
// Installer
// =============================================================================

/// Project manifest that receives the convenience script entry.
pub const MANIFEST_FILE_NAME: &str = "package.json";

/// Directory (relative to the project root) the executable is copied into.
pub const INSTALL_DIR_NAME: &str = "scripts";

/// File name of the installed executable (without platform suffix).
pub const INSTALL_BINARY_NAME: &str = "sls-logs";

/// Key added under `"scripts"` in the manifest.
pub const INSTALL_SCRIPT_KEY: &str = "sls:logs";

// =============================================================================
// Logging
// =============================================================================

/// Default log level. Diagnostics stay quiet unless asked for so they never
/// interleave with relayed function output.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Maximum length of a relayed line included in debug output.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
