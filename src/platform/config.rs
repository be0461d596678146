// sls-logs - platform/config.rs
//
// Platform-specific configuration directory resolution and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for sls-logs configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/sls-logs/ or %APPDATA%\sls-logs\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility -- a newer
/// config file can be used with an older binary without crashing.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[discovery]` section.
    pub discovery: DiscoverySection,
    /// `[command]` section.
    pub command: CommandSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[discovery]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DiscoverySection {
    /// Directories probed in order when no directory or list is given.
    pub conventional_paths: Option<Vec<String>>,
    /// Filename globs identifying definition files.
    pub definition_patterns: Option<Vec<String>>,
    /// Maximum directory recursion depth.
    pub max_depth: Option<usize>,
}

/// `[command]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct CommandSection {
    /// Shell the log command is run through.
    pub shell: Option<String>,
    /// Log command prefix, e.g. "npx serverless logs".
    pub base: Option<String>,
    /// Flag that enables continuous tailing.
    pub tail_flag: Option<String>,
    /// Flag placed before the function name.
    pub function_flag: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    // -- Discovery --
    pub conventional_paths: Vec<PathBuf>,
    pub definition_patterns: Vec<String>,
    /// Opt-in scan depth limit; `None` scans the whole tree.
    pub max_depth: Option<usize>,

    // -- Command --
    pub shell: String,
    pub log_command: String,
    pub tail_flag: String,
    pub function_flag: String,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            conventional_paths: constants::DEFAULT_CONVENTIONAL_PATHS
                .iter()
                .map(PathBuf::from)
                .collect(),
            definition_patterns: constants::DEFAULT_DEFINITION_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            max_depth: None,
            shell: constants::DEFAULT_SHELL.to_string(),
            log_command: constants::DEFAULT_LOG_COMMAND.to_string(),
            tail_flag: constants::DEFAULT_TAIL_FLAG.to_string(),
            function_flag: constants::DEFAULT_FUNCTION_FLAG.to_string(),
            log_level: None,
        }
    }
}

/// Load and validate a config file.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// A missing file yields defaults with no warnings, unless the path was given
/// explicitly (`explicit`), in which case the absence is reported. An
/// unreadable or unparseable file yields defaults plus a warning: the tool
/// still runs but the user is told.
pub fn load_config(config_path: &Path, explicit: bool) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        if explicit {
            warnings.push(format!(
                "Config file '{}' does not exist. Using defaults.",
                config_path.display()
            ));
        } else {
            tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        }
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(e) => {
            let msg = format!(
                "Could not read config file '{}': {e}. Using defaults.",
                config_path.display()
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    let (config, parse_warnings) = parse_config(&content, config_path);
    warnings.extend(parse_warnings);
    (config, warnings)
}

/// Validate config text. `origin` is only used in messages.
pub fn parse_config(content: &str, origin: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    let raw: RawConfig = match toml::from_str(content) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!(
                "Failed to parse config file '{}': {e}. Using defaults.",
                origin.display()
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %origin.display(), "Loaded config.toml");

    let mut config = AppConfig::default();

    // -- Discovery: conventional_paths --
    if let Some(paths) = raw.discovery.conventional_paths {
        let paths: Vec<PathBuf> = paths
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .collect();
        if paths.is_empty() {
            warnings.push(
                "[discovery] conventional_paths is empty. Using default paths.".to_string(),
            );
        } else {
            config.conventional_paths = paths;
        }
    }

    // -- Discovery: definition_patterns --
    if let Some(patterns) = raw.discovery.definition_patterns {
        let mut valid = Vec::new();
        for p in patterns {
            match glob::Pattern::new(&p) {
                Ok(_) => valid.push(p),
                Err(e) => warnings.push(format!(
                    "[discovery] definition pattern \"{p}\" is invalid: {e}. Ignoring it."
                )),
            }
        }
        if valid.is_empty() {
            warnings.push(format!(
                "[discovery] definition_patterns has no usable pattern. Using default ({}).",
                constants::DEFAULT_DEFINITION_PATTERNS.join(", ")
            ));
        } else {
            config.definition_patterns = valid;
        }
    }

    // -- Discovery: max_depth --
    if let Some(depth) = raw.discovery.max_depth {
        if (1..=constants::ABSOLUTE_MAX_DEPTH).contains(&depth) {
            config.max_depth = Some(depth);
        } else {
            warnings.push(format!(
                "[discovery] max_depth = {depth} is out of range (1-{}). Scanning without a depth limit.",
                constants::ABSOLUTE_MAX_DEPTH,
            ));
        }
    }

    // -- Command --
    if let Some(shell) = raw.command.shell {
        if shell.trim().is_empty() {
            warnings.push(format!(
                "[command] shell is empty. Using default ({}).",
                constants::DEFAULT_SHELL
            ));
        } else {
            config.shell = shell;
        }
    }
    if let Some(base) = raw.command.base {
        if base.trim().is_empty() {
            warnings.push(format!(
                "[command] base is empty. Using default ({}).",
                constants::DEFAULT_LOG_COMMAND
            ));
        } else {
            config.log_command = base;
        }
    }
    // Flags may legitimately be empty (frameworks that take the name positionally).
    if let Some(flag) = raw.command.tail_flag {
        config.tail_flag = flag;
    }
    if let Some(flag) = raw.command.function_flag {
        config.function_flag = flag;
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default ({}).",
                constants::DEFAULT_LOG_LEVEL
            ));
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "Config validation produced warnings");
    }

    (config, warnings)
}
