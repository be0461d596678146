// sls-logs - app/state.rs
//
// The invocation: every setting the run needs, assembled once at startup
// from the CLI and config.toml and passed by reference from there on.

use crate::core::command::LogCommandConfig;
use crate::core::discovery::ScanConfig;
use crate::core::model::{FunctionName, StreamOptions};
use crate::core::resolver::ResolveRequest;
use crate::platform::config::AppConfig;
use std::path::{Path, PathBuf};

/// Top-level run configuration.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Run the self-installer instead of streaming logs.
    pub install: bool,

    /// Project directory (the working directory at startup).
    pub project_dir: PathBuf,

    /// Inputs to target resolution.
    pub request: ResolveRequest,

    /// Definition scan settings.
    pub scan: ScanConfig,

    /// How to build each log command.
    pub command: LogCommandConfig,

    /// Tail vs. single fetch, plus extra arguments.
    pub stream: StreamOptions,
}

/// CLI values that feed an `Invocation`.
#[derive(Debug, Clone, Default)]
pub struct CliInputs {
    pub install: bool,
    pub names: Vec<FunctionName>,
    pub lambda_list: Option<Vec<FunctionName>>,
    pub lambda_dir: Option<PathBuf>,
    pub log_once: bool,
    pub sls_args: Option<String>,
}

impl Invocation {
    /// Combine CLI values and validated config. Relative conventional paths
    /// and `--lambdaDir` are anchored at `project_dir`.
    pub fn build(cli: CliInputs, config: &AppConfig, project_dir: &Path) -> Self {
        let conventional_paths = config
            .conventional_paths
            .iter()
            .map(|p| project_dir.join(p))
            .collect();

        Self {
            install: cli.install,
            project_dir: project_dir.to_path_buf(),
            request: ResolveRequest {
                explicit_args: cli.names,
                explicit_list: cli.lambda_list,
                explicit_dir: cli.lambda_dir.map(|d| project_dir.join(d)),
                conventional_paths,
            },
            scan: ScanConfig {
                definition_patterns: config.definition_patterns.clone(),
                max_depth: config.max_depth,
            },
            command: LogCommandConfig {
                shell: config.shell.clone(),
                base: config.log_command.clone(),
                tail_flag: config.tail_flag.clone(),
                function_flag: config.function_flag.clone(),
            },
            stream: StreamOptions {
                tail_mode: !cli.log_once,
                extra_args: cli.sls_args.filter(|a| !a.trim().is_empty()),
            },
        }
    }
}
