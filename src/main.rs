// sls-logs - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and logging initialisation (debug mode support)
// 3. Install mode, or target resolution + selection + log streaming

use clap::Parser;
use sls_logs::app::{self, install, run};
use sls_logs::core::discovery::DiskSource;
use sls_logs::core::model::Tone;
use sls_logs::platform::config::{self, PlatformPaths};
use sls_logs::ui::printer::Printer;
use sls_logs::ui::prompt::TerminalPrompt;
use sls_logs::ui::theme::{paint, paint_bright};
use sls_logs::util::{self, constants, error::SlsLogsError};
use std::ffi::OsString;
use std::path::PathBuf;

/// sls-logs - watch the logs of several serverless functions at once.
///
/// Without names, functions are discovered from definition files in the
/// project and offered in an interactive picker.
#[derive(Parser, Debug)]
#[command(name = "sls-logs", version, about)]
struct Cli {
    /// Function names to watch (skips discovery and the picker).
    names: Vec<String>,

    /// Install this executable into the current project and register a
    /// `sls:logs` script in package.json.
    #[arg(short = 'i', long = "install")]
    install: bool,

    /// Extra arguments appended to every log command.
    #[arg(short = 'a', long = "slsArgs", allow_hyphen_values = true)]
    sls_args: Option<String>,

    /// Directory to scan for function definition files.
    #[arg(short = 'l', long = "lambdaDir")]
    lambda_dir: Option<PathBuf>,

    /// Candidate function names offered in the picker instead of a scan
    /// (also accepted as `-ll`).
    #[arg(long = "lambdaList", alias = "ll", num_args = 1..)]
    lambda_list: Option<Vec<String>>,

    /// Fetch logs once instead of tailing them.
    #[arg(
        short = 'o',
        long = "logOnce",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    log_once: Option<bool>,

    /// Path to a config.toml (defaults to the platform config directory).
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

/// Rewrite the two argument forms clap cannot express directly:
///
/// - `-ll` (a two-letter short flag) becomes `--lambdaList`. Left alone,
///   clap would read it as `-l l`.
/// - A bare `-o`/`--logOnce` not followed by `true` or `false` becomes
///   `--logOnce=true`, so a following function name is not taken as its value.
///
/// Everything after `--` is passed through untouched.
fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let args: Vec<OsString> = args.into_iter().collect();
    let mut out = Vec::with_capacity(args.len());
    let mut verbatim = false;
    for (index, arg) in args.iter().enumerate() {
        if verbatim {
            out.push(arg.clone());
            continue;
        }
        match arg.to_str() {
            Some("--") => {
                verbatim = true;
                out.push(arg.clone());
            }
            Some("-ll") => out.push(OsString::from("--lambdaList")),
            Some("-o") | Some("--logOnce") => {
                let has_value = matches!(
                    args.get(index + 1).and_then(|next| next.to_str()),
                    Some("true") | Some("false")
                );
                if has_value {
                    out.push(arg.clone());
                } else {
                    out.push(OsString::from("--logOnce=true"));
                }
            }
            _ => out.push(arg.clone()),
        }
    }
    out
}

fn main() {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    // Config is read before logging so its level can take part in init.
    let (config_path, explicit) = match &cli.config {
        Some(path) => (path.clone(), true),
        None => (PlatformPaths::resolve().config_file(), false),
    };
    let (app_config, config_warnings) = config::load_config(&config_path, explicit);

    util::logging::init(cli.debug, app_config.log_level.as_deref());

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        config = %config_path.display(),
        "sls-logs starting"
    );

    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
        eprintln!("{}", paint(warning, Tone::Warning));
    }

    let project_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!(
                "{}",
                paint_bright(&format!("Cannot read the working directory: {e}"), Tone::Error)
            );
            std::process::exit(1);
        }
    };

    let inputs = app::state::CliInputs {
        install: cli.install,
        names: cli.names,
        lambda_list: cli.lambda_list,
        lambda_dir: cli.lambda_dir,
        log_once: cli.log_once.unwrap_or(false),
        sls_args: cli.sls_args,
    };
    let invocation = app::state::Invocation::build(inputs, &app_config, &project_dir);

    let code = if invocation.install {
        run_install(&invocation)
    } else {
        run_watch(&invocation)
    };
    std::process::exit(code);
}

fn run_install(invocation: &app::state::Invocation) -> i32 {
    let executable = match std::env::current_exe() {
        Ok(path) => path,
        Err(e) => {
            let err = SlsLogsError::Io {
                path: PathBuf::from(constants::APP_NAME),
                operation: "locate running executable",
                source: e,
            };
            report_error(&err);
            return 1;
        }
    };

    match install::install(&invocation.project_dir, &executable, &mut TerminalPrompt::new()) {
        Ok(report) => {
            if let Some(previous) = &report.replaced {
                println!(
                    "{}",
                    paint(
                        &format!("Replaced existing script '{}': {previous}", constants::INSTALL_SCRIPT_KEY),
                        Tone::Warning
                    )
                );
            }
            println!(
                "{}",
                paint_bright(
                    &format!("Installed {} to {}", constants::APP_NAME, report.executable.display()),
                    Tone::Success
                )
            );
            println!(
                "Registered script '{}' in {}",
                constants::INSTALL_SCRIPT_KEY,
                report.manifest.display()
            );
            println!(
                "{}",
                paint(&format!("Run `yarn {}`", constants::INSTALL_SCRIPT_KEY), Tone::Warning)
            );
            0
        }
        Err(e) => {
            report_error(&e);
            1
        }
    }
}

fn run_watch(invocation: &app::state::Invocation) -> i32 {
    let targets = match run::select_targets(invocation, &DiskSource, &mut TerminalPrompt::new()) {
        Ok(targets) => targets,
        Err(e) => {
            report_error(&e);
            return 1;
        }
    };

    for warning in &targets.warnings {
        eprintln!("{}", paint(warning, Tone::Warning));
    }
    println!();

    match run::watch(&targets.names, invocation, &mut Printer::stdio()) {
        Ok(summary) => {
            tracing::debug!(?summary, "Watch finished");
            0
        }
        Err(e) => {
            // Only a closed stdout/stderr gets here; nothing left to print to.
            tracing::error!(error = %e, "Output failed");
            1
        }
    }
}

/// Print a fatal error, with the probed paths when discovery came up empty.
fn report_error(err: &SlsLogsError) {
    tracing::error!(error = %err, "Fatal");
    eprintln!("{}", paint_bright(&err.to_string(), Tone::Error));
    if let SlsLogsError::Configuration(config_err) = err {
        let checked = config_err.checked_paths();
        if checked.len() > 1 {
            eprintln!("{}", paint("Looked at:", Tone::Warning));
            for path in checked {
                eprintln!("{}", paint(&format!("  {}", path.display()), Tone::Warning));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        let argv = std::iter::once("sls-logs")
            .chain(args.iter().copied())
            .map(OsString::from);
        Cli::try_parse_from(normalize_args(argv)).expect("arguments should parse")
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_double_l_is_lambda_list() {
        let cli = parse(&["-ll", "alpha", "beta"]);
        assert_eq!(cli.lambda_list, Some(vec!["alpha".to_string(), "beta".to_string()]));
        assert!(cli.names.is_empty());
        assert_eq!(cli.lambda_dir, None);
    }

    #[test]
    fn test_lambda_list_long_forms() {
        assert_eq!(parse(&["--lambdaList", "a", "b"]).lambda_list.map(|l| l.len()), Some(2));
        assert_eq!(parse(&["--ll", "a"]).lambda_list, Some(vec!["a".to_string()]));
    }

    #[test]
    fn test_positional_names_and_lambda_dir() {
        let cli = parse(&["-l", "fns", "getUser", "putUser"]);
        assert_eq!(cli.lambda_dir, Some(PathBuf::from("fns")));
        assert_eq!(cli.names, vec!["getUser", "putUser"]);
    }

    #[test]
    fn test_log_once_forms() {
        assert_eq!(parse(&[]).log_once, None);
        assert_eq!(parse(&["-o"]).log_once, Some(true));
        assert_eq!(parse(&["-o", "false"]).log_once, Some(false));
        assert_eq!(parse(&["--logOnce", "true"]).log_once, Some(true));

        let cli = parse(&["-o", "getUser"]);
        assert_eq!(cli.log_once, Some(true));
        assert_eq!(cli.names, vec!["getUser"]);
    }

    #[test]
    fn test_sls_args_accepts_hyphen_values() {
        let cli = parse(&["-a", "--stage dev", "getUser"]);
        assert_eq!(cli.sls_args.as_deref(), Some("--stage dev"));
        assert_eq!(cli.names, vec!["getUser"]);
    }

    #[test]
    fn test_install_config_and_debug_flags() {
        let cli = parse(&["-i", "-c", "my.toml", "-d"]);
        assert!(cli.install);
        assert!(cli.debug);
        assert_eq!(cli.config, Some(PathBuf::from("my.toml")));
    }

    #[test]
    fn test_normalize_leaves_args_after_separator() {
        let argv = ["sls-logs", "--", "-ll", "-o"].map(OsString::from);
        let out = normalize_args(argv);
        assert_eq!(out, ["sls-logs", "--", "-ll", "-o"].map(OsString::from));
    }
}
