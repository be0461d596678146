// sls-logs - app/run.rs
//
// Orchestration of one run: resolve targets, ask for a selection when
// needed, then stream every selected function until all sessions end.

use crate::app::select::Selector;
use crate::app::state::Invocation;
use crate::app::stream::StreamManager;
use crate::core::discovery::DefinitionSource;
use crate::core::model::{FunctionName, Resolution, StreamEvent};
use crate::core::resolver;
use crate::util::error::Result;
use std::io;

/// Prompt text for the function picker.
pub const SELECT_MESSAGE: &str = "Select lambdas to watch";

/// Receives stream events on the main thread (normally ui::printer).
pub trait EventSink {
    fn handle(&mut self, event: &StreamEvent) -> io::Result<()>;
}

/// Final selection plus anything worth telling the user about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Targets {
    pub names: Vec<FunctionName>,
    pub warnings: Vec<String>,
    /// Whether the interactive selector ran.
    pub prompted: bool,
}

/// Resolve targets and, unless the names were given positionally, ask the
/// selector to narrow the candidate pool.
pub fn select_targets<S, P>(invocation: &Invocation, source: &S, selector: &mut P) -> Result<Targets>
where
    S: DefinitionSource + ?Sized,
    P: Selector + ?Sized,
{
    let outcome = resolver::resolve(source, &invocation.request, &invocation.scan)?;
    match outcome.resolution {
        Resolution::Selected(names) => Ok(Targets {
            names,
            warnings: outcome.warnings,
            prompted: false,
        }),
        Resolution::Candidates { names, source } => {
            tracing::debug!(count = names.len(), ?source, "Prompting for selection");
            let chosen = selector.select(SELECT_MESSAGE, &names)?;
            Ok(Targets {
                names: chosen,
                warnings: outcome.warnings,
                prompted: true,
            })
        }
    }
}

/// Tally of a finished watch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchSummary {
    pub sessions: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Start one session per name and feed every event to `sink` until all
/// sessions have finished. Session failures never make this return `Err`;
/// only a broken sink does.
pub fn watch<K: EventSink + ?Sized>(
    names: &[FunctionName],
    invocation: &Invocation,
    sink: &mut K,
) -> io::Result<WatchSummary> {
    let mut manager = StreamManager::new();
    manager.start(names, &invocation.command, &invocation.stream);
    drain(&manager, sink)
}

/// Feed events from `manager` to `sink` until the channel closes.
pub fn drain<K: EventSink + ?Sized>(manager: &StreamManager, sink: &mut K) -> io::Result<WatchSummary> {
    let mut summary = WatchSummary {
        sessions: manager.session_count(),
        ..Default::default()
    };
    while let Some(event) = manager.recv() {
        match &event {
            StreamEvent::Exited { status, .. } if status.is_success() => summary.succeeded += 1,
            StreamEvent::Exited { .. } | StreamEvent::Failed { .. } => summary.failed += 1,
            _ => {}
        }
        sink.handle(&event)?;
    }
    tracing::info!(
        sessions = summary.sessions,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "All log sessions finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::discovery::MemorySource;
    use crate::platform::config::AppConfig;
    use crate::app::state::CliInputs;
    use crate::util::error::{ConfigurationError, PromptError, SlsLogsError};
    use std::path::{Path, PathBuf};

    struct PanickingSelector;

    impl Selector for PanickingSelector {
        fn select(&mut self, _: &str, _: &[FunctionName]) -> std::result::Result<Vec<FunctionName>, PromptError> {
            panic!("selector must not run")
        }
    }

    /// Picks the last candidate and records what it was offered.
    #[derive(Default)]
    struct LastPicker {
        offered: Vec<FunctionName>,
    }

    impl Selector for LastPicker {
        fn select(&mut self, message: &str, candidates: &[FunctionName]) -> std::result::Result<Vec<FunctionName>, PromptError> {
            assert_eq!(message, SELECT_MESSAGE);
            self.offered = candidates.to_vec();
            Ok(candidates.last().cloned().into_iter().collect())
        }
    }

    fn invocation(cli: CliInputs) -> Invocation {
        Invocation::build(cli, &AppConfig::default(), Path::new("proj"))
    }

    #[test]
    fn test_positional_names_skip_selector() {
        let inv = invocation(CliInputs {
            names: vec!["foo".into(), "bar".into()],
            ..Default::default()
        });
        let targets = select_targets(&inv, &MemorySource::new(), &mut PanickingSelector).unwrap();
        assert_eq!(targets.names, vec!["foo", "bar"]);
        assert!(!targets.prompted);
    }

    #[test]
    fn test_candidates_go_through_selector() {
        let src = MemorySource::new()
            .with_dir("proj/serverless/lambdas")
            .with_file("proj/serverless/function/one.yml", "one:\n")
            .with_file("proj/serverless/function/two.yml", "two:\n");
        let mut picker = LastPicker::default();
        let targets = select_targets(&invocation(CliInputs::default()), &src, &mut picker).unwrap();
        assert_eq!(picker.offered, vec!["one", "two"]);
        assert_eq!(targets.names, vec!["two"]);
        assert!(targets.prompted);
    }

    #[test]
    fn test_missing_dir_fails_before_prompt() {
        let inv = invocation(CliInputs {
            lambda_dir: Some(PathBuf::from("missing")),
            ..Default::default()
        });
        let err = select_targets(&inv, &MemorySource::new(), &mut PanickingSelector).unwrap_err();
        assert!(matches!(
            err,
            SlsLogsError::Configuration(ConfigurationError::DirectoryNotFound { .. })
        ));
    }

    #[test]
    fn test_selector_cancel_propagates() {
        struct Cancel;
        impl Selector for Cancel {
            fn select(&mut self, _: &str, _: &[FunctionName]) -> std::result::Result<Vec<FunctionName>, PromptError> {
                Err(PromptError::Cancelled)
            }
        }
        let inv = invocation(CliInputs {
            lambda_list: Some(vec!["a".into()]),
            ..Default::default()
        });
        let err = select_targets(&inv, &MemorySource::new(), &mut Cancel).unwrap_err();
        assert!(matches!(err, SlsLogsError::Prompt(PromptError::Cancelled)));
    }
}
