// sls-logs - core/resolver.rs
//
// Decides which functions to watch, or which to offer for selection.
//
// Precedence (first match wins):
//   1. positional names      -> final selection, no prompt
//   2. explicit name list    -> candidate pool
//   3. explicit directory    -> scanned; missing path or empty scan is fatal
//   4. conventional paths    -> first existing path with >= 1 definition
//   5. otherwise             -> "no lambdas found" with every path checked
//
// Scan failures on a conventional path are not fatal: they are collected as
// warnings and the next path is tried. On an explicit directory they are.

use crate::core::discovery::{self, DefinitionSource, ScanConfig};
use crate::core::model::{CandidateSource, FunctionName, Resolution};
use crate::util::error::{ConfigurationError, Result};
use std::path::PathBuf;

/// Everything the resolver needs to know about the invocation.
#[derive(Debug, Clone, Default)]
pub struct ResolveRequest {
    /// Positional CLI arguments.
    pub explicit_args: Vec<FunctionName>,
    /// `--lambdaList`; an empty list counts as not given.
    pub explicit_list: Option<Vec<FunctionName>>,
    /// `--lambdaDir`.
    pub explicit_dir: Option<PathBuf>,
    /// Conventional directories, probed in order.
    pub conventional_paths: Vec<PathBuf>,
}

/// Resolution result plus any non-fatal problems met on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOutcome {
    pub resolution: Resolution,
    pub warnings: Vec<String>,
}

/// Resolve the watch targets for `request`.
pub fn resolve<S: DefinitionSource + ?Sized>(
    source: &S,
    request: &ResolveRequest,
    scan_config: &ScanConfig,
) -> Result<ResolveOutcome> {
    if !request.explicit_args.is_empty() {
        tracing::debug!(names = ?request.explicit_args, "Using positional function names");
        return Ok(ResolveOutcome {
            resolution: Resolution::Selected(request.explicit_args.clone()),
            warnings: Vec::new(),
        });
    }

    if let Some(list) = request.explicit_list.as_ref().filter(|l| !l.is_empty()) {
        tracing::debug!(count = list.len(), "Using explicit function list");
        return Ok(ResolveOutcome {
            resolution: Resolution::Candidates {
                names: list.clone(),
                source: CandidateSource::ExplicitList,
            },
            warnings: Vec::new(),
        });
    }

    if let Some(dir) = &request.explicit_dir {
        if !source.exists(dir) {
            return Err(ConfigurationError::DirectoryNotFound { path: dir.clone() }.into());
        }
        let names = discovery::scan(source, dir, scan_config)?;
        if names.is_empty() {
            return Err(ConfigurationError::NoFunctionsFound {
                checked: vec![dir.clone()],
            }
            .into());
        }
        tracing::info!(dir = %dir.display(), count = names.len(), "Functions found in explicit directory");
        return Ok(ResolveOutcome {
            resolution: Resolution::Candidates {
                names,
                source: CandidateSource::ExplicitDir(dir.clone()),
            },
            warnings: Vec::new(),
        });
    }

    let mut warnings = Vec::new();
    for path in &request.conventional_paths {
        if !source.exists(path) {
            tracing::debug!(path = %path.display(), "Conventional path absent");
            continue;
        }
        match discovery::scan(source, path, scan_config) {
            Ok(names) if !names.is_empty() => {
                tracing::info!(path = %path.display(), count = names.len(), "Functions found in conventional path");
                return Ok(ResolveOutcome {
                    resolution: Resolution::Candidates {
                        names,
                        source: CandidateSource::ConventionalPath(path.clone()),
                    },
                    warnings,
                });
            }
            Ok(_) => {
                tracing::debug!(path = %path.display(), "Conventional path has no definitions");
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Conventional path scan failed");
                warnings.push(e.to_string());
            }
        }
    }

    Err(ConfigurationError::NoFunctionsFound {
        checked: request.conventional_paths.clone(),
    }
    .into())
}
