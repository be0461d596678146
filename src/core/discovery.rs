// sls-logs - core/discovery.rs
//
// Recursive discovery of function definition files and extraction of their
// names.
//
// Architecture note: listing the tree and reading file contents sit behind
// the `DefinitionSource` trait. `DiskSource` implements it with `walkdir`;
// `MemorySource` implements it over an in-memory map so the scanner and the
// resolver can be tested without fixtures. Name extraction itself is the
// pure `core::definition::extract_function_name`.
//
// Error policy:
//   - A missing, non-directory or unreadable root is an error.
//   - Traversal failures below the root and unreadable definition files are
//     errors too: a scan either sees the whole tree or reports why it could
//     not. Whether that is fatal is the resolver's decision.

use crate::core::definition::extract_function_name;
use crate::core::model::FunctionName;
use crate::util::error::FilesystemError;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for a definition scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Filename globs a file must match to be treated as a definition.
    pub definition_patterns: Vec<String>,

    /// Maximum directory recursion depth (files directly in the root are at
    /// depth 1). `None` walks the whole tree.
    pub max_depth: Option<usize>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        use crate::util::constants;
        Self {
            definition_patterns: constants::DEFAULT_DEFINITION_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            max_depth: None,
        }
    }
}

// =============================================================================
// Sources
// =============================================================================

/// Read access to a tree of definition files.
pub trait DefinitionSource {
    /// True if `path` exists (file or directory).
    fn exists(&self, path: &Path) -> bool;

    /// Every regular file under `root` (down to `max_depth` if given),
    /// depth-first with siblings in file-name order.
    fn list_files(&self, root: &Path, max_depth: Option<usize>) -> Result<Vec<PathBuf>, FilesystemError>;

    /// Full text of one file. Invalid UTF-8 is replaced, not rejected.
    fn read_to_string(&self, path: &Path) -> Result<String, FilesystemError>;
}

/// `DefinitionSource` backed by the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskSource;

impl DefinitionSource for DiskSource {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn list_files(&self, root: &Path, max_depth: Option<usize>) -> Result<Vec<PathBuf>, FilesystemError> {
        // fs::metadata rather than Path::is_dir so a permission problem is
        // reported as such instead of as "not found".
        match std::fs::metadata(root) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(FilesystemError::NotADirectory {
                    path: root.to_path_buf(),
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(FilesystemError::RootNotFound {
                    path: root.to_path_buf(),
                })
            }
            Err(source) => {
                return Err(FilesystemError::RootUnreadable {
                    path: root.to_path_buf(),
                    source,
                })
            }
        }

        // follow_links makes walkdir detect symlink loops and report them as
        // traversal errors, so an unbounded walk always terminates.
        let mut walker = walkdir::WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name();
        if let Some(depth) = max_depth {
            walker = walker.max_depth(depth);
        }

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|source| FilesystemError::Traversal {
                path: source
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf()),
                source,
            })?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    fn read_to_string(&self, path: &Path) -> Result<String, FilesystemError> {
        let bytes = std::fs::read(path).map_err(|source| FilesystemError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// In-memory `DefinitionSource`. Directories are implied by file paths;
/// empty directories are added with [`MemorySource::with_dir`].
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    files: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file (and all of its ancestor directories).
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let path = path.into();
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(ancestor.to_path_buf());
        }
        self.files.insert(path, content.into());
        self
    }

    /// Add an empty directory (and its ancestors).
    pub fn with_dir(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(ancestor.to_path_buf());
        }
        self
    }
}

impl DefinitionSource for MemorySource {
    fn exists(&self, path: &Path) -> bool {
        self.dirs.contains(path) || self.files.contains_key(path)
    }

    fn list_files(&self, root: &Path, max_depth: Option<usize>) -> Result<Vec<PathBuf>, FilesystemError> {
        if self.files.contains_key(root) {
            return Err(FilesystemError::NotADirectory {
                path: root.to_path_buf(),
            });
        }
        if !self.dirs.contains(root) {
            return Err(FilesystemError::RootNotFound {
                path: root.to_path_buf(),
            });
        }
        // BTreeMap order on PathBuf compares component by component, which
        // matches a depth-first walk with siblings sorted by name.
        Ok(self
            .files
            .keys()
            .filter(|p| {
                p.strip_prefix(root)
                    .map(|rel| max_depth.map_or(true, |d| rel.components().count() <= d))
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    fn read_to_string(&self, path: &Path) -> Result<String, FilesystemError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| FilesystemError::Read {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
    }
}

// =============================================================================
// Scan
// =============================================================================

/// Scan `root` for definition files and return one function name per file,
/// in walk order.
pub fn scan<S: DefinitionSource + ?Sized>(
    source: &S,
    root: &Path,
    config: &ScanConfig,
) -> Result<Vec<FunctionName>, FilesystemError> {
    use crate::util::constants;

    let max_depth = config
        .max_depth
        .map(|d| d.min(constants::ABSOLUTE_MAX_DEPTH));
    let patterns = compile_patterns(&config.definition_patterns);

    tracing::debug!(
        root = %root.display(),
        ?max_depth,
        patterns = ?config.definition_patterns,
        "Definition scan starting"
    );

    let mut names = Vec::new();
    for path in source.list_files(root, max_depth)? {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            tracing::debug!(file = %path.display(), "Skipping non-UTF-8 filename");
            continue;
        };
        if !is_definition(file_name, &patterns) {
            tracing::trace!(file = file_name, "Not a definition file");
            continue;
        }
        let content = source.read_to_string(&path)?;
        let name = extract_function_name(&content);
        tracing::trace!(file = %path.display(), name = %name, "Definition found");
        names.push(name);
    }

    tracing::debug!(root = %root.display(), found = names.len(), "Definition scan complete");
    Ok(names)
}

// =============================================================================
// Glob helpers
// =============================================================================

/// Compile glob pattern strings; patterns that fail to compile are logged
/// and skipped.
fn compile_patterns(patterns: &[String]) -> Vec<glob::Pattern> {
    patterns
        .iter()
        .filter_map(|p| match glob::Pattern::new(p) {
            Ok(compiled) => Some(compiled),
            Err(e) => {
                tracing::warn!(pattern = p, error = %e, "Invalid definition pattern, skipping");
                None
            }
        })
        .collect()
}

/// Returns true if `file_name` matches at least one definition pattern.
fn is_definition(file_name: &str, patterns: &[glob::Pattern]) -> bool {
    patterns.iter().any(|p| p.matches(file_name))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_temp_tree() -> TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();

        fs::write(root.join("alpha.yml"), "alpha:\n  handler: a.handler\n").expect("alpha");
        fs::write(root.join("notes.md"), "notes:\n").expect("notes");
        let nested = root.join("group").join("deeper");
        fs::create_dir_all(&nested).expect("mkdir nested");
        fs::write(root.join("group").join("beta.yml"), "beta:\n").expect("beta");
        fs::write(nested.join("gamma.yml"), "gamma:\n").expect("gamma");
        dir
    }

    #[test]
    fn test_disk_scan_finds_nested_definitions_in_order() {
        let dir = make_temp_tree();
        let names = scan(&DiskSource, dir.path(), &ScanConfig::default()).unwrap();
        assert_eq!(names, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_disk_scan_root_not_found() {
        let result = scan(
            &DiskSource,
            Path::new("/nonexistent/sls-logs/lambdas"),
            &ScanConfig::default(),
        );
        assert!(matches!(result, Err(FilesystemError::RootNotFound { .. })));
    }

    #[test]
    fn test_disk_scan_root_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("fn.yml");
        fs::write(&file, "fn:\n").unwrap();
        let result = scan(&DiskSource, &file, &ScanConfig::default());
        assert!(matches!(result, Err(FilesystemError::NotADirectory { .. })));
    }

    #[test]
    fn test_disk_scan_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let names = scan(&DiskSource, dir.path(), &ScanConfig::default()).unwrap();
        assert!(names.is_empty());
    }

    #[test]
    fn test_max_depth_limits_descent() {
        let dir = make_temp_tree();
        let config = ScanConfig {
            max_depth: Some(1),
            ..Default::default()
        };
        let names = scan(&DiskSource, dir.path(), &config).unwrap();
        assert_eq!(names, vec!["alpha"]);
    }

    #[test]
    fn test_default_scan_has_no_depth_limit() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("top.yml"), "top:\n").unwrap();
        let mut deep = dir.path().to_path_buf();
        for level in 0..40 {
            deep.push(format!("d{level}"));
        }
        fs::create_dir_all(&deep).unwrap();
        fs::write(deep.join("deep.yml"), "deep:\n").unwrap();

        let names = scan(&DiskSource, dir.path(), &ScanConfig::default()).unwrap();
        assert_eq!(names, vec!["deep", "top"]);
    }

    #[test]
    fn test_custom_patterns() {
        let dir = make_temp_tree();
        let config = ScanConfig {
            definition_patterns: vec!["*.md".to_string()],
            ..Default::default()
        };
        let names = scan(&DiskSource, dir.path(), &config).unwrap();
        assert_eq!(names, vec!["notes"]);
    }

    #[test]
    fn test_invalid_pattern_is_skipped() {
        let dir = make_temp_tree();
        let config = ScanConfig {
            definition_patterns: vec!["[".to_string(), "*.yml".to_string()],
            ..Default::default()
        };
        let names = scan(&DiskSource, dir.path(), &config).unwrap();
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn test_duplicates_pass_through() {
        let src = MemorySource::new()
            .with_file("fns/a.yml", "same:\n")
            .with_file("fns/b.yml", "same:\n");
        let names = scan(&src, Path::new("fns"), &ScanConfig::default()).unwrap();
        assert_eq!(names, vec!["same", "same"]);
    }

    #[test]
    fn test_memory_source_depth_first_order() {
        let src = MemorySource::new()
            .with_file("fns/z.yml", "z:\n")
            .with_file("fns/c/d.yml", "d:\n")
            .with_file("fns/b.yml", "b:\n");
        let names = scan(&src, Path::new("fns"), &ScanConfig::default()).unwrap();
        assert_eq!(names, vec!["b", "d", "z"]);
    }

    #[test]
    fn test_memory_source_missing_and_file_roots() {
        let src = MemorySource::new().with_file("fns/a.yml", "a:\n");
        assert!(matches!(
            scan(&src, Path::new("other"), &ScanConfig::default()),
            Err(FilesystemError::RootNotFound { .. })
        ));
        assert!(matches!(
            scan(&src, Path::new("fns/a.yml"), &ScanConfig::default()),
            Err(FilesystemError::NotADirectory { .. })
        ));
    }

    #[test]
    fn test_memory_source_empty_dir_exists() {
        let src = MemorySource::new().with_dir("serverless/lambda");
        assert!(src.exists(Path::new("serverless/lambda")));
        assert!(src.exists(Path::new("serverless")));
        let names = scan(&src, Path::new("serverless/lambda"), &ScanConfig::default()).unwrap();
        assert!(names.is_empty());
    }
}
