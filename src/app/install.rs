// sls-logs - app/install.rs
//
// Self-install into a host project: copy the running executable into the
// project's scripts/ directory and register a `sls:logs` script in its
// package.json so `yarn sls:logs` launches it.
//
// The manifest is edited as a generic JSON value with key order preserved,
// so nothing but the one script entry changes.

use crate::platform::fs as pfs;
use crate::util::constants::{
    APP_NAME, INSTALL_BINARY_NAME, INSTALL_DIR_NAME, INSTALL_SCRIPT_KEY, MANIFEST_FILE_NAME,
};
use crate::util::error::{InstallError, PromptError, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Asks the user a free-text question.
pub trait Confirmer {
    fn ask(&mut self, question: &str) -> std::result::Result<String, PromptError>;
}

/// What an install changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub manifest: PathBuf,
    pub executable: PathBuf,
    /// Value written under `scripts["sls:logs"]`.
    pub script: String,
    /// The previous value of that key, if any.
    pub replaced: Option<String>,
}

/// An empty answer or `y` (any case) means yes.
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim();
    answer.is_empty() || answer.eq_ignore_ascii_case("y")
}

/// Install the executable at `executable` into the project at `project_dir`.
pub fn install<C: Confirmer + ?Sized>(
    project_dir: &Path,
    executable: &Path,
    confirmer: &mut C,
) -> Result<InstallReport> {
    let manifest = project_dir.join(MANIFEST_FILE_NAME);
    if !manifest.is_file() {
        return Err(InstallError::ManifestNotFound { path: manifest }.into());
    }

    let answer = confirmer.ask(&format!(
        "Are you sure you want to install {APP_NAME} here? (y) "
    ))?;
    if !is_affirmative(&answer) {
        tracing::info!(answer = %answer.trim(), "Install declined");
        return Err(InstallError::Declined.into());
    }

    let install_dir = project_dir.join(INSTALL_DIR_NAME);
    std::fs::create_dir_all(&install_dir).map_err(|source| InstallError::Io {
        path: install_dir.clone(),
        operation: "create directory",
        source,
    })?;

    let file_name = pfs::executable_file_name(INSTALL_BINARY_NAME);
    let target = install_dir.join(&file_name);
    pfs::copy_executable(executable, &target).map_err(|source| InstallError::Io {
        path: target.clone(),
        operation: "copy executable",
        source,
    })?;

    let script = format!("{INSTALL_DIR_NAME}/{file_name}");
    let replaced = register_script(&manifest, &script)?;

    tracing::info!(
        manifest = %manifest.display(),
        executable = %target.display(),
        "Installed into project"
    );

    Ok(InstallReport {
        manifest,
        executable: target,
        script,
        replaced,
    })
}

/// Set `scripts["sls:logs"] = script` in the manifest at `path`, creating the
/// `scripts` object if needed. Returns the previous value of the key.
fn register_script(path: &Path, script: &str) -> Result<Option<String>> {
    let text = std::fs::read_to_string(path).map_err(|source| InstallError::Io {
        path: path.to_path_buf(),
        operation: "read manifest",
        source,
    })?;
    let mut manifest: Value = serde_json::from_str(&text).map_err(|source| InstallError::ManifestParse {
        path: path.to_path_buf(),
        source,
    })?;

    let replaced = set_script(&mut manifest, script).map_err(|reason| InstallError::ManifestShape {
        path: path.to_path_buf(),
        reason,
    })?;

    let mut out = serde_json::to_string_pretty(&manifest).map_err(|source| InstallError::ManifestParse {
        path: path.to_path_buf(),
        source,
    })?;
    if text.ends_with('\n') {
        out.push('\n');
    }
    pfs::write_atomic(path, out.as_bytes()).map_err(|source| InstallError::Io {
        path: path.to_path_buf(),
        operation: "write manifest",
        source,
    })?;
    Ok(replaced)
}

/// Pure manifest edit behind `register_script`.
fn set_script(manifest: &mut Value, script: &str) -> std::result::Result<Option<String>, &'static str> {
    let root = manifest
        .as_object_mut()
        .ok_or("top level is not a JSON object")?;
    let scripts = root
        .entry("scripts")
        .or_insert_with(|| Value::Object(Map::new()));
    if scripts.is_null() {
        *scripts = Value::Object(Map::new());
    }
    let scripts = scripts
        .as_object_mut()
        .ok_or("\"scripts\" is not a JSON object")?;
    let previous = scripts.insert(INSTALL_SCRIPT_KEY.to_string(), Value::String(script.to_string()));
    Ok(previous.map(|v| match v {
        Value::String(s) => s,
        other => other.to_string(),
    }))
}
