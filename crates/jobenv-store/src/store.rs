//! Environment load and save
//!
//! - `make_env`: default environment, merged with a persisted `env` file when one
//!   exists, then with the live configuration file
//! - `save_env`: write the environment back into its result directory, or do
//!   nothing when that directory does not exist yet
//!
//! Each file is opened, read or written, and closed inside a single call.

use crate::environment::{ConfigMap, Environment, ENV_FILE_NAME};
use crate::error::{ConfigError, FileKind, PersistError};
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of a save request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The environment was written to this path
    Written(PathBuf),
    /// `resultdir` does not exist; nothing was written
    Skipped,
}

impl SaveOutcome {
    /// Whether the environment reached disk
    #[inline]
    #[must_use]
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written(_))
    }
}

/// Load/save seam used by the task harness
pub trait EnvStore {
    /// Build the environment for one invocation
    ///
    /// # Errors
    /// `ConfigError` when the environment or configuration file exists but
    /// cannot be read or parsed
    fn load(&self, working_dir: Option<&Path>) -> Result<Environment, ConfigError>;

    /// Persist the environment at the end of one invocation
    ///
    /// # Errors
    /// `PersistError` when `resultdir` exists but the file cannot be written
    fn save(&self, env: &Environment) -> Result<SaveOutcome, PersistError>;
}

/// `EnvStore` backed by YAML files on the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlEnvStore;

impl YamlEnvStore {
    /// Create new YAML store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl EnvStore for YamlEnvStore {
    fn load(&self, working_dir: Option<&Path>) -> Result<Environment, ConfigError> {
        make_env(working_dir)
    }

    fn save(&self, env: &Environment) -> Result<SaveOutcome, PersistError> {
        save_env(env)
    }
}

/// Load the environment from `working_dir`, or make a new one
///
/// With `None` (or an empty path) a default environment is built. With a
/// directory holding an `env` file, that file's fields replace the defaults.
/// Either way the file named by `config_file` is then re-read and merged into
/// `config`, so edits made between two tasks are picked up.
///
/// # Errors
/// - `ConfigError::Malformed` if either file is not a YAML mapping of the expected shape
/// - `ConfigError::Io` if either file exists but cannot be read
pub fn make_env(working_dir: Option<&Path>) -> Result<Environment, ConfigError> {
    let mut env = Environment::new();

    if let Some(dir) = working_dir.filter(|d| !d.as_os_str().is_empty()) {
        let env_path = dir.join(ENV_FILE_NAME);

        if env_path.is_file() {
            if let Some(value) = read_mapping(FileKind::Environment, &env_path)? {
                env = serde_yaml::from_value(value).map_err(|e| {
                    ConfigError::malformed(FileKind::Environment, &env_path, e.to_string())
                })?;
            }
            tracing::debug!("Loaded environment {}", env_path.display());
        }
    }

    reload_config(&mut env)?;
    Ok(env)
}

/// Re-read `config_file` and merge it into `config`
///
/// Returns `false` when there is no configuration file to read.
///
/// # Errors
/// Same as [`make_env`] for the configuration file.
pub fn reload_config(env: &mut Environment) -> Result<bool, ConfigError> {
    if env.config_file.as_os_str().is_empty() || !env.config_file.is_file() {
        return Ok(false);
    }

    let path = env.config_file.clone();
    if let Some(value) = read_mapping(FileKind::Configuration, &path)? {
        let values: ConfigMap = serde_yaml::from_value(value).map_err(|e| {
            ConfigError::malformed(FileKind::Configuration, &path, e.to_string())
        })?;
        env.merge_config(values);
    }
    tracing::debug!("Reloaded config {:?}", env.config);

    Ok(true)
}

/// Write `env` to `<resultdir>/env`
///
/// A missing `resultdir` is not an error: nothing is created and
/// `SaveOutcome::Skipped` is returned.
///
/// # Errors
/// - `PersistError::Serialize` if the environment holds values YAML cannot express
/// - `PersistError::Io` if the file write fails
pub fn save_env(env: &Environment) -> Result<SaveOutcome, PersistError> {
    if !env.has_resultdir() {
        tracing::debug!(
            "Result directory {} does not exist, environment not saved",
            env.resultdir.display()
        );
        return Ok(SaveOutcome::Skipped);
    }

    let env_path = env.resultdir.join(ENV_FILE_NAME);
    let yaml = serde_yaml::to_string(env).map_err(|e| PersistError::Serialize(e.to_string()))?;
    fs::write(&env_path, yaml).map_err(|e| PersistError::io_error(&env_path, e))?;
    tracing::debug!("Saved environment {}", env_path.display());

    Ok(SaveOutcome::Written(env_path))
}

/// Read a YAML file that must hold a mapping
///
/// An empty document yields `None`.
fn read_mapping(kind: FileKind, path: &Path) -> Result<Option<Value>, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::io_error(kind, path, e))?;
    if text.trim().is_empty() {
        return Ok(None);
    }

    let value: Value = serde_yaml::from_str(&text)
        .map_err(|e| ConfigError::malformed(kind, path, format!("YAML parse error: {e}")))?;

    match value {
        Value::Null => Ok(None),
        Value::Mapping(_) => Ok(Some(value)),
        other => Err(ConfigError::malformed(
            kind,
            path,
            format!("expected a mapping, found {}", value_kind(&other)),
        )),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn make_env_without_directory_is_default() {
        let env = make_env(None).unwrap();
        assert_eq!(env, Environment::new());
    }

    #[test]
    fn empty_working_dir_is_no_directory() {
        let env = make_env(Some(Path::new(""))).unwrap();
        assert_eq!(env, Environment::new());
    }

    #[test]
    fn directory_without_env_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let env = make_env(Some(dir.path())).unwrap();
        assert_eq!(env, Environment::new());
    }

    #[test]
    fn empty_env_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(ENV_FILE_NAME), "").unwrap();

        let env = make_env(Some(dir.path())).unwrap();
        assert_eq!(env, Environment::new());
    }

    #[test]
    fn malformed_env_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(ENV_FILE_NAME), "phase: [unclosed").unwrap();

        let err = make_env(Some(dir.path())).unwrap_err();
        assert_eq!(err.kind(), FileKind::Environment);
        assert!(matches!(err, ConfigError::Malformed { .. }));
    }

    #[test]
    fn non_mapping_env_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(ENV_FILE_NAME), "- just\n- a list\n").unwrap();

        let err = make_env(Some(dir.path())).unwrap_err();
        assert!(err.to_string().contains("expected a mapping, found a sequence"));
    }

    #[test]
    fn wrongly_typed_field_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(ENV_FILE_NAME), "nodes: 12\n").unwrap();

        let err = make_env(Some(dir.path())).unwrap_err();
        assert_eq!(err.kind(), FileKind::Environment);
    }

    #[test]
    fn config_file_is_merged_without_env_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("job.yaml");
        fs::write(&config, "walltime: '02:00:00'\nnodes: 4\n").unwrap();

        let mut env = Environment::new().with_config_file(&config);
        assert!(reload_config(&mut env).unwrap());

        assert_eq!(env.config_value("nodes"), Some(&Value::from(4)));
        assert_eq!(env.config_value("walltime"), Some(&Value::from("02:00:00")));
    }

    #[test]
    fn missing_config_file_is_not_an_error() {
        let mut env = Environment::new().with_config_file("/nonexistent/job.yaml");
        assert!(!reload_config(&mut env).unwrap());
        assert!(env.config.is_empty());
    }

    #[test]
    fn malformed_config_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("job.yaml");
        fs::write(&config, "42\n").unwrap();

        let mut env = Environment::new().with_config_file(&config);
        let err = reload_config(&mut env).unwrap_err();
        assert_eq!(err.kind(), FileKind::Configuration);
    }

    #[test]
    fn save_without_resultdir_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("not-yet");
        let env = Environment::new().with_resultdir(&missing);

        assert_eq!(save_env(&env).unwrap(), SaveOutcome::Skipped);
        assert!(!missing.exists());
        assert_eq!(save_env(&Environment::new()).unwrap(), SaveOutcome::Skipped);
    }

    #[test]
    fn save_writes_env_file() {
        let dir = tempfile::tempdir().unwrap();
        let env = Environment::new().with_resultdir(dir.path()).with_user("alice");

        let outcome = save_env(&env).unwrap();
        assert_eq!(outcome, SaveOutcome::Written(dir.path().join(ENV_FILE_NAME)));
        assert!(outcome.is_written());

        let text = fs::read_to_string(dir.path().join(ENV_FILE_NAME)).unwrap();
        assert!(text.contains("user: alice"));
    }

    #[test]
    fn yaml_store_delegates() {
        let dir = tempfile::tempdir().unwrap();
        let store = YamlEnvStore::new();

        let mut env = store.load(None).unwrap();
        env.resultdir = dir.path().to_path_buf();
        env.mark_phase("up");
        assert!(store.save(&env).unwrap().is_written());

        let reloaded = store.load(Some(dir.path())).unwrap();
        assert_eq!(reloaded, env);
    }
}
