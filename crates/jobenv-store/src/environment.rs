//! The persisted environment of one job
//!
//! The four control fields (`resultdir`, `config_file`, `phase`, `user`) are typed.
//! `config` and `nodes` stay loosely typed so providers and tasks can store whatever
//! shape they need, and unknown top-level keys added by tasks are kept in `extra`.
//! `phase` and `user` accept any YAML scalar on load and keep its text.

use crate::error::ReservedKeyError;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Name of the environment file inside a result directory
pub const ENV_FILE_NAME: &str = "env";

/// Top-level keys owned by the typed fields; never stored in `extra`
pub const RESERVED_KEYS: [&str; 6] = ["config", "resultdir", "config_file", "nodes", "phase", "user"];

/// Merged configuration values
pub type ConfigMap = BTreeMap<String, Value>;

/// Role name → node descriptors assigned to that role
pub type Roles = BTreeMap<String, Vec<Value>>;

/// State record of one job, carried between task invocations by the `env` file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    /// Merged configuration values
    pub config: ConfigMap,
    /// Directory holding the job's artifacts and its `env` file
    pub resultdir: PathBuf,
    /// Configuration source re-read on every load
    pub config_file: PathBuf,
    /// Role assignment produced by a provider
    pub nodes: Roles,
    /// Name of the last task phase that completed
    #[serde(deserialize_with = "scalar_text")]
    pub phase: String,
    /// Identity the job runs under
    #[serde(deserialize_with = "scalar_text")]
    pub user: String,
    // Disjoint from RESERVED_KEYS, or the flat file would repeat a key.
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

impl Environment {
    /// Create an environment with every field at its empty default
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With result directory
    #[inline]
    #[must_use]
    pub fn with_resultdir(mut self, resultdir: impl Into<PathBuf>) -> Self {
        self.resultdir = resultdir.into();
        self
    }

    /// With configuration file
    #[inline]
    #[must_use]
    pub fn with_config_file(mut self, config_file: impl Into<PathBuf>) -> Self {
        self.config_file = config_file.into();
        self
    }

    /// With user
    #[inline]
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Location of the `env` file, or `None` while no result directory is set
    #[must_use]
    pub fn env_path(&self) -> Option<PathBuf> {
        if self.resultdir.as_os_str().is_empty() {
            None
        } else {
            Some(self.resultdir.join(ENV_FILE_NAME))
        }
    }

    /// Whether `resultdir` currently exists as a directory
    #[must_use]
    pub fn has_resultdir(&self) -> bool {
        !self.resultdir.as_os_str().is_empty() && self.resultdir.is_dir()
    }

    /// Record the last completed phase
    pub fn mark_phase(&mut self, phase: impl Into<String>) {
        self.phase = phase.into();
    }

    /// Merge values into `config`
    ///
    /// Top-level keys only: keys in `values` overwrite, keys absent from
    /// `values` stay. Nested mappings are replaced, not merged.
    pub fn merge_config(&mut self, values: ConfigMap) {
        self.config.extend(values);
    }

    /// Configuration value by top-level key
    #[must_use]
    pub fn config_value(&self, key: &str) -> Option<&Value> {
        self.config.get(key)
    }

    /// Nodes assigned to a role
    #[must_use]
    pub fn role(&self, role: &str) -> &[Value] {
        self.nodes.get(role).map(Vec::as_slice).unwrap_or_default()
    }

    /// Top-level keys added by tasks
    #[inline]
    #[must_use]
    pub fn extra(&self) -> &BTreeMap<String, Value> {
        &self.extra
    }

    /// Extension value by key
    #[must_use]
    pub fn extra_value(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Store a task-defined top-level key, returning the previous value
    ///
    /// # Errors
    /// `ReservedKeyError` if `key` names one of the typed fields
    pub fn set_extra(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, ReservedKeyError> {
        let key = key.into();
        if RESERVED_KEYS.contains(&key.as_str()) {
            return Err(ReservedKeyError(key));
        }
        Ok(self.extra.insert(key, value.into()))
    }

    /// Remove a task-defined top-level key
    pub fn remove_extra(&mut self, key: &str) -> Option<Value> {
        self.extra.remove(key)
    }
}

fn scalar_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(text) => Ok(text),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Sequence(_) => Err(de::Error::custom("expected a scalar, found a sequence")),
        Value::Mapping(_) => Err(de::Error::custom("expected a scalar, found a mapping")),
        Value::Tagged(_) => Err(de::Error::custom("expected a scalar, found a tagged value")),
    }
}
