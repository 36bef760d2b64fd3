//! Testing utilities for jobenv workspace
//!
//! Shared fixture providers and a throwaway result directory.

#![allow(missing_docs)]

use jobenv_store::{save_env, ConfigMap, Environment, Roles, ENV_FILE_NAME};
use jobenv_task::{Provider, ProviderError, ProviderRegistry};
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const CONFIG_FILE_NAME: &str = "job.yaml";

/// Provider that hands back the roles listed under `resources` in the config
#[derive(Debug, Default)]
pub struct Static;

impl Provider for Static {
    fn class_name(&self) -> &str {
        "Static"
    }

    fn init(&mut self, config: &ConfigMap) -> Result<Roles, ProviderError> {
        let Some(resources) = config.get("resources") else {
            return Ok(Roles::new());
        };
        serde_yaml::from_value(resources.clone())
            .map_err(|e| ProviderError::acquisition("static", e.to_string()))
    }
}

/// Provider whose acquisition always fails
#[derive(Debug, Default)]
pub struct Broken;

impl Provider for Broken {
    fn class_name(&self) -> &str {
        "Broken"
    }

    fn init(&mut self, _config: &ConfigMap) -> Result<Roles, ProviderError> {
        Err(ProviderError::acquisition("broken", "no resources left"))
    }
}

/// Registry with `static` and `broken`
pub fn fixture_registry() -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    registry.register::<Static>("static").unwrap();
    registry.register::<Broken>("broken").unwrap();
    registry
}

/// Temporary result directory with a job configuration file next to it
#[derive(Debug)]
pub struct JobWorkspace {
    dir: TempDir,
}

impl JobWorkspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn resultdir(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join(CONFIG_FILE_NAME)
    }

    pub fn env_path(&self) -> PathBuf {
        self.dir.path().join(ENV_FILE_NAME)
    }

    pub fn write_config(&self, text: &str) -> PathBuf {
        let path = self.config_path();
        fs::write(&path, text).unwrap();
        path
    }

    /// Save an environment pointing at this directory, as a first `up` would
    pub fn seed_env(&self, user: &str) -> Environment {
        let env = Environment::new()
            .with_resultdir(self.resultdir())
            .with_config_file(self.config_path())
            .with_user(user);
        save_env(&env).unwrap();
        env
    }

    pub fn env_bytes(&self) -> Vec<u8> {
        fs::read(self.env_path()).unwrap()
    }
}

impl Default for JobWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

pub fn node(name: &str) -> Value {
    Value::from(name)
}
