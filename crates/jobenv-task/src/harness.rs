//! Task harness
//!
//! Runs one task with its environment prepared and persisted around it:
//!
//! 1. Load the environment through the store
//! 2. Resolve `--provider`, if given
//! 3. Run the task body with environment and provider injected
//! 4. Save the environment through the store
//!
//! A failure at any step ends the invocation there. In particular a failing
//! task body never reaches step 4, so the `env` file on disk only ever holds
//! the state of the last clean run.

use crate::args::TaskArgs;
use crate::error::HarnessError;
use crate::invocation::{Invocation, InvocationId, InvocationReport};
use crate::phase::{InvocationPhase, PhaseTrace};
use crate::registry::ProviderRegistry;
use crate::task::Task;
use chrono::Utc;
use jobenv_store::{EnvStore, YamlEnvStore};
use std::path::{Path, PathBuf};

/// Harness configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Directory the environment is loaded from; `None` starts a fresh
    /// environment on every invocation
    pub working_dir: Option<PathBuf>,
}

impl HarnessConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With working directory
    #[inline]
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

/// Owns environment load and save around plain task bodies
#[derive(Debug)]
pub struct TaskHarness<S = YamlEnvStore> {
    config: HarnessConfig,
    providers: ProviderRegistry,
    store: S,
}

impl TaskHarness<YamlEnvStore> {
    /// Harness over YAML files on the local filesystem
    #[inline]
    #[must_use]
    pub fn new(config: HarnessConfig, providers: ProviderRegistry) -> Self {
        Self::with_store(config, providers, YamlEnvStore::new())
    }
}

impl<S: EnvStore> TaskHarness<S> {
    /// Harness over a custom store
    #[inline]
    #[must_use]
    pub fn with_store(config: HarnessConfig, providers: ProviderRegistry, store: S) -> Self {
        Self {
            config,
            providers,
            store,
        }
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Provider registry
    #[inline]
    #[must_use]
    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }

    /// Environment store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Working directory environments are loaded from
    #[must_use]
    pub fn working_dir(&self) -> Option<&Path> {
        self.config.working_dir.as_deref()
    }

    /// Invoke `task` with `args`
    ///
    /// `--provider` is removed from `args` and replaced by the built provider;
    /// everything else is forwarded as is.
    ///
    /// # Errors
    /// - `HarnessError::Config` if the environment cannot be loaded
    /// - `HarnessError::ProviderNotFound` if `--provider` does not resolve
    /// - `HarnessError::Task` with the body's own error if the body fails
    /// - `HarnessError::Persist` if the environment cannot be written
    /// - `HarnessError::Phase` if a step is taken out of order
    pub fn invoke(&self, task: &Task, mut args: TaskArgs) -> Result<InvocationReport, HarnessError> {
        let id = InvocationId::new();
        let span = tracing::info_span!("task", name = task.name(), invocation = %id);
        let _entered = span.enter();

        let started_at = Utc::now();
        let mut trace = PhaseTrace::new();
        tracing::info!("Running task {}", task.name());

        let env = self.store.load(self.working_dir())?;
        trace.advance(InvocationPhase::EnvLoaded)?;

        let provider = match args.take_provider()? {
            Some(name) => {
                let provider = self.providers.resolve(&name)?;
                tracing::debug!("Resolved provider {} as {}", name, provider.class_name());
                trace.advance(InvocationPhase::ProviderResolved)?;
                Some(provider)
            }
            None => None,
        };

        let mut invocation = Invocation::new(id, args, env, provider);
        trace.advance(InvocationPhase::TaskRunning)?;
        if let Err(error) = task.run(&mut invocation) {
            tracing::warn!("Task {} failed: {:#}", task.name(), error);
            return Err(HarnessError::Task(error));
        }
        trace.advance(InvocationPhase::TaskDone)?;

        let save = self.store.save(&invocation.env)?;
        trace.advance(InvocationPhase::EnvSaved)?;
        tracing::info!("Task {} completed (phase: {:?})", task.name(), invocation.env.phase);

        Ok(InvocationReport {
            id,
            task: task.name().to_string(),
            phases: trace.into_phases(),
            save,
            env: invocation.env,
            started_at,
            finished_at: Utc::now(),
        })
    }
}
