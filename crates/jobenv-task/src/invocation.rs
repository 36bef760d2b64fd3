//! Invocation context and report
//!
//! `Invocation` is what a task body receives: the forwarded arguments, the
//! loaded environment and the provider, if one was requested. The body
//! mutates `env` in place; the harness saves whatever it holds afterwards.

use crate::args::TaskArgs;
use crate::phase::InvocationPhase;
use crate::provider::Provider;
use chrono::{DateTime, Utc};
use jobenv_store::{Environment, SaveOutcome};
use std::fmt;
use ulid::Ulid;

/// Identifier of one task invocation, used to correlate log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InvocationId(Ulid);

impl InvocationId {
    /// Generate a new identifier
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Underlying ULID
    #[inline]
    #[must_use]
    pub fn as_ulid(&self) -> Ulid {
        self.0
    }
}

impl Default for InvocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InvocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Context handed to a task body
#[derive(Debug)]
pub struct Invocation {
    id: InvocationId,
    /// Caller arguments, without `--provider`
    pub args: TaskArgs,
    /// Environment loaded for this invocation
    pub env: Environment,
    /// Provider built from `--provider`, if given
    pub provider: Option<Box<dyn Provider>>,
}

impl Invocation {
    /// Assemble an invocation context
    #[must_use]
    pub fn new(
        id: InvocationId,
        args: TaskArgs,
        env: Environment,
        provider: Option<Box<dyn Provider>>,
    ) -> Self {
        Self {
            id,
            args,
            env,
            provider,
        }
    }

    /// Identifier of this invocation
    #[inline]
    #[must_use]
    pub fn id(&self) -> InvocationId {
        self.id
    }

    /// The provider, for tasks that cannot run without one
    ///
    /// # Errors
    /// When the task was invoked without `--provider`
    pub fn require_provider(&mut self) -> anyhow::Result<&mut dyn Provider> {
        Ok(self.provider.as_deref_mut().ok_or_else(missing_provider)?)
    }

    /// The provider and the environment, borrowed together
    ///
    /// Lets a body feed `env.config` to the provider and store the result
    /// back into `env`:
    ///
    /// ```rust,ignore
    /// let (provider, env) = inv.provider_and_env()?;
    /// env.nodes = provider.init(&env.config)?;
    /// ```
    ///
    /// # Errors
    /// When the task was invoked without `--provider`
    pub fn provider_and_env(&mut self) -> anyhow::Result<(&mut dyn Provider, &mut Environment)> {
        let provider = self.provider.as_deref_mut().ok_or_else(missing_provider)?;
        Ok((provider, &mut self.env))
    }
}

fn missing_provider() -> anyhow::Error {
    anyhow::anyhow!("this task needs a provider, pass --provider <name>")
}

/// Outcome of a successful invocation
#[derive(Debug, Clone)]
pub struct InvocationReport {
    /// Invocation identifier
    pub id: InvocationId,
    /// Task name
    pub task: String,
    /// Phases traversed, `Start` through `EnvSaved`
    pub phases: Vec<InvocationPhase>,
    /// Whether the environment reached disk
    pub save: SaveOutcome,
    /// Environment as saved
    pub env: Environment,
    /// When the invocation began
    pub started_at: DateTime<Utc>,
    /// When the environment was saved
    pub finished_at: DateTime<Utc>,
}

impl InvocationReport {
    /// Whether a provider was resolved for this run
    #[must_use]
    pub fn provider_resolved(&self) -> bool {
        self.phases.contains(&InvocationPhase::ProviderResolved)
    }

    /// Wall-clock time of the invocation
    #[must_use]
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use jobenv_store::{ConfigMap, Roles};
    use serde_yaml::Value;

    #[test]
    fn ids_are_unique() {
        let a = InvocationId::new();
        let b = InvocationId::new();
        assert_ne!(a, b);
        assert_eq!(a.to_string().len(), 26);
    }

    #[test]
    fn require_provider_without_one_fails() {
        let mut invocation =
            Invocation::new(InvocationId::new(), TaskArgs::new(), Environment::new(), None);

        let err = invocation.require_provider().unwrap_err();
        assert!(err.to_string().contains("--provider"));
        assert!(invocation.provider_and_env().is_err());
    }

    #[derive(Debug)]
    struct OneNode;

    impl Provider for OneNode {
        fn class_name(&self) -> &str {
            "Onenode"
        }

        fn init(&mut self, config: &ConfigMap) -> Result<Roles, ProviderError> {
            let host = config.get("host").cloned().unwrap_or_default();
            Ok(Roles::from([("control".to_string(), vec![host])]))
        }
    }

    #[test]
    fn provider_reads_config_and_fills_nodes() {
        let mut env = Environment::new();
        env.config.insert("host".into(), Value::from("node-1"));
        let mut invocation =
            Invocation::new(InvocationId::new(), TaskArgs::new(), env, Some(Box::new(OneNode)));

        let (provider, env) = invocation.provider_and_env().unwrap();
        env.nodes = provider.init(&env.config).unwrap();

        assert_eq!(invocation.env.role("control"), &[Value::from("node-1")]);
        assert_eq!(invocation.require_provider().unwrap().class_name(), "Onenode");
    }

    #[test]
    fn report_tracks_provider_phase() {
        let now = Utc::now();
        let report = InvocationReport {
            id: InvocationId::new(),
            task: "up".to_string(),
            phases: vec![
                InvocationPhase::Start,
                InvocationPhase::EnvLoaded,
                InvocationPhase::TaskRunning,
                InvocationPhase::TaskDone,
                InvocationPhase::EnvSaved,
            ],
            save: SaveOutcome::Skipped,
            env: Environment::new(),
            started_at: now,
            finished_at: now,
        };

        assert!(!report.provider_resolved());
        assert_eq!(report.elapsed(), chrono::Duration::zero());
    }
}
