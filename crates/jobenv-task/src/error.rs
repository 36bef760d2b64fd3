//! Error types for the task harness
//!
//! Provides error handling for:
//! - Provider registration and resolution
//! - Task catalog management
//! - Tracing subscriber installation
//! - The invocation itself (`HarnessError`)

use crate::phase::{InvocationPhase, PhaseError};
use jobenv_store::{ConfigError, PersistError};

/// Provider name did not resolve to a registered component
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderNotFoundError {
    /// Nothing is registered under the lower-cased name
    #[error("no provider registered under '{name}' (known: {})", .known.join(", "))]
    Unregistered {
        /// Lower-cased name that was looked up
        name: String,
        /// Names that are registered
        known: Vec<String>,
    },

    /// The registered component does not expose the capitalised class
    #[error("provider '{name}' does not expose class '{class}' (found '{found}')")]
    MissingClass {
        /// Lower-cased registration name
        name: String,
        /// Class identifier expected for that name
        class: String,
        /// Class identifier the built component reports
        found: String,
    },

    /// The `--provider` argument is not a scalar
    #[error("invalid provider name: {0}")]
    InvalidName(String),
}

/// Errors while building a provider registry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Name already taken (compared lower-cased)
    #[error("provider '{0}' is already registered")]
    AlreadyRegistered(String),

    /// Providers need a non-empty name
    #[error("provider name must not be empty")]
    EmptyName,
}

/// Failure reported by a provider implementation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// Resources could not be acquired
    #[error("provider {provider} failed to acquire resources: {message}")]
    Acquisition {
        /// Provider that failed
        provider: String,
        /// What went wrong
        message: String,
    },

    /// Resources could not be released
    #[error("provider {provider} failed to release resources: {message}")]
    Release {
        /// Provider that failed
        provider: String,
        /// What went wrong
        message: String,
    },
}

impl ProviderError {
    /// Create acquisition error
    pub fn acquisition(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Acquisition {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create release error
    pub fn release(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Release {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

/// Errors while building a task catalog
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// Two tasks share a name
    #[error("task '{0}' is already in the catalog")]
    DuplicateTask(String),
}

/// Errors while installing the tracing subscriber
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The filter directives do not parse
    #[error("invalid log filter: {0}")]
    InvalidFilter(String),

    /// A global subscriber is already set
    #[error("tracing already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Failure of one task invocation
///
/// Every variant aborts the invocation. Only a clean run reaches the save step,
/// so none of these leave a partially updated `env` file behind.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// Environment or configuration file could not be loaded
    #[error("environment load failed: {0}")]
    Config(#[from] ConfigError),

    /// `--provider` named no registered component
    #[error("provider resolution failed: {0}")]
    ProviderNotFound(#[from] ProviderNotFoundError),

    /// The task body failed; its error is passed through untouched
    #[error(transparent)]
    Task(anyhow::Error),

    /// The environment could not be written after a successful run
    #[error("environment save failed: {0}")]
    Persist(#[from] PersistError),

    /// A harness step was taken out of order
    #[error("invocation out of order: {0}")]
    Phase(#[from] PhaseError),
}

impl HarnessError {
    /// Last phase reached before the failure
    #[must_use]
    pub fn failed_in(&self) -> InvocationPhase {
        match self {
            Self::Config(_) => InvocationPhase::Start,
            Self::ProviderNotFound(_) => InvocationPhase::EnvLoaded,
            Self::Task(_) => InvocationPhase::TaskRunning,
            Self::Persist(_) => InvocationPhase::TaskDone,
            Self::Phase(error) => error.from,
        }
    }

    /// Whether the task body ever ran
    #[inline]
    #[must_use]
    pub fn task_started(&self) -> bool {
        match self {
            Self::Task(_) | Self::Persist(_) => true,
            Self::Phase(error) => matches!(
                error.from,
                InvocationPhase::TaskRunning | InvocationPhase::TaskDone | InvocationPhase::EnvSaved
            ),
            Self::Config(_) | Self::ProviderNotFound(_) => false,
        }
    }

    /// The task body's own error, if that is what failed
    #[must_use]
    pub fn into_task_error(self) -> Option<anyhow::Error> {
        match self {
            Self::Task(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobenv_store::FileKind;

    #[test]
    fn unregistered_lists_known_names() {
        let err = ProviderNotFoundError::Unregistered {
            name: "chameleon".to_string(),
            known: vec!["g5k".to_string(), "vagrant".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "no provider registered under 'chameleon' (known: g5k, vagrant)"
        );
    }

    #[test]
    fn task_error_display_is_unchanged() {
        let err = HarnessError::Task(anyhow::anyhow!("deploy exploded"));
        assert_eq!(err.to_string(), "deploy exploded");
        assert_eq!(err.failed_in(), InvocationPhase::TaskRunning);
        assert!(err.task_started());
        assert_eq!(err.into_task_error().unwrap().to_string(), "deploy exploded");
    }

    #[test]
    fn load_failures_happen_before_the_task() {
        let err: HarnessError =
            ConfigError::malformed(FileKind::Configuration, "/tmp/job.yaml", "bad").into();
        assert_eq!(err.failed_in(), InvocationPhase::Start);
        assert!(!err.task_started());
        assert!(err.into_task_error().is_none());

        let err: HarnessError = ProviderNotFoundError::InvalidName("[1, 2]".to_string()).into();
        assert_eq!(err.failed_in(), InvocationPhase::EnvLoaded);
        assert!(!err.task_started());
    }

    #[test]
    fn out_of_order_step_is_an_error() {
        let err: HarnessError = PhaseError {
            from: InvocationPhase::EnvLoaded,
            to: InvocationPhase::TaskDone,
        }
        .into();
        assert_eq!(err.failed_in(), InvocationPhase::EnvLoaded);
        assert!(!err.task_started());
        assert!(err.to_string().contains("ENV_LOADED -> TASK_DONE"));

        let err: HarnessError = PhaseError {
            from: InvocationPhase::TaskDone,
            to: InvocationPhase::Start,
        }
        .into();
        assert!(err.task_started());
    }

    #[test]
    fn provider_error_display() {
        let err = ProviderError::acquisition("Static", "no nodes left");
        assert_eq!(
            err.to_string(),
            "provider Static failed to acquire resources: no nodes left"
        );
    }
}
