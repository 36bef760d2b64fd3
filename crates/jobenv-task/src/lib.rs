//! jobenv Task Harness
//!
//! Wraps task bodies so that each invocation:
//! - Recovers the environment left by the previous task
//! - Re-reads the job configuration
//! - Builds the provider named by `--provider`, if any
//! - Runs the body with environment and provider injected
//! - Persists the environment for the next task
//!
//! # Architecture
//!
//! ```text
//! caller ─→ TaskHarness::invoke ─→ EnvStore::load ─→ ProviderRegistry::resolve
//!                                                           │
//!            InvocationReport ←─ EnvStore::save ←─ Task body (Invocation)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use jobenv_task::prelude::*;
//!
//! let mut providers = ProviderRegistry::new();
//! providers.register::<Vagrant>("vagrant")?;
//!
//! let up = Task::new("up", "Get resources and install the stack.", |inv| {
//!     let (provider, env) = inv.provider_and_env()?;
//!     env.nodes = provider.init(&env.config)?;
//!     env.mark_phase("up");
//!     Ok(())
//! });
//!
//! let harness = TaskHarness::new(
//!     HarnessConfig::new().with_working_dir("results/current"),
//!     providers,
//! );
//! harness.invoke(&up, TaskArgs::new().with_provider("vagrant"))?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod args;
pub mod catalog;
pub mod error;
pub mod harness;
pub mod invocation;
pub mod phase;
pub mod provider;
pub mod registry;
pub mod task;
pub mod telemetry;

// Re-exports for convenience
pub use args::{TaskArgs, PROVIDER_ARG};
pub use catalog::TaskCatalog;
pub use error::{
    CatalogError, HarnessError, ProviderError, ProviderNotFoundError, RegistryError,
    TelemetryError,
};
pub use harness::{HarnessConfig, TaskHarness};
pub use invocation::{Invocation, InvocationId, InvocationReport};
pub use phase::{allowed_transitions, validate_transition, InvocationPhase, PhaseError, PhaseTrace};
pub use provider::{class_identifier, Provider};
pub use registry::{ProviderFactory, ProviderRegistry};
pub use task::{Task, TaskResult};
pub use telemetry::{init_tracing, LogFormat};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for defining and running tasks
    pub use crate::{
        HarnessConfig, HarnessError, Invocation, InvocationReport, Provider, ProviderError,
        ProviderRegistry, Task, TaskArgs, TaskCatalog, TaskHarness, TaskResult,
    };
    pub use jobenv_store::{ConfigMap, Environment, Roles};
}
