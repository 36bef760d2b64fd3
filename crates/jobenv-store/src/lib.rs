//! jobenv Store
//!
//! Owns the on-disk form of a job environment. A job is a sequence of
//! independently run tasks; each task loads the environment left by the
//! previous one and saves it back when it finishes.
//!
//! # Core Operations
//!
//! - **Load**: `make_env` builds a default environment, merges a persisted
//!   `env` file when one exists, then merges the live configuration file
//! - **Save**: `save_env` writes the environment into its result directory,
//!   skipping silently while that directory does not exist
//!
//! # Architecture
//!
//! ```text
//! <resultdir>/env ──┐
//!                   ├─→ make_env ─→ Environment ─→ task ─→ save_env ─→ <resultdir>/env
//! config_file ──────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use jobenv_store::{make_env, save_env};
//!
//! let mut env = make_env(Some(Path::new("results/job-42")))?;
//! env.mark_phase("deploy");
//! save_env(&env)?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod environment;
pub mod error;
pub mod store;

// Re-exports for convenience
pub use environment::{ConfigMap, Environment, Roles, ENV_FILE_NAME, RESERVED_KEYS};
pub use error::{ConfigError, FileKind, PersistError, ReservedKeyError};
pub use store::{make_env, reload_config, save_env, EnvStore, SaveOutcome, YamlEnvStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with job environments
    pub use crate::environment::{ConfigMap, Environment, Roles};
    pub use crate::error::{ConfigError, PersistError};
    pub use crate::store::{make_env, save_env, EnvStore, SaveOutcome, YamlEnvStore};
}
