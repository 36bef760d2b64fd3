//! Provider contract
//!
//! A provider acquires resources for a job and assigns them to roles. Tasks
//! get one when they are invoked with `--provider <name>`; it is built fresh
//! for that invocation and is never persisted.

use crate::error::ProviderError;
use jobenv_store::{ConfigMap, Environment, Roles};
use std::fmt;

/// Pluggable backend selected by name at invocation time
///
/// Implementations are built with no arguments (see
/// [`ProviderRegistry::register`](crate::registry::ProviderRegistry::register)).
pub trait Provider: fmt::Debug {
    /// Class identifier, the capitalised registration name (`Vagrant` for `vagrant`)
    fn class_name(&self) -> &str;

    /// Acquire resources described by `config` and return the role assignment
    ///
    /// # Errors
    /// `ProviderError::Acquisition` when resources cannot be obtained
    fn init(&mut self, config: &ConfigMap) -> Result<Roles, ProviderError>;

    /// Release resources held for `env`
    ///
    /// # Errors
    /// `ProviderError::Release` when resources cannot be released
    fn destroy(&mut self, env: &Environment) -> Result<(), ProviderError> {
        let _ = env;
        Ok(())
    }
}

/// Registry key for a provider name
#[inline]
#[must_use]
pub fn canonical_name(name: &str) -> String {
    name.to_lowercase()
}

/// Class identifier expected for a provider name
///
/// First character upper case, the rest lower case: `g5K` → `G5k`.
#[must_use]
pub fn class_identifier(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
