//! Provider registry
//!
//! Maps lower-case provider names to factories. Built once by the caller,
//! then only read while tasks run.

use crate::error::{ProviderNotFoundError, RegistryError};
use crate::provider::{canonical_name, class_identifier, Provider};
use std::collections::BTreeMap;
use std::fmt;

/// Builds a fresh provider instance
pub type ProviderFactory = Box<dyn Fn() -> Box<dyn Provider> + Send + Sync>;

struct Registration {
    class: String,
    factory: ProviderFactory,
}

/// Name → provider factory
#[derive(Default)]
pub struct ProviderRegistry {
    entries: BTreeMap<String, Registration>,
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.names())
            .finish()
    }
}

impl ProviderRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Register a provider type built with `Default`
    ///
    /// # Errors
    /// - `RegistryError::EmptyName` for an empty name
    /// - `RegistryError::AlreadyRegistered` if the lower-cased name is taken
    pub fn register<P>(&mut self, name: &str) -> Result<(), RegistryError>
    where
        P: Provider + Default + 'static,
    {
        self.register_factory(name, || -> Box<dyn Provider> { Box::new(P::default()) })
    }

    /// Register a factory closure
    ///
    /// # Errors
    /// Same as [`register`](Self::register).
    pub fn register_factory<F>(&mut self, name: &str, factory: F) -> Result<(), RegistryError>
    where
        F: Fn() -> Box<dyn Provider> + Send + Sync + 'static,
    {
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }

        let key = canonical_name(name);
        if self.entries.contains_key(&key) {
            return Err(RegistryError::AlreadyRegistered(key));
        }

        let class = class_identifier(&key);
        tracing::debug!("Registered provider {} ({})", key, class);
        self.entries.insert(
            key,
            Registration {
                class,
                factory: Box::new(factory),
            },
        );
        Ok(())
    }

    /// Build the provider registered under `name` (case-insensitive)
    ///
    /// # Errors
    /// - `ProviderNotFoundError::Unregistered` if no provider has that name
    /// - `ProviderNotFoundError::MissingClass` if the built component's class
    ///   identifier is not the capitalised name
    pub fn resolve(&self, name: &str) -> Result<Box<dyn Provider>, ProviderNotFoundError> {
        let key = canonical_name(name);
        let registration =
            self.entries
                .get(&key)
                .ok_or_else(|| ProviderNotFoundError::Unregistered {
                    name: key.clone(),
                    known: self.names().into_iter().map(str::to_string).collect(),
                })?;

        let provider = (registration.factory)();
        if provider.class_name() != registration.class {
            return Err(ProviderNotFoundError::MissingClass {
                name: key,
                class: registration.class.clone(),
                found: provider.class_name().to_string(),
            });
        }

        Ok(provider)
    }

    /// Class identifier expected for a registered name
    #[must_use]
    pub fn class_of(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&canonical_name(name))
            .map(|r| r.class.as_str())
    }

    /// Whether `name` is registered (case-insensitive)
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&canonical_name(name))
    }

    /// Registered names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Number of registered providers
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no provider is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
