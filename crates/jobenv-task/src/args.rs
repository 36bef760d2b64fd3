//! Task arguments
//!
//! Whatever the caller parsed from its own command line: positional values and
//! `--option` keyed values. The harness consumes [`PROVIDER_ARG`] and forwards
//! the rest to the task body.

use crate::error::ProviderNotFoundError;
use serde_yaml::Value;
use std::collections::BTreeMap;

/// Reserved option naming the provider to build for the task
pub const PROVIDER_ARG: &str = "--provider";

/// Arguments of one task invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskArgs {
    positional: Vec<Value>,
    options: BTreeMap<String, Value>,
}

impl TaskArgs {
    /// Create empty argument set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With positional value appended
    #[must_use]
    pub fn with_positional(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// With keyword option
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// With boolean flag set
    #[must_use]
    pub fn with_flag(self, key: impl Into<String>) -> Self {
        self.with_option(key, true)
    }

    /// With `--provider` set
    #[must_use]
    pub fn with_provider(self, name: impl Into<String>) -> Self {
        let name: String = name.into();
        self.with_option(PROVIDER_ARG, name)
    }

    /// Positional values in order
    #[must_use]
    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    /// Keyword options
    #[must_use]
    pub fn options(&self) -> &BTreeMap<String, Value> {
        &self.options
    }

    /// Option value by key
    #[must_use]
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Option value as a string
    #[must_use]
    pub fn option_str(&self, key: &str) -> Option<&str> {
        self.option(key).and_then(Value::as_str)
    }

    /// Whether a boolean flag is set to `true`
    #[must_use]
    pub fn flag(&self, key: &str) -> bool {
        self.option(key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Whether an option is present
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    /// Remove `--provider` and return its name
    ///
    /// A null value means no provider. Numbers and booleans are taken as
    /// their text form.
    pub(crate) fn take_provider(&mut self) -> Result<Option<String>, ProviderNotFoundError> {
        match self.options.remove(PROVIDER_ARG) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(name)) => Ok(Some(name)),
            Some(Value::Bool(flag)) => Ok(Some(flag.to_string())),
            Some(Value::Number(number)) => Ok(Some(number.to_string())),
            Some(other) => Err(ProviderNotFoundError::InvalidName(
                serde_yaml::to_string(&other)
                    .map(|s| s.trim_end().to_string())
                    .unwrap_or_else(|_| format!("{other:?}")),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_and_flags() {
        let args = TaskArgs::new()
            .with_positional("site.yaml")
            .with_flag("--force-deploy")
            .with_option("--env", "results/current");

        assert_eq!(args.positional(), &[Value::from("site.yaml")]);
        assert!(args.flag("--force-deploy"));
        assert!(!args.flag("--reservation"));
        assert_eq!(args.option_str("--env"), Some("results/current"));
        assert!(args.contains("--env"));
    }

    #[test]
    fn take_provider_removes_the_option() {
        let mut args = TaskArgs::new().with_provider("Vagrant").with_flag("--force");

        assert_eq!(args.take_provider().unwrap(), Some("Vagrant".to_string()));
        assert!(!args.contains(PROVIDER_ARG));
        assert!(args.flag("--force"));
        assert_eq!(args.take_provider().unwrap(), None);
    }

    #[test]
    fn null_provider_is_absent() {
        let mut args = TaskArgs::new().with_option(PROVIDER_ARG, Value::Null);
        assert_eq!(args.take_provider().unwrap(), None);
        assert!(!args.contains(PROVIDER_ARG));
    }

    #[test]
    fn scalar_provider_is_text() {
        let mut args = TaskArgs::new().with_option(PROVIDER_ARG, 5);
        assert_eq!(args.take_provider().unwrap(), Some("5".to_string()));
    }

    #[test]
    fn sequence_provider_is_invalid() {
        let mut args = TaskArgs::new().with_option(
            PROVIDER_ARG,
            Value::Sequence(vec![Value::from("a"), Value::from("b")]),
        );
        assert!(matches!(
            args.take_provider(),
            Err(ProviderNotFoundError::InvalidName(_))
        ));
    }
}
