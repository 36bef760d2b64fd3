//! Task definition
//!
//! A task pairs a body with the description given when it was defined. The
//! description is what catalogs show; the body's own doc comments are not
//! consulted.

use crate::invocation::Invocation;
use std::fmt;

/// Result of a task body; the error type is opaque to the harness
pub type TaskResult = anyhow::Result<()>;

type TaskBody = Box<dyn Fn(&mut Invocation) -> TaskResult>;

/// A named unit of work run once per invocation
pub struct Task {
    name: String,
    doc: String,
    body: TaskBody,
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("doc", &self.doc)
            .finish_non_exhaustive()
    }
}

impl Task {
    /// Define a task
    ///
    /// # Example
    /// ```rust,ignore
    /// let up = Task::new("up", "Get resources and install the stack.", |inv| {
    ///     let (provider, env) = inv.provider_and_env()?;
    ///     env.nodes = provider.init(&env.config)?;
    ///     env.mark_phase("up");
    ///     Ok(())
    /// });
    /// ```
    pub fn new<F>(name: impl Into<String>, doc: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut Invocation) -> TaskResult + 'static,
    {
        Self {
            name: name.into(),
            doc: doc.into(),
            body: Box::new(body),
        }
    }

    /// Task name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Description given at definition time
    #[inline]
    #[must_use]
    pub fn doc(&self) -> &str {
        &self.doc
    }

    /// Run the body against an invocation context
    ///
    /// # Errors
    /// Whatever the body returns
    pub fn run(&self, invocation: &mut Invocation) -> TaskResult {
        (self.body)(invocation)
    }
}
