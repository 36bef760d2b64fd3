//! Task catalog
//!
//! Name-keyed set of tasks a caller can list and pick from.

use crate::error::CatalogError;
use crate::task::Task;
use std::collections::BTreeMap;

/// Tasks by name, listed in name order
#[derive(Debug, Default)]
pub struct TaskCatalog {
    tasks: BTreeMap<String, Task>,
}

impl TaskCatalog {
    /// Create empty catalog
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: BTreeMap::new(),
        }
    }

    /// Add a task
    ///
    /// # Errors
    /// `CatalogError::DuplicateTask` if the name is taken
    pub fn register(&mut self, task: Task) -> Result<(), CatalogError> {
        if self.tasks.contains_key(task.name()) {
            return Err(CatalogError::DuplicateTask(task.name().to_string()));
        }
        self.tasks.insert(task.name().to_string(), task);
        Ok(())
    }

    /// Task by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Task> {
        self.tasks.get(name)
    }

    /// `(name, description)` for every task
    #[must_use]
    pub fn describe(&self) -> Vec<(&str, &str)> {
        self.tasks
            .values()
            .map(|task| (task.name(), task.doc()))
            .collect()
    }

    /// Task names
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.tasks.keys().map(String::as_str).collect()
    }

    /// Number of tasks
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(name: &str, doc: &str) -> Task {
        Task::new(name, doc, |_| Ok(()))
    }

    #[test]
    fn describe_lists_definition_docs() {
        let mut catalog = TaskCatalog::new();
        catalog.register(noop("up", "Get resources.")).unwrap();
        catalog.register(noop("destroy", "Release resources.")).unwrap();

        assert_eq!(
            catalog.describe(),
            vec![("destroy", "Release resources."), ("up", "Get resources.")]
        );
        assert_eq!(catalog.names(), vec!["destroy", "up"]);
    }

    #[test]
    fn duplicate_task_rejected() {
        let mut catalog = TaskCatalog::new();
        catalog.register(noop("up", "first")).unwrap();

        let err = catalog.register(noop("up", "second")).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateTask("up".to_string()));
        assert_eq!(catalog.get("up").map(Task::doc), Some("first"));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn unknown_task_is_none() {
        let catalog = TaskCatalog::new();
        assert!(catalog.get("up").is_none());
        assert!(catalog.is_empty());
    }
}
