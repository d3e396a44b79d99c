use crate::capability::Task;
use crate::error::RegistryError;
use std::collections::HashMap;
use std::sync::Arc;

/// Tasks available to hooks, keyed by name.
#[derive(Default)]
pub struct TaskRegistry {
    tasks: HashMap<String, Arc<dyn Task>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, task: Arc<dyn Task>) -> Result<(), RegistryError> {
        let name = task.name().to_string();
        if self.tasks.contains_key(&name) {
            return Err(RegistryError::AlreadyExists { name });
        }
        self.tasks.insert(name, task);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<Arc<dyn Task>, RegistryError> {
        self.tasks
            .remove(name)
            .ok_or_else(|| RegistryError::NotFound { name: name.to_string() })
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn Task>, RegistryError> {
        self.tasks
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound { name: name.to_string() })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Registered task names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tasks.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for TaskRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskRegistry").field("tasks", &self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::FnTask;

    fn task(name: &str) -> Arc<dyn Task> {
        Arc::new(FnTask::new(name, |_| Ok(())))
    }

    #[test]
    fn add_get_remove() {
        let mut registry = TaskRegistry::new();
        registry.add(task("b")).unwrap();
        registry.add(task("a")).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["a", "b"]);
        assert_eq!(registry.get("a").unwrap().name(), "a");

        let removed = registry.remove("a").unwrap();
        assert_eq!(removed.name(), "a");
        assert!(!registry.contains("a"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_add_leaves_registry_unchanged() {
        let mut registry = TaskRegistry::new();
        let first = task("charge");
        registry.add(first.clone()).unwrap();

        let err = registry.add(task("charge")).unwrap_err();
        assert_eq!(err, RegistryError::AlreadyExists { name: "charge".to_string() });
        assert_eq!(registry.len(), 1);
        assert!(Arc::ptr_eq(&registry.get("charge").unwrap(), &first));
    }

    #[test]
    fn missing_names_are_not_found() {
        let mut registry = TaskRegistry::new();
        registry.add(task("keep")).unwrap();

        assert!(matches!(
            registry.remove("gone"),
            Err(RegistryError::NotFound { name }) if name == "gone"
        ));
        assert!(registry.get("gone").is_err());
        assert_eq!(registry.names(), vec!["keep"]);
    }
}
