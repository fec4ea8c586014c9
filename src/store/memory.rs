use super::TaskRepository;
use crate::errors::TaskError;
use crate::filter::CompiledQuery;
use crate::query::{compare_docs, eval_filter};
use crate::task::Task;
use crate::types::TaskId;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;

#[derive(Default)]
struct Inner {
    tasks: HashMap<TaskId, Task>,
    order: Vec<TaskId>,
}

/// Thread-safe in-memory task collection.
#[derive(Default)]
pub struct MemoryTaskStore {
    inner: RwLock<Inner>,
}

impl MemoryTaskStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let store = Self::new();
        for t in tasks {
            store.insert(t);
        }
        store
    }

    /// Loads a JSON array of tasks.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a JSON array of tasks.
    pub fn load_json(path: &Path) -> Result<Self, TaskError> {
        let s = std::fs::read_to_string(path)?;
        let tasks: Vec<Task> = serde_json::from_str(&s)?;
        log::info!("loaded {} tasks from {}", tasks.len(), path.display());
        Ok(Self::from_tasks(tasks))
    }

    #[must_use]
    pub fn all(&self) -> Vec<Task> {
        let inner = self.inner.read();
        inner.order.iter().filter_map(|id| inner.tasks.get(id).cloned()).collect()
    }
}

impl TaskRepository for MemoryTaskStore {
    fn insert(&self, task: Task) -> TaskId {
        let id = task.id.clone();
        let mut inner = self.inner.write();
        if inner.tasks.insert(id.clone(), task).is_none() {
            inner.order.push(id.clone());
        }
        id
    }

    fn get(&self, id: &TaskId) -> Option<Task> {
        self.inner.read().tasks.get(id).cloned()
    }

    fn replace(&self, task: Task) -> bool {
        let mut inner = self.inner.write();
        match inner.tasks.get_mut(&task.id) {
            Some(slot) => {
                *slot = task;
                true
            }
            None => false,
        }
    }

    fn remove(&self, id: &TaskId) -> bool {
        let mut inner = self.inner.write();
        if inner.tasks.remove(id).is_some() {
            inner.order.retain(|x| x != id);
            true
        } else {
            false
        }
    }

    fn find(&self, query: &CompiledQuery) -> Vec<Task> {
        let filter = query.to_filter();
        let sort = query.sort_specs();
        let mut hits: Vec<(bson::Document, Task)> = {
            let inner = self.inner.read();
            inner
                .order
                .iter()
                .filter_map(|id| inner.tasks.get(id))
                .filter_map(|t| {
                    let d = t.to_document();
                    eval_filter(&d, &filter).then(|| (d, t.clone()))
                })
                .collect()
        };
        if !sort.is_empty() {
            // Stable: ties keep insertion order.
            hits.sort_by(|a, b| compare_docs(&a.0, &b.0, &sort));
        }
        hits.into_iter().map(|(_, t)| t).collect()
    }

    fn len(&self) -> usize {
        self.inner.read().tasks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterCriteria, compile};
    use crate::task::TaskRequest;
    use crate::types::TaskStatus;

    fn task(title: &str, status: TaskStatus, priority: i32) -> Task {
        Task::from_request(TaskRequest::new(title, status, priority), None)
    }

    #[test]
    fn insert_get_replace_remove() {
        let store = MemoryTaskStore::new();
        let mut t = task("a", TaskStatus::Todo, 1);
        let id = store.insert(t.clone());
        assert_eq!(store.get(&id).unwrap().title, "a");
        t.title = "b".into();
        assert!(store.replace(t));
        assert_eq!(store.get(&id).unwrap().title, "b");
        assert!(store.remove(&id));
        assert!(!store.remove(&id));
        assert!(store.is_empty());
    }

    #[test]
    fn replace_missing_is_false() {
        let store = MemoryTaskStore::new();
        assert!(!store.replace(task("ghost", TaskStatus::Done, 2)));
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn unsorted_find_keeps_insertion_order() {
        let store = MemoryTaskStore::from_tasks(vec![
            task("first", TaskStatus::Todo, 5),
            task("second", TaskStatus::Done, 1),
            task("third", TaskStatus::Todo, 3),
        ]);
        let titles: Vec<String> = store
            .find(&compile(&FilterCriteria::new().status(TaskStatus::Todo)))
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["first", "third"]);
    }

    #[test]
    fn sorted_find_orders_by_field() {
        let store = MemoryTaskStore::from_tasks(vec![
            task("p2", TaskStatus::Todo, 2),
            task("p5", TaskStatus::Todo, 5),
            task("p1", TaskStatus::Todo, 1),
        ]);
        let desc = store.find(&compile(&FilterCriteria::new().sort_by("priority").sort_direction("DESC")));
        let prios: Vec<i32> = desc.iter().map(|t| t.priority).collect();
        assert_eq!(prios, vec![5, 2, 1]);
    }
}
