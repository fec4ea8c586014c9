//! Task storage. The service only talks to [`TaskRepository`]; the in-memory
//! implementation evaluates compiled queries with the `query` module.

mod memory;

pub use memory::MemoryTaskStore;

use crate::filter::CompiledQuery;
use crate::task::Task;
use crate::types::TaskId;

pub trait TaskRepository: Send + Sync {
    fn insert(&self, task: Task) -> TaskId;
    fn get(&self, id: &TaskId) -> Option<Task>;
    /// Overwrites the task with the same id. Returns `false` if it does not exist.
    fn replace(&self, task: Task) -> bool;
    fn remove(&self, id: &TaskId) -> bool;
    /// Runs a compiled query. Without a sort clause results keep insertion order.
    fn find(&self, query: &CompiledQuery) -> Vec<Task>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
