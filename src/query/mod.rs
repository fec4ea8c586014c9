// Submodules for separation of concerns
mod eval;
mod types;

pub use eval::{compare_docs, eval_filter};
pub use types::{CmpOp, Filter, Order, SortSpec};
