//! CLI command handlers, one per file.

mod list;
mod sync;

pub use list::run_list;
pub use sync::run_sync;
