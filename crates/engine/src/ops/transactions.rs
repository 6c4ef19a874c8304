//! Transaction operations.
//!
//! Writes live in `write/` (one file per mutation), reads in `list.rs`, and
//! the loading/linking helpers they share in `helpers.rs`.

mod helpers;
mod list;
mod write;

pub use list::TransactionListFilter;
pub use write::DeleteOutcome;
