mod create;
mod delete;
mod update;

pub use delete::DeleteOutcome;
