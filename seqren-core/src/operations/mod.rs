//! High-level operations that correspond to CLI commands
//!
//! These modules contain the core business logic for each seqren operation,
//! separated from CLI concerns like argument parsing and output formatting.

pub mod plan;
pub mod rename;

pub use plan::plan_operation;
pub use rename::{rename_operation, RenameOptions};
