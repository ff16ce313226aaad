#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod cancel;
pub mod config;
pub mod error;
pub mod job;
pub mod journal;
pub mod naming;
pub mod observer;
pub mod operations;
pub mod output;
pub mod preview;
pub mod selection;

pub use cancel::CancelFlag;
pub use config::{Config, DefaultsConfig};
pub use error::RenameError;
pub use job::{
    ExecutionMode, FailedItem, JobHandle, JobOptions, JobOutcome, JobReport, JobState,
    RenameJob, RenamedItem,
};
pub use journal::Journal;
pub use naming::{extension_with_dot, IndexedName, NamingPolicy};
pub use observer::{JobEvent, Observers};
pub use operations::{plan_operation, rename_operation, RenameOptions};
pub use output::{OutputFormat, OutputFormatter, PreviewResult, RenameResult, VersionResult};
pub use preview::{
    percent_complete, render_progress_line, render_table, should_use_color,
};
pub use selection::{Selection, DEFAULT_EXTENSIONS};
