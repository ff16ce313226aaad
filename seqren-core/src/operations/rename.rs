use crate::cancel::CancelFlag;
use crate::config::{Config, DefaultsConfig};
use crate::job::{JobOptions, RenameJob};
use crate::journal::Journal;
use crate::naming::IndexedName;
use crate::observer::JobEvent;
use crate::output::RenameResult;
use crate::selection::Selection;
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// Options shared by the plan and rename operations
#[derive(Debug, Clone, Default)]
pub struct RenameOptions {
    /// Extension filter applied while selecting files (empty = all files)
    pub extensions: Vec<String>,
    /// Zero-pad indices to this many digits
    pub pad_width: usize,
    pub job: JobOptions,
    /// Directory for the per-job log, `None` disables it
    pub journal_dir: Option<PathBuf>,
    pub cancel: Option<CancelFlag>,
}

impl RenameOptions {
    /// Options from config defaults, with the journal rooted at `working_dir`.
    pub fn from_defaults(defaults: &DefaultsConfig, working_dir: &Path) -> Self {
        Self {
            extensions: defaults.extensions.clone(),
            pad_width: defaults.pad_width,
            job: defaults.job_options(),
            journal_dir: defaults.journal.then(|| Config::logs_dir(working_dir)),
            cancel: None,
        }
    }
}

/// Collect `paths` into an ordered, filtered, duplicate-free selection.
pub(crate) fn select(paths: &[PathBuf], extensions: &[String]) -> Result<Selection> {
    let mut selection = Selection::new(extensions)?;
    selection.add_paths(paths)?;
    Ok(selection)
}

/// High-level rename operation - equivalent to `seqren rename`
///
/// Runs the job according to `options.job.execution_mode` and feeds every
/// event to `on_event` on the calling thread, together with the batch size.
/// Invalid input is returned as an error. A batch that fails or is cancelled
/// part way is returned as `Ok` with the failure recorded in the result.
pub fn rename_operation<F>(
    paths: &[PathBuf],
    prefix: &str,
    options: &RenameOptions,
    mut on_event: F,
) -> Result<RenameResult>
where
    F: FnMut(&JobEvent, usize),
{
    let selection = select(paths, &options.extensions)?;
    let skipped = selection.skipped();

    let mut job = RenameJob::new(selection.into_items(), prefix, options.job)?
        .with_policy(IndexedName::with_padding(options.pad_width));
    if let Some(cancel) = &options.cancel {
        job = job.with_cancel_flag(cancel.clone());
    }

    let journal = match &options.journal_dir {
        Some(dir) => {
            let journal = Journal::for_job(dir, &job)?;
            journal.attach(&mut job);
            Some(journal.path().to_path_buf())
        },
        None => None,
    };

    let total = job.items().len();
    let (tx, rx) = mpsc::channel();
    job.observers_mut().forward_to(tx);

    let handle = job.execute()?;
    for event in &rx {
        on_event(&event, total);
        if event.is_terminal() {
            break;
        }
    }

    let outcome = handle.wait_outcome();
    Ok(RenameResult {
        report: outcome.report,
        skipped,
        error: outcome.error.map(|e| e.to_string()),
        journal,
    })
}
