use crate::error::RenameError;
use crate::job::RenameJob;
use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::warn;

/// Append-only, timestamped log of what a job did.
///
/// Cloning shares the underlying file, so one journal can back several
/// observers. Write failures are reported through `tracing` and never stop
/// the job.
#[derive(Debug, Clone)]
pub struct Journal {
    path: PathBuf,
    file: Arc<Mutex<File>>,
}

impl Journal {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;

        Ok(Self {
            path: path.to_path_buf(),
            file: Arc::new(Mutex::new(file)),
        })
    }

    /// Open `<logs_dir>/<job-id>.log`.
    pub fn for_job(logs_dir: &Path, job: &RenameJob) -> Result<Self> {
        Self::open(&logs_dir.join(format!("{}.log", job.id())))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn log(&self, message: &str) {
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        let written = writeln!(
            file,
            "[{}] {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            message
        )
        .and_then(|()| file.flush());

        if let Err(e) = written {
            warn!(path = %self.path.display(), error = %e, "failed to write journal entry");
        }
    }

    /// Register as an observer of every event kind on `job`.
    pub fn attach(&self, job: &mut RenameJob) {
        self.log(&format!(
            "job {} created: {} items, prefix '{}'",
            job.id(),
            job.items().len(),
            job.prefix()
        ));

        let journal = self.clone();
        job.subscribe_item_renamed(move |target| {
            journal.log(&format!("renamed -> {}", target.display()));
        });

        let journal = self.clone();
        job.subscribe_progress(move |completed| {
            journal.log(&format!("progress {}", completed));
        });

        let journal = self.clone();
        job.subscribe_finished(move || journal.log("finished"));

        let journal = self.clone();
        job.subscribe_error(move |err: &RenameError| {
            journal.log(&format!("stopped: {}", err));
        });
    }
}
