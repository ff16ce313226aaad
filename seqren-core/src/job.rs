use crate::cancel::CancelFlag;
use crate::error::RenameError;
use crate::naming::{IndexedName, NamingPolicy};
use crate::observer::Observers;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::SystemTime;
use tracing::{debug, info, warn};

/// Where `execute` runs the renames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// On the calling thread, blocking it for the whole batch.
    Inline,
    /// On one dedicated worker thread owned by the job.
    #[default]
    Background,
}

/// Options for a rename job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobOptions {
    /// Detach all observers once the job reaches a terminal state
    pub auto_dispose_on_finish: bool,
    /// Used by [`RenameJob::execute`]
    pub execution_mode: ExecutionMode,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            auto_dispose_on_finish: true,
            execution_mode: ExecutionMode::Background,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Created,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Created => "created",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenamedItem {
    pub source: PathBuf,
    pub target: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedItem {
    /// 1-based position of the item in the job
    pub index: usize,
    pub path: PathBuf,
    pub target: PathBuf,
    pub cause: String,
}

/// What a job did, inspectable after it reaches a terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobReport {
    pub id: String,
    pub prefix: String,
    pub state: JobState,
    pub total: usize,
    pub started_at: String,
    pub renamed: Vec<RenamedItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailedItem>,
}

impl JobReport {
    pub fn completed(&self) -> usize {
        self.renamed.len()
    }
}

/// The report together with the error that ended the job, if any.
#[derive(Debug)]
pub struct JobOutcome {
    pub report: JobReport,
    pub error: Option<RenameError>,
}

impl JobOutcome {
    pub fn into_result(self) -> Result<JobReport, RenameError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.report),
        }
    }
}

/// Renames an ordered list of files to `{prefix}{index}{ext}`, one at a time.
///
/// Items are renamed strictly in list order. After each rename the job emits
/// `item_renamed(target)` then `progress(index)`; after the last item it emits
/// `finished()` exactly once.
///
/// Failure policy is abort-batch: if renaming item `k` fails, items before it
/// stay renamed, items from `k` on are left untouched, error observers get
/// [`RenameError::RenameFailed`], `finished` is not emitted and the state
/// becomes [`JobState::Failed`].
pub struct RenameJob {
    id: String,
    items: Vec<PathBuf>,
    prefix: String,
    policy: Box<dyn NamingPolicy>,
    options: JobOptions,
    observers: Observers,
    cancel: CancelFlag,
    state: Arc<Mutex<JobState>>,
    last_report: Option<JobReport>,
}

impl RenameJob {
    /// Build a job. Touches no file.
    ///
    /// Rejects an empty prefix, a prefix containing a path separator, and
    /// duplicate source paths. Existence of the sources is not checked; a
    /// missing file surfaces as a rename failure.
    pub fn new(
        items: Vec<PathBuf>,
        prefix: impl Into<String>,
        options: JobOptions,
    ) -> Result<Self, RenameError> {
        let prefix = prefix.into();
        validate_prefix(&prefix)?;

        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item) {
                return Err(RenameError::InvalidInput(format!(
                    "duplicate source path: {}",
                    item.display()
                )));
            }
        }

        Ok(Self {
            id: generate_job_id(&prefix, &items),
            items,
            prefix,
            policy: Box::new(IndexedName::new()),
            options,
            observers: Observers::new(),
            cancel: CancelFlag::new(),
            state: Arc::new(Mutex::new(JobState::Created)),
            last_report: None,
        })
    }

    pub fn with_policy(mut self, policy: impl NamingPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn on_item_renamed(mut self, f: impl Fn(&Path) + Send + 'static) -> Self {
        self.observers.on_item_renamed(f);
        self
    }

    pub fn on_progress(mut self, f: impl Fn(usize) + Send + 'static) -> Self {
        self.observers.on_progress(f);
        self
    }

    pub fn on_finished(mut self, f: impl Fn() + Send + 'static) -> Self {
        self.observers.on_finished(f);
        self
    }

    pub fn on_error(mut self, f: impl Fn(&RenameError) + Send + 'static) -> Self {
        self.observers.on_error(f);
        self
    }

    pub fn subscribe_item_renamed(&mut self, f: impl Fn(&Path) + Send + 'static) {
        self.observers.on_item_renamed(f);
    }

    pub fn subscribe_progress(&mut self, f: impl Fn(usize) + Send + 'static) {
        self.observers.on_progress(f);
    }

    pub fn subscribe_finished(&mut self, f: impl Fn() + Send + 'static) {
        self.observers.on_finished(f);
    }

    pub fn subscribe_error(&mut self, f: impl Fn(&RenameError) + Send + 'static) {
        self.observers.on_error(f);
    }

    pub fn observers_mut(&mut self) -> &mut Observers {
        &mut self.observers
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn items(&self) -> &[PathBuf] {
        &self.items
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn options(&self) -> JobOptions {
        self.options
    }

    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    pub fn state(&self) -> JobState {
        *lock(&self.state)
    }

    /// Report of the last `run`, including partial progress on failure.
    pub fn last_report(&self) -> Option<&JobReport> {
        self.last_report.as_ref()
    }

    /// Rename every item on the calling thread.
    pub fn run(&mut self) -> Result<JobReport, RenameError> {
        self.begin()?;
        let outcome = self.process();
        self.last_report = Some(outcome.report.clone());
        self.dispose_if_requested();
        outcome.into_result()
    }

    /// Move the job onto a dedicated worker thread and return immediately.
    ///
    /// The worker owns the job. It runs the batch, detaches observers if
    /// requested, then sends the outcome on a one-shot channel and exits, so
    /// worker teardown always follows the job's last event.
    pub fn start(self) -> Result<JobHandle, RenameError> {
        self.begin()?;

        let (done_tx, done_rx) = mpsc::channel();
        let handle = self.handle_parts(done_rx);
        let mut job = self;
        let worker = thread::Builder::new()
            .name(format!("seqren-{}", job.id))
            .spawn(move || {
                let outcome = job.process();
                job.dispose_if_requested();
                drop(job);
                let _ = done_tx.send(outcome);
            })
            .map_err(RenameError::WorkerSpawn)?;

        Ok(handle.with_worker(worker))
    }

    /// Run according to `options.execution_mode`.
    ///
    /// In inline mode the batch has finished by the time this returns and the
    /// handle only carries the outcome.
    pub fn execute(mut self) -> Result<JobHandle, RenameError> {
        match self.options.execution_mode {
            ExecutionMode::Background => self.start(),
            ExecutionMode::Inline => {
                self.begin()?;
                let (done_tx, done_rx) = mpsc::channel();
                let handle = self.handle_parts(done_rx);
                let outcome = self.process();
                self.dispose_if_requested();
                let _ = done_tx.send(outcome);
                Ok(handle)
            },
        }
    }

    fn begin(&self) -> Result<(), RenameError> {
        let mut state = lock(&self.state);
        if *state != JobState::Created {
            return Err(RenameError::AlreadyStarted);
        }
        *state = JobState::Running;
        Ok(())
    }

    fn set_state(&self, next: JobState) {
        *lock(&self.state) = next;
    }

    fn handle_parts(&self, done: Receiver<JobOutcome>) -> JobHandle {
        JobHandle {
            id: self.id.clone(),
            prefix: self.prefix.clone(),
            total: self.items.len(),
            state: Arc::clone(&self.state),
            cancel: self.cancel.clone(),
            done,
            worker: None,
        }
    }

    fn process(&self) -> JobOutcome {
        let mut report = JobReport {
            id: self.id.clone(),
            prefix: self.prefix.clone(),
            state: JobState::Running,
            total: self.items.len(),
            started_at: chrono::Local::now().to_rfc3339(),
            renamed: Vec::with_capacity(self.items.len()),
            failure: None,
        };

        info!(
            job_id = %self.id,
            prefix = %self.prefix,
            total = self.items.len(),
            "rename job started"
        );

        for (offset, source) in self.items.iter().enumerate() {
            let index = offset + 1;

            if self.cancel.is_cancelled() {
                let err = RenameError::Cancelled {
                    completed: report.renamed.len(),
                };
                warn!(job_id = %self.id, completed = report.renamed.len(), "rename job cancelled");
                return self.terminate(report, JobState::Cancelled, err);
            }

            // Computed right before the rename, never ahead of time.
            let target = self.policy.target_for(&self.prefix, index, source);

            if let Err(cause) = rename_one(source, &target) {
                warn!(
                    job_id = %self.id,
                    index,
                    source = %source.display(),
                    target = %target.display(),
                    error = %cause,
                    "rename failed, aborting batch"
                );
                report.failure = Some(FailedItem {
                    index,
                    path: source.clone(),
                    target: target.clone(),
                    cause: cause.to_string(),
                });
                let err = RenameError::RenameFailed {
                    path: source.clone(),
                    target,
                    source: cause,
                };
                return self.terminate(report, JobState::Failed, err);
            }

            debug!(
                job_id = %self.id,
                index,
                source = %source.display(),
                target = %target.display(),
                "renamed"
            );

            self.observers.emit_item_renamed(&target);
            self.observers.emit_progress(index);
            report.renamed.push(RenamedItem {
                source: source.clone(),
                target,
            });
        }

        info!(job_id = %self.id, renamed = report.renamed.len(), "rename job finished");
        self.observers.emit_finished();
        // Terminal only once the finished observers have returned.
        self.set_state(JobState::Completed);
        report.state = JobState::Completed;

        JobOutcome {
            report,
            error: None,
        }
    }

    fn terminate(&self, mut report: JobReport, state: JobState, err: RenameError) -> JobOutcome {
        self.observers.emit_error(&err);
        self.set_state(state);
        report.state = state;
        JobOutcome {
            report,
            error: Some(err),
        }
    }

    fn dispose_if_requested(&mut self) {
        if self.options.auto_dispose_on_finish {
            self.observers.clear();
        }
    }
}

impl std::fmt::Debug for RenameJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenameJob")
            .field("id", &self.id)
            .field("prefix", &self.prefix)
            .field("items", &self.items.len())
            .field("options", &self.options)
            .field("observers", &self.observers)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

/// Caller-side view of a started job.
#[derive(Debug)]
pub struct JobHandle {
    id: String,
    prefix: String,
    total: usize,
    state: Arc<Mutex<JobState>>,
    cancel: CancelFlag,
    done: Receiver<JobOutcome>,
    worker: Option<JoinHandle<()>>,
}

impl JobHandle {
    fn with_worker(mut self, worker: JoinHandle<()>) -> Self {
        self.worker = Some(worker);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn state(&self) -> JobState {
        *lock(&self.state)
    }

    /// True once the terminal observers (`finished` or `error`) have returned.
    pub fn is_finished(&self) -> bool {
        self.state().is_terminal()
    }

    /// Ask the job to stop before its next rename.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Block until the job is terminal and its worker has exited.
    pub fn wait_outcome(mut self) -> JobOutcome {
        let received = self.done.recv();
        let joined = self.worker.take().map_or(Ok(()), JoinHandle::join);

        match (received, joined) {
            (Ok(outcome), Ok(())) => outcome,
            _ => {
                let mut state = lock(&self.state);
                if !state.is_terminal() {
                    *state = JobState::Failed;
                }
                JobOutcome {
                    report: JobReport {
                        id: self.id.clone(),
                        prefix: self.prefix.clone(),
                        state: *state,
                        total: self.total,
                        started_at: String::new(),
                        renamed: Vec::new(),
                        failure: None,
                    },
                    error: Some(RenameError::WorkerPanicked),
                }
            },
        }
    }

    pub fn wait(self) -> Result<JobReport, RenameError> {
        self.wait_outcome().into_result()
    }
}

fn validate_prefix(prefix: &str) -> Result<(), RenameError> {
    if prefix.trim().is_empty() {
        return Err(RenameError::InvalidInput(
            "prefix must not be empty".to_string(),
        ));
    }
    if prefix.contains('/') || prefix.contains(std::path::MAIN_SEPARATOR) {
        return Err(RenameError::InvalidInput(format!(
            "prefix must not contain a path separator: {prefix}"
        )));
    }
    Ok(())
}

/// Rename without clobbering: an existing target that is not the source
/// itself is reported as `AlreadyExists`.
fn rename_one(source: &Path, target: &Path) -> io::Result<()> {
    if source != target && target.symlink_metadata().is_ok() && !is_case_only_rename(source, target)
    {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("target {} already exists", target.display()),
        ));
    }
    fs::rename(source, target)
}

/// Case-insensitive filesystems report `P1.JPG` as existing when renaming to
/// `p1.jpg`. Only that exact situation is let through: same directory, names
/// equal ignoring case, no symlinks, and both paths resolve to one file.
fn is_case_only_rename(source: &Path, target: &Path) -> bool {
    if is_symlink(source) || is_symlink(target) || source.parent() != target.parent() {
        return false;
    }
    let same_name = match (source.file_name(), target.file_name()) {
        (Some(a), Some(b)) => {
            a.to_string_lossy().to_lowercase() == b.to_string_lossy().to_lowercase()
        },
        _ => false,
    };
    if !same_name {
        return false;
    }
    match (fs::canonicalize(source), fs::canonicalize(target)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn is_symlink(path: &Path) -> bool {
    path.symlink_metadata()
        .is_ok_and(|meta| meta.file_type().is_symlink())
}

fn generate_job_id(prefix: &str, items: &[PathBuf]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(prefix.as_bytes());
    for item in items {
        hasher.update(item.to_string_lossy().as_bytes());
        hasher.update([0]);
    }
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    hasher.update(nanos.to_string().as_bytes());
    format!("{:x}", hasher.finalize())[..16].to_string()
}

fn lock(state: &Mutex<JobState>) -> MutexGuard<'_, JobState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
