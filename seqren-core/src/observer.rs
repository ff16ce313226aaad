use crate::error::RenameError;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

pub type ItemRenamedFn = Box<dyn Fn(&Path) + Send>;
pub type ProgressFn = Box<dyn Fn(usize) + Send>;
pub type FinishedFn = Box<dyn Fn() + Send>;
pub type ErrorFn = Box<dyn Fn(&RenameError) + Send>;

/// An owned copy of one emitted event, for callers that consume events from a
/// channel on their own thread instead of inside a callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    ItemRenamed(PathBuf),
    Progress(usize),
    Finished,
    Failed { path: PathBuf, message: String },
    Cancelled { completed: usize },
}

impl JobEvent {
    /// True for the last event a job ever emits.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Finished | Self::Failed { .. } | Self::Cancelled { .. }
        )
    }
}

/// Registered callbacks, one ordered list per event kind.
///
/// Emission calls every callback of a kind in registration order, on whatever
/// thread the job is running on.
#[derive(Default)]
pub struct Observers {
    item_renamed: Vec<ItemRenamedFn>,
    progress: Vec<ProgressFn>,
    finished: Vec<FinishedFn>,
    error: Vec<ErrorFn>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_item_renamed(&mut self, f: impl Fn(&Path) + Send + 'static) {
        self.item_renamed.push(Box::new(f));
    }

    pub fn on_progress(&mut self, f: impl Fn(usize) + Send + 'static) {
        self.progress.push(Box::new(f));
    }

    pub fn on_finished(&mut self, f: impl Fn() + Send + 'static) {
        self.finished.push(Box::new(f));
    }

    pub fn on_error(&mut self, f: impl Fn(&RenameError) + Send + 'static) {
        self.error.push(Box::new(f));
    }

    /// Register observers that copy every event into `tx`.
    ///
    /// Send errors are ignored: a receiver that hung up has stopped listening.
    pub fn forward_to(&mut self, tx: Sender<JobEvent>) {
        let item_tx = tx.clone();
        self.on_item_renamed(move |path| {
            let _ = item_tx.send(JobEvent::ItemRenamed(path.to_path_buf()));
        });

        let progress_tx = tx.clone();
        self.on_progress(move |completed| {
            let _ = progress_tx.send(JobEvent::Progress(completed));
        });

        let finished_tx = tx.clone();
        self.on_finished(move || {
            let _ = finished_tx.send(JobEvent::Finished);
        });

        self.on_error(move |err| {
            let event = match err {
                RenameError::Cancelled { completed } => JobEvent::Cancelled {
                    completed: *completed,
                },
                RenameError::RenameFailed { path, .. } => JobEvent::Failed {
                    path: path.clone(),
                    message: err.to_string(),
                },
                other => JobEvent::Failed {
                    path: PathBuf::new(),
                    message: other.to_string(),
                },
            };
            let _ = tx.send(event);
        });
    }

    pub(crate) fn emit_item_renamed(&self, target: &Path) {
        for f in &self.item_renamed {
            f(target);
        }
    }

    pub(crate) fn emit_progress(&self, completed: usize) {
        for f in &self.progress {
            f(completed);
        }
    }

    pub(crate) fn emit_finished(&self) {
        for f in &self.finished {
            f();
        }
    }

    pub(crate) fn emit_error(&self, err: &RenameError) {
        for f in &self.error {
            f(err);
        }
    }

    /// Detach everything.
    pub fn clear(&mut self) {
        self.item_renamed.clear();
        self.progress.clear();
        self.finished.clear();
        self.error.clear();
    }

    /// Total number of registered callbacks across all event kinds.
    pub fn len(&self) -> usize {
        self.item_renamed.len() + self.progress.len() + self.finished.len() + self.error.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("item_renamed", &self.item_renamed.len())
            .field("progress", &self.progress.len())
            .field("finished", &self.finished.len())
            .field("error", &self.error.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_emission_follows_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut observers = Observers::new();

        for name in ["first", "second", "third"] {
            let log = Arc::clone(&log);
            observers.on_progress(move |n| log.lock().unwrap().push(format!("{name}:{n}")));
        }

        observers.emit_progress(1);
        observers.emit_progress(2);

        assert_eq!(
            *log.lock().unwrap(),
            vec!["first:1", "second:1", "third:1", "first:2", "second:2", "third:2"]
        );
    }

    #[test]
    fn test_forward_to_channel() {
        let (tx, rx) = mpsc::channel();
        let mut observers = Observers::new();
        observers.forward_to(tx);
        assert_eq!(observers.len(), 4);

        observers.emit_item_renamed(Path::new("/tmp/P1.jpg"));
        observers.emit_progress(1);
        observers.emit_finished();
        observers.emit_error(&RenameError::Cancelled { completed: 1 });
        drop(observers);

        let events: Vec<JobEvent> = rx.iter().collect();
        assert_eq!(
            events,
            vec![
                JobEvent::ItemRenamed(PathBuf::from("/tmp/P1.jpg")),
                JobEvent::Progress(1),
                JobEvent::Finished,
                JobEvent::Cancelled { completed: 1 },
            ]
        );
        assert!(events[2].is_terminal());
        assert!(!events[1].is_terminal());
    }

    #[test]
    fn test_clear_detaches_everything() {
        let mut observers = Observers::new();
        observers.on_finished(|| {});
        observers.on_error(|_| {});
        assert!(!observers.is_empty());
        observers.clear();
        assert!(observers.is_empty());
    }
}
