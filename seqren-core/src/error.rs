use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a [`crate::RenameJob`].
///
/// `InvalidInput` and `AlreadyStarted` are returned at the offending call.
/// `RenameFailed` and `Cancelled` happen mid-batch, so they are delivered to
/// the job's error observers and returned from `run`/`wait`.
#[derive(Debug, Error)]
pub enum RenameError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("could not rename {} to {}: {source}", path.display(), target.display())]
    RenameFailed {
        path: PathBuf,
        target: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("job already started")]
    AlreadyStarted,

    #[error("job cancelled after {completed} renames")]
    Cancelled { completed: usize },

    #[error("could not spawn rename worker: {0}")]
    WorkerSpawn(#[source] io::Error),

    #[error("rename worker panicked")]
    WorkerPanicked,
}

impl RenameError {
    /// The original path of the item that failed, if this is a rename failure.
    pub fn failed_path(&self) -> Option<&PathBuf> {
        match self {
            Self::RenameFailed { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_failed_message_names_both_paths() {
        let err = RenameError::RenameFailed {
            path: PathBuf::from("/tmp/a.jpg"),
            target: PathBuf::from("/tmp/P1.jpg"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/a.jpg"));
        assert!(msg.contains("/tmp/P1.jpg"));
        assert!(msg.contains("gone"));
        assert_eq!(err.failed_path(), Some(&PathBuf::from("/tmp/a.jpg")));
    }

    #[test]
    fn test_cancelled_is_not_a_rename_failure() {
        let err = RenameError::Cancelled { completed: 3 };
        assert!(err.is_cancelled());
        assert!(err.failed_path().is_none());
        assert_eq!(err.to_string(), "job cancelled after 3 renames");
    }
}
