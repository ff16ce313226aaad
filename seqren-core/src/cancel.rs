use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag a running job polls before each rename.
///
/// Clones observe the same flag, so the CLI's signal handlers and a
/// [`crate::JobHandle`] can both stop the same job.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// The underlying atomic, for APIs such as `signal_hook::flag::register`.
    pub fn shared(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let flag = CancelFlag::new();
        let other = flag.clone();
        assert!(!other.is_cancelled());
        flag.cancel();
        assert!(other.is_cancelled());
    }

    #[test]
    fn test_shared_atomic_raises_flag() {
        let flag = CancelFlag::new();
        flag.shared().store(true, Ordering::SeqCst);
        assert!(flag.is_cancelled());
    }
}
