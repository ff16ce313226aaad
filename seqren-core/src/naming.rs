use std::path::{Path, PathBuf};

/// Maps `(prefix, 1-based index, source path)` to the path a file is renamed to.
///
/// Policies must be pure: the job calls them right before each rename and
/// expects the same answer for the same inputs.
pub trait NamingPolicy: Send + Sync {
    fn target_for(&self, prefix: &str, index: usize, source: &Path) -> PathBuf;
}

impl<F> NamingPolicy for F
where
    F: Fn(&str, usize, &Path) -> PathBuf + Send + Sync,
{
    fn target_for(&self, prefix: &str, index: usize, source: &Path) -> PathBuf {
        self(prefix, index, source)
    }
}

/// Default policy: `{parent}/{prefix}{index}{.ext}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexedName {
    pad_width: usize,
}

impl IndexedName {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero-pad the index to `width` digits. Wider indices are kept whole.
    pub fn with_padding(width: usize) -> Self {
        Self { pad_width: width }
    }

    pub fn pad_width(&self) -> usize {
        self.pad_width
    }
}

impl NamingPolicy for IndexedName {
    fn target_for(&self, prefix: &str, index: usize, source: &Path) -> PathBuf {
        let file_name = format!(
            "{}{:0width$}{}",
            prefix,
            index,
            extension_with_dot(source),
            width = self.pad_width
        );
        match source.parent() {
            Some(parent) => parent.join(file_name),
            None => PathBuf::from(file_name),
        }
    }
}

/// The final extension of `path` including its leading dot, or `""`.
///
/// `archive.tar.gz` yields `.gz`; a dotfile such as `.bashrc` has none.
pub fn extension_with_dot(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}
