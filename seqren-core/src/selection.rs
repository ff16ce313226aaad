use anyhow::{anyhow, Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions offered when no filter is configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "txt", "py"];

/// Ordered, duplicate-free list of files to hand to a [`crate::RenameJob`].
///
/// Directories are expanded one level deep, sorted by file name. Only
/// regular files whose extension passes the filter are kept; an empty
/// extension list keeps every file.
#[derive(Debug)]
pub struct Selection {
    filter: Option<GlobSet>,
    seen: HashSet<PathBuf>,
    items: Vec<PathBuf>,
    skipped: usize,
}

impl Selection {
    pub fn new<S: AsRef<str>>(extensions: &[S]) -> Result<Self> {
        Ok(Self {
            filter: build_filter(extensions)?,
            seen: HashSet::new(),
            items: Vec::new(),
            skipped: 0,
        })
    }

    /// Selection that accepts any file.
    pub fn any() -> Self {
        Self {
            filter: None,
            seen: HashSet::new(),
            items: Vec::new(),
            skipped: 0,
        }
    }

    pub fn add_path(&mut self, path: &Path) -> Result<()> {
        let metadata = path
            .metadata()
            .with_context(|| format!("Cannot read {}", path.display()))?;

        if metadata.is_dir() {
            let entries = WalkDir::new(path)
                .min_depth(1)
                .max_depth(1)
                .sort_by_file_name()
                .into_iter();
            for entry in entries {
                let entry =
                    entry.with_context(|| format!("Cannot list directory {}", path.display()))?;
                if entry.file_type().is_file() {
                    self.push(entry.into_path());
                }
            }
        } else if metadata.is_file() {
            self.push(path.to_path_buf());
        } else {
            return Err(anyhow!("Not a regular file: {}", path.display()));
        }

        Ok(())
    }

    pub fn add_paths<I, P>(&mut self, paths: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for path in paths {
            self.add_path(path.as_ref())?;
        }
        Ok(())
    }

    fn push(&mut self, path: PathBuf) {
        if !self.accepts(&path) {
            self.skipped += 1;
            return;
        }
        if self.seen.insert(path.clone()) {
            self.items.push(path);
        }
    }

    pub fn accepts(&self, path: &Path) -> bool {
        match &self.filter {
            None => true,
            Some(set) => path.file_name().is_some_and(|name| set.is_match(name)),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Files rejected by the extension filter.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn items(&self) -> &[PathBuf] {
        &self.items
    }

    pub fn into_items(self) -> Vec<PathBuf> {
        self.items
    }
}

fn build_filter<S: AsRef<str>>(extensions: &[S]) -> Result<Option<GlobSet>> {
    if extensions.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for ext in extensions {
        let ext = ext.as_ref().trim().trim_start_matches("*.").trim_start_matches('.');
        if ext.is_empty() {
            continue;
        }
        let glob = GlobBuilder::new(&format!("*.{}", ext))
            .case_insensitive(true)
            .literal_separator(true)
            .build()
            .with_context(|| format!("Invalid extension filter: {}", ext))?;
        builder.add(glob);
    }
    Ok(Some(builder.build()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "").unwrap();
        path
    }

    #[test]
    fn test_duplicates_keep_first_position() {
        let temp_dir = TempDir::new().unwrap();
        let a = touch(temp_dir.path(), "a.jpg");
        let b = touch(temp_dir.path(), "b.jpg");

        let mut selection = Selection::new(DEFAULT_EXTENSIONS).unwrap();
        selection.add_paths([&b, &a, &b]).unwrap();

        assert_eq!(selection.items(), &[b, a]);
    }

    #[test]
    fn test_extension_filter_is_case_insensitive() {
        let temp_dir = TempDir::new().unwrap();
        let upper = touch(temp_dir.path(), "IMG.JPG");
        let doc = touch(temp_dir.path(), "notes.pdf");

        let mut selection = Selection::new(&["jpg"]).unwrap();
        selection.add_path(&upper).unwrap();
        selection.add_path(&doc).unwrap();

        assert_eq!(selection.items(), &[upper]);
        assert_eq!(selection.skipped(), 1);
    }

    #[test]
    fn test_directory_expansion_is_sorted_and_shallow() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "c.png");
        touch(temp_dir.path(), "a.png");
        touch(temp_dir.path(), "b.txt");
        let nested = temp_dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        touch(&nested, "deep.png");

        let mut selection = Selection::new(&[".png", "*.txt"]).unwrap();
        selection.add_path(temp_dir.path()).unwrap();

        let names: Vec<String> = selection
            .items()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.png", "b.txt", "c.png"]);
    }

    #[test]
    fn test_empty_filter_accepts_everything() {
        let temp_dir = TempDir::new().unwrap();
        let odd = touch(temp_dir.path(), "data.bin");
        let bare = touch(temp_dir.path(), "Makefile");

        let mut selection = Selection::new::<&str>(&[]).unwrap();
        selection.add_paths([&odd, &bare]).unwrap();

        assert_eq!(selection.len(), 2);
        assert!(Selection::any().accepts(Path::new("whatever")));
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let mut selection = Selection::any();
        let err = selection
            .add_path(&temp_dir.path().join("missing.jpg"))
            .unwrap_err();
        assert!(err.to_string().contains("Cannot read"));
    }
}
