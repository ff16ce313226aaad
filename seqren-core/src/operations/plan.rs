use super::rename::{select, RenameOptions};
use crate::job::{JobOptions, RenameJob, RenamedItem};
use crate::naming::{IndexedName, NamingPolicy};
use crate::output::PreviewResult;
use anyhow::Result;
use std::path::PathBuf;

/// High-level plan operation - equivalent to `seqren plan` or `rename --dry-run`
///
/// Applies the same selection and validation as a real rename and computes
/// each target name without touching the filesystem. Targets are advisory:
/// the job recomputes them right before each rename.
pub fn plan_operation(
    paths: &[PathBuf],
    prefix: &str,
    options: &RenameOptions,
) -> Result<PreviewResult> {
    let selection = select(paths, &options.extensions)?;
    let skipped = selection.skipped();

    // Validation only; the job is never run.
    let job = RenameJob::new(selection.into_items(), prefix, JobOptions::default())?;
    let policy = IndexedName::with_padding(options.pad_width);

    let items = job
        .items()
        .iter()
        .enumerate()
        .map(|(offset, source)| RenamedItem {
            source: source.clone(),
            target: policy.target_for(job.prefix(), offset + 1, source),
        })
        .collect();

    Ok(PreviewResult {
        prefix: job.prefix().to_string(),
        items,
        skipped,
    })
}
