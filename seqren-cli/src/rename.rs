use anyhow::{Context, Result};
use seqren_core::{
    plan_operation, render_progress_line, rename_operation, CancelFlag, Config, ExecutionMode,
    JobEvent, JobState, OutputFormat, OutputFormatter, RenameOptions,
};
use std::path::PathBuf;

use crate::cli::args::SelectionArgs;
use crate::plan::print_plan;

/// Flags that only apply to `seqren rename`
#[derive(Debug, Clone, Copy)]
pub struct RenameFlags {
    pub inline: bool,
    pub no_journal: bool,
    pub dry_run: bool,
    pub output: OutputFormat,
    pub quiet: bool,
}

/// Run `seqren rename` and return the state the job ended in.
///
/// The summary is printed before returning, so a failed or cancelled batch
/// is reported through the returned state rather than as an error.
pub fn handle_rename(
    selection: &SelectionArgs,
    flags: RenameFlags,
    config: &Config,
    cancel: CancelFlag,
    use_color: bool,
) -> Result<JobState> {
    let working_dir = std::env::current_dir().context("Failed to get current directory")?;
    let mut options = RenameOptions::from_defaults(&config.defaults, &working_dir);
    selection.apply_to(&mut options);

    if flags.dry_run {
        let preview = plan_operation(&selection.paths, &selection.prefix, &options)?;
        if !flags.quiet {
            print_plan(&preview, flags.output, use_color);
        }
        return Ok(JobState::Completed);
    }

    if flags.inline {
        options.job.execution_mode = ExecutionMode::Inline;
    }
    if flags.no_journal {
        options.journal_dir = None;
    }
    options.cancel = Some(cancel);

    let show_progress = !flags.quiet && flags.output == OutputFormat::Summary;
    let mut last_target = PathBuf::new();

    let result = rename_operation(&selection.paths, &selection.prefix, &options, |event, total| {
        if !show_progress {
            return;
        }
        match event {
            JobEvent::ItemRenamed(target) => last_target.clone_from(target),
            JobEvent::Progress(completed) => {
                eprintln!(
                    "{}",
                    render_progress_line(*completed, total, &last_target, use_color)
                );
            },
            JobEvent::Failed { message, .. } => eprintln!("Error: {message}"),
            JobEvent::Cancelled { .. } => eprintln!("Stopping: rename cancelled"),
            JobEvent::Finished => {},
        }
    })?;

    match flags.output {
        OutputFormat::Json => println!("{}", result.format_json()),
        OutputFormat::Summary if !flags.quiet => print!("{}", result.format_summary()),
        OutputFormat::Summary => {},
    }

    Ok(result.report.state)
}
