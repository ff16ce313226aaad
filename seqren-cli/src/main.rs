use anyhow::Context;
use clap::Parser;
use seqren_core::{
    should_use_color, CancelFlag, Config, JobState, OutputFormatter, RenameError, VersionResult,
};
use std::process;

mod cli;
mod plan;
mod rename;

use cli::{Cli, Commands, OutputFormat};
use rename::RenameFlags;

fn main() {
    // Both signals stop the running job before its next rename
    let cancel = CancelFlag::new();

    let sigint = cancel.clone();
    ctrlc::set_handler(move || {
        eprintln!("\nReceived SIGINT. Stopping after the current file...");
        sigint.cancel();
    })
    .expect("Error setting SIGINT handler");

    signal_hook::flag::register(signal_hook::consts::SIGTERM, cancel.shared())
        .expect("Error setting SIGTERM handler");

    let cli = Cli::parse();

    if let Some(ref dir) = cli.directory {
        std::env::set_current_dir(dir)
            .with_context(|| format!("Failed to change to directory: {}", dir.display()))
            .unwrap_or_else(|e| {
                eprintln!("Error: {e:#}");
                process::exit(2);
            });
    }

    let config = Config::load().unwrap_or_default();
    let use_color = !cli.no_color && should_use_color(config.defaults.use_color);

    let result = match cli.command {
        Commands::Rename {
            selection,
            inline,
            no_journal,
            dry_run,
            output,
            quiet,
        } => {
            let flags = RenameFlags {
                inline,
                no_journal,
                dry_run,
                output: output.map_or_else(|| config.defaults.output(), Into::into),
                quiet,
            };
            rename::handle_rename(&selection, flags, &config, cancel.clone(), use_color)
                .map(exit_code_for_state)
        },
        Commands::Plan { selection, output } => {
            let output = output.map_or_else(|| config.defaults.output(), Into::into);
            plan::handle_plan(&selection, output, &config, use_color).map(|()| 0)
        },
        Commands::Version { output } => {
            handle_version(output);
            Ok(0)
        },
    };

    let interrupted = cancel.is_cancelled();
    if let Err(e) = &result {
        if interrupted {
            eprintln!("Operation interrupted");
        } else {
            eprintln!("Error: {e:#}");
        }
    }
    process::exit(exit_code(&result, interrupted));
}

/// A signal only decides the code of a command that errored. A batch that
/// ran to completion despite a late signal keeps its own code.
fn exit_code(result: &anyhow::Result<i32>, interrupted: bool) -> i32 {
    match result {
        Ok(code) => *code,
        Err(_) if interrupted => 130,
        Err(e) => exit_code_for_error(e),
    }
}

fn exit_code_for_state(state: JobState) -> i32 {
    match state {
        JobState::Cancelled => 130,
        JobState::Failed => 1,
        _ => 0,
    }
}

/// Exit codes: 1 rename failure, 2 invalid input, 3 internal error
fn exit_code_for_error(e: &anyhow::Error) -> i32 {
    match e.downcast_ref::<RenameError>() {
        Some(RenameError::InvalidInput(_) | RenameError::AlreadyStarted) => 2,
        Some(RenameError::RenameFailed { .. }) => 1,
        Some(RenameError::Cancelled { .. }) => 130,
        Some(RenameError::WorkerSpawn(_) | RenameError::WorkerPanicked) => 3,
        None => {
            let message = e.to_string();
            if message.contains("Cannot read")
                || message.contains("Not a regular file")
                || message.contains("Invalid extension")
            {
                2
            } else {
                3
            }
        },
    }
}

fn handle_version(output: OutputFormat) {
    let result = VersionResult {
        name: "seqren".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    match output {
        OutputFormat::Json => println!("{}", result.format_json()),
        OutputFormat::Summary => print!("{}", result.format_summary()),
    }
}
