use clap::{Args, Parser, Subcommand};
use seqren_core::RenameOptions;
use std::path::PathBuf;

use super::types::OutputFormat;

/// Rename a batch of files to a common prefix plus an incrementing index
#[derive(Parser, Debug)]
#[command(name = "seqren")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Run as if started in <path> instead of the current working directory
    #[arg(short = 'C', global = true, value_name = "PATH")]
    pub directory: Option<PathBuf>,
}

/// Which files to rename and how to name them
#[derive(Args, Debug, Clone)]
pub struct SelectionArgs {
    /// Files or directories to rename, in order. Directories contribute their
    /// files sorted by name (not recursively)
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Prefix for the new names: <prefix><index><.ext>
    #[arg(short, long)]
    pub prefix: String,

    /// Only rename files with these extensions (comma-separated, e.g. "jpg,png")
    #[arg(long, value_delimiter = ',', conflicts_with = "all_types")]
    pub ext: Vec<String>,

    /// Rename files of any type, ignoring the extension filter
    #[arg(long)]
    pub all_types: bool,

    /// Zero-pad the index to this many digits
    #[arg(long, value_name = "WIDTH")]
    pub pad: Option<usize>,
}

impl SelectionArgs {
    /// Override config-derived options with what was given on the command line.
    pub fn apply_to(&self, options: &mut RenameOptions) {
        if self.all_types {
            options.extensions.clear();
        } else if !self.ext.is_empty() {
            options.extensions.clone_from(&self.ext);
        }
        if let Some(width) = self.pad {
            options.pad_width = width;
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rename files to <prefix>1, <prefix>2, ... keeping their extensions
    Rename {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Rename on the main thread instead of a background worker
        #[arg(long)]
        inline: bool,

        /// Don't write a log to .seqren/logs
        #[arg(long)]
        no_journal: bool,

        /// Show what would be renamed, don't touch any file
        #[arg(long)]
        dry_run: bool,

        /// Output format for machine consumption (defaults from config)
        #[arg(long, value_enum)]
        output: Option<OutputFormat>,

        /// Suppress progress and summary output
        #[arg(long)]
        quiet: bool,
    },

    /// Show the renames that would happen without applying them
    Plan {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Output format for machine consumption (defaults from config)
        #[arg(long, value_enum)]
        output: Option<OutputFormat>,
    },

    /// Show version information
    Version {
        /// Output format for machine consumption
        #[arg(long, value_enum, default_value = "summary")]
        output: OutputFormat,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_selection_overrides() {
        let cli = Cli::parse_from([
            "seqren", "rename", "a.jpg", "b.jpg", "--prefix", "Trip", "--ext", "jpg,heic", "--pad",
            "3",
        ]);
        let Commands::Rename { selection, .. } = cli.command else {
            panic!("expected rename");
        };

        let mut options = RenameOptions {
            extensions: vec!["png".to_string()],
            ..RenameOptions::default()
        };
        selection.apply_to(&mut options);

        assert_eq!(selection.paths.len(), 2);
        assert_eq!(options.extensions, vec!["jpg", "heic"]);
        assert_eq!(options.pad_width, 3);
    }

    #[test]
    fn test_all_types_clears_filter() {
        let cli = Cli::parse_from(["seqren", "plan", "dir", "-p", "X", "--all-types"]);
        let Commands::Plan { selection, .. } = cli.command else {
            panic!("expected plan");
        };

        let mut options = RenameOptions {
            extensions: vec!["png".to_string()],
            ..RenameOptions::default()
        };
        selection.apply_to(&mut options);
        assert!(options.extensions.is_empty());
    }
}
