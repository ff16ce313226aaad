use anyhow::{Context, Result};
use seqren_core::{
    plan_operation, render_table, Config, OutputFormat, OutputFormatter, PreviewResult,
    RenameOptions,
};

use crate::cli::args::SelectionArgs;

pub fn handle_plan(
    selection: &SelectionArgs,
    output: OutputFormat,
    config: &Config,
    use_color: bool,
) -> Result<()> {
    let working_dir = std::env::current_dir().context("Failed to get current directory")?;
    let mut options = RenameOptions::from_defaults(&config.defaults, &working_dir);
    selection.apply_to(&mut options);

    let preview = plan_operation(&selection.paths, &selection.prefix, &options)?;
    print_plan(&preview, output, use_color);
    Ok(())
}

pub fn print_plan(preview: &PreviewResult, output: OutputFormat, use_color: bool) {
    match output {
        OutputFormat::Json => println!("{}", preview.format_json()),
        OutputFormat::Summary => {
            if !preview.items.is_empty() {
                println!("{}", render_table(&preview.items, use_color));
            }
            print!("{}", preview.format_summary());
        },
    }
}
