use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use dwe_lib::{CollectOptions, Layout, collect_recipes};

use super::{print_counter, print_dry_run_notice, print_heading, print_placements};
use crate::error::CliError;

pub(crate) fn run_collect_recipes(
    sources: Vec<PathBuf>,
    output: PathBuf,
    layout: Layout,
    overwrite: bool,
    dry_run: bool,
) -> Result<(), CliError> {
    log::info!(
        "Collecting recipes into: {}",
        output.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    print_dry_run_notice(dry_run);

    let options = CollectOptions {
        sources,
        output,
        layout,
        overwrite,
        dry_run,
    };
    let summary = collect_recipes(&options)?;

    print_heading("Summary");
    print_counter("Recipes found", summary.found);
    print_placements(&summary.placements);
    Ok(())
}
