use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use dwe_lib::{ItemTableOptions, Settings, build_item_tables};

use super::{print_counter, print_dry_run_notice, print_heading, print_placements};
use crate::error::CliError;

pub(crate) fn run_items(
    settings: &Settings,
    sources: Vec<PathBuf>,
    table_dir: PathBuf,
    content_root: PathBuf,
    overwrite: bool,
    dry_run: bool,
) -> Result<(), CliError> {
    log::info!(
        "Building item tables in: {}",
        table_dir.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    print_dry_run_notice(dry_run);

    let options = ItemTableOptions {
        sources,
        table_dir,
        content_root,
        content_prefix: settings.content_prefix.clone(),
        placeholder: settings.placeholders.item.clone(),
        overwrite,
        dry_run,
    };
    let summary = build_item_tables(&options)?;

    print_heading("Summary");
    print_counter("Groups", summary.groups);
    print_counter("Items processed", summary.items_processed);
    print_counter("Item JSON written", summary.item_json_written);
    print_counter("Icons copied", summary.icons_copied);
    print_counter("Icons missing", summary.icons_missing);
    print_counter("Placeholder icons copied", summary.placeholder_icons_copied);
    print_counter("Files skipped", summary.files_skipped);
    print_counter("Tag conflicts", summary.tag_conflicts);
    print_counter("First-block fallbacks", summary.fallback_records);
    print_placements(&summary.placements);
    Ok(())
}
