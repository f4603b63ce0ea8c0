//! Asset-tree maintenance commands.

use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use dwe_assets::{
    DropTableOptions, SyncOptions, rename_assets, sync_table_to_assets, update_drop_tables,
    write_character_catalog,
};

use super::{print_counter, print_dry_run_notice, print_heading};
use crate::error::CliError;

pub(crate) fn run_characters(source: PathBuf, output: PathBuf) -> Result<(), CliError> {
    let summary = write_character_catalog(&source, &output)?;
    print_heading("Summary");
    print_counter("Tables read", summary.tables_read);
    print_counter("Tables missing", summary.tables_missing);
    Ok(())
}

pub(crate) fn run_rename_assets(root: PathBuf) -> Result<(), CliError> {
    log::info!(
        "Renaming assets in: {}",
        root.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    let summary = rename_assets(&root)?;
    print_heading("Summary");
    print_counter("Items processed", summary.items_processed);
    print_counter("JSON renamed", summary.json_renamed);
    print_counter("Images renamed", summary.images_renamed);
    print_counter("Warnings", summary.warnings);
    Ok(())
}

pub(crate) fn run_sync_assets(
    table_root: PathBuf,
    assets_root: PathBuf,
    dry_run: bool,
    delete_matched: bool,
) -> Result<(), CliError> {
    log::info!(
        "Syncing {} into {}",
        table_root.display().if_supports_color(Stdout, |t| t.cyan()),
        assets_root.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    print_dry_run_notice(dry_run);

    let summary = sync_table_to_assets(&SyncOptions {
        table_root,
        assets_root,
        dry_run,
        delete_matched,
    })?;
    print_heading("Summary");
    print_counter("Table files scanned", summary.scanned);
    print_counter("Files replaced", summary.replaced);
    if delete_matched {
        print_counter("Table files deleted", summary.deleted);
    }
    print_counter("Missing matches", summary.missing);
    print_counter("Multiple matches", summary.multiple_matches);
    Ok(())
}

pub(crate) fn run_drop_tables(loot_dir: PathBuf, web_dir: PathBuf) -> Result<(), CliError> {
    let summary = update_drop_tables(&DropTableOptions { loot_dir, web_dir })?;
    print_heading("Summary");
    print_counter("Enemies", summary.enemies);
    print_counter("Items", summary.items);
    print_counter("Names kept", summary.names_kept);
    print_counter("Files published", summary.files_published);
    Ok(())
}
