use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use dwe_lib::{Settings, SpellCatalogOptions, build_spell_catalog};

use super::{print_counter, print_dry_run_notice, print_heading, print_lookup, print_placements};
use crate::cli_types::CatalogArgs;
use crate::error::CliError;

pub(crate) fn run_spells(
    settings: &Settings,
    spells_root: PathBuf,
    output: PathBuf,
    icons_dir: PathBuf,
    catalog: CatalogArgs,
) -> Result<(), CliError> {
    log::info!(
        "Cataloging spells in: {}",
        spells_root.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    print_dry_run_notice(catalog.dry_run);

    let options = SpellCatalogOptions {
        spells_root,
        items_root: catalog.items,
        placeholder: settings.placeholders.spell_path(&catalog.content_root),
        content_root: catalog.content_root,
        content_prefix: settings.content_prefix.clone(),
        output,
        icons_dir,
        dry_run: catalog.dry_run,
    };
    let summary = build_spell_catalog(&options)?;

    print_heading("Summary");
    print_lookup(&summary.lookup);
    print_counter("Spells indexed", summary.spells_indexed);
    print_counter("Spell files skipped", summary.spells_skipped);
    print_counter("Spell icons missing", summary.icons_missing);
    print_placements(&summary.icons);
    Ok(())
}
