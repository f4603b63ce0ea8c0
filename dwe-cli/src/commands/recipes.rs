use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use dwe_lib::{RecipeIndexOptions, Settings, build_recipe_index};

use super::{print_counter, print_dry_run_notice, print_heading, print_lookup, print_placements};
use crate::cli_types::CatalogArgs;
use crate::error::CliError;

pub(crate) fn run_recipes(
    settings: &Settings,
    recipes_root: PathBuf,
    output: PathBuf,
    icons_dir: PathBuf,
    catalog: CatalogArgs,
) -> Result<(), CliError> {
    log::info!(
        "Indexing recipes in: {}",
        recipes_root.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    print_dry_run_notice(catalog.dry_run);

    let options = RecipeIndexOptions {
        recipes_root,
        items_root: catalog.items,
        content_root: catalog.content_root,
        content_prefix: settings.content_prefix.clone(),
        output,
        icons_dir,
        placeholder: settings.placeholders.recipe.clone(),
        dry_run: catalog.dry_run,
    };
    let summary = build_recipe_index(&options)?;

    print_heading("Summary");
    print_lookup(&summary.lookup);
    print_counter("Recipes indexed", summary.recipes_indexed);
    print_counter("Recipes without output", summary.recipes_skipped);
    print_counter("Recipe files skipped", summary.files_skipped);
    print_counter("Line icons missing", summary.lines.icons_missing);
    print_counter("Placeholder icons used", summary.lines.placeholders_used);
    print_placements(&summary.icons);
    Ok(())
}
