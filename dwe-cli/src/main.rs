//! dwe CLI
//!
//! Command-line interface for building Dragonwilds catalogs and maintaining
//! the curated asset tree.

mod cli_types;
mod commands;
mod error;
mod logger;

use std::process::ExitCode;

use clap::Parser;

use dwe_lib::{Layout, load_settings};

use cli_types::{Cli, Commands};
use error::CliError;
use logger::CliLogger;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let logger = match CliLogger::new(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        Ok(logger) => logger,
        Err(e) => {
            println!("[ERROR] {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = logger.install() {
        println!("[ERROR] {e}");
        return ExitCode::FAILURE;
    }

    let result = run(cli);
    log::logger().flush();
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            log::logger().flush();
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Items {
            source,
            table,
            content_root,
            overwrite,
            dry_run,
        } => commands::items::run_items(&settings, source, table, content_root, overwrite, dry_run),
        Commands::Recipes {
            recipes,
            output,
            icons_dir,
            catalog,
        } => commands::recipes::run_recipes(&settings, recipes, output, icons_dir, catalog),
        Commands::Spells {
            spells,
            output,
            icons_dir,
            catalog,
        } => commands::spells::run_spells(&settings, spells, output, icons_dir, catalog),
        Commands::WebCatalog {
            assets,
            base,
            output,
        } => commands::web_catalog::run_web_catalog(&settings, assets, base, output),
        Commands::CollectRecipes {
            source,
            output,
            flat: _,
            no_flat,
            overwrite,
            dry_run,
        } => {
            let layout = if no_flat {
                Layout::PreserveTree
            } else {
                Layout::Flat
            };
            commands::collect::run_collect_recipes(source, output, layout, overwrite, dry_run)
        }
        Commands::Characters { source, output } => {
            commands::assets::run_characters(source, output)
        }
        Commands::RenameAssets { root } => commands::assets::run_rename_assets(root),
        Commands::SyncAssets {
            table,
            assets,
            dry_run,
            delete_matched,
        } => commands::assets::run_sync_assets(table, assets, dry_run, delete_matched),
        Commands::DropTables { loot_dir, web_dir } => {
            commands::assets::run_drop_tables(loot_dir, web_dir)
        }
    }
}
