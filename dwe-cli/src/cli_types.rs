//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dwe")]
#[command(about = "Build catalogs from Dragonwilds game exports", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable debug-level messages
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    /// Settings file (default: ./dwe.toml, then the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments shared by the recipe and spell catalogs.
#[derive(Args, Clone)]
pub(crate) struct CatalogArgs {
    /// Directory scanned for item definitions
    #[arg(long, default_value = "Content/Gameplay")]
    pub items: PathBuf,

    /// Root that engine object paths resolve against
    #[arg(long, default_value = "Content")]
    pub content_root: PathBuf,

    /// Show what would be written without touching the outputs
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Build item tables grouped by filter tag
    Items {
        /// Source directories with ITEM_*.json files
        #[arg(long, required = true, num_args = 1..)]
        source: Vec<PathBuf>,

        /// Output table directory
        #[arg(long)]
        table: PathBuf,

        /// Root that engine object paths resolve against
        #[arg(long, default_value = ".")]
        content_root: PathBuf,

        /// Overwrite name collisions instead of renaming them
        #[arg(long)]
        overwrite: bool,

        /// Show planned writes without executing
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// Build the recipe index and copy its icons
    Recipes {
        /// Directory scanned for RECIPE_*.json files
        #[arg(long, default_value = "Recipes")]
        recipes: PathBuf,

        /// Output JSON file
        #[arg(long, default_value = "docs/data/recipes.json")]
        output: PathBuf,

        /// Directory the icons are copied into
        #[arg(long, default_value = "docs/recipes/icons")]
        icons_dir: PathBuf,

        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Build the spell catalog and copy its icons
    Spells {
        /// Directory scanned for USD_*.json files
        #[arg(long, default_value = "Content/Gameplay")]
        spells: PathBuf,

        /// Output JSON file
        #[arg(long, default_value = "docs/data/spells.json")]
        output: PathBuf,

        /// Directory the icons are copied into
        #[arg(long, default_value = "docs/spells/icons")]
        icons_dir: PathBuf,

        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Aggregate the curated asset tree into the web catalog
    WebCatalog {
        /// Asset tree root (default: docs/DWE/Assets, else DWE/Assets)
        #[arg(long)]
        assets: Option<PathBuf>,

        /// Directory catalog paths are relative to
        #[arg(long)]
        base: Option<PathBuf>,

        /// Output files (default: web/data/catalog.json and docs/data/catalog.json)
        #[arg(long, num_args = 1..)]
        output: Vec<PathBuf>,
    },

    /// Copy RECIPE_*.json files into one folder
    CollectRecipes {
        /// Source directories to scan
        #[arg(long, num_args = 1.., default_value = "Content/Gameplay")]
        source: Vec<PathBuf>,

        /// Output directory
        #[arg(long, default_value = "Recipes")]
        output: PathBuf,

        /// Copy every recipe into a single folder (default)
        #[arg(long, overrides_with = "no_flat")]
        flat: bool,

        /// Keep each recipe's directory below its source root
        #[arg(long, overrides_with = "flat")]
        no_flat: bool,

        /// Overwrite name collisions instead of renaming them
        #[arg(long)]
        overwrite: bool,

        /// Show planned copies without executing
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// List character-customization options
    Characters {
        /// Directory with the DT_Customization_*.json tables
        #[arg(long, default_value = "docs/charactereditor/data")]
        source: PathBuf,

        /// Output JSON file
        #[arg(long, default_value = "docs/charactereditor/data/character_catalog.json")]
        output: PathBuf,
    },

    /// Rename item documents and icons after each item's name
    RenameAssets {
        /// Table root to rename in
        #[arg(long, default_value = "Table")]
        root: PathBuf,
    },

    /// Replace asset files with same-named files from a table
    SyncAssets {
        /// Table root with grouped JSON/PNG
        #[arg(long, default_value = "Table")]
        table: PathBuf,

        /// Asset root to replace files in
        #[arg(long, default_value = "DWE/Assets")]
        assets: PathBuf,

        /// Show planned copies without executing
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Delete table files once they have replaced their assets
        #[arg(long)]
        delete_matched: bool,
    },

    /// Refresh the loot drop table name stubs and publish them
    DropTables {
        /// Directory holding DT_LootDropTable.json and its stubs
        #[arg(long, default_value = "LootDropTable")]
        loot_dir: PathBuf,

        /// Web data directory the tables are copied into
        #[arg(long, default_value = "docs/data")]
        web_dir: PathBuf,
    },
}
