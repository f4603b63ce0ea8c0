use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use dwe_lib::web_catalog::{default_outputs, default_roots};
use dwe_lib::{Settings, WebCatalogOptions, write_web_catalog};

use super::{print_counter, print_heading};
use crate::error::CliError;

pub(crate) fn run_web_catalog(
    settings: &Settings,
    assets: Option<PathBuf>,
    base: Option<PathBuf>,
    outputs: Vec<PathBuf>,
) -> Result<(), CliError> {
    let repo_root = Path::new(".");
    let (default_assets, default_base) = default_roots(repo_root);
    let options = WebCatalogOptions {
        assets_root: assets.unwrap_or(default_assets),
        base_root: base.unwrap_or(default_base),
        outputs: if outputs.is_empty() {
            default_outputs(repo_root)
        } else {
            outputs
        },
        tabs: settings.web_catalog.tabs.clone(),
    };
    log::info!(
        "Aggregating assets in: {}",
        options.assets_root.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    let summary = write_web_catalog(&options)?;

    print_heading("Summary");
    for (tab, count) in &summary.tabs {
        print_counter(&format!("Tab {tab}"), count);
    }
    print_counter("Documents skipped", summary.files_skipped);
    print_counter("Outputs written", summary.outputs_written);
    Ok(())
}
