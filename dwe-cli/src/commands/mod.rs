pub(crate) mod assets;
pub(crate) mod collect;
pub(crate) mod items;
pub(crate) mod recipes;
pub(crate) mod spells;
pub(crate) mod web_catalog;

use std::fmt::Display;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use dwe_lib::PlacementStats;
use dwe_lib::lookup::LookupSummary;

/// Print one end-of-run counter.
pub(crate) fn print_counter(label: &str, value: impl Display) {
    log::info!(
        "{} {}",
        format!("{label}:").if_supports_color(Stdout, |t| t.bold()),
        value,
    );
}

pub(crate) fn print_heading(text: &str) {
    log::info!("");
    log::info!("{}", text.if_supports_color(Stdout, |t| t.cyan()));
}

pub(crate) fn print_placements(stats: &PlacementStats) {
    print_counter("Files copied", stats.copied);
    print_counter("Duplicates skipped", stats.duplicates_skipped);
    print_counter("Renamed", stats.renamed);
    print_counter("Overwritten", stats.overwritten);
}

pub(crate) fn print_lookup(summary: &LookupSummary) {
    print_counter("Items indexed", summary.items_indexed);
    print_counter("Item icons missing", summary.icons_missing);
    print_counter("Item files skipped", summary.files_skipped);
    print_counter("Items redefined", summary.redefined);
}

pub(crate) fn print_dry_run_notice(dry_run: bool) {
    if dry_run {
        log::info!(
            "{}",
            "Dry run: no files will be written".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
}
