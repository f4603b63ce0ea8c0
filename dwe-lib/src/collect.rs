//! Recipe collector: gathers `RECIPE_*.json` from several export trees into
//! one directory.

use std::path::PathBuf;

use crate::dedup::{Deduplicator, Layout, PlacementKind, PlacementPolicy, PlacementStats};
use crate::error::PipelineError;
use crate::scanner::{FileConvention, ensure_roots, scan_convention};

#[derive(Debug, Clone)]
pub struct CollectOptions {
    pub sources: Vec<PathBuf>,
    pub output: PathBuf,
    pub layout: Layout,
    pub overwrite: bool,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectSummary {
    pub found: usize,
    pub placements: PlacementStats,
}

/// Copy every recipe document into `options.output`.
///
/// All sources are checked before anything is copied.
pub fn collect_recipes(options: &CollectOptions) -> Result<CollectSummary, PipelineError> {
    ensure_roots(&options.sources, "Source")?;

    let policy = PlacementPolicy {
        layout: options.layout,
        overwrite: options.overwrite,
    };
    let mut dedup = Deduplicator::new(policy).dry_run(options.dry_run);
    let mut found = 0;

    for source in &options.sources {
        let files = scan_convention(source, &FileConvention::RECIPE);
        log::info!("Scanning: {} ({} matches)", source.display(), files.len());
        for path in &files {
            found += 1;
            let placement = dedup.place_file(path, source, &options.output)?;
            let action = match placement.kind {
                PlacementKind::DuplicateSkip => {
                    log::info!("Skip duplicate: {}", path.display());
                    continue;
                }
                PlacementKind::Overwrite => "Overwrite",
                PlacementKind::Rename => "Copy (renamed)",
                PlacementKind::Flat | PlacementKind::PreservePath => "Copy",
            };
            log::info!("{}: {} -> {}", action, path.display(), placement.path.display());
        }
    }

    if options.dry_run {
        log::info!("Dry run only: no files were written.");
    }
    Ok(CollectSummary {
        found,
        placements: *dedup.stats(),
    })
}
