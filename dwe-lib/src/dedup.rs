//! Content-addressed placement into a shared output namespace.
//!
//! Files from several source trees (and generated documents) land in one
//! directory. Same name and same bytes is a duplicate and is skipped; same
//! name and different bytes is renamed with an origin suffix unless
//! overwriting is allowed, in which case it replaces whatever the slot
//! holds. Slots owned by a generated document (see
//! [`Deduplicator::place_owned_bytes`]) are refreshed across runs and only
//! renamed when a second owner claims them in the same run. The decision for a single slot is the pure
//! function [`decide_slot`]; [`Deduplicator`] drives it across candidate
//! names and performs the filesystem side effects.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PipelineError;
use crate::hasher::{ContentHash, hash_bytes, hash_file};

/// How destination paths are derived from source paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Every file goes directly into the destination directory.
    #[default]
    Flat,
    /// The source-relative subtree is mirrored under the destination.
    PreserveTree,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlacementPolicy {
    pub layout: Layout,
    /// Replace a colliding file with different content instead of renaming.
    pub overwrite: bool,
}

/// What a destination slot currently holds relative to the candidate bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Vacant,
    Identical,
    Different,
}

/// What to do with one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotDecision {
    Write,
    Skip,
    Overwrite,
    /// Try the next rename candidate.
    Probe,
}

/// Decide what to do with a slot given its state.
pub fn decide_slot(state: SlotState, overwrite: bool) -> SlotDecision {
    match state {
        SlotState::Vacant => SlotDecision::Write,
        SlotState::Identical => SlotDecision::Skip,
        SlotState::Different if overwrite => SlotDecision::Overwrite,
        SlotState::Different => SlotDecision::Probe,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementKind {
    /// Written under its mirrored relative path.
    PreservePath,
    /// Written under its own name.
    Flat,
    DuplicateSkip,
    Overwrite,
    Rename,
}

impl PlacementKind {
    pub fn label(&self) -> &'static str {
        match self {
            PlacementKind::PreservePath => "preserve-path",
            PlacementKind::Flat => "flat",
            PlacementKind::DuplicateSkip => "duplicate-skip",
            PlacementKind::Overwrite => "overwrite",
            PlacementKind::Rename => "rename",
        }
    }

    /// Whether this placement produces a write.
    pub fn writes(&self) -> bool {
        !matches!(self, PlacementKind::DuplicateSkip)
    }
}

/// Final destination of one file and how it was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub path: PathBuf,
    pub kind: PlacementKind,
}

impl Placement {
    /// File name of the final destination; this is the identifier callers
    /// store in generated documents.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Reads the content hash of whatever already sits at a path.
pub trait SlotProbe {
    fn existing_hash(&self, path: &Path) -> Option<ContentHash>;
}

/// Probes the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskProbe;

impl SlotProbe for DiskProbe {
    fn existing_hash(&self, path: &Path) -> Option<ContentHash> {
        if !path.is_file() {
            return None;
        }
        match hash_file(path) {
            Ok(hash) => Some(hash),
            Err(e) => {
                log::warn!("Could not hash existing {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// Per-run counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlacementStats {
    /// Every write, including renames and overwrites.
    pub copied: usize,
    pub duplicates_skipped: usize,
    pub renamed: usize,
    pub overwritten: usize,
}

impl PlacementStats {
    fn record(&mut self, kind: PlacementKind) {
        if kind.writes() {
            self.copied += 1;
        }
        match kind {
            PlacementKind::DuplicateSkip => self.duplicates_skipped += 1,
            PlacementKind::Rename => self.renamed += 1,
            PlacementKind::Overwrite => self.overwritten += 1,
            PlacementKind::PreservePath | PlacementKind::Flat => {}
        }
    }

    pub fn merge(&mut self, other: &PlacementStats) {
        self.copied += other.copied;
        self.duplicates_skipped += other.duplicates_skipped;
        self.renamed += other.renamed;
        self.overwritten += other.overwritten;
    }
}

/// Collapse an origin path into a filename-safe suffix.
///
/// Every non-alphanumeric character becomes `_`, runs collapse, and leading
/// or trailing underscores are dropped. An empty result is `root`.
pub fn sanitize_suffix(value: &str) -> String {
    let replaced: String = value
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    let collapsed = replaced
        .split('_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    if collapsed.is_empty() {
        "root".to_string()
    } else {
        collapsed
    }
}

/// `<stem>__<suffix><ext>`, or `<stem>__<suffix>_<n><ext>` with a counter.
pub fn rename_candidate(file_name: &str, suffix: &str, counter: Option<u32>) -> String {
    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    match counter {
        Some(n) => format!("{stem}__{suffix}_{n}{ext}"),
        None => format!("{stem}__{suffix}{ext}"),
    }
}

/// The parent of `source` relative to `root`, used as a rename suffix.
///
/// Files outside `root` fall back to their own parent directory.
pub fn origin_of(source: &Path, root: &Path) -> String {
    let parent = source.parent().unwrap_or(Path::new(""));
    match parent.strip_prefix(root) {
        Ok(relative) => relative.to_string_lossy().into_owned(),
        Err(_) => parent.to_string_lossy().into_owned(),
    }
}

/// Places content into a destination namespace, one run at a time.
///
/// Remembers every slot it fills so later decisions in the same run see
/// them, including in dry-run mode where nothing is written.
#[derive(Debug)]
pub struct Deduplicator<P: SlotProbe = DiskProbe> {
    policy: PlacementPolicy,
    dry_run: bool,
    probe: P,
    ledger: BTreeMap<PathBuf, ContentHash>,
    stats: PlacementStats,
}

impl Deduplicator<DiskProbe> {
    pub fn new(policy: PlacementPolicy) -> Self {
        Self::with_probe(policy, DiskProbe)
    }
}

impl<P: SlotProbe> Deduplicator<P> {
    pub fn with_probe(policy: PlacementPolicy, probe: P) -> Self {
        Self {
            policy,
            dry_run: false,
            probe,
            ledger: BTreeMap::new(),
            stats: PlacementStats::default(),
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn stats(&self) -> &PlacementStats {
        &self.stats
    }

    /// The ledger stands in for the disk for slots filled this run, so
    /// dry runs decide the same way real runs do.
    fn slot_state(&self, path: &Path, content: &ContentHash) -> SlotState {
        let existing = match self.ledger.get(path) {
            Some(hash) => Some(hash.clone()),
            None => self.probe.existing_hash(path),
        };
        match existing {
            None => SlotState::Vacant,
            Some(hash) if &hash == content => SlotState::Identical,
            Some(_) => SlotState::Different,
        }
    }

    /// Decide where `content` named `file_name` goes inside `dest_dir`.
    ///
    /// Only probes; nothing is written and the ledger is not updated.
    pub fn plan(
        &self,
        dest_dir: &Path,
        file_name: &str,
        origin: &str,
        content: &ContentHash,
    ) -> Placement {
        self.plan_slot(dest_dir, file_name, origin, content, self.policy.overwrite)
    }

    /// Like [`plan`](Self::plan) for a slot the caller owns by name.
    ///
    /// Different content left by an earlier run is replaced. A slot already
    /// claimed this run belongs to another owner and is renamed unless the
    /// policy overwrites.
    pub fn plan_owned(
        &self,
        dest_dir: &Path,
        file_name: &str,
        origin: &str,
        content: &ContentHash,
    ) -> Placement {
        let claimed = self.ledger.contains_key(&dest_dir.join(file_name));
        self.plan_slot(
            dest_dir,
            file_name,
            origin,
            content,
            self.policy.overwrite || !claimed,
        )
    }

    fn plan_slot(
        &self,
        dest_dir: &Path,
        file_name: &str,
        origin: &str,
        content: &ContentHash,
        overwrite: bool,
    ) -> Placement {
        let primary = dest_dir.join(file_name);
        let kind = match decide_slot(self.slot_state(&primary, content), overwrite) {
            SlotDecision::Write => Some(PlacementKind::Flat),
            SlotDecision::Skip => Some(PlacementKind::DuplicateSkip),
            SlotDecision::Overwrite => Some(PlacementKind::Overwrite),
            SlotDecision::Probe => None,
        };
        if let Some(kind) = kind {
            return Placement {
                path: primary,
                kind,
            };
        }

        let suffix = sanitize_suffix(origin);
        let mut counter: Option<u32> = None;
        loop {
            let path = dest_dir.join(rename_candidate(file_name, &suffix, counter));
            // Rename candidates are never overwritten.
            match decide_slot(self.slot_state(&path, content), false) {
                SlotDecision::Write => {
                    return Placement {
                        path,
                        kind: PlacementKind::Rename,
                    };
                }
                SlotDecision::Skip => {
                    return Placement {
                        path,
                        kind: PlacementKind::DuplicateSkip,
                    };
                }
                SlotDecision::Overwrite | SlotDecision::Probe => {}
            }
            counter = Some(counter.map_or(2, |n| n + 1));
        }
    }

    /// Copy `source` into `dest_dir` under its own name.
    ///
    /// With [`Layout::PreserveTree`] the path relative to `source_root` is
    /// mirrored and no dedup decision is made.
    pub fn place_file(
        &mut self,
        source: &Path,
        source_root: &Path,
        dest_dir: &Path,
    ) -> Result<Placement, PipelineError> {
        if self.policy.layout == Layout::PreserveTree {
            let relative = source.strip_prefix(source_root).unwrap_or(source);
            let path = dest_dir.join(relative);
            let content = hash_file(source).map_err(|e| PipelineError::io(source, e))?;
            let placement = Placement {
                path,
                kind: PlacementKind::PreservePath,
            };
            self.commit(&placement, content, |dest| fs::copy(source, dest).map(|_| ()))?;
            return Ok(placement);
        }

        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let origin = origin_of(source, source_root);
        self.place_file_as(source, &file_name, &origin, dest_dir)
    }

    /// Copy `source` into `dest_dir` under `file_name`.
    pub fn place_file_as(
        &mut self,
        source: &Path,
        file_name: &str,
        origin: &str,
        dest_dir: &Path,
    ) -> Result<Placement, PipelineError> {
        let content = hash_file(source).map_err(|e| PipelineError::io(source, e))?;
        let placement = self.plan(dest_dir, file_name, origin, &content);
        self.commit(&placement, content, |dest| fs::copy(source, dest).map(|_| ()))?;
        Ok(placement)
    }

    /// Copy `source` into a slot owned by the caller; see
    /// [`plan_owned`](Self::plan_owned).
    pub fn place_owned_file_as(
        &mut self,
        source: &Path,
        file_name: &str,
        origin: &str,
        dest_dir: &Path,
    ) -> Result<Placement, PipelineError> {
        let content = hash_file(source).map_err(|e| PipelineError::io(source, e))?;
        let placement = self.plan_owned(dest_dir, file_name, origin, &content);
        self.commit(&placement, content, |dest| fs::copy(source, dest).map(|_| ()))?;
        Ok(placement)
    }

    /// Write generated bytes into `dest_dir` under `file_name`.
    pub fn place_bytes(
        &mut self,
        bytes: &[u8],
        file_name: &str,
        origin: &str,
        dest_dir: &Path,
    ) -> Result<Placement, PipelineError> {
        let content = hash_bytes(bytes);
        let placement = self.plan(dest_dir, file_name, origin, &content);
        self.commit(&placement, content, |dest| fs::write(dest, bytes))?;
        Ok(placement)
    }

    /// Write a generated document into a slot owned by the caller; see
    /// [`plan_owned`](Self::plan_owned).
    pub fn place_owned_bytes(
        &mut self,
        bytes: &[u8],
        file_name: &str,
        origin: &str,
        dest_dir: &Path,
    ) -> Result<Placement, PipelineError> {
        let content = hash_bytes(bytes);
        let placement = self.plan_owned(dest_dir, file_name, origin, &content);
        self.commit(&placement, content, |dest| fs::write(dest, bytes))?;
        Ok(placement)
    }

    fn commit<F>(
        &mut self,
        placement: &Placement,
        content: ContentHash,
        write: F,
    ) -> Result<(), PipelineError>
    where
        F: FnOnce(&Path) -> std::io::Result<()>,
    {
        if placement.kind.writes() && !self.dry_run {
            if let Some(parent) = placement.path.parent() {
                fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
            }
            write(&placement.path).map_err(|e| PipelineError::io(&placement.path, e))?;
        }
        if placement.kind == PlacementKind::Overwrite {
            log::debug!("Replacing {} ({})", placement.path.display(), content.short());
        }
        self.ledger.insert(placement.path.clone(), content);
        self.stats.record(placement.kind);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory destination contents keyed by path.
    #[derive(Default)]
    struct MemoryProbe(HashMap<PathBuf, ContentHash>);

    impl MemoryProbe {
        fn with(mut self, path: &str, bytes: &[u8]) -> Self {
            self.0.insert(PathBuf::from(path), hash_bytes(bytes));
            self
        }
    }

    impl SlotProbe for MemoryProbe {
        fn existing_hash(&self, path: &Path) -> Option<ContentHash> {
            self.0.get(path).cloned()
        }
    }

    fn flat(overwrite: bool) -> PlacementPolicy {
        PlacementPolicy {
            layout: Layout::Flat,
            overwrite,
        }
    }

    #[test]
    fn test_decision_table() {
        assert_eq!(decide_slot(SlotState::Vacant, false), SlotDecision::Write);
        assert_eq!(decide_slot(SlotState::Identical, true), SlotDecision::Skip);
        assert_eq!(decide_slot(SlotState::Different, false), SlotDecision::Probe);
        assert_eq!(decide_slot(SlotState::Different, true), SlotDecision::Overwrite);
    }

    #[test]
    fn test_sanitize_suffix() {
        assert_eq!(sanitize_suffix("Crafting/Tier 1"), "Crafting_Tier_1");
        assert_eq!(sanitize_suffix("__a--b__"), "a_b");
        assert_eq!(sanitize_suffix(""), "root");
        assert_eq!(sanitize_suffix("."), "root");
    }

    #[test]
    fn test_rename_candidate() {
        assert_eq!(
            rename_candidate("RECIPE_A.json", "B", None),
            "RECIPE_A__B.json"
        );
        assert_eq!(
            rename_candidate("RECIPE_A.json", "B", Some(2)),
            "RECIPE_A__B_2.json"
        );
        assert_eq!(rename_candidate("README", "x", None), "README__x");
    }

    #[test]
    fn test_origin_of() {
        let root = Path::new("/src");
        assert_eq!(origin_of(Path::new("/src/A/B/f.json"), root), "A/B");
        assert_eq!(origin_of(Path::new("/src/f.json"), root), "");
        assert_eq!(sanitize_suffix(&origin_of(Path::new("/src/f.json"), root)), "root");
    }

    #[test]
    fn test_plan_vacant_and_identical() {
        let probe = MemoryProbe::default().with("out/A.json", b"one");
        let dedup = Deduplicator::with_probe(flat(false), probe);
        let dest = Path::new("out");

        let same = dedup.plan(dest, "A.json", "x", &hash_bytes(b"one"));
        assert_eq!(same.kind, PlacementKind::DuplicateSkip);
        assert_eq!(same.path, PathBuf::from("out/A.json"));

        let fresh = dedup.plan(dest, "B.json", "x", &hash_bytes(b"two"));
        assert_eq!(fresh.kind, PlacementKind::Flat);
    }

    #[test]
    fn test_plan_rename_skips_taken_candidates() {
        let probe = MemoryProbe::default()
            .with("out/A.json", b"one")
            .with("out/A__B.json", b"other");
        let dedup = Deduplicator::with_probe(flat(false), probe);

        let placement = dedup.plan(Path::new("out"), "A.json", "B", &hash_bytes(b"two"));
        assert_eq!(placement.kind, PlacementKind::Rename);
        assert_eq!(placement.path, PathBuf::from("out/A__B_2.json"));
    }

    #[test]
    fn test_plan_reuses_identical_rename_candidate() {
        let probe = MemoryProbe::default()
            .with("out/A.json", b"one")
            .with("out/A__B.json", b"two");
        let dedup = Deduplicator::with_probe(flat(false), probe);

        let placement = dedup.plan(Path::new("out"), "A.json", "B", &hash_bytes(b"two"));
        assert_eq!(placement.kind, PlacementKind::DuplicateSkip);
        assert_eq!(placement.path, PathBuf::from("out/A__B.json"));
    }

    #[test]
    fn test_overwrite_replaces_every_collision() {
        let probe = MemoryProbe::default().with("out/A.json", b"old");
        let mut dedup = Deduplicator::with_probe(flat(true), probe).dry_run(true);
        let dest = Path::new("out");

        let first = dedup.place_bytes(b"new", "A.json", "one", dest).unwrap();
        assert_eq!(first.kind, PlacementKind::Overwrite);

        // Same name, different bytes, same run: the later source wins.
        let second = dedup.place_bytes(b"newer", "A.json", "two", dest).unwrap();
        assert_eq!(second.kind, PlacementKind::Overwrite);
        assert_eq!(second.path, PathBuf::from("out/A.json"));

        let third = dedup.place_bytes(b"newer", "A.json", "three", dest).unwrap();
        assert_eq!(third.kind, PlacementKind::DuplicateSkip);

        let stats = dedup.stats();
        assert_eq!(stats.overwritten, 2);
        assert_eq!(stats.renamed, 0);
        assert_eq!(stats.copied, 2);
    }

    #[test]
    fn test_owned_slot_refreshes_earlier_output() {
        let probe = MemoryProbe::default().with("out/Bread.json", b"stale");
        let mut dedup = Deduplicator::with_probe(flat(false), probe).dry_run(true);
        let dest = Path::new("out");

        let fresh = dedup
            .place_owned_bytes(b"fresh", "Bread.json", "Food", dest)
            .unwrap();
        assert_eq!(fresh.kind, PlacementKind::Overwrite);
        assert_eq!(fresh.path, PathBuf::from("out/Bread.json"));

        // A second owner of the same name in this run is renamed.
        let other = dedup
            .place_owned_bytes(b"other", "Bread.json", "Drinks", dest)
            .unwrap();
        assert_eq!(other.kind, PlacementKind::Rename);
        assert_eq!(other.path, PathBuf::from("out/Bread__Drinks.json"));

        let again = dedup
            .place_owned_bytes(b"fresh", "Bread.json", "Food", dest)
            .unwrap();
        assert_eq!(again.kind, PlacementKind::DuplicateSkip);
    }

    #[test]
    fn test_unowned_slot_keeps_earlier_output() {
        let probe = MemoryProbe::default().with("out/Bread.json", b"stale");
        let dedup = Deduplicator::with_probe(flat(false), probe);

        let placement = dedup.plan(Path::new("out"), "Bread.json", "Food", &hash_bytes(b"fresh"));
        assert_eq!(placement.kind, PlacementKind::Rename);
    }

    #[test]
    fn test_dry_run_consults_ledger() {
        let mut dedup = Deduplicator::with_probe(flat(false), MemoryProbe::default()).dry_run(true);
        let dest = Path::new("out");

        let first = dedup.place_bytes(b"x", "A.json", "a", dest).unwrap();
        let second = dedup.place_bytes(b"x", "A.json", "b", dest).unwrap();
        let third = dedup.place_bytes(b"y", "A.json", "b", dest).unwrap();

        assert_eq!(first.kind, PlacementKind::Flat);
        assert_eq!(second.kind, PlacementKind::DuplicateSkip);
        assert_eq!(third.kind, PlacementKind::Rename);
        assert_eq!(dedup.stats().duplicates_skipped, 1);
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(PlacementKind::DuplicateSkip.label(), "duplicate-skip");
        assert!(!PlacementKind::DuplicateSkip.writes());
        assert!(PlacementKind::Rename.writes());
    }
}
