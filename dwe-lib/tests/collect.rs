use dwe_lib::{CollectOptions, Layout, PipelineError, collect_recipes};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn options(sources: Vec<PathBuf>, output: PathBuf) -> CollectOptions {
    CollectOptions {
        sources,
        output,
        layout: Layout::Flat,
        overwrite: false,
        dry_run: false,
    }
}

fn names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn identical_recipes_are_copied_once() {
    let tmp = TempDir::new().unwrap();
    let a = tmp.path().join("A");
    let b = tmp.path().join("B");
    write(&a, "Crafting/RECIPE_Plank.json", "[1]");
    write(&b, "Other/RECIPE_Plank.json", "[1]");
    let out = tmp.path().join("Recipes");

    let summary = collect_recipes(&options(vec![a, b], out.clone())).unwrap();
    assert_eq!(summary.found, 2);
    assert_eq!(summary.placements.copied, 1);
    assert_eq!(summary.placements.duplicates_skipped, 1);
    assert_eq!(names(&out), ["RECIPE_Plank.json"]);
}

#[test]
fn colliding_recipes_are_renamed_after_their_folder() {
    let tmp = TempDir::new().unwrap();
    let a = tmp.path().join("A");
    let b = tmp.path().join("B");
    write(&a, "Crafting/RECIPE_Plank.json", "[1]");
    write(&b, "Tier 2/Wood/RECIPE_Plank.json", "[2]");
    let out = tmp.path().join("Recipes");

    let summary = collect_recipes(&options(vec![a, b], out.clone())).unwrap();
    assert_eq!(summary.placements.renamed, 1);
    assert_eq!(
        names(&out),
        ["RECIPE_Plank.json", "RECIPE_Plank__Tier_2_Wood.json"]
    );
    assert_eq!(
        fs::read_to_string(out.join("RECIPE_Plank__Tier_2_Wood.json")).unwrap(),
        "[2]"
    );
}

#[test]
fn rerun_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let a = tmp.path().join("A");
    let b = tmp.path().join("B");
    write(&a, "RECIPE_Plank.json", "[1]");
    write(&b, "X/RECIPE_Plank.json", "[2]");
    let out = tmp.path().join("Recipes");
    let opts = options(vec![a, b], out.clone());

    collect_recipes(&opts).unwrap();
    let second = collect_recipes(&opts).unwrap();
    assert_eq!(second.placements.copied, 0);
    assert_eq!(second.placements.duplicates_skipped, 2);
    assert_eq!(names(&out), ["RECIPE_Plank.json", "RECIPE_Plank__X.json"]);
}

#[test]
fn overwrite_replaces_stale_output() {
    let tmp = TempDir::new().unwrap();
    let a = tmp.path().join("A");
    let b = tmp.path().join("B");
    let out = tmp.path().join("Recipes");
    write(&out, "RECIPE_Plank.json", "stale");
    write(&a, "RECIPE_Plank.json", "[1]");
    write(&b, "RECIPE_Plank.json", "[2]");

    let mut opts = options(vec![a, b], out.clone());
    opts.overwrite = true;
    let summary = collect_recipes(&opts).unwrap();

    assert_eq!(summary.placements.overwritten, 2);
    assert_eq!(summary.placements.renamed, 0);
    assert_eq!(names(&out), ["RECIPE_Plank.json"]);
    assert_eq!(fs::read_to_string(out.join("RECIPE_Plank.json")).unwrap(), "[2]");
}

#[test]
fn overwrite_lets_later_source_win_within_a_run() {
    let tmp = TempDir::new().unwrap();
    let a = tmp.path().join("A");
    let b = tmp.path().join("B");
    write(&a, "X/RECIPE_Plank.json", "[1]");
    write(&b, "Y/RECIPE_Plank.json", "[2]");
    let out = tmp.path().join("Recipes");

    let mut opts = options(vec![a, b], out.clone());
    opts.overwrite = true;
    let summary = collect_recipes(&opts).unwrap();

    assert_eq!(summary.placements.overwritten, 1);
    assert_eq!(summary.placements.renamed, 0);
    assert_eq!(names(&out), ["RECIPE_Plank.json"]);
    assert_eq!(fs::read_to_string(out.join("RECIPE_Plank.json")).unwrap(), "[2]");
}

#[test]
fn preserve_tree_mirrors_layout() {
    let tmp = TempDir::new().unwrap();
    let a = tmp.path().join("A");
    write(&a, "Crafting/Wood/RECIPE_Plank.json", "[1]");
    let out = tmp.path().join("Recipes");

    let mut opts = options(vec![a], out.clone());
    opts.layout = Layout::PreserveTree;
    collect_recipes(&opts).unwrap();
    assert!(out.join("Crafting/Wood/RECIPE_Plank.json").is_file());
}

#[test]
fn dry_run_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let a = tmp.path().join("A");
    write(&a, "RECIPE_Plank.json", "[1]");
    let out = tmp.path().join("Recipes");

    let mut opts = options(vec![a], out.clone());
    opts.dry_run = true;
    let summary = collect_recipes(&opts).unwrap();
    assert_eq!(summary.placements.copied, 1);
    assert!(!out.exists());
}

#[test]
fn missing_source_fails_before_copying() {
    let tmp = TempDir::new().unwrap();
    let a = tmp.path().join("A");
    write(&a, "RECIPE_Plank.json", "[1]");
    let out = tmp.path().join("Recipes");

    let err = collect_recipes(&options(vec![a, tmp.path().join("missing")], out.clone()))
        .unwrap_err();
    assert!(matches!(err, PipelineError::MissingRoot { .. }));
    assert!(!out.exists());
}
