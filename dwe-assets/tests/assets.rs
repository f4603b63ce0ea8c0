use std::fs;
use std::path::Path;

use dwe_assets::drop_tables::{ENEMY_NAMES_FILE, ITEM_NAMES_FILE, LOOT_TABLE_FILE};
use dwe_assets::{
    AssetError, DropTableOptions, SyncOptions, rename_assets, sync_table_to_assets,
    update_drop_tables, write_character_catalog,
};
use serde_json::{Value, json};
use tempfile::TempDir;

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
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
fn test_rename_assets_after_display_name() {
    let tmp = TempDir::new().unwrap();
    let food = tmp.path().join("Food");
    write(&food.join("ITEM_Bread.json"), r#"{"name": "Bread: Fresh", "icon": "ITEM_Bread.png"}"#);
    fs::write(food.join("ITEM_Bread.png"), b"png").unwrap();
    write(&food.join("ITEM_Pie.json"), r#"{"icon": "T_Pie.png"}"#);
    fs::write(food.join("T_Pie.png"), b"pie").unwrap();
    write(&tmp.path().join("index.json"), "{}");

    let summary = rename_assets(tmp.path()).unwrap();
    assert_eq!(summary.items_processed, 2);
    assert_eq!(summary.json_renamed, 2);
    assert_eq!(summary.images_renamed, 1);
    assert_eq!(summary.warnings, 1);

    assert_eq!(
        names(&food),
        ["Bread_ Fresh.json", "Bread_ Fresh.png", "T_Pie.json", "T_Pie.png"]
    );
    let bread = read_json(&food.join("Bread_ Fresh.json"));
    assert_eq!(bread["icon"], "Bread_ Fresh.png");
    let pie = read_json(&food.join("T_Pie.json"));
    assert_eq!(pie["name"], "T_Pie");
    assert!(tmp.path().join("index.json").is_file());
}

#[test]
fn test_rename_assets_is_stable_on_rerun() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("Tools");
    write(&dir.join("a.json"), r#"{"name": "Axe", "icon": "a.png"}"#);
    fs::write(dir.join("a.png"), b"1").unwrap();
    write(&dir.join("b.json"), r#"{"name": "Axe", "icon": "b.png"}"#);
    fs::write(dir.join("b.png"), b"2").unwrap();

    rename_assets(tmp.path()).unwrap();
    assert_eq!(names(&dir), ["Axe (2).json", "Axe (2).png", "Axe.json", "Axe.png"]);
    let before: Vec<Vec<u8>> = names(&dir).iter().map(|n| fs::read(dir.join(n)).unwrap()).collect();

    let again = rename_assets(tmp.path()).unwrap();
    assert_eq!(again.json_renamed, 0);
    assert_eq!(again.images_renamed, 0);
    assert_eq!(names(&dir), ["Axe (2).json", "Axe (2).png", "Axe.json", "Axe.png"]);
    let after: Vec<Vec<u8>> = names(&dir).iter().map(|n| fs::read(dir.join(n)).unwrap()).collect();
    assert_eq!(before, after);
}

#[test]
fn test_rename_missing_root() {
    let tmp = TempDir::new().unwrap();
    let err = rename_assets(&tmp.path().join("nope")).unwrap_err();
    assert!(matches!(err, AssetError::NotFound { .. }));
}

#[test]
fn test_sync_replaces_matches_case_insensitively() {
    let tmp = TempDir::new().unwrap();
    let table = tmp.path().join("Table");
    let assets = tmp.path().join("Assets");
    write(&table.join("Food/Bread.json"), "new bread");
    write(&table.join("Food/Ghost.json"), "nobody");
    write(&table.join("index.json"), "{}");
    write(&assets.join("BagTab/Food/bread.JSON"), "old bread");
    write(&assets.join("BagTab/Other/Bread.json"), "old copy");
    write(&assets.join("index.json"), "keep");

    let options = SyncOptions {
        table_root: table.clone(),
        assets_root: assets.clone(),
        dry_run: false,
        delete_matched: true,
    };
    let summary = sync_table_to_assets(&options).unwrap();
    assert_eq!(summary.scanned, 2);
    assert_eq!(summary.replaced, 2);
    assert_eq!(summary.deleted, 1);
    assert_eq!(summary.missing, 1);
    assert_eq!(summary.multiple_matches, 1);

    assert_eq!(fs::read_to_string(assets.join("BagTab/Food/bread.JSON")).unwrap(), "new bread");
    assert_eq!(fs::read_to_string(assets.join("BagTab/Other/Bread.json")).unwrap(), "new bread");
    assert_eq!(fs::read_to_string(assets.join("index.json")).unwrap(), "keep");
    assert!(!table.join("Food/Bread.json").exists());
    assert!(table.join("Food/Ghost.json").exists());
}

#[test]
fn test_sync_dry_run_touches_nothing() {
    let tmp = TempDir::new().unwrap();
    let table = tmp.path().join("Table");
    let assets = tmp.path().join("Assets");
    write(&table.join("Axe.png"), "new");
    write(&assets.join("Axe.png"), "old");

    let options = SyncOptions {
        table_root: table.clone(),
        assets_root: assets.clone(),
        dry_run: true,
        delete_matched: true,
    };
    let summary = sync_table_to_assets(&options).unwrap();
    assert_eq!(summary.replaced, 1);
    assert_eq!(summary.deleted, 1);
    assert_eq!(fs::read_to_string(assets.join("Axe.png")).unwrap(), "old");
    assert!(table.join("Axe.png").exists());
}

#[test]
fn test_drop_tables_preserve_translations() {
    let tmp = TempDir::new().unwrap();
    let loot = tmp.path().join("LootDropTable");
    let web = tmp.path().join("docs/data");
    let table = json!([{"Rows": {
        "Wolf": {"Resources": [{"SpawnedItemData": {"ObjectName": "X'ITEM_Pelt'"}}]},
        "Bear": {"Resources": [{"SpawnedItemData": {"ObjectName": "X'DA_Claw'"}}]}
    }}]);
    write(&loot.join(LOOT_TABLE_FILE), &table.to_string());
    write(&loot.join(ENEMY_NAMES_FILE), r#"{"Wolf": "Grey Wolf", "Gone": "x"}"#);
    write(&loot.join(ITEM_NAMES_FILE), "not json");

    let summary = update_drop_tables(&DropTableOptions {
        loot_dir: loot.clone(),
        web_dir: web.clone(),
    })
    .unwrap();
    assert_eq!(summary.enemies, 2);
    assert_eq!(summary.items, 2);
    assert_eq!(summary.names_kept, 1);
    assert_eq!(summary.files_published, 3);

    let enemies = fs::read_to_string(loot.join(ENEMY_NAMES_FILE)).unwrap();
    assert_eq!(enemies, "{\n  \"Bear\": \"\",\n  \"Wolf\": \"Grey Wolf\"\n}\n");
    assert_eq!(
        read_json(&loot.join(ITEM_NAMES_FILE)),
        json!({"DA_Claw": "", "ITEM_Pelt": ""})
    );
    assert_eq!(
        names(&web),
        [
            "loot_drop_table.json",
            "loot_drop_table_enemy_names.json",
            "loot_drop_table_item_names.json"
        ]
    );
    assert_eq!(
        fs::read_to_string(web.join("loot_drop_table_enemy_names.json")).unwrap(),
        enemies
    );
}

#[test]
fn test_drop_tables_missing_loot_table() {
    let tmp = TempDir::new().unwrap();
    let err = update_drop_tables(&DropTableOptions {
        loot_dir: tmp.path().to_path_buf(),
        web_dir: tmp.path().join("web"),
    })
    .unwrap_err();
    assert!(matches!(err, AssetError::NotFound { kind: "Loot table", .. }));
}

#[test]
fn test_character_catalog_written() {
    let tmp = TempDir::new().unwrap();
    write(
        &tmp.path().join("DT_Customization_BodyType.json"),
        r#"[{"Rows": {"B": {}, "A": {}}}]"#,
    );
    let output = tmp.path().join("out/characters.json");
    let summary = write_character_catalog(tmp.path(), &output).unwrap();
    assert_eq!(summary.tables_read, 1);
    assert_eq!(summary.tables_missing, 7);

    let value = read_json(&output);
    assert_eq!(value["BodyType"], json!(["A", "B"]));
    assert_eq!(value["EyebrowColor"], json!([]));
    let text = fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("{\n  \"BodyType\""));
}
