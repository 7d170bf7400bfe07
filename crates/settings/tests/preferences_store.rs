use bibshelf_settings::{PreferenceStore, PreferencesError, PreferencesFile};
use std::fs;
use tempfile::tempdir;

#[test]
fn load_missing_file_returns_empty_store() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("preferences.json");

    let store = PreferencesFile::load(&path).expect("load defaults");
    assert!(store.entries().is_empty());
    assert!(store.get_string_list("customExportFormat0").is_empty());
    assert!(!path.exists(), "loading must not create the file");
}

#[test]
fn save_and_reload_roundtrip() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("nested").join("preferences.json");

    let mut store = PreferencesFile::new(path.clone());
    store.put_string_list(
        "customExportFormat0",
        &["My;Format".to_string(), "my.layout".to_string(), "txt".to_string()],
    );
    store.put_bool("exportInOriginalOrder", true);
    store.save().expect("save");
    assert!(!path.with_extension("tmp").exists());

    let reloaded = PreferencesFile::load(&path).expect("reload");
    assert_eq!(
        reloaded.get_string_list("customExportFormat0"),
        vec!["My;Format", "my.layout", "txt"]
    );
    assert!(reloaded.get_bool("exportInOriginalOrder", false));
}

#[test]
fn removed_keys_are_not_persisted() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("preferences.json");

    let mut store = PreferencesFile::new(path.clone());
    store.put("a", "1".to_string());
    store.put("b", "2".to_string());
    store.save().expect("save");

    store.remove("a");
    store.save().expect("save again");

    let reloaded = PreferencesFile::load(&path).expect("reload");
    assert_eq!(reloaded.get("a"), None);
    assert_eq!(reloaded.get("b").as_deref(), Some("2"));
}

#[test]
fn import_backs_up_existing_file() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("preferences.json");
    let import = temp.path().join("incoming.json");

    let mut store = PreferencesFile::new(path.clone());
    store.put("defaultEncoding", "ISO-8859-1".to_string());
    store.save().expect("save");

    fs::write(
        &import,
        r#"{ "version": 0, "entries": { "defaultEncoding": "UTF-16" } }"#,
    )
    .expect("write import");
    store.import_from(&import).expect("import");

    assert_eq!(store.get("defaultEncoding").as_deref(), Some("UTF-16"));
    let backup = fs::read_to_string(path.with_extension("bak")).expect("backup");
    assert!(backup.contains("ISO-8859-1"));
    let saved = fs::read_to_string(&path).expect("saved");
    assert!(saved.contains("\"version\": 1"), "legacy version is upgraded");
}

#[test]
fn export_writes_a_copy() {
    let temp = tempdir().expect("tempdir");
    let mut store = PreferencesFile::new(temp.path().join("preferences.json"));
    store.put("fileDirectory", "/papers".to_string());

    let target = temp.path().join("out").join("prefs-export.json");
    store.export_to(&target).expect("export");
    let exported = fs::read_to_string(&target).expect("read export");
    assert!(exported.contains("\"fileDirectory\": \"/papers\""));
}

#[test]
fn malformed_file_reports_parse_error() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("preferences.json");
    fs::write(&path, "{ not json").expect("write");

    match PreferencesFile::load(&path) {
        Err(PreferencesError::Parse { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected parse error, got {other:?}"),
    }
}
