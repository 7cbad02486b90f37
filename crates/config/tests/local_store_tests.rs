//! Integration tests for the local preference store.
//!
//! These tests drive the typed interface/changelog items the way the UI does:
//! open, read with defaults, patch, reopen.

use serde_json::json;
use stash_config::{ChangelogConfig, InterfaceConfig, LocalStore, StoreError};

#[test]
fn test_interface_config_round_trip_through_disk() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("local-store.json");

    let mut store = LocalStore::open(&path);
    let mut interface = store.interface_config();
    assert_eq!(interface.data(), &InterfaceConfig::default());

    store
        .set_data(
            &mut interface,
            json!({"queryConfig": {"performers": {"itemsPerPage": 40, "disp": 1}}}),
        )
        .unwrap();
    store
        .set_data(
            &mut interface,
            json!({"queryConfig": {"performers": {"currentPage": 3}}}),
        )
        .unwrap();

    let performers = &interface.data().query_config["performers"];
    assert_eq!(performers.items_per_page, Some(40));
    assert_eq!(performers.disp, Some(1));
    assert_eq!(performers.current_page, Some(3));

    let mut reopened = LocalStore::open(&path);
    assert_eq!(reopened.interface_config().data(), interface.data());
}

#[test]
fn test_changelog_versions_merge() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("local-store.json");

    let mut store = LocalStore::open(&path);
    let mut changelog = store.changelog_config();
    store
        .set_data(&mut changelog, json!({"versions": {"v0.4.0": true}}))
        .unwrap();
    store
        .set_data(&mut changelog, json!({"versions": {"v0.5.0": false}}))
        .unwrap();

    let mut expected = ChangelogConfig::default();
    expected.versions.insert("v0.4.0".to_string(), true);
    expected.versions.insert("v0.5.0".to_string(), false);
    assert_eq!(changelog.data(), &expected);
}

#[test]
fn test_store_written_by_web_client_is_readable() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("local-store.json");
    std::fs::write(
        &path,
        r#"{
            "interface": "{\"imageLightbox\":{\"slideshowDelay\":7,\"scaleUp\":true}}",
            "changelog": {"versions": {"v0.3.0": true}}
        }"#,
    )
    .unwrap();

    let mut store = LocalStore::open(&path);
    let interface = store.interface_config();
    assert_eq!(interface.data().image_lightbox.slideshow_delay, Some(7));
    assert_eq!(interface.data().image_lightbox.scale_up, Some(true));
    assert_eq!(
        store.changelog_config().data().versions.get("v0.3.0"),
        Some(&true)
    );
}

#[test]
fn test_patch_that_breaks_shape_is_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("local-store.json");

    let mut store = LocalStore::open(&path);
    let mut interface = store.interface_config();
    let result = store.set_data(&mut interface, json!({"queryConfig": 12}));

    assert!(matches!(result, Err(StoreError::Decode { .. })));
    assert_eq!(interface.data(), &InterfaceConfig::default());
    assert!(!path.exists());
}

#[test]
fn test_corrupt_store_starts_empty_and_recovers_on_write() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("local-store.json");
    std::fs::write(&path, "{ invalid json }").unwrap();

    let mut store = LocalStore::open(&path);
    assert!(store.open_error().is_some());

    let mut changelog = store.changelog_config();
    store
        .set_data(&mut changelog, json!({"versions": {"v1": true}}))
        .unwrap();

    let mut reopened = LocalStore::open(&path);
    assert!(reopened.open_error().is_none());
    assert_eq!(
        reopened.changelog_config().data().versions.get("v1"),
        Some(&true)
    );
}

#[test]
fn test_invalid_utf8_store_is_backed_up_before_write() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("local-store.json");
    let mut original = br#"{"interface":{"imageLightbox":{"slideshowDelay":5}},"note":""#.to_vec();
    original.extend_from_slice(&[0xff, 0xfe]);
    original.extend_from_slice(br#""}"#);
    std::fs::write(&path, &original).unwrap();

    let mut store = LocalStore::open(&path);
    assert!(matches!(store.open_error(), Some(StoreError::Parse { .. })));

    let mut changelog = store.changelog_config();
    store
        .set_data(&mut changelog, json!({"versions": {"v2": true}}))
        .unwrap();

    let backups: Vec<_> = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().contains("corrupt"))
        .collect();
    assert_eq!(backups.len(), 1);
    assert_eq!(std::fs::read(backups[0].path()).unwrap(), original);
}
