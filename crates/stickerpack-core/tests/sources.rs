//! Both pack sources end to end: a manifest on disk, imported into a store.

use stickerpack_core::{ErrorKind, Loader, LoaderConfig, PackSource};
use stickerpack_schema::read_packs_file;
use stickerpack_store::{DirStore, StoreLayout};
use std::fs;
use std::path::{Path, PathBuf};

const MANIFEST: &str = r#"{
  "android_play_store_link": "https://play.example/app",
  "ios_app_store_link": "https://apps.example/app",
  "sticker_packs": [
    {
      "identifier": "cuppy",
      "name": "Cuppy",
      "publisher": "Jane Doe",
      "tray_image_file": "tray.png",
      "publisher_website": "https://example.com",
      "image_data_version": "2",
      "avoid_cache": true,
      "stickers": [
        {"image_file": "01.webp", "emojis": ["☕", "🙂"], "accessibility_text": "a cup"},
        {"image_file": "02.webp", "emojis": []}
      ]
    },
    {
      "identifier": "bandit",
      "name": "Bandit",
      "publisher": "Jane Doe",
      "tray_image_file": "tray.png",
      "image_data_version": "1",
      "stickers": [
        {"image_file": "01.webp", "emojis": ["😎"]}
      ]
    }
  ]
}"#;

fn write_project(dir: &Path) -> PathBuf {
    let manifest = dir.join("contents.json");
    fs::write(&manifest, MANIFEST).unwrap();
    fs::write(dir.join("01.webp"), b"RIFF-one").unwrap();
    fs::write(dir.join("02.webp"), b"RIFF-two-bytes").unwrap();
    fs::write(dir.join("tray.png"), b"PNG").unwrap();
    manifest
}

fn import_all(manifest: &Path, assets: &Path, store_root: &Path) {
    let store = DirStore::create(store_root).unwrap();
    for pack in read_packs_file(manifest).unwrap() {
        store.import_pack(&pack, assets).unwrap();
    }
}

#[test]
fn store_reproduces_manifest_with_sizes() {
    let project = tempfile::tempdir().unwrap();
    let store_root = tempfile::tempdir().unwrap();
    let manifest = write_project(project.path());
    import_all(&manifest, project.path(), store_root.path());

    let loader = Loader::new();
    let from_manifest = loader
        .load(&PackSource::Manifest(manifest.clone()))
        .unwrap();
    let from_store = loader
        .load(&PackSource::Store(store_root.path().to_path_buf()))
        .unwrap();

    assert_eq!(from_manifest.len(), from_store.len());
    for (m, s) in from_manifest.iter().zip(&from_store) {
        assert_eq!(m.identifier, s.identifier);
        assert_eq!(m.name, s.name);
        assert_eq!(m.avoid_cache, s.avoid_cache);
        assert_eq!(m.publisher_website, s.publisher_website);
        assert_eq!(m.android_play_store_link, s.android_play_store_link);
        assert_eq!(m.ios_app_store_link, s.ios_app_store_link);
        let tags_m: Vec<_> = m.items.iter().map(|i| &i.tags).collect();
        let tags_s: Vec<_> = s.items.iter().map(|i| &i.tags).collect();
        assert_eq!(tags_m, tags_s);
        assert_eq!(m.total_size(), 0);
    }
    assert_eq!(from_store[0].total_size(), 8 + 14);
    assert_eq!(from_store[1].total_size(), 8);
}

#[test]
fn tampered_store_asset_is_asset_unavailable() {
    let project = tempfile::tempdir().unwrap();
    let store_root = tempfile::tempdir().unwrap();
    let manifest = write_project(project.path());
    import_all(&manifest, project.path(), store_root.path());

    let layout = StoreLayout::new(store_root.path());
    fs::write(layout.asset_path("bandit", "01.webp"), b"other").unwrap();

    let err = Loader::new()
        .load(&PackSource::Store(store_root.path().to_path_buf()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AssetUnavailable);
    let msg = err.to_string();
    assert!(msg.contains("bandit"), "{msg}");
    assert!(msg.contains("01.webp"), "{msg}");
}

#[test]
fn configured_limits_reject_large_pack() {
    let project = tempfile::tempdir().unwrap();
    let manifest = write_project(project.path());
    let config = LoaderConfig::parse("[limits]\nmax_items = 1\n", Path::new("config.toml")).unwrap();

    let err = Loader::from_config(&config)
        .load(&PackSource::Manifest(manifest))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Invariant);
    assert!(err.to_string().contains("cuppy"));
}

#[test]
fn malformed_manifest_is_structural() {
    let project = tempfile::tempdir().unwrap();
    let manifest = project.path().join("contents.json");
    fs::write(&manifest, &MANIFEST[..MANIFEST.len() - 3]).unwrap();

    let err = Loader::new()
        .load(&PackSource::Manifest(manifest))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
}
