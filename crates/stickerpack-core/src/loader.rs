use crate::config::LoaderConfig;
use crate::CoreError;
use stickerpack_schema::{
    read_packs, InvariantValidator, LimitsValidator, ManifestError, Pack, PackValidator,
};
use stickerpack_store::{load_packs, ContentStore, DirStore};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, info};

/// Where a load takes its packs from. Exactly one front-end runs per load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackSource {
    /// A JSON manifest file.
    Manifest(PathBuf),
    /// The root of a directory-backed content store.
    Store(PathBuf),
}

/// Parse a manifest stream into validated packs.
pub fn load_from_manifest(reader: impl Read) -> Result<Vec<Pack>, CoreError> {
    Loader::new().load_manifest(reader)
}

/// Load validated packs, with asset sizes, from a content store.
pub fn load_from_store(store: &dyn ContentStore) -> Result<Vec<Pack>, CoreError> {
    Loader::new().load_store(store)
}

/// Pack loader with an injected validator.
///
/// Both front-ends always apply the structural invariants; the validator adds
/// whatever rules the caller needs on top.
pub struct Loader {
    validator: Box<dyn PackValidator>,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader {
    pub fn new() -> Self {
        Self::with_validator(InvariantValidator)
    }

    pub fn with_validator(validator: impl PackValidator + 'static) -> Self {
        Self {
            validator: Box::new(validator),
        }
    }

    pub fn from_config(config: &LoaderConfig) -> Self {
        Self::with_validator(LimitsValidator::new(config.limits.clone()))
    }

    pub fn load(&self, source: &PackSource) -> Result<Vec<Pack>, CoreError> {
        match source {
            PackSource::Manifest(path) => {
                debug!("loading packs from manifest {}", path.display());
                let file = File::open(path).map_err(ManifestError::Io)?;
                self.load_manifest(file)
            }
            PackSource::Store(root) => {
                debug!("loading packs from store {}", root.display());
                let store = DirStore::open(root)?;
                self.load_store(&store)
            }
        }
    }

    pub fn load_manifest(&self, reader: impl Read) -> Result<Vec<Pack>, CoreError> {
        let packs = read_packs(reader)?;
        for pack in &packs {
            self.validator.verify(pack).map_err(ManifestError::from)?;
        }
        info!("manifest yielded {} packs", packs.len());
        Ok(packs)
    }

    pub fn load_store(&self, store: &dyn ContentStore) -> Result<Vec<Pack>, CoreError> {
        let packs = load_packs(store, self.validator.as_ref())?;
        info!("store yielded {} packs", packs.len());
        Ok(packs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use stickerpack_schema::{PackLimits, ValidationError};
    use stickerpack_store::{ItemRow, MemoryStore, PackRow};

    const MANIFEST: &str = r#"{
        "android_play_store_link": "https://play.example/app",
        "sticker_packs": [{
            "identifier": "cuppy",
            "name": "Cuppy",
            "publisher": "Jane Doe",
            "tray_image_file": "tray.png",
            "image_data_version": "1",
            "stickers": [
                {"image_file": "01.webp", "emojis": ["☕", "🙂"]},
                {"image_file": "02.webp", "emojis": ["😄"]}
            ]
        }]
    }"#;

    fn memory_store() -> MemoryStore {
        let store = MemoryStore::new();
        store.add_pack(PackRow {
            identifier: "cuppy".to_owned(),
            name: "Cuppy".to_owned(),
            publisher: "Jane Doe".to_owned(),
            tray_image_file: "tray.png".to_owned(),
            image_data_version: "1".to_owned(),
            ..PackRow::default()
        });
        store.add_item("cuppy", ItemRow::new("01.webp", "☕,🙂"), b"RIFF");
        store.add_item("cuppy", ItemRow::new("02.webp", "😄"), b"RIFF-2");
        store
    }

    #[test]
    fn manifest_front_end() {
        let packs = load_from_manifest(MANIFEST.as_bytes()).unwrap();
        assert_eq!(packs.len(), 1);
        assert_eq!(
            packs[0].android_play_store_link.as_deref(),
            Some("https://play.example/app")
        );
        assert!(packs[0].ios_app_store_link.is_none());
        assert_eq!(packs[0].total_size(), 0);
    }

    #[test]
    fn store_front_end() {
        let packs = load_from_store(&memory_store()).unwrap();
        assert_eq!(packs[0].identifier, "cuppy");
        assert_eq!(packs[0].total_size(), 10);
    }

    #[test]
    fn validator_applies_to_manifest() {
        let loader = Loader::with_validator(LimitsValidator::new(PackLimits {
            max_items: Some(1),
            ..PackLimits::default()
        }));
        let err = loader.load_manifest(MANIFEST.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invariant);
        assert!(err.to_string().contains("cuppy"));
    }

    #[test]
    fn validator_applies_to_store() {
        let loader = Loader::with_validator(|_: &Pack| -> Result<(), ValidationError> {
            Err(ValidationError::NoPacks)
        });
        let err = loader.load_store(&memory_store()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invariant);
    }

    #[test]
    fn permissive_validator_keeps_store_invariants() {
        let store = memory_store();
        store.add_pack(PackRow {
            identifier: "bare".to_owned(),
            ..PackRow::default()
        });
        store.add_item("bare", ItemRow::new("01.webp", "☕"), b"RIFF");
        store.add_pack(PackRow {
            identifier: "hollow".to_owned(),
            name: "Hollow".to_owned(),
            publisher: "Jane Doe".to_owned(),
            tray_image_file: "tray.png".to_owned(),
            image_data_version: "1".to_owned(),
            ..PackRow::default()
        });

        let loader = Loader::with_validator(|_: &Pack| -> Result<(), ValidationError> { Ok(()) });
        let err = loader.load_store(&store).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invariant);
        assert!(err.to_string().contains("bare"), "{err}");
    }

    #[test]
    fn config_limits_drive_validator() {
        let mut config = LoaderConfig::default();
        config.limits.max_tags_per_item = Some(1);
        let err = Loader::from_config(&config)
            .load_store(&memory_store())
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Store(stickerpack_store::StoreError::Invalid(
                ValidationError::TooManyTags { .. }
            ))
        ));
    }

    #[test]
    fn missing_manifest_is_structural() {
        let dir = tempfile::tempdir().unwrap();
        let err = Loader::new()
            .load(&PackSource::Manifest(dir.path().join("none.json")))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structural);
    }

    #[test]
    fn missing_store_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = Loader::new()
            .load(&PackSource::Store(dir.path().join("none")))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
    }
}
