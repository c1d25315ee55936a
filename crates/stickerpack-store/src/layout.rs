use crate::{write_atomic, StoreError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Current store format version. Incremented on incompatible layout changes.
pub const STORE_FORMAT_VERSION: u32 = 1;
const VERSION_FILE: &str = "version";

/// Directory layout of a [`DirStore`](crate::DirStore).
///
/// ```text
/// <root>/store/version
/// <root>/store/packs.json
/// <root>/store/items/<identifier>.json
/// <root>/store/assets/<identifier>/<file_name>
/// ```
#[derive(Debug, Clone)]
pub struct StoreLayout {
    root: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoreVersion {
    format_version: u32,
}

impl StoreLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[inline]
    pub fn store_dir(&self) -> PathBuf {
        self.root.join("store")
    }

    #[inline]
    pub fn packs_file(&self) -> PathBuf {
        self.store_dir().join("packs.json")
    }

    #[inline]
    pub fn items_dir(&self) -> PathBuf {
        self.store_dir().join("items")
    }

    #[inline]
    pub fn items_file(&self, identifier: &str) -> PathBuf {
        self.items_dir().join(format!("{identifier}.json"))
    }

    #[inline]
    pub fn assets_dir(&self) -> PathBuf {
        self.store_dir().join("assets")
    }

    #[inline]
    pub fn pack_assets_dir(&self, identifier: &str) -> PathBuf {
        self.assets_dir().join(identifier)
    }

    #[inline]
    pub fn asset_path(&self, identifier: &str, file_name: &str) -> PathBuf {
        self.pack_assets_dir(identifier).join(file_name)
    }

    #[inline]
    pub fn lock_file(&self) -> PathBuf {
        self.store_dir().join(".lock")
    }

    fn version_file(&self) -> PathBuf {
        self.store_dir().join(VERSION_FILE)
    }

    pub fn is_initialized(&self) -> bool {
        self.version_file().exists()
    }

    pub fn initialize(&self) -> Result<(), StoreError> {
        fs::create_dir_all(self.items_dir())?;
        fs::create_dir_all(self.assets_dir())?;

        if self.is_initialized() {
            self.verify_version()?;
        } else {
            let ver = StoreVersion {
                format_version: STORE_FORMAT_VERSION,
            };
            let content = serde_json::to_string_pretty(&ver)?;
            write_atomic(&self.store_dir(), &self.version_file(), content.as_bytes())?;
        }

        Ok(())
    }

    pub fn verify_version(&self) -> Result<(), StoreError> {
        let content = fs::read_to_string(self.version_file())?;
        let ver: StoreVersion = serde_json::from_str(&content)?;

        if ver.format_version != STORE_FORMAT_VERSION {
            return Err(StoreError::VersionMismatch {
                expected: STORE_FORMAT_VERSION,
                found: ver.format_version,
            });
        }
        Ok(())
    }
}
