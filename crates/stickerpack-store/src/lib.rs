//! Content store access and the store loader for stickerpack.
//!
//! This crate provides the tabular query seam (`ContentStore`), the row types
//! it returns (`PackRow`, `ItemRow`), the store loader that turns rows and
//! asset payloads into validated packs (`load_packs`), a directory-backed
//! store with atomic writes (`DirStore`), and an in-memory store for tests and
//! embedding (`MemoryStore`). Writers to a `DirStore` serialize on a `StoreLock`.

pub mod dir;
pub mod layout;
pub mod loader;
pub mod lock;
pub mod memory;
pub mod rows;

pub use dir::DirStore;
pub use layout::{StoreLayout, STORE_FORMAT_VERSION};
pub use loader::{fetch_asset, load_packs};
pub use lock::StoreLock;
pub use memory::{MemoryStore, Query};
pub use rows::{split_tags, ItemRow, PackRow};

use stickerpack_schema::ValidationError;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;

/// Read-only query interface over a tabular pack store.
///
/// Rows come back in store order; the loader never re-sorts them.
pub trait ContentStore: Send + Sync {
    /// All pack rows, in one request.
    fn list_packs(&self) -> Result<Vec<PackRow>, StoreError>;

    /// Item rows of one pack. An unknown identifier yields no rows.
    fn list_items(&self, identifier: &str) -> Result<Vec<ItemRow>, StoreError>;

    /// Raw payload of one asset.
    fn open_asset(
        &self,
        identifier: &str,
        file_name: &str,
    ) -> Result<Box<dyn Read + '_>, StoreError>;
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store format version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("invalid store key: '{0}'")]
    InvalidKey(String),
    #[error("asset not found: {pack}/{item}")]
    AssetNotFound { pack: String, item: String },
    #[error("integrity check failed for asset '{pack}/{item}': expected {expected}, got {actual}")]
    IntegrityFailure {
        pack: String,
        item: String,
        expected: String,
        actual: String,
    },
    #[error("asset unavailable, pack: {pack}, sticker: {item}: {reason}")]
    AssetUnavailable {
        pack: String,
        item: String,
        reason: String,
    },
    #[error("asset file is empty, pack: {pack}, sticker: {item}")]
    EmptyAsset { pack: String, item: String },
    #[error("invalid pack: {0}")]
    Invalid(#[from] ValidationError),
}

impl StoreError {
    /// Collapse a failed query into `Unavailable`, keeping the original reason.
    pub fn unavailable(self) -> Self {
        match self {
            e @ StoreError::Unavailable(_) => e,
            other => StoreError::Unavailable(other.to_string()),
        }
    }

    /// True for failures tied to one asset payload.
    pub fn is_asset_failure(&self) -> bool {
        matches!(
            self,
            StoreError::AssetUnavailable { .. } | StoreError::EmptyAsset { .. }
        )
    }
}

/// Fsync a directory so a preceding `rename()` is durable.
pub(crate) fn fsync_dir(dir: &Path) -> Result<(), std::io::Error> {
    let f = std::fs::File::open(dir)?;
    f.sync_all()
}

/// Write `data` to `dest` through a temp file in `dir`, then rename over it.
pub(crate) fn write_atomic(dir: &Path, dest: &Path, data: &[u8]) -> Result<(), StoreError> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(dest).map_err(|e| StoreError::Io(e.error))?;
    fsync_dir(dir)?;
    Ok(())
}
