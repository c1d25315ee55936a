use crate::layout::StoreLayout;
use crate::lock::StoreLock;
use crate::rows::{ItemRow, PackRow};
use crate::{write_atomic, ContentStore, StoreError};
use stickerpack_schema::{check_pack, contains_traversal, Pack};
use std::collections::HashMap;
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// Asset digests of one pack, keyed by file name.
type Digests = HashMap<String, String>;

/// Content store backed by a directory of JSON row files and raw assets.
///
/// Writes are atomic via `NamedTempFile` and serialized by a [`StoreLock`].
/// Asset reads verify the blake3 digest recorded in the item row, when there
/// is one. Digests are remembered per pack when its item rows are listed, so
/// each items file is parsed once per load.
pub struct DirStore {
    layout: StoreLayout,
    digests: Mutex<HashMap<String, Digests>>,
}

impl DirStore {
    pub fn new(layout: StoreLayout) -> Self {
        Self {
            layout,
            digests: Mutex::new(HashMap::new()),
        }
    }

    /// Open an existing store, failing if it was never initialized or has a
    /// different format version.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let layout = StoreLayout::new(root.as_ref());
        if !layout.is_initialized() {
            return Err(StoreError::Unavailable(format!(
                "no pack store at {}",
                root.as_ref().display()
            )));
        }
        layout.verify_version()?;
        Ok(Self::new(layout))
    }

    /// Open the store at `root`, creating it if needed.
    pub fn create(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let layout = StoreLayout::new(root.as_ref());
        layout.initialize()?;
        Ok(Self::new(layout))
    }

    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    /// Write a pack, its item rows, and its asset files into the store.
    ///
    /// Assets are read from `asset_dir` by file name. The pack row replaces an
    /// existing row with the same identifier in place, otherwise it is appended.
    pub fn import_pack(&self, pack: &Pack, asset_dir: &Path) -> Result<(), StoreError> {
        check_pack(pack)?;
        let id = pack.identifier.as_str();
        let _lock = StoreLock::acquire(&self.layout.lock_file())?;

        let pack_assets = self.layout.pack_assets_dir(id);
        fs::create_dir_all(&pack_assets)?;

        let mut item_rows = Vec::with_capacity(pack.items.len());
        for item in &pack.items {
            let file = item.file_name.as_str();
            let data = fs::read(asset_dir.join(file)).map_err(|e| StoreError::AssetUnavailable {
                pack: id.to_owned(),
                item: file.to_owned(),
                reason: e.to_string(),
            })?;
            if data.is_empty() {
                return Err(StoreError::EmptyAsset {
                    pack: id.to_owned(),
                    item: file.to_owned(),
                });
            }
            write_atomic(&pack_assets, &self.layout.asset_path(id, file), &data)?;

            let mut row = ItemRow::from_item(item);
            row.digest = Some(blake3::hash(&data).to_hex().to_string());
            item_rows.push(row);
        }

        // The tray image is optional on disk; it is never listed as an item.
        let tray = pack.tray_image_file.as_str();
        if contains_traversal(tray) {
            warn!("not copying tray image '{tray}' of pack '{id}': unsafe file name");
        } else {
            match fs::read(asset_dir.join(tray)) {
                Ok(data) => write_atomic(&pack_assets, &self.layout.asset_path(id, tray), &data)?,
                Err(e) => warn!("tray image '{tray}' of pack '{id}' not copied: {e}"),
            }
        }

        let items_json = serde_json::to_string_pretty(&item_rows)?;
        write_atomic(
            &self.layout.items_dir(),
            &self.layout.items_file(id),
            items_json.as_bytes(),
        )?;

        let mut rows = self.read_pack_rows()?;
        let row = PackRow::from_pack(pack);
        match rows.iter_mut().find(|r| r.identifier == row.identifier) {
            Some(existing) => *existing = row,
            None => rows.push(row),
        }
        self.write_pack_rows(&rows)?;
        self.cache().remove(id);

        debug!("imported pack '{id}' with {} stickers", item_rows.len());
        Ok(())
    }

    fn read_pack_rows(&self) -> Result<Vec<PackRow>, StoreError> {
        let path = self.layout.packs_file();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn read_item_rows(&self, identifier: &str) -> Result<Vec<ItemRow>, StoreError> {
        let path = self.layout.items_file(identifier);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn cache(&self) -> MutexGuard<'_, HashMap<String, Digests>> {
        self.digests.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remember_digests(&self, identifier: &str, rows: &[ItemRow]) {
        let digests = rows
            .iter()
            .filter_map(|r| Some((r.file_name.clone(), r.digest.clone()?)))
            .collect();
        self.cache().insert(identifier.to_owned(), digests);
    }

    /// Recorded digest of one asset, reading the items file only if this pack
    /// was never listed.
    fn expected_digest(
        &self,
        identifier: &str,
        file_name: &str,
    ) -> Result<Option<String>, StoreError> {
        if let Some(digests) = self.cache().get(identifier) {
            return Ok(digests.get(file_name).cloned());
        }
        let rows = self.read_item_rows(identifier)?;
        self.remember_digests(identifier, &rows);
        Ok(rows
            .into_iter()
            .find(|r| r.file_name == file_name)
            .and_then(|r| r.digest))
    }

    fn write_pack_rows(&self, rows: &[PackRow]) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(rows)?;
        write_atomic(
            &self.layout.store_dir(),
            &self.layout.packs_file(),
            content.as_bytes(),
        )
    }
}

/// Row values are joined onto store paths; refuse anything that could escape.
fn guard_key(key: &str) -> Result<(), StoreError> {
    if key.is_empty() || contains_traversal(key) {
        return Err(StoreError::InvalidKey(key.to_owned()));
    }
    Ok(())
}

impl ContentStore for DirStore {
    fn list_packs(&self) -> Result<Vec<PackRow>, StoreError> {
        self.layout.verify_version()?;
        self.read_pack_rows()
    }

    fn list_items(&self, identifier: &str) -> Result<Vec<ItemRow>, StoreError> {
        guard_key(identifier)?;
        let rows = self.read_item_rows(identifier)?;
        self.remember_digests(identifier, &rows);
        Ok(rows)
    }

    fn open_asset(
        &self,
        identifier: &str,
        file_name: &str,
    ) -> Result<Box<dyn Read + '_>, StoreError> {
        guard_key(identifier)?;
        guard_key(file_name)?;

        let path = self.layout.asset_path(identifier, file_name);
        if !path.exists() {
            return Err(StoreError::AssetNotFound {
                pack: identifier.to_owned(),
                item: file_name.to_owned(),
            });
        }
        let data = fs::read(&path)?;

        if let Some(expected) = self.expected_digest(identifier, file_name)? {
            let actual = blake3::hash(&data).to_hex().to_string();
            if actual != expected {
                return Err(StoreError::IntegrityFailure {
                    pack: identifier.to_owned(),
                    item: file_name.to_owned(),
                    expected,
                    actual,
                });
            }
        }

        Ok(Box::new(Cursor::new(data)))
    }
}
