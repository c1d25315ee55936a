use crate::rows::PackRow;
use crate::{ContentStore, StoreError};
use stickerpack_schema::{
    check_item, check_pack, check_unique_identifiers, Item, Pack, PackValidator, ValidationError,
};
use std::io::Read;
use tracing::{debug, info};

/// Load every pack from `store`, with asset sizes resolved.
///
/// The pack table is read once and checked for duplicate identifiers before
/// any item or asset is queried. Packs are then populated one at a time, in
/// store order. Each must pass the structural invariants, then `validator`,
/// before the next is queried. The first failure aborts the whole load.
pub fn load_packs(
    store: &dyn ContentStore,
    validator: &dyn PackValidator,
) -> Result<Vec<Pack>, StoreError> {
    let rows = store.list_packs().map_err(StoreError::unavailable)?;
    let mut packs: Vec<Pack> = rows.into_iter().map(PackRow::into_pack).collect();
    check_unique_identifiers(&packs)?;
    debug!("store returned {} pack rows", packs.len());

    for pack in &mut packs {
        if pack.identifier.has_traversal() {
            return Err(ValidationError::IdentifierTraversal(pack.identifier.to_string()).into());
        }
        pack.items = load_items(store, pack.identifier.as_str())?;
        check_pack(pack)?;
        validator.verify(pack)?;
        info!(
            "loaded pack '{}' ({} stickers, {} bytes)",
            pack.identifier,
            pack.items.len(),
            pack.total_size()
        );
    }

    Ok(packs)
}

fn load_items(store: &dyn ContentStore, identifier: &str) -> Result<Vec<Item>, StoreError> {
    let rows = store
        .list_items(identifier)
        .map_err(StoreError::unavailable)?;

    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        let mut item = row.into_item();
        // The file name becomes a store key; reject it before it is used as one.
        check_item(identifier, &item)?;
        let data = fetch_asset(store, identifier, &item.file_name)?;
        item.size_bytes = data.len() as u64;
        items.push(item);
    }
    Ok(items)
}

/// Fetch one asset payload. Missing, unreadable, or empty payloads fail with
/// an error naming the pack and the sticker.
pub fn fetch_asset(
    store: &dyn ContentStore,
    identifier: &str,
    file_name: &str,
) -> Result<Vec<u8>, StoreError> {
    let unavailable = |reason: String| StoreError::AssetUnavailable {
        pack: identifier.to_owned(),
        item: file_name.to_owned(),
        reason,
    };

    let mut data = Vec::new();
    {
        let mut reader = store
            .open_asset(identifier, file_name)
            .map_err(|e| unavailable(e.to_string()))?;
        reader
            .read_to_end(&mut data)
            .map_err(|e| unavailable(e.to_string()))?;
    }

    if data.is_empty() {
        return Err(StoreError::EmptyAsset {
            pack: identifier.to_owned(),
            item: file_name.to_owned(),
        });
    }
    Ok(data)
}
