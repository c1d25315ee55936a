use super::{json_pretty, Failure, EXIT_SUCCESS};
use stickerpack_core::CoreError;
use stickerpack_store::{ContentStore, DirStore};
use std::path::Path;

/// Print the pack table as stored. No items or assets are read.
pub fn run(store_path: &Path, json: bool) -> Result<u8, Failure> {
    let rows = DirStore::open(store_path)
        .and_then(|store| store.list_packs())
        .map_err(CoreError::from)?;

    if json {
        println!("{}", json_pretty(&rows)?);
    } else if rows.is_empty() {
        println!("no packs in store");
    } else {
        println!("{:<24} {:<24} {:<20} VERSION", "IDENTIFIER", "NAME", "PUBLISHER");
        for row in &rows {
            println!(
                "{:<24} {:<24} {:<20} {}",
                row.identifier, row.name, row.publisher, row.image_data_version
            );
        }
    }
    Ok(EXIT_SUCCESS)
}
