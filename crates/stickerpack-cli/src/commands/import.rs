use super::{json_pretty, spin_fail, spin_ok, spinner, Failure, EXIT_SUCCESS};
use stickerpack_core::{CoreError, Loader, PackSource};
use stickerpack_store::DirStore;
use std::path::Path;
use tracing::info;

/// Validate a manifest, copy its packs and assets into the store, then load
/// the store back to confirm the result.
pub fn run(
    loader: &Loader,
    manifest: &Path,
    assets: &Path,
    store_path: &Path,
    json: bool,
) -> Result<u8, Failure> {
    let packs = loader.load(&PackSource::Manifest(manifest.to_path_buf()))?;
    let store = DirStore::create(store_path).map_err(CoreError::from)?;

    let pb = if json {
        None
    } else {
        Some(spinner("importing packs..."))
    };
    for pack in &packs {
        if let Some(ref pb) = pb {
            pb.set_message(format!("importing '{}'...", pack.identifier));
        }
        if let Err(e) = store.import_pack(pack, assets) {
            if let Some(ref pb) = pb {
                spin_fail(pb, &format!("import of '{}' failed", pack.identifier));
            }
            return Err(CoreError::from(e).into());
        }
        info!("imported pack '{}'", pack.identifier);
    }

    let loaded = match loader.load_store(&store) {
        Ok(l) => l,
        Err(e) => {
            if let Some(ref pb) = pb {
                spin_fail(pb, "store reload failed");
            }
            return Err(e.into());
        }
    };
    if let Some(ref pb) = pb {
        spin_ok(
            pb,
            &format!(
                "imported {} packs into {}",
                packs.len(),
                store_path.display()
            ),
        );
    }

    if json {
        let payload = serde_json::json!({
            "store": store_path,
            "imported": packs.iter().map(|p| p.identifier.as_str()).collect::<Vec<_>>(),
            "packs_in_store": loaded.len(),
        });
        println!("{}", json_pretty(&payload)?);
    }
    Ok(EXIT_SUCCESS)
}
