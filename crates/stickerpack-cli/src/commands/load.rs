use super::{print_summaries, spin_fail, spin_ok, spinner, Failure, EXIT_SUCCESS};
use stickerpack_core::{Loader, PackSource};
use stickerpack_schema::Pack;
use std::path::Path;

pub fn run(loader: &Loader, store_path: &Path, json: bool) -> Result<u8, Failure> {
    let pb = if json {
        None
    } else {
        Some(spinner("loading packs from store..."))
    };

    let packs = match loader.load(&PackSource::Store(store_path.to_path_buf())) {
        Ok(p) => {
            if let Some(ref pb) = pb {
                spin_ok(pb, &format!("loaded {} packs", p.len()));
            }
            p
        }
        Err(e) => {
            if let Some(ref pb) = pb {
                spin_fail(pb, "load failed");
            }
            return Err(e.into());
        }
    };

    let summaries: Vec<_> = packs.iter().map(Pack::summary).collect();
    print_summaries(&summaries, json)?;
    Ok(EXIT_SUCCESS)
}
