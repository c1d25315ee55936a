use super::{print_summaries, Failure, EXIT_SUCCESS};
use stickerpack_core::{Loader, PackSource};
use stickerpack_schema::Pack;
use std::path::Path;

pub fn run(loader: &Loader, manifest: &Path, json: bool) -> Result<u8, Failure> {
    let packs = loader.load(&PackSource::Manifest(manifest.to_path_buf()))?;
    let summaries: Vec<_> = packs.iter().map(Pack::summary).collect();
    if !json {
        println!("{}: {} packs ok", manifest.display(), packs.len());
    }
    print_summaries(&summaries, json)?;
    Ok(EXIT_SUCCESS)
}
