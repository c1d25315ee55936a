//! Pack model, manifest parsing, and pack validation for stickerpack.
//!
//! This crate defines the schema layer: the shared `Pack`/`Item` model that
//! every front-end produces, the JSON manifest parser (`read_packs`), the
//! structural invariants (`check_pack`), and the `PackValidator` seam used to
//! plug business rules on top of them.

pub mod manifest;
pub mod model;
pub mod types;
pub mod validate;

pub use manifest::{
    parse_manifest_reader, parse_manifest_str, read_packs, read_packs_file, Manifest,
    ManifestError, PackEntry, StickerEntry,
};
pub use model::{apply_store_links, Item, Pack, PackSummary, ASSET_EXTENSION};
pub use types::{contains_traversal, AssetName, PackId};
pub use validate::{
    check_item, check_pack, check_pack_fields, check_unique_identifiers, InvariantValidator,
    LimitsValidator, PackLimits, PackValidator, ValidationError,
};
