use crate::model::{apply_store_links, Item, Pack};
use crate::types::{AssetName, PackId};
use crate::validate::{check_item, check_pack_fields, check_unique_identifiers, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::error::Category;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed manifest: {0}")]
    Malformed(serde_json::Error),
    #[error("manifest schema violation: {0}")]
    Schema(serde_json::Error),
    #[error("invalid manifest: {0}")]
    Invalid(#[from] ValidationError),
}

impl From<serde_json::Error> for ManifestError {
    fn from(e: serde_json::Error) -> Self {
        match e.classify() {
            Category::Io => ManifestError::Io(e.into()),
            Category::Syntax | Category::Eof => ManifestError::Malformed(e),
            Category::Data => ManifestError::Schema(e),
        }
    }
}

/// The manifest document as written on disk.
///
/// Unknown keys are rejected at document and pack level. Sticker objects
/// ignore keys they do not know so newer manifests still load.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub android_play_store_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ios_app_store_link: Option<String>,
    pub sticker_packs: Vec<PackEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PackEntry {
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub tray_image_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher_website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy_policy_website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_agreement_website: Option<String>,
    #[serde(default)]
    pub image_data_version: String,
    #[serde(default)]
    pub avoid_cache: bool,
    #[serde(default)]
    pub stickers: Vec<StickerEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct StickerEntry {
    #[serde(default)]
    pub image_file: String,
    #[serde(default)]
    pub emojis: Vec<String>,
}

impl From<StickerEntry> for Item {
    fn from(entry: StickerEntry) -> Self {
        Item::new(AssetName::new(entry.image_file), entry.emojis)
    }
}

impl Manifest {
    /// Validate every pack and build the pack list.
    ///
    /// Packs are checked in document order. Within a pack the stickers are
    /// checked first, then the pack's own fields. The document-level store
    /// links are copied onto every pack once the whole list is valid.
    pub fn into_packs(self) -> Result<Vec<Pack>, ManifestError> {
        let mut packs = Vec::with_capacity(self.sticker_packs.len());
        for entry in self.sticker_packs {
            packs.push(entry.into_pack()?);
        }
        check_unique_identifiers(&packs)?;
        apply_store_links(
            &mut packs,
            self.android_play_store_link.as_deref(),
            self.ios_app_store_link.as_deref(),
        );
        Ok(packs)
    }
}

impl PackEntry {
    fn into_pack(self) -> Result<Pack, ValidationError> {
        let mut items = Vec::with_capacity(self.stickers.len());
        for sticker in self.stickers {
            let item = Item::from(sticker);
            check_item(&self.identifier, &item)?;
            items.push(item);
        }

        let pack = Pack {
            identifier: PackId::new(self.identifier),
            name: self.name,
            publisher: self.publisher,
            tray_image_file: self.tray_image_file,
            publisher_email: self.publisher_email,
            publisher_website: self.publisher_website,
            privacy_policy_website: self.privacy_policy_website,
            license_agreement_website: self.license_agreement_website,
            image_data_version: self.image_data_version,
            avoid_cache: self.avoid_cache,
            android_play_store_link: None,
            ios_app_store_link: None,
            items,
        };
        check_pack_fields(&pack)?;
        Ok(pack)
    }
}

pub fn parse_manifest_str(input: &str) -> Result<Manifest, ManifestError> {
    Ok(serde_json::from_str(input)?)
}

pub fn parse_manifest_reader(reader: impl Read) -> Result<Manifest, ManifestError> {
    Ok(serde_json::from_reader(BufReader::new(reader))?)
}

/// Parse and validate a manifest stream into its pack list.
pub fn read_packs(reader: impl Read) -> Result<Vec<Pack>, ManifestError> {
    parse_manifest_reader(reader)?.into_packs()
}

pub fn read_packs_file(path: impl AsRef<Path>) -> Result<Vec<Pack>, ManifestError> {
    read_packs(File::open(path)?)
}
