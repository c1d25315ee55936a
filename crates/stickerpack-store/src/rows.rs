use serde::{Deserialize, Serialize};
use stickerpack_schema::{AssetName, Item, Pack, PackId};

/// One row of the pack table.
///
/// Unlike the manifest, store links live on each row.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackRow {
    pub identifier: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub tray_image_file: String,
    #[serde(default)]
    pub android_play_store_link: Option<String>,
    #[serde(default)]
    pub ios_app_store_link: Option<String>,
    #[serde(default)]
    pub publisher_email: Option<String>,
    #[serde(default)]
    pub publisher_website: Option<String>,
    #[serde(default)]
    pub privacy_policy_website: Option<String>,
    #[serde(default)]
    pub license_agreement_website: Option<String>,
    #[serde(default)]
    pub image_data_version: String,
    #[serde(default)]
    pub avoid_cache: bool,
}

impl PackRow {
    /// Project the row into a pack with no items yet.
    pub fn into_pack(self) -> Pack {
        Pack {
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
            android_play_store_link: self.android_play_store_link,
            ios_app_store_link: self.ios_app_store_link,
            items: Vec::new(),
        }
    }

    pub fn from_pack(pack: &Pack) -> Self {
        Self {
            identifier: pack.identifier.to_string(),
            name: pack.name.clone(),
            publisher: pack.publisher.clone(),
            tray_image_file: pack.tray_image_file.clone(),
            android_play_store_link: pack.android_play_store_link.clone(),
            ios_app_store_link: pack.ios_app_store_link.clone(),
            publisher_email: pack.publisher_email.clone(),
            publisher_website: pack.publisher_website.clone(),
            privacy_policy_website: pack.privacy_policy_website.clone(),
            license_agreement_website: pack.license_agreement_website.clone(),
            image_data_version: pack.image_data_version.clone(),
            avoid_cache: pack.avoid_cache,
        }
    }
}

/// One row of a pack's item table: file name plus comma-joined emojis.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemRow {
    pub file_name: String,
    #[serde(default)]
    pub emojis: String,
    /// blake3 of the payload, checked on read when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

impl ItemRow {
    pub fn new(file_name: impl Into<String>, emojis: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            emojis: emojis.into(),
            digest: None,
        }
    }

    pub fn into_item(self) -> Item {
        Item::new(AssetName::new(self.file_name), split_tags(&self.emojis))
    }

    pub fn from_item(item: &Item) -> Self {
        Self::new(item.file_name.to_string(), item.tags.join(","))
    }
}

/// Split a comma-joined tag column. An empty column means no tags.
pub fn split_tags(joined: &str) -> Vec<String> {
    if joined.is_empty() {
        return Vec::new();
    }
    joined.split(',').map(str::to_owned).collect()
}
