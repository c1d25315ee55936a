use crate::types::{AssetName, PackId};
use serde::{Deserialize, Serialize};

/// Extension every asset file name must carry.
pub const ASSET_EXTENSION: &str = ".webp";

/// One image asset of a pack plus its emoji tags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub file_name: AssetName,
    /// Tags in authoring order. Duplicates are allowed.
    pub tags: Vec<String>,
    /// Payload length in bytes. Zero until the asset has been fetched.
    #[serde(default)]
    pub size_bytes: u64,
}

impl Item {
    pub fn new(file_name: impl Into<AssetName>, tags: Vec<String>) -> Self {
        Self {
            file_name: file_name.into(),
            tags,
            size_bytes: 0,
        }
    }
}

/// A named, uniquely identified collection of items with shared metadata.
///
/// Both the manifest parser and the store loader produce this type, so
/// consumers cannot tell which front-end a pack came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pack {
    pub identifier: PackId,
    pub name: String,
    pub publisher: String,
    pub tray_image_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher_website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy_policy_website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_agreement_website: Option<String>,
    pub image_data_version: String,
    #[serde(default)]
    pub avoid_cache: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub android_play_store_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ios_app_store_link: Option<String>,
    pub items: Vec<Item>,
}

impl Pack {
    /// Create a pack with the required fields set and everything optional unset.
    pub fn new(
        identifier: impl Into<PackId>,
        name: impl Into<String>,
        publisher: impl Into<String>,
        tray_image_file: impl Into<String>,
        image_data_version: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            publisher: publisher.into(),
            tray_image_file: tray_image_file.into(),
            publisher_email: None,
            publisher_website: None,
            privacy_policy_website: None,
            license_agreement_website: None,
            image_data_version: image_data_version.into(),
            avoid_cache: false,
            android_play_store_link: None,
            ios_app_store_link: None,
            items: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.items = items;
        self
    }

    /// Sum of all item sizes. Zero for packs whose assets were never fetched.
    pub fn total_size(&self) -> u64 {
        self.items.iter().map(|i| i.size_bytes).sum()
    }

    pub fn item(&self, file_name: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.file_name == file_name)
    }

    pub fn summary(&self) -> PackSummary {
        PackSummary {
            identifier: self.identifier.clone(),
            name: self.name.clone(),
            publisher: self.publisher.clone(),
            items: self.items.len(),
            total_size: self.total_size(),
        }
    }
}

/// Condensed view of a pack for listings.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PackSummary {
    pub identifier: PackId,
    pub name: String,
    pub publisher: String,
    pub items: usize,
    pub total_size: u64,
}

/// Copy document-scoped store links onto every pack.
pub fn apply_store_links(packs: &mut [Pack], android: Option<&str>, ios: Option<&str>) {
    for pack in packs {
        pack.android_play_store_link = android.map(str::to_owned);
        pack.ios_app_store_link = ios.map(str::to_owned);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sized(name: &str, size: u64) -> Item {
        Item {
            size_bytes: size,
            ..Item::new(name, vec!["😀".to_owned()])
        }
    }

    #[test]
    fn total_size_sums_items() {
        let pack = Pack::new("p", "P", "pub", "tray.png", "1")
            .with_items(vec![sized("a.webp", 10), sized("b.webp", 32)]);
        assert_eq!(pack.total_size(), 42);
        assert_eq!(pack.summary().items, 2);
        assert_eq!(pack.summary().total_size, 42);
    }

    #[test]
    fn unfetched_pack_has_zero_size() {
        let pack = Pack::new("p", "P", "pub", "tray.png", "1")
            .with_items(vec![Item::new("a.webp", Vec::new())]);
        assert_eq!(pack.total_size(), 0);
    }

    #[test]
    fn item_lookup_by_file_name() {
        let pack = Pack::new("p", "P", "pub", "tray.png", "1")
            .with_items(vec![sized("a.webp", 1), sized("b.webp", 2)]);
        assert_eq!(pack.item("b.webp").map(|i| i.size_bytes), Some(2));
        assert!(pack.item("c.webp").is_none());
    }

    #[test]
    fn store_links_are_broadcast() {
        let mut packs = vec![
            Pack::new("a", "A", "pub", "t.png", "1"),
            Pack::new("b", "B", "pub", "t.png", "1"),
        ];
        apply_store_links(&mut packs, Some("https://play.example/app"), None);
        for pack in &packs {
            assert_eq!(
                pack.android_play_store_link.as_deref(),
                Some("https://play.example/app")
            );
            assert!(pack.ios_app_store_link.is_none());
        }
    }

    #[test]
    fn optional_fields_are_omitted_from_json() {
        let pack = Pack::new("p", "P", "pub", "tray.png", "1");
        let json = serde_json::to_string(&pack).unwrap();
        assert!(!json.contains("publisher_email"));
        assert!(!json.contains("ios_app_store_link"));
    }
}
