//! Pack invariants shared by every front-end, and the validator seam.
//!
//! `check_pack` and friends enforce the structural rules any pack must satisfy
//! before it reaches a consumer. Business rules on top of those (item counts,
//! asset sizes) live behind [`PackValidator`] so callers can swap them out.

use crate::model::{Item, Pack, ASSET_EXTENSION};
use crate::types::contains_traversal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("pack list cannot be empty")]
    NoPacks,
    #[error("pack identifiers must be unique, more than one pack has identifier '{0}'")]
    DuplicateIdentifier(String),
    #[error("identifier cannot be empty")]
    EmptyIdentifier,
    #[error("name cannot be empty (pack '{pack}')")]
    EmptyName { pack: String },
    #[error("publisher cannot be empty (pack '{pack}')")]
    EmptyPublisher { pack: String },
    #[error("tray_image_file cannot be empty (pack '{pack}')")]
    EmptyTrayImage { pack: String },
    #[error("sticker list is empty (pack '{pack}')")]
    NoItems { pack: String },
    #[error("identifier '{0}' must not contain .. or / (directory traversal)")]
    IdentifierTraversal(String),
    #[error("image_data_version cannot be empty (pack '{pack}')")]
    EmptyImageDataVersion { pack: String },
    #[error("sticker image_file cannot be empty (pack '{pack}')")]
    EmptyFileName { pack: String },
    #[error("sticker image files must be .webp files, got '{file}' (pack '{pack}')")]
    WrongExtension { pack: String, file: String },
    #[error("file name '{file}' must not contain .. or / (directory traversal, pack '{pack}')")]
    FileNameTraversal { pack: String, file: String },
    #[error("pack '{pack}' has {count} stickers, at least {min} required")]
    TooFewItems { pack: String, count: usize, min: usize },
    #[error("pack '{pack}' has {count} stickers, at most {max} allowed")]
    TooManyItems { pack: String, count: usize, max: usize },
    #[error("sticker '{file}' in pack '{pack}' has {count} emojis, at most {max} allowed")]
    TooManyTags {
        pack: String,
        file: String,
        count: usize,
        max: usize,
    },
    #[error("sticker '{file}' in pack '{pack}' is {size} bytes, at most {max} allowed")]
    AssetTooLarge {
        pack: String,
        file: String,
        size: u64,
        max: u64,
    },
    #[error("{field} of pack '{pack}' is {len} characters, at most {max} allowed")]
    TextTooLong {
        pack: String,
        field: &'static str,
        len: usize,
        max: usize,
    },
    #[error("tray image '{tray}' of pack '{pack}' is not one of its stickers")]
    TrayNotInPack { pack: String, tray: String },
}

/// Item-level invariants: non-empty name, required extension, no traversal.
pub fn check_item(pack: &str, item: &Item) -> Result<(), ValidationError> {
    let file = item.file_name.as_str();
    if file.is_empty() {
        return Err(ValidationError::EmptyFileName {
            pack: pack.to_owned(),
        });
    }
    if !file.ends_with(ASSET_EXTENSION) {
        return Err(ValidationError::WrongExtension {
            pack: pack.to_owned(),
            file: file.to_owned(),
        });
    }
    if contains_traversal(file) {
        return Err(ValidationError::FileNameTraversal {
            pack: pack.to_owned(),
            file: file.to_owned(),
        });
    }
    Ok(())
}

/// Pack-level invariants, checked in a fixed order; the first failure wins.
///
/// Items are only checked for presence here, see [`check_pack`].
pub fn check_pack_fields(pack: &Pack) -> Result<(), ValidationError> {
    let id = pack.identifier.as_str();
    if id.is_empty() {
        return Err(ValidationError::EmptyIdentifier);
    }
    if pack.name.is_empty() {
        return Err(ValidationError::EmptyName {
            pack: id.to_owned(),
        });
    }
    if pack.publisher.is_empty() {
        return Err(ValidationError::EmptyPublisher {
            pack: id.to_owned(),
        });
    }
    if pack.tray_image_file.is_empty() {
        return Err(ValidationError::EmptyTrayImage {
            pack: id.to_owned(),
        });
    }
    if pack.items.is_empty() {
        return Err(ValidationError::NoItems {
            pack: id.to_owned(),
        });
    }
    if contains_traversal(id) {
        return Err(ValidationError::IdentifierTraversal(id.to_owned()));
    }
    if pack.image_data_version.is_empty() {
        return Err(ValidationError::EmptyImageDataVersion {
            pack: id.to_owned(),
        });
    }
    Ok(())
}

/// All invariants of one pack: its own fields, then each item in order.
pub fn check_pack(pack: &Pack) -> Result<(), ValidationError> {
    check_pack_fields(pack)?;
    for item in &pack.items {
        check_item(&pack.identifier, item)?;
    }
    Ok(())
}

/// Reject an empty list or the first identifier seen twice.
pub fn check_unique_identifiers(packs: &[Pack]) -> Result<(), ValidationError> {
    if packs.is_empty() {
        return Err(ValidationError::NoPacks);
    }
    let mut seen = HashSet::with_capacity(packs.len());
    for pack in packs {
        if !seen.insert(pack.identifier.as_str()) {
            return Err(ValidationError::DuplicateIdentifier(
                pack.identifier.to_string(),
            ));
        }
    }
    Ok(())
}

/// Verifies a fully populated pack before it is handed to consumers.
pub trait PackValidator: Send + Sync {
    fn verify(&self, pack: &Pack) -> Result<(), ValidationError>;
}

impl<F> PackValidator for F
where
    F: Fn(&Pack) -> Result<(), ValidationError> + Send + Sync,
{
    fn verify(&self, pack: &Pack) -> Result<(), ValidationError> {
        self(pack)
    }
}

/// Applies only the structural invariants.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvariantValidator;

impl PackValidator for InvariantValidator {
    fn verify(&self, pack: &Pack) -> Result<(), ValidationError> {
        check_pack(pack)
    }
}

/// Optional business-rule ceilings. `None` disables a rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PackLimits {
    #[serde(default)]
    pub min_items: Option<usize>,
    #[serde(default)]
    pub max_items: Option<usize>,
    #[serde(default)]
    pub max_tags_per_item: Option<usize>,
    #[serde(default)]
    pub max_asset_bytes: Option<u64>,
    #[serde(default)]
    pub max_text_len: Option<usize>,
    #[serde(default)]
    pub require_tray_item: bool,
}

/// Structural invariants followed by the configured [`PackLimits`].
#[derive(Debug, Clone, Default)]
pub struct LimitsValidator {
    limits: PackLimits,
}

impl LimitsValidator {
    pub fn new(limits: PackLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &PackLimits {
        &self.limits
    }

    fn check_text(&self, pack: &Pack) -> Result<(), ValidationError> {
        let Some(max) = self.limits.max_text_len else {
            return Ok(());
        };
        let fields = [
            ("identifier", pack.identifier.as_str()),
            ("name", pack.name.as_str()),
            ("publisher", pack.publisher.as_str()),
        ];
        for (field, value) in fields {
            let len = value.chars().count();
            if len > max {
                return Err(ValidationError::TextTooLong {
                    pack: pack.identifier.to_string(),
                    field,
                    len,
                    max,
                });
            }
        }
        Ok(())
    }
}

impl PackValidator for LimitsValidator {
    fn verify(&self, pack: &Pack) -> Result<(), ValidationError> {
        check_pack(pack)?;
        self.check_text(pack)?;

        let id = pack.identifier.as_str();
        let count = pack.items.len();
        if let Some(min) = self.limits.min_items {
            if count < min {
                return Err(ValidationError::TooFewItems {
                    pack: id.to_owned(),
                    count,
                    min,
                });
            }
        }
        if let Some(max) = self.limits.max_items {
            if count > max {
                return Err(ValidationError::TooManyItems {
                    pack: id.to_owned(),
                    count,
                    max,
                });
            }
        }

        for item in &pack.items {
            if let Some(max) = self.limits.max_tags_per_item {
                if item.tags.len() > max {
                    return Err(ValidationError::TooManyTags {
                        pack: id.to_owned(),
                        file: item.file_name.to_string(),
                        count: item.tags.len(),
                        max,
                    });
                }
            }
            if let Some(max) = self.limits.max_asset_bytes {
                if item.size_bytes > max {
                    return Err(ValidationError::AssetTooLarge {
                        pack: id.to_owned(),
                        file: item.file_name.to_string(),
                        size: item.size_bytes,
                        max,
                    });
                }
            }
        }

        if self.limits.require_tray_item && pack.item(&pack.tray_image_file).is_none() {
            return Err(ValidationError::TrayNotInPack {
                pack: id.to_owned(),
                tray: pack.tray_image_file.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_pack(id: &str) -> Pack {
        Pack::new(id, "Cuppy", "Jane Doe", "tray_Cuppy.png", "1").with_items(vec![
            Item::new("01_Cuppy_smile.webp", vec!["☕".to_owned(), "🙂".to_owned()]),
            Item::new("02_Cuppy_lol.webp", vec!["😄".to_owned()]),
        ])
    }

    #[test]
    fn valid_pack_passes() {
        assert!(check_pack(&valid_pack("1")).is_ok());
    }

    #[test]
    fn pack_checks_run_in_fixed_order() {
        let mut pack = valid_pack("../up");
        pack.name.clear();
        // Empty name is reported before the traversal in the identifier.
        assert!(matches!(
            check_pack(&pack),
            Err(ValidationError::EmptyName { .. })
        ));

        let mut pack = valid_pack("../up");
        pack.image_data_version.clear();
        assert_eq!(
            check_pack(&pack),
            Err(ValidationError::IdentifierTraversal("../up".to_owned()))
        );
    }

    #[test]
    fn empty_identifier_rejected() {
        assert_eq!(
            check_pack(&valid_pack("")),
            Err(ValidationError::EmptyIdentifier)
        );
    }

    #[test]
    fn empty_items_rejected() {
        let pack = valid_pack("1").with_items(Vec::new());
        assert!(matches!(
            check_pack(&pack),
            Err(ValidationError::NoItems { .. })
        ));
    }

    #[test]
    fn empty_image_data_version_rejected() {
        let mut pack = valid_pack("1");
        pack.image_data_version.clear();
        assert!(matches!(
            check_pack(&pack),
            Err(ValidationError::EmptyImageDataVersion { .. })
        ));
    }

    #[test]
    fn item_file_name_rules() {
        let bad = [
            ("", "EmptyFileName"),
            ("smile.png", "WrongExtension"),
            ("../evil.webp", "FileNameTraversal"),
            ("sub/dir.webp", "FileNameTraversal"),
        ];
        for (name, expected) in bad {
            let err = check_item("p", &Item::new(name, Vec::new())).unwrap_err();
            assert!(
                format!("{err:?}").starts_with(expected),
                "{name}: expected {expected}, got {err:?}"
            );
        }
        assert!(check_item("p", &Item::new("ok.webp", Vec::new())).is_ok());
    }

    #[test]
    fn wrong_extension_wins_over_traversal() {
        let err = check_item("p", &Item::new("sub/dir.png", Vec::new())).unwrap_err();
        assert!(matches!(err, ValidationError::WrongExtension { .. }));
    }

    #[test]
    fn duplicate_identifier_named() {
        let packs = vec![valid_pack("a"), valid_pack("b"), valid_pack("a")];
        assert_eq!(
            check_unique_identifiers(&packs),
            Err(ValidationError::DuplicateIdentifier("a".to_owned()))
        );
        let msg = check_unique_identifiers(&packs).unwrap_err().to_string();
        assert!(msg.contains("'a'"));
    }

    #[test]
    fn empty_pack_list_rejected() {
        assert_eq!(check_unique_identifiers(&[]), Err(ValidationError::NoPacks));
    }

    #[test]
    fn closure_acts_as_validator() {
        let reject_all = |pack: &Pack| -> Result<(), ValidationError> {
            Err(ValidationError::TooManyItems {
                pack: pack.identifier.to_string(),
                count: pack.items.len(),
                max: 0,
            })
        };
        assert!(reject_all.verify(&valid_pack("1")).is_err());
        assert!(InvariantValidator.verify(&valid_pack("1")).is_ok());
    }

    #[test]
    fn default_limits_enforce_only_invariants() {
        let v = LimitsValidator::default();
        let single = valid_pack("1").with_items(vec![Item::new("a.webp", Vec::new())]);
        assert!(v.verify(&single).is_ok());
        assert!(v.verify(&valid_pack("")).is_err());
    }

    #[test]
    fn item_count_limits() {
        let v = LimitsValidator::new(PackLimits {
            min_items: Some(3),
            ..PackLimits::default()
        });
        assert!(matches!(
            v.verify(&valid_pack("1")),
            Err(ValidationError::TooFewItems { count: 2, min: 3, .. })
        ));

        let v = LimitsValidator::new(PackLimits {
            max_items: Some(1),
            ..PackLimits::default()
        });
        assert!(matches!(
            v.verify(&valid_pack("1")),
            Err(ValidationError::TooManyItems { count: 2, max: 1, .. })
        ));
    }

    #[test]
    fn tag_and_size_limits() {
        let v = LimitsValidator::new(PackLimits {
            max_tags_per_item: Some(1),
            ..PackLimits::default()
        });
        assert!(matches!(
            v.verify(&valid_pack("1")),
            Err(ValidationError::TooManyTags { count: 2, .. })
        ));

        let v = LimitsValidator::new(PackLimits {
            max_asset_bytes: Some(100),
            ..PackLimits::default()
        });
        let mut pack = valid_pack("1");
        assert!(v.verify(&pack).is_ok());
        pack.items[1].size_bytes = 101;
        assert!(matches!(
            v.verify(&pack),
            Err(ValidationError::AssetTooLarge { size: 101, .. })
        ));
    }

    #[test]
    fn text_length_counts_characters() {
        let v = LimitsValidator::new(PackLimits {
            max_text_len: Some(5),
            ..PackLimits::default()
        });
        let mut pack = valid_pack("1");
        pack.name = "☕☕☕☕☕".to_owned();
        assert!(v.verify(&pack).is_ok());
        pack.publisher = "Jane Doe".to_owned();
        assert!(matches!(
            v.verify(&pack),
            Err(ValidationError::TextTooLong {
                field: "publisher",
                ..
            })
        ));
    }

    #[test]
    fn tray_item_requirement() {
        let v = LimitsValidator::new(PackLimits {
            require_tray_item: true,
            ..PackLimits::default()
        });
        let mut pack = valid_pack("1");
        assert!(matches!(
            v.verify(&pack),
            Err(ValidationError::TrayNotInPack { .. })
        ));
        pack.tray_image_file = "02_Cuppy_lol.webp".to_owned();
        assert!(v.verify(&pack).is_ok());
    }
}
