//! Color variant reconciler
//!
//! Pure merge of a client-submitted color list against the persisted state
//! of a product. The reconciler decides three things: the new `colors` list,
//! which asset ids became orphans and should be deleted at the asset store,
//! and which submitted entries were skipped (and why). It performs no I/O;
//! the catalog service acts on the outcome.

use std::collections::HashSet;

use uuid::Uuid;

use crate::db::models::{ColorSubmission, ColorVariant, ImageRef, ImageSubmission, LayerImageRef};

/// One submitted entry the reconciler refused. `index` is the submission
/// position for malformed entries; stale-id drops carry no index because the
/// entry itself was well formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedColor {
    pub index: Option<usize>,
    pub reason: String,
}

/// What a reconciliation decided.
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    /// The merged colors list to persist
    pub colors: Vec<ColorVariant>,
    /// Asset ids belonging to removed variants, due for best-effort deletion
    pub orphaned_assets: Vec<String>,
    /// Entries dropped from the submission
    pub skipped: Vec<SkippedColor>,
}

/// Required scalar fields of a screened color entry.
#[derive(Debug, Clone)]
struct ColorFields {
    name: String,
    color_code: String,
    shape: String,
}

/// A screened submission entry. A present variant id means "edit that
/// variant"; an absent one means "create a new variant".
enum ColorPatch {
    Existing {
        variant_id: String,
        fields: ColorFields,
        base_images: Vec<ImageRef>,
        layer_images: Vec<LayerImageRef>,
    },
    New {
        fields: ColorFields,
        base_images: Vec<ImageRef>,
        layer_images: Vec<LayerImageRef>,
    },
}

/// Merge `submitted` against `existing`.
///
/// Variants whose id does not appear anywhere in the submission are removed
/// and their asset ids reported as orphans. Submitted entries with a known
/// id have their scalars overwritten and their image lists set-union merged
/// by asset id. Entries without an id become new variants with fresh ids.
/// The merged list holds the updated existing variants first, then the new
/// ones, regardless of submission order.
///
/// If the merge computes an empty colors list the whole submission is
/// treated as a no-op: the existing colors survive and nothing is orphaned.
pub fn reconcile(existing: &[ColorVariant], submitted: Vec<ColorSubmission>) -> ReconcileOutcome {
    // Every id-carrying entry protects its variant's assets from deletion,
    // even when the entry itself is later skipped as malformed.
    let kept_ids: HashSet<String> = submitted
        .iter()
        .filter_map(|entry| entry.variant_id.as_deref())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();

    let (patches, mut skipped) = screen(submitted);

    let mut colors: Vec<ColorVariant> = Vec::new();
    for patch in &patches {
        let ColorPatch::Existing {
            variant_id,
            fields,
            base_images,
            layer_images,
        } = patch
        else {
            continue;
        };
        let Some(current) = existing.iter().find(|v| &v.variant_id == variant_id) else {
            // Stale id: dropped, never treated as a create
            skipped.push(SkippedColor {
                index: None,
                reason: format!("unknown variant id {variant_id}"),
            });
            continue;
        };
        colors.push(ColorVariant {
            variant_id: current.variant_id.clone(),
            name: fields.name.clone(),
            color_code: fields.color_code.clone(),
            shape: fields.shape.clone(),
            base_images: merge_images(&current.base_images, base_images, |i| &i.asset_id),
            layer_images: merge_images(&current.layer_images, layer_images, |i| &i.asset_id),
        });
    }
    for patch in &patches {
        let ColorPatch::New {
            fields,
            base_images,
            layer_images,
        } = patch
        else {
            continue;
        };
        colors.push(ColorVariant {
            variant_id: Uuid::new_v4().to_string(),
            name: fields.name.clone(),
            color_code: fields.color_code.clone(),
            shape: fields.shape.clone(),
            base_images: dedup_last_wins(base_images.clone(), |i| i.asset_id.clone()),
            layer_images: dedup_last_wins(layer_images.clone(), |i| i.asset_id.clone()),
        });
    }

    if colors.is_empty() {
        // Empty or fully-skipped submission never wipes a product
        return ReconcileOutcome {
            colors: existing.to_vec(),
            orphaned_assets: Vec::new(),
            skipped,
        };
    }

    let orphaned_assets = existing
        .iter()
        .filter(|v| !kept_ids.contains(v.variant_id.as_str()))
        .flat_map(|v| v.asset_ids())
        .collect();

    ReconcileOutcome {
        colors,
        orphaned_assets,
        skipped,
    }
}

/// Set-union merge keyed by asset id: every existing image survives in its
/// stored order, then submitted images with unseen asset ids are appended in
/// submission order. A duplicated asset id inside the submission resolves to
/// its last occurrence.
fn merge_images<T: Clone>(existing: &[T], submitted: &[T], key: impl Fn(&T) -> &str) -> Vec<T> {
    let existing_ids: HashSet<&str> = existing.iter().map(&key).collect();
    let mut merged: Vec<T> = existing.to_vec();
    let fresh: Vec<T> = submitted
        .iter()
        .filter(|img| !existing_ids.contains(key(img)))
        .cloned()
        .collect();
    merged.extend(dedup_last_wins(fresh, |img| key(img).to_string()));
    merged
}

/// Keep the last occurrence per key, preserving first-seen position.
fn dedup_last_wins<T>(items: Vec<T>, key: impl Fn(&T) -> String) -> Vec<T> {
    let mut order: Vec<String> = Vec::new();
    let mut by_key: std::collections::HashMap<String, T> = std::collections::HashMap::new();
    for item in items {
        let k = key(&item);
        if !by_key.contains_key(&k) {
            order.push(k.clone());
        }
        by_key.insert(k, item);
    }
    order
        .into_iter()
        .filter_map(|k| by_key.remove(&k))
        .collect()
}

/// Screen raw submissions into patches, collecting skip reasons for entries
/// missing required scalars. Malformed image entries inside an otherwise
/// valid color are dropped individually.
fn screen(submitted: Vec<ColorSubmission>) -> (Vec<ColorPatch>, Vec<SkippedColor>) {
    let mut patches = Vec::new();
    let mut skipped = Vec::new();

    for (index, entry) in submitted.into_iter().enumerate() {
        let fields = match screen_fields(&entry) {
            Ok(fields) => fields,
            Err(reason) => {
                skipped.push(SkippedColor {
                    index: Some(index),
                    reason,
                });
                continue;
            }
        };
        let base_images = entry
            .base_images
            .iter()
            .filter_map(screen_base_image)
            .collect();
        let layer_images = entry
            .layer_images
            .iter()
            .filter_map(screen_layer_image)
            .collect();

        patches.push(match entry.variant_id {
            Some(variant_id) if !variant_id.trim().is_empty() => ColorPatch::Existing {
                variant_id,
                fields,
                base_images,
                layer_images,
            },
            _ => ColorPatch::New {
                fields,
                base_images,
                layer_images,
            },
        });
    }

    (patches, skipped)
}

fn screen_fields(entry: &ColorSubmission) -> Result<ColorFields, String> {
    let name = non_empty(entry.name.as_deref()).ok_or("missing name")?;
    let color_code = non_empty(entry.color_code.as_deref()).ok_or("missing color code")?;
    let shape = non_empty(entry.shape.as_deref()).ok_or("missing shape")?;
    Ok(ColorFields {
        name,
        color_code,
        shape,
    })
}

fn screen_base_image(img: &ImageSubmission) -> Option<ImageRef> {
    Some(ImageRef {
        asset_id: non_empty(img.asset_id.as_deref())?,
        url: non_empty(img.url.as_deref())?,
        is_main: img.is_main,
    })
}

fn screen_layer_image(img: &ImageSubmission) -> Option<LayerImageRef> {
    Some(LayerImageRef {
        asset_id: non_empty(img.asset_id.as_deref())?,
        url: non_empty(img.url.as_deref())?,
        color_code: non_empty(img.color_code.as_deref())?,
        color_variant_id: non_empty(img.color_variant_id.as_deref())?,
        is_main: img.is_main,
    })
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(asset_id: &str) -> ImageRef {
        ImageRef {
            asset_id: asset_id.to_string(),
            url: format!("https://img.test/{asset_id}"),
            is_main: false,
        }
    }

    fn layer(asset_id: &str, variant_ref: &str) -> LayerImageRef {
        LayerImageRef {
            asset_id: asset_id.to_string(),
            url: format!("https://img.test/{asset_id}"),
            color_code: "#112233".to_string(),
            color_variant_id: variant_ref.to_string(),
            is_main: false,
        }
    }

    fn variant(id: &str, base: &[&str], layers: &[&str]) -> ColorVariant {
        ColorVariant {
            variant_id: id.to_string(),
            name: "Crimson".to_string(),
            color_code: "#AA0000".to_string(),
            shape: "round".to_string(),
            base_images: base.iter().map(|a| image(a)).collect(),
            layer_images: layers.iter().map(|a| layer(a, id)).collect(),
        }
    }

    fn submitted_image(asset_id: &str) -> ImageSubmission {
        ImageSubmission {
            asset_id: Some(asset_id.to_string()),
            url: Some(format!("https://img.test/{asset_id}")),
            ..Default::default()
        }
    }

    fn submission(
        variant_id: Option<&str>,
        name: &str,
        base: &[&str],
    ) -> ColorSubmission {
        ColorSubmission {
            variant_id: variant_id.map(str::to_string),
            name: Some(name.to_string()),
            color_code: Some("#FF0000".to_string()),
            shape: Some("round".to_string()),
            base_images: base.iter().map(|a| submitted_image(a)).collect(),
            layer_images: Vec::new(),
        }
    }

    fn asset_ids(images: &[ImageRef]) -> Vec<&str> {
        images.iter().map(|i| i.asset_id.as_str()).collect()
    }

    #[test]
    fn resubmitting_current_state_changes_nothing() {
        let existing = vec![variant("v1", &["a1", "a2"], &["l1"])];
        let resubmit = vec![ColorSubmission {
            variant_id: Some("v1".to_string()),
            name: Some("Crimson".to_string()),
            color_code: Some("#AA0000".to_string()),
            shape: Some("round".to_string()),
            base_images: vec![submitted_image("a1"), submitted_image("a2")],
            layer_images: vec![ImageSubmission {
                asset_id: Some("l1".to_string()),
                url: Some("https://img.test/l1".to_string()),
                color_code: Some("#112233".to_string()),
                color_variant_id: Some("v1".to_string()),
                is_main: false,
            }],
        }];

        let outcome = reconcile(&existing, resubmit);

        assert_eq!(outcome.colors.len(), 1);
        assert_eq!(outcome.colors[0].variant_id, "v1");
        assert_eq!(asset_ids(&outcome.colors[0].base_images), vec!["a1", "a2"]);
        assert_eq!(outcome.colors[0].layer_images.len(), 1);
        assert!(outcome.orphaned_assets.is_empty());
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn empty_submission_keeps_existing_colors() {
        let existing = vec![variant("v1", &["a1"], &[])];

        let outcome = reconcile(&existing, Vec::new());

        assert_eq!(outcome.colors.len(), 1);
        assert_eq!(outcome.colors[0].variant_id, "v1");
        assert!(outcome.orphaned_assets.is_empty());
    }

    #[test]
    fn fully_skipped_submission_keeps_existing_colors() {
        let existing = vec![variant("v1", &["a1"], &[])];
        // Missing color code, so the only entry is skipped
        let submitted = vec![ColorSubmission {
            name: Some("Blue".to_string()),
            shape: Some("square".to_string()),
            ..Default::default()
        }];

        let outcome = reconcile(&existing, submitted);

        assert_eq!(outcome.colors.len(), 1);
        assert_eq!(outcome.colors[0].variant_id, "v1");
        assert!(outcome.orphaned_assets.is_empty());
        assert_eq!(outcome.skipped.len(), 1);
        assert!(outcome.skipped[0].reason.contains("color code"));
    }

    #[test]
    fn removed_variant_orphans_all_its_assets() {
        let existing = vec![
            variant("v1", &["a1", "a2"], &["l1", "l2", "l3"]),
            variant("v2", &["b1"], &[]),
        ];
        let submitted = vec![submission(Some("v2"), "Kept", &["b1"])];

        let outcome = reconcile(&existing, submitted);

        assert_eq!(outcome.colors.len(), 1);
        assert_eq!(outcome.colors[0].variant_id, "v2");
        // 2 base + 3 layer from v1
        let mut orphans = outcome.orphaned_assets.clone();
        orphans.sort();
        assert_eq!(orphans, vec!["a1", "a2", "l1", "l2", "l3"]);
    }

    #[test]
    fn union_merge_keeps_existing_order_then_appends_new() {
        let existing = vec![variant("v1", &["A", "B"], &[])];
        let submitted = vec![submission(Some("v1"), "Crimson", &["B", "C"])];

        let outcome = reconcile(&existing, submitted);

        assert_eq!(asset_ids(&outcome.colors[0].base_images), vec!["A", "B", "C"]);
        assert!(outcome.orphaned_assets.is_empty());
    }

    #[test]
    fn malformed_entry_skipped_siblings_processed() {
        let existing = vec![variant("v1", &["a1"], &[])];
        let submitted = vec![
            ColorSubmission {
                variant_id: Some("v1".to_string()),
                name: Some("NoCode".to_string()),
                shape: Some("round".to_string()),
                ..Default::default()
            },
            submission(None, "Blue", &["b1"]),
        ];

        let outcome = reconcile(&existing, submitted);

        assert_eq!(outcome.colors.len(), 1);
        assert_eq!(outcome.colors[0].name, "Blue");
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].index, Some(0));
        // The skipped entry still referenced v1, so its assets are protected
        assert!(outcome.orphaned_assets.is_empty());
    }

    #[test]
    fn malformed_edit_never_orphans_the_referenced_assets() {
        // A typo in one required field of an edit entry must not turn into
        // permanent deletion of that variant's assets.
        let existing = vec![variant("v1", &["a1", "a2"], &["l1"])];
        let mut typo_edit = submission(Some("v1"), "Crimson", &["a1", "a2"]);
        typo_edit.color_code = None;
        let submitted = vec![typo_edit, submission(None, "Blue", &["b1"])];

        let outcome = reconcile(&existing, submitted);

        assert!(outcome.orphaned_assets.is_empty());
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.colors.len(), 1);
        assert_eq!(outcome.colors[0].name, "Blue");
    }

    #[test]
    fn updated_existing_variants_come_before_new_ones() {
        let existing = vec![variant("v1", &["a1"], &[])];
        // New entry submitted first; the merged list must still lead with
        // the updated existing variant.
        let submitted = vec![
            submission(None, "Blue", &["b1"]),
            submission(Some("v1"), "Red", &["a1"]),
        ];

        let outcome = reconcile(&existing, submitted);

        assert_eq!(outcome.colors.len(), 2);
        assert_eq!(outcome.colors[0].variant_id, "v1");
        assert_eq!(outcome.colors[0].name, "Red");
        assert_eq!(outcome.colors[1].name, "Blue");
    }

    #[test]
    fn new_entry_gets_fresh_unused_variant_id() {
        let existing = vec![variant("v1", &["a1"], &[])];
        let submitted = vec![
            submission(Some("v1"), "Crimson", &["a1"]),
            submission(None, "Blue", &["b1"]),
        ];

        let outcome = reconcile(&existing, submitted);

        assert_eq!(outcome.colors.len(), 2);
        let fresh = &outcome.colors[1].variant_id;
        assert!(!fresh.is_empty());
        assert_ne!(fresh, "v1");
    }

    #[test]
    fn edit_adds_image_without_deletions() {
        let existing = vec![variant("v1", &["a1"], &[])];
        let submitted = vec![submission(Some("v1"), "Red", &["a1", "a2"])];

        let outcome = reconcile(&existing, submitted);

        assert_eq!(outcome.colors.len(), 1);
        assert_eq!(outcome.colors[0].variant_id, "v1");
        assert_eq!(outcome.colors[0].name, "Red");
        assert_eq!(asset_ids(&outcome.colors[0].base_images), vec!["a1", "a2"]);
        assert!(outcome.orphaned_assets.is_empty());
    }

    #[test]
    fn replacing_all_variants_orphans_the_old_ones() {
        let existing = vec![variant("v1", &["a1"], &[])];
        let mut sub = submission(None, "Blue", &["b1"]);
        sub.color_code = Some("#0000FF".to_string());
        sub.shape = Some("square".to_string());
        sub.base_images[0].is_main = true;

        let outcome = reconcile(&existing, vec![sub]);

        assert_eq!(outcome.colors.len(), 1);
        assert_ne!(outcome.colors[0].variant_id, "v1");
        assert_eq!(asset_ids(&outcome.colors[0].base_images), vec!["b1"]);
        assert!(outcome.colors[0].base_images[0].is_main);
        assert_eq!(outcome.orphaned_assets, vec!["a1"]);
    }

    #[test]
    fn stale_variant_id_dropped_not_created() {
        let existing = vec![variant("v1", &["a1"], &[])];
        let submitted = vec![
            submission(Some("v1"), "Crimson", &["a1"]),
            submission(Some("ghost"), "Ghost", &["g1"]),
        ];

        let outcome = reconcile(&existing, submitted);

        assert_eq!(outcome.colors.len(), 1);
        assert_eq!(outcome.colors[0].variant_id, "v1");
        assert!(outcome.orphaned_assets.is_empty());
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].index, None);
        assert!(outcome.skipped[0].reason.contains("ghost"));
    }

    #[test]
    fn duplicate_asset_id_in_submission_resolves_to_last() {
        let existing = vec![variant("v1", &["a1"], &[])];
        let mut dup_one = submitted_image("a2");
        dup_one.is_main = false;
        let mut dup_two = submitted_image("a2");
        dup_two.is_main = true;
        let submitted = vec![ColorSubmission {
            variant_id: Some("v1".to_string()),
            name: Some("Red".to_string()),
            color_code: Some("#FF0000".to_string()),
            shape: Some("round".to_string()),
            base_images: vec![dup_one, dup_two],
            layer_images: Vec::new(),
        }];

        let outcome = reconcile(&existing, submitted);

        let images = &outcome.colors[0].base_images;
        assert_eq!(asset_ids(images), vec!["a1", "a2"]);
        assert!(images[1].is_main);
    }

    #[test]
    fn scalar_fields_overwritten_on_edit() {
        let existing = vec![variant("v1", &["a1"], &[])];
        let submitted = vec![ColorSubmission {
            variant_id: Some("v1".to_string()),
            name: Some("Scarlet".to_string()),
            color_code: Some("#CC0000".to_string()),
            shape: Some("oval".to_string()),
            base_images: vec![submitted_image("a1")],
            layer_images: Vec::new(),
        }];

        let outcome = reconcile(&existing, submitted);

        let merged = &outcome.colors[0];
        assert_eq!(merged.name, "Scarlet");
        assert_eq!(merged.color_code, "#CC0000");
        assert_eq!(merged.shape, "oval");
    }

    #[test]
    fn malformed_image_entries_dropped_individually() {
        let existing: Vec<ColorVariant> = Vec::new();
        let submitted = vec![ColorSubmission {
            variant_id: None,
            name: Some("Blue".to_string()),
            color_code: Some("#0000FF".to_string()),
            shape: Some("square".to_string()),
            base_images: vec![
                submitted_image("b1"),
                ImageSubmission::default(), // no asset id, no url
            ],
            layer_images: vec![ImageSubmission {
                asset_id: Some("l1".to_string()),
                url: Some("https://img.test/l1".to_string()),
                // missing color_code and color_variant_id
                ..Default::default()
            }],
        }];

        let outcome = reconcile(&existing, submitted);

        assert_eq!(asset_ids(&outcome.colors[0].base_images), vec!["b1"]);
        assert!(outcome.colors[0].layer_images.is_empty());
    }
}
