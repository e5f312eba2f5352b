//! Create-time color validation
//!
//! Unlike updates, creation is strict: every submitted color must be fully
//! formed. Problems are reported per color index so the client can point at
//! the offending entry, and nothing is persisted if any message is emitted.

use uuid::Uuid;

use crate::db::models::{ColorSubmission, ColorVariant, ImageRef, LayerImageRef};
use crate::utils::validation::is_hex_color;

/// Validate submitted colors for product creation. Returns the fully built
/// variants (with fresh ids assigned) or every validation message at once.
pub fn build_colors(submitted: &[ColorSubmission]) -> Result<Vec<ColorVariant>, Vec<String>> {
    let mut errors = Vec::new();
    let mut variants = Vec::new();

    if submitted.is_empty() {
        return Err(vec!["At least one color variant is required".to_string()]);
    }

    for (index, entry) in submitted.iter().enumerate() {
        match build_color(index, entry) {
            Ok(variant) => variants.push(variant),
            Err(mut msgs) => errors.append(&mut msgs),
        }
    }

    if errors.is_empty() {
        Ok(variants)
    } else {
        Err(errors)
    }
}

fn build_color(index: usize, entry: &ColorSubmission) -> Result<ColorVariant, Vec<String>> {
    let mut errors = Vec::new();

    let name = required(entry.name.as_deref());
    if name.is_none() {
        errors.push(format!("colors[{index}]: name is required"));
    }
    let color_code = required(entry.color_code.as_deref());
    match &color_code {
        None => errors.push(format!("colors[{index}]: colorCode is required")),
        Some(code) if !is_hex_color(code) => {
            errors.push(format!("colors[{index}]: colorCode must be #RRGGBB"));
        }
        Some(_) => {}
    }
    let shape = required(entry.shape.as_deref());
    if shape.is_none() {
        errors.push(format!("colors[{index}]: shape is required"));
    }

    let mut base_images = Vec::new();
    if entry.base_images.is_empty() {
        errors.push(format!("colors[{index}]: at least one base image is required"));
    }
    for (img_index, img) in entry.base_images.iter().enumerate() {
        match (required(img.asset_id.as_deref()), required(img.url.as_deref())) {
            (Some(asset_id), Some(url)) => base_images.push(ImageRef {
                asset_id,
                url,
                is_main: img.is_main,
            }),
            _ => errors.push(format!(
                "colors[{index}].baseImages[{img_index}]: assetId and url are required"
            )),
        }
    }
    let main_count = base_images.iter().filter(|i| i.is_main).count();
    if !base_images.is_empty() && main_count != 1 {
        errors.push(format!(
            "colors[{index}]: exactly one base image must be marked main (found {main_count})"
        ));
    }

    let mut layer_images = Vec::new();
    for (img_index, img) in entry.layer_images.iter().enumerate() {
        let asset_id = required(img.asset_id.as_deref());
        let url = required(img.url.as_deref());
        let layer_code = required(img.color_code.as_deref());
        let variant_ref = required(img.color_variant_id.as_deref());
        match (asset_id, url, layer_code, variant_ref) {
            (Some(asset_id), Some(url), Some(color_code), Some(color_variant_id)) => {
                layer_images.push(LayerImageRef {
                    asset_id,
                    url,
                    color_code,
                    color_variant_id,
                    is_main: img.is_main,
                });
            }
            _ => errors.push(format!(
                "colors[{index}].layerImages[{img_index}]: assetId, url, colorCode and \
                 colorVariantId are required"
            )),
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    // Scalars are present when errors is empty
    let (Some(name), Some(color_code), Some(shape)) = (name, color_code, shape) else {
        return Err(vec![format!("colors[{index}]: invalid entry")]);
    };

    Ok(ColorVariant {
        variant_id: Uuid::new_v4().to_string(),
        name,
        color_code,
        shape,
        base_images,
        layer_images,
    })
}

fn required(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::ImageSubmission;

    fn good_color() -> ColorSubmission {
        ColorSubmission {
            variant_id: None,
            name: Some("Indigo".to_string()),
            color_code: Some("#2233AA".to_string()),
            shape: Some("round".to_string()),
            base_images: vec![ImageSubmission {
                asset_id: Some("a1".to_string()),
                url: Some("https://img.test/a1".to_string()),
                is_main: true,
                ..Default::default()
            }],
            layer_images: Vec::new(),
        }
    }

    #[test]
    fn valid_submission_builds_variants_with_fresh_ids() {
        let colors = build_colors(&[good_color(), good_color()]).unwrap();
        assert_eq!(colors.len(), 2);
        assert_ne!(colors[0].variant_id, colors[1].variant_id);
        assert!(colors.iter().all(|c| !c.variant_id.is_empty()));
    }

    #[test]
    fn empty_colors_rejected() {
        let errors = build_colors(&[]).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn messages_carry_the_color_index() {
        let mut bad = good_color();
        bad.color_code = Some("red".to_string());
        let errors = build_colors(&[good_color(), bad]).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("colors[1]"));
        assert!(errors[0].contains("#RRGGBB"));
    }

    #[test]
    fn all_problems_reported_at_once() {
        let bad = ColorSubmission::default();
        let errors = build_colors(&[bad]).unwrap_err();
        // name, colorCode, shape, base images
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn exactly_one_main_image_enforced() {
        let mut two_mains = good_color();
        two_mains.base_images.push(ImageSubmission {
            asset_id: Some("a2".to_string()),
            url: Some("https://img.test/a2".to_string()),
            is_main: true,
            ..Default::default()
        });
        let errors = build_colors(&[two_mains]).unwrap_err();
        assert!(errors[0].contains("exactly one"));

        let mut no_main = good_color();
        no_main.base_images[0].is_main = false;
        assert!(build_colors(&[no_main]).is_err());
    }

    #[test]
    fn layer_images_need_tint_and_back_reference() {
        let mut color = good_color();
        color.layer_images.push(ImageSubmission {
            asset_id: Some("l1".to_string()),
            url: Some("https://img.test/l1".to_string()),
            ..Default::default()
        });
        let errors = build_colors(&[color]).unwrap_err();
        assert!(errors[0].contains("layerImages[0]"));
    }
}
