//! Taxonomy models
//!
//! The admin-managed enumerations products are tagged with. Categories,
//! patterns and shapes carry a presentation image (held by the asset
//! store); color swatches and pile heights are plain values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use surrealdb::RecordId;

use super::product::ImageRef;

/// Common surface of the taxonomy documents, so one repository and one
/// handler set can serve all five tables.
pub trait TaxonomyRecord:
    Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
    const TABLE: &'static str;
    /// Human-readable resource name for error messages
    const RESOURCE: &'static str;
    /// Document field holding the unique key
    const KEY_FIELD: &'static str;

    /// Creation payload accepted by the API
    type Create: DeserializeOwned + Send + 'static;

    /// Build a record from its creation payload, or a validation message.
    fn from_create(payload: Self::Create) -> Result<Self, String>;

    /// Value that must be unique within the table
    fn unique_key(&self) -> &str;
    /// Asset-store image to clean up when the record is deleted
    fn image(&self) -> Option<&ImageRef>;
}

/// Creation payload for the image-carrying taxonomy tables.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedCreate {
    pub name: String,
    pub image: Option<ImageRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SwatchCreate {
    pub code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PileHeightCreate {
    pub height: String,
    pub price: i64,
}

fn named_fields(payload: NamedCreate) -> Result<(String, Option<ImageRef>), String> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err("name is required".to_string());
    }
    Ok((name, payload.image))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    pub image: Option<ImageRef>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pattern {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    pub image: Option<ImageRef>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    pub image: Option<ImageRef>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// A selectable color, identified by its hex code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorSwatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub code: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// A pile-height tier and its price adjustment (minor currency units).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PileHeight {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub height: String,
    pub price: i64,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl TaxonomyRecord for Category {
    const TABLE: &'static str = "category";
    const RESOURCE: &'static str = "Category";
    const KEY_FIELD: &'static str = "name";

    type Create = NamedCreate;

    fn from_create(payload: NamedCreate) -> Result<Self, String> {
        let (name, image) = named_fields(payload)?;
        Ok(Self {
            id: None,
            name,
            image,
            created_at: Utc::now(),
        })
    }

    fn unique_key(&self) -> &str {
        &self.name
    }
    fn image(&self) -> Option<&ImageRef> {
        self.image.as_ref()
    }
}

impl TaxonomyRecord for Pattern {
    const TABLE: &'static str = "pattern";
    const RESOURCE: &'static str = "Pattern";
    const KEY_FIELD: &'static str = "name";

    type Create = NamedCreate;

    fn from_create(payload: NamedCreate) -> Result<Self, String> {
        let (name, image) = named_fields(payload)?;
        Ok(Self {
            id: None,
            name,
            image,
            created_at: Utc::now(),
        })
    }

    fn unique_key(&self) -> &str {
        &self.name
    }
    fn image(&self) -> Option<&ImageRef> {
        self.image.as_ref()
    }
}

impl TaxonomyRecord for ShapeStyle {
    const TABLE: &'static str = "shape";
    const RESOURCE: &'static str = "Shape";
    const KEY_FIELD: &'static str = "name";

    type Create = NamedCreate;

    fn from_create(payload: NamedCreate) -> Result<Self, String> {
        let (name, image) = named_fields(payload)?;
        Ok(Self {
            id: None,
            name,
            image,
            created_at: Utc::now(),
        })
    }

    fn unique_key(&self) -> &str {
        &self.name
    }
    fn image(&self) -> Option<&ImageRef> {
        self.image.as_ref()
    }
}

impl TaxonomyRecord for ColorSwatch {
    const TABLE: &'static str = "color";
    const RESOURCE: &'static str = "Color";
    const KEY_FIELD: &'static str = "code";

    type Create = SwatchCreate;

    fn from_create(payload: SwatchCreate) -> Result<Self, String> {
        let code = payload.code.trim().to_uppercase();
        if !crate::utils::validation::is_hex_color(&code) {
            return Err("code must be #RRGGBB".to_string());
        }
        Ok(Self {
            id: None,
            code,
            created_at: Utc::now(),
        })
    }

    fn unique_key(&self) -> &str {
        &self.code
    }
    fn image(&self) -> Option<&ImageRef> {
        None
    }
}

impl TaxonomyRecord for PileHeight {
    const TABLE: &'static str = "pile_height";
    const RESOURCE: &'static str = "Pile height";
    const KEY_FIELD: &'static str = "height";

    type Create = PileHeightCreate;

    fn from_create(payload: PileHeightCreate) -> Result<Self, String> {
        let height = payload.height.trim().to_string();
        if height.is_empty() {
            return Err("height is required".to_string());
        }
        Ok(Self {
            id: None,
            height,
            price: payload.price,
            created_at: Utc::now(),
        })
    }

    fn unique_key(&self) -> &str {
        &self.height
    }
    fn image(&self) -> Option<&ImageRef> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swatch_code_normalized_and_checked() {
        let swatch = ColorSwatch::from_create(SwatchCreate {
            code: " #aa00ff ".to_string(),
        })
        .unwrap();
        assert_eq!(swatch.code, "#AA00FF");

        assert!(ColorSwatch::from_create(SwatchCreate {
            code: "purple".to_string(),
        })
        .is_err());
    }

    #[test]
    fn named_create_rejects_blank_name() {
        assert!(Category::from_create(NamedCreate {
            name: "  ".to_string(),
            image: None,
        })
        .is_err());
    }
}
