//! Collection API response model
//!
//! Every field is optional on the wire. Missing fields and JSON `null` both
//! deserialize to the field's default, so callers never dereference an absent
//! value.

use serde::{Deserialize, Deserializer, Serialize};

/// Response envelope of the collection object endpoint
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionResponse {
    #[serde(default)]
    pub art_object: Option<CollectionMetadata>,
}

/// Collection object metadata
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionMetadata {
    /// Presence of a truthy value means the object is under copyright
    #[serde(default)]
    pub copyright_holder: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "nullable")]
    pub has_image: bool,
    #[serde(default)]
    pub web_image: Option<WebImage>,
    #[serde(default, deserialize_with = "nullable")]
    pub object_types: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub object_collection: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub principal_makers: Vec<Maker>,
    #[serde(default)]
    pub long_title: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub plaque_description_english: Option<String>,
    #[serde(default)]
    pub dating: Option<Dating>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WebImage {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Maker {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub production_places: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dating {
    #[serde(default)]
    pub year_early: Option<i64>,
    #[serde(default)]
    pub year_late: Option<i64>,
}

impl CollectionMetadata {
    /// Image URL, if present and non-empty
    pub fn media_url(&self) -> Option<&str> {
        self.web_image
            .as_ref()
            .and_then(|image| image.url.as_deref())
            .filter(|url| !url.is_empty())
    }

    pub fn maker_names(&self) -> impl Iterator<Item = &str> {
        self.principal_makers.iter().map(|maker| maker.name.as_str())
    }
}

/// JavaScript-style truthiness of a JSON value
pub fn is_truthy(value: &serde_json::Value) -> bool {
    use serde_json::Value;

    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Treat an explicit `null` as the type's default
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
