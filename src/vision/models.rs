//! Classification request/response models
//!
//! The raw response types mirror the service's JSON with every field
//! optional. A field holding the wrong JSON type is read as absent rather
//! than failing the whole body.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Base64 text of an image, ready to embed in a request body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage(String);

impl EncodedImage {
    pub fn new(encoded: String) -> Self {
        Self(encoded)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Request options sent alongside the image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationOptions {
    /// Ask the service to include similar reference images
    pub similar_images: bool,
}

impl Default for ClassificationOptions {
    fn default() -> Self {
        Self {
            similar_images: true,
        }
    }
}

/// One classification call
#[derive(Debug, Clone)]
pub struct ClassificationRequest {
    pub image: EncodedImage,
    pub options: ClassificationOptions,
}

impl ClassificationRequest {
    /// JSON body in the shape the service expects
    pub fn body(&self) -> RequestBody<'_> {
        RequestBody {
            images: [self.image.as_str()],
            similar_images: self.options.similar_images,
        }
    }
}

/// Wire form of [`ClassificationRequest`]
#[derive(Debug, Serialize)]
pub struct RequestBody<'a> {
    pub images: [&'a str; 1],
    pub similar_images: bool,
}

/// Untrusted response body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClassificationResponseRaw {
    #[serde(deserialize_with = "lenient_seq")]
    pub suggestions: Option<Vec<RawSuggestion>>,
}

impl ClassificationResponseRaw {
    /// Read a parsed JSON document; anything that is not an object has no
    /// suggestions.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSuggestion {
    #[serde(deserialize_with = "lenient")]
    pub plant_name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub probability: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub plant_details: Option<RawPlantDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPlantDetails {
    #[serde(deserialize_with = "lenient_strings")]
    pub common_names: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient")]
    pub wiki_description: Option<RawWikiDescription>,
    #[serde(deserialize_with = "lenient")]
    pub taxonomy: Option<RawTaxonomy>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawWikiDescription {
    #[serde(deserialize_with = "lenient")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawTaxonomy {
    #[serde(deserialize_with = "lenient")]
    pub family: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub genus: Option<String>,
}

/// Normalized identification record.
///
/// `None` always means "unknown"; it is never replaced by an empty
/// placeholder.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlantIdentification {
    pub scientific_name: Option<String>,
    pub common_names: Option<Vec<String>>,
    /// As reported by the service, in [0, 1]
    pub probability: Option<f64>,
    pub family: Option<String>,
    pub genus: Option<String>,
    pub description: Option<String>,
}

/// Deserialize a field, treating null or a type mismatch as absent
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Like [`lenient`], but a malformed element becomes an empty suggestion
/// instead of discarding the whole list (keeps the top position stable).
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(None);
    };
    Ok(Some(
        items
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap_or_default())
            .collect(),
    ))
}

/// A list of strings where non-string entries are skipped. An empty or
/// fully skipped list stays `Some(vec![])`.
fn lenient_strings<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(None);
    };
    Ok(Some(
        items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let request = ClassificationRequest {
            image: EncodedImage::new("aGVsbG8=".to_string()),
            options: ClassificationOptions::default(),
        };

        let body = serde_json::to_value(request.body()).unwrap();
        assert_eq!(body, json!({ "images": ["aGVsbG8="], "similar_images": true }));
    }

    #[test]
    fn test_full_response_parses() {
        let raw = ClassificationResponseRaw::from_value(json!({
            "suggestions": [{
                "plant_name": "Ficus lyrata",
                "probability": 0.81,
                "plant_details": {
                    "common_names": ["fiddle-leaf fig"],
                    "wiki_description": { "value": "A species of flowering plant." },
                    "taxonomy": { "family": "Moraceae", "genus": "Ficus" }
                }
            }]
        }));

        let suggestions = raw.suggestions.unwrap();
        let top = &suggestions[0];
        assert_eq!(top.plant_name.as_deref(), Some("Ficus lyrata"));
        assert_eq!(top.probability, Some(0.81));
        let details = top.plant_details.as_ref().unwrap();
        assert_eq!(details.taxonomy.as_ref().unwrap().genus.as_deref(), Some("Ficus"));
    }

    #[test]
    fn test_wrong_types_read_as_absent() {
        let raw = ClassificationResponseRaw::from_value(json!({
            "suggestions": [{
                "plant_name": 42,
                "probability": "high",
                "plant_details": {
                    "common_names": "not a list",
                    "taxonomy": null,
                    "wiki_description": { "value": ["x"] }
                }
            }]
        }));

        let top = &raw.suggestions.unwrap()[0];
        assert!(top.plant_name.is_none());
        assert!(top.probability.is_none());
        let details = top.plant_details.as_ref().unwrap();
        assert!(details.common_names.is_none());
        assert!(details.taxonomy.is_none());
        assert!(details.wiki_description.as_ref().unwrap().value.is_none());
    }

    #[test]
    fn test_malformed_suggestion_keeps_position() {
        let raw = ClassificationResponseRaw::from_value(json!({
            "suggestions": ["garbage", { "plant_name": "Aloe vera" }]
        }));

        let suggestions = raw.suggestions.unwrap();
        assert_eq!(suggestions.len(), 2);
        assert!(suggestions[0].plant_name.is_none());
        assert_eq!(suggestions[1].plant_name.as_deref(), Some("Aloe vera"));
    }

    #[test]
    fn test_common_names_skip_non_strings() {
        let raw = ClassificationResponseRaw::from_value(json!({
            "suggestions": [{
                "plant_details": { "common_names": ["Swiss cheese plant", null, 7, "Split-leaf philodendron"] }
            }]
        }));

        let top = &raw.suggestions.unwrap()[0];
        let names = top.plant_details.as_ref().unwrap().common_names.clone();
        assert_eq!(
            names,
            Some(vec!["Swiss cheese plant".to_string(), "Split-leaf philodendron".to_string()])
        );
    }

    #[test]
    fn test_non_object_body_has_no_suggestions() {
        assert!(ClassificationResponseRaw::from_value(json!([1, 2])).suggestions.is_none());
        assert!(ClassificationResponseRaw::from_value(json!({ "suggestions": {} })).suggestions.is_none());
        assert!(ClassificationResponseRaw::from_value(json!({})).suggestions.is_none());
    }
}
