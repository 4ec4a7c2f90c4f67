use std::time::Duration;

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;
use url::Url;

const DEFAULT_BASE_URL: &str = "http://localhost:5177";
const ENV_BASE_URL: &str = "MOCKUP_STUDIO_API_URL";
const ENV_RETRY_ATTEMPTS: &str = "MOCKUP_STUDIO_RETRY_ATTEMPTS";
const ENV_RETRY_DELAY_MS: &str = "MOCKUP_STUDIO_RETRY_DELAY_MS";

/// Response from the /api/mockups/generate-mockups endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerateMockupsResponse {
    #[serde(default)]
    pub total: usize,
    pub results: Vec<MockupResult>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MockupResult {
    pub index: usize,
    #[serde(default)]
    pub prompt: String,
    pub url: String,
}

/// One entry of the /api/ideas/generate-ideas response
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GeneratedIdea {
    pub url: String,
    #[serde(default)]
    pub prompt: String,
}

/// Typed view of the product analysis, used to show it on screen.
///
/// Every field is optional on the wire; the backend omits whatever it could
/// not infer from the image.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductProfile {
    pub product_category: String,
    pub product_type: String,
    pub display_mode: String,
    pub primary_colors: Vec<String>,
    pub pattern: String,
    pub style_keywords: Vec<String>,
    pub mood: String,
    pub audience: String,
    pub inspired_by: InspiredBy,
    pub characters: Characters,
    pub material: Material,
}

/// Analysis returned by /api/ideas/analyze-product.
///
/// The JSON object is kept exactly as received, since it is embedded
/// verbatim in the idea prompt. `profile` is a best-effort typed view: nulls
/// read as defaults, and a mistyped field falls back to an empty profile.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAnalysis {
    pub profile: ProductProfile,
    raw: Value,
}

impl ImageAnalysis {
    #[cfg(test)]
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// The analysis as indented JSON, keys in the order the backend sent them.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.raw).unwrap_or_else(|_| "{}".to_string())
    }
}

impl From<ProductProfile> for ImageAnalysis {
    fn from(profile: ProductProfile) -> Self {
        let raw = serde_json::to_value(&profile).unwrap_or_default();
        Self { profile, raw }
    }
}

impl<'de> Deserialize<'de> for ImageAnalysis {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        if !raw.is_object() {
            return Err(de::Error::custom("expected a JSON object for the analysis"));
        }

        let profile = ProductProfile::deserialize(without_nulls(&raw)).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "analysis does not match the expected shape");
            ProductProfile::default()
        });

        Ok(Self { profile, raw })
    }
}

/// Copy of `value` with every null removed, so missing and null read alike.
fn without_nulls(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), without_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .filter(|v| !v.is_null())
                .map(without_nulls)
                .collect(),
        ),
        other => other.clone(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InspiredBy {
    pub source: String,
    pub theme: String,
    pub setting: String,
    pub style_reference: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Characters {
    pub has_characters: bool,
    pub character_names: Vec<String>,
    pub character_type: Vec<String>,
    pub number_of_characters: u32,
    pub relationship: String,
    pub visual_description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Material {
    pub main: String,
    pub details: String,
    pub texture: String,
    pub weight_or_thickness: String,
    pub flexibility: String,
    pub breathability: String,
    pub season_suitability: Vec<String>,
}

/// Fixed-delay retry budget used when fetching generated images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    #[cfg(test)]
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_millis(1000),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid API base URL {value:?}: {reason}")]
    InvalidBaseUrl { value: String, reason: String },

    #[error("invalid value {value:?} for {key}")]
    InvalidNumber { key: &'static str, value: String },
}

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,
    pub retry: RetryPolicy,
}

impl ApiConfig {
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            retry: RetryPolicy::default(),
        })
    }

    /// Build a config from `MOCKUP_STUDIO_*` environment variables, falling
    /// back to the defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_BASE_URL) {
            config.base_url = parse_base_url(&value)?;
        }
        if let Some(value) = lookup(ENV_RETRY_ATTEMPTS) {
            config.retry.max_attempts = parse_number(ENV_RETRY_ATTEMPTS, &value)?;
        }
        if let Some(value) = lookup(ENV_RETRY_DELAY_MS) {
            config.retry.delay =
                Duration::from_millis(parse_number(ENV_RETRY_DELAY_MS, &value)?);
        }

        Ok(config)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            retry: RetryPolicy::default(),
        }
    }
}

fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim()).map_err(|e| ConfigError::InvalidBaseUrl {
        value: value.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl {
            value: value.to_string(),
            reason: format!("unsupported scheme {}", url.scheme()),
        });
    }

    Ok(url)
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        key,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_env_is_empty() {
        let config = ApiConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:5177/");
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.delay, Duration::from_millis(1000));
    }

    #[test]
    fn test_env_overrides() {
        let config = ApiConfig::from_lookup(lookup(&[
            (ENV_BASE_URL, "https://studio.example.com"),
            (ENV_RETRY_ATTEMPTS, "3"),
            (ENV_RETRY_DELAY_MS, " 250 "),
        ]))
        .unwrap();
        assert_eq!(config.base_url.host_str(), Some("studio.example.com"));
        assert_eq!(config.retry, RetryPolicy::new(3, Duration::from_millis(250)));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = ApiConfig::from_lookup(lookup(&[(ENV_RETRY_ATTEMPTS, "many")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { key, .. } if key == ENV_RETRY_ATTEMPTS));

        let err = ApiConfig::with_base_url("ftp://files.example.com").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn test_analysis_decodes_partial_camel_case() {
        let analysis: ImageAnalysis = serde_json::from_str(
            r#"{
                "productCategory": "apparel",
                "primaryColors": ["navy", "white"],
                "inspiredBy": {"styleReference": "ukiyo-e"},
                "characters": {"hasCharacters": true, "numberOfCharacters": 2},
                "material": {"weightOrThickness": "heavy"}
            }"#,
        )
        .unwrap();

        let profile = &analysis.profile;
        assert_eq!(profile.product_category, "apparel");
        assert_eq!(profile.primary_colors, vec!["navy", "white"]);
        assert_eq!(profile.inspired_by.style_reference, "ukiyo-e");
        assert!(profile.characters.has_characters);
        assert_eq!(profile.characters.number_of_characters, 2);
        assert_eq!(profile.material.weight_or_thickness, "heavy");
        assert!(profile.mood.is_empty());
    }

    #[test]
    fn test_analysis_tolerates_nulls() {
        let analysis: ImageAnalysis = serde_json::from_str(
            r#"{
                "productCategory": "apparel",
                "pattern": null,
                "primaryColors": ["navy", null],
                "inspiredBy": null,
                "characters": {"hasCharacters": null, "numberOfCharacters": null}
            }"#,
        )
        .unwrap();

        assert_eq!(analysis.profile.product_category, "apparel");
        assert!(analysis.profile.pattern.is_empty());
        assert_eq!(analysis.profile.primary_colors, vec!["navy"]);
        assert!(!analysis.profile.characters.has_characters);
        // The raw object still carries the nulls as sent
        assert_eq!(analysis.raw()["pattern"], Value::Null);
    }

    #[test]
    fn test_analysis_keeps_unknown_fields_and_key_order() {
        let analysis: ImageAnalysis = serde_json::from_str(
            r#"{"productType": "hoodie", "targetMarket": "teens", "productCategory": "apparel"}"#,
        )
        .unwrap();

        assert_eq!(analysis.profile.product_type, "hoodie");
        assert_eq!(
            analysis.to_pretty_json(),
            "{\n  \"productType\": \"hoodie\",\n  \"targetMarket\": \"teens\",\n  \"productCategory\": \"apparel\"\n}"
        );
    }

    #[test]
    fn test_mistyped_analysis_still_decodes() {
        let analysis: ImageAnalysis =
            serde_json::from_str(r#"{"productCategory": "mug", "primaryColors": "red"}"#).unwrap();

        assert_eq!(analysis.profile, ProductProfile::default());
        assert_eq!(analysis.raw()["primaryColors"], "red");

        assert!(serde_json::from_str::<ImageAnalysis>(r#"["not", "an", "object"]"#).is_err());
    }
}
