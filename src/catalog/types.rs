//! Catalog data model: queries, items and enriched items.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::config::QueryConfig;

/// Opaque key/value object returned by the upstream catalog.
pub type Fields = Map<String, Value>;

/// Extra fields returned by a detail fetch.
pub type DetailFields = Fields;

/// Query parameters as received on the wire, before defaults are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCatalogParams {
    pub text: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub expand: Option<String>,
}

/// A validated catalog search, immutable for the lifetime of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub text: String,
    pub page: u32,
    pub limit: u32,
    pub expand: bool,
}

impl CatalogQuery {
    /// Apply defaults to raw parameters.
    ///
    /// Missing, blank, non-numeric and non-positive values fall back to the
    /// configured defaults instead of failing the request.
    pub fn from_params(raw: &RawCatalogParams, defaults: &QueryConfig) -> Self {
        let text = raw
            .text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(defaults.default_text.as_str())
            .to_string();

        let expand = raw
            .expand
            .as_deref()
            .is_some_and(|v| v.trim().eq_ignore_ascii_case(defaults.expand_value.trim()));

        Self {
            text,
            page: positive_or(raw.page.as_deref(), defaults.default_page),
            limit: positive_or(raw.limit.as_deref(), defaults.default_limit),
            expand,
        }
    }
}

fn positive_or(value: Option<&str>, fallback: u32) -> u32 {
    value
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v >= 1)
        .unwrap_or_else(|| fallback.max(1))
}

/// One result from the upstream list fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    /// Identifier used for the detail fetch; empty when the upstream omitted it.
    pub identifier: String,
    /// The upstream object as received, identifier field included.
    pub fields: Fields,
}

impl CatalogItem {
    pub fn new(identifier: impl Into<String>, fields: Fields) -> Self {
        Self {
            identifier: identifier.into(),
            fields,
        }
    }

    /// Build an item from an upstream object, reading its identifier from `id_field`.
    pub fn from_object(fields: Fields, id_field: &str) -> Self {
        let identifier = fields
            .get(id_field)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Self { identifier, fields }
    }
}

impl Serialize for CatalogItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

/// Key the detail fields are nested under in an enriched item.
pub const DETAILS_KEY: &str = "details";

/// A catalog item after the enrichment stage.
///
/// `details` is `None` when enrichment was not requested or failed, in which
/// case the item serializes exactly like its base form. Otherwise the base
/// fields are written unchanged and the detail fields are nested under
/// [`details_key`](Self::details_key).
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedItem {
    pub item: CatalogItem,
    pub details: Option<DetailFields>,
}

impl EnrichedItem {
    pub fn enriched(item: CatalogItem, details: DetailFields) -> Self {
        Self {
            item,
            details: Some(details),
        }
    }

    pub fn base(item: CatalogItem) -> Self {
        Self { item, details: None }
    }

    pub fn identifier(&self) -> &str {
        &self.item.identifier
    }

    pub fn is_enriched(&self) -> bool {
        self.details.is_some()
    }

    /// `details`, prefixed with `_` until it no longer names a base field.
    pub fn details_key(&self) -> String {
        let mut key = DETAILS_KEY.to_string();
        while self.item.fields.contains_key(&key) {
            key.insert(0, '_');
        }
        key
    }
}

impl Serialize for EnrichedItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let Some(details) = &self.details else {
            return self.item.serialize(serializer);
        };

        let mut map = serializer.serialize_map(Some(self.item.fields.len() + 1))?;
        for (key, value) in &self.item.fields {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry(&self.details_key(), details)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(text: Option<&str>, page: Option<&str>, limit: Option<&str>, expand: Option<&str>) -> RawCatalogParams {
        RawCatalogParams {
            text: text.map(Into::into),
            page: page.map(Into::into),
            limit: limit.map(Into::into),
            expand: expand.map(Into::into),
        }
    }

    #[test]
    fn test_defaults_when_no_params() {
        let query = CatalogQuery::from_params(&RawCatalogParams::default(), &QueryConfig::default());
        assert_eq!(
            query,
            CatalogQuery {
                text: "the lord of the rings".into(),
                page: 1,
                limit: 10,
                expand: false,
            }
        );
    }

    #[test]
    fn test_explicit_params_are_kept() {
        let raw = params(Some("dune"), Some("3"), Some("25"), Some("true"));
        let query = CatalogQuery::from_params(&raw, &QueryConfig::default());
        assert_eq!(query.text, "dune");
        assert_eq!(query.page, 3);
        assert_eq!(query.limit, 25);
        assert!(query.expand);
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let defaults = QueryConfig::default();
        for bad in ["0", "-2", "abc", "", "1.5"] {
            let raw = params(None, Some(bad), Some(bad), None);
            let query = CatalogQuery::from_params(&raw, &defaults);
            assert_eq!(query.page, 1, "page for {bad:?}");
            assert_eq!(query.limit, 10, "limit for {bad:?}");
        }
    }

    #[test]
    fn test_blank_text_falls_back() {
        let query = CatalogQuery::from_params(&params(Some("   "), None, None, None), &QueryConfig::default());
        assert_eq!(query.text, "the lord of the rings");
    }

    #[test]
    fn test_expand_requires_flag_value() {
        let defaults = QueryConfig::default();
        for (value, expected) in [("true", true), ("TRUE", true), (" true ", true), ("false", false), ("1", false), ("", false)] {
            let query = CatalogQuery::from_params(&params(None, None, None, Some(value)), &defaults);
            assert_eq!(query.expand, expected, "expand={value:?}");
        }
    }

    #[test]
    fn test_item_identifier_from_object() {
        let fields = json!({"key": "/works/OL1W", "title": "Dune"});
        let item = CatalogItem::from_object(fields.as_object().unwrap().clone(), "key");
        assert_eq!(item.identifier, "/works/OL1W");

        let fields = json!({"key": 42});
        let item = CatalogItem::from_object(fields.as_object().unwrap().clone(), "key");
        assert_eq!(item.identifier, "");
    }

    #[test]
    fn test_enriched_item_serialization() {
        let fields = json!({"key": "/works/OL1W", "title": "Dune"});
        let item = CatalogItem::from_object(fields.as_object().unwrap().clone(), "key");

        let base = serde_json::to_value(EnrichedItem::base(item.clone())).unwrap();
        assert_eq!(base, fields);

        let details = json!({"description": "Spice"}).as_object().unwrap().clone();
        let enriched = serde_json::to_value(EnrichedItem::enriched(item, details)).unwrap();
        assert_eq!(
            enriched,
            json!({"key": "/works/OL1W", "title": "Dune", "details": {"description": "Spice"}})
        );
    }

    #[test]
    fn test_upstream_details_field_is_not_shadowed() {
        let fields = json!({"key": "/works/OL1W", "details": "upstream", "_details": 7});
        let item = CatalogItem::from_object(fields.as_object().unwrap().clone(), "key");
        let details = json!({"x": 1}).as_object().unwrap().clone();
        let enriched = EnrichedItem::enriched(item, details);

        assert_eq!(enriched.details_key(), "__details");
        let text = serde_json::to_string(&enriched).unwrap();
        assert_eq!(text.matches("\"details\"").count(), 1);
        assert_eq!(
            serde_json::from_str::<Value>(&text).unwrap(),
            json!({"key": "/works/OL1W", "details": "upstream", "_details": 7, "__details": {"x": 1}})
        );
    }
}
