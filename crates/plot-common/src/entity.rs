//! Lookup queries, service endpoints and feature records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::geometry::Geometry;

/// Kind of cadastral entity being looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Parcel,
    Building,
}

impl EntityType {
    /// Lowercase identifier used in exports and metrics labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Parcel => "parcel",
            EntityType::Building => "building",
        }
    }

    /// Capitalized name used in user-facing messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            EntityType::Parcel => "Parcel",
            EntityType::Building => "Building",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single lookup request. Immutable for the lifetime of one retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityQuery {
    entity_id: String,
    entity_type: EntityType,
}

impl EntityQuery {
    pub fn new(entity_type: EntityType, entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            entity_type,
        }
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }
}

/// A WFS endpoint resolved by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEndpoint {
    pub url: String,
    pub organization: String,
    pub administrative_code: String,
}

impl ServiceEndpoint {
    pub fn new(
        url: impl Into<String>,
        organization: impl Into<String>,
        administrative_code: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            organization: organization.into(),
            administrative_code: administrative_code.into(),
        }
    }
}

/// One feature as returned by the remote service, before normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFeatureRecord {
    /// Attribute values keyed by local element name.
    pub attributes: BTreeMap<String, String>,
    /// Serialized markup of the geometry-bearing child element.
    pub geometry_fragment: Option<String>,
}

impl RawFeatureRecord {
    /// True when `entity_id` equals at least one attribute value exactly.
    ///
    /// Surrounding whitespace in the attribute value is ignored; substrings
    /// of a value never match.
    pub fn matches_id(&self, entity_id: &str) -> bool {
        let wanted = entity_id.trim();
        !wanted.is_empty() && self.attributes.values().any(|v| v.trim() == wanted)
    }
}

/// The engine's final output: attributes plus WGS84 geometry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFeature {
    pub attributes: BTreeMap<String, String>,
    pub geometry: Option<Geometry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> RawFeatureRecord {
        RawFeatureRecord {
            attributes: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            geometry_fragment: None,
        }
    }

    #[test]
    fn test_exact_match() {
        let rec = record(&[("ID_DZIALKI", "146501_8.0101.123/4"), ("NUMER", "123/4")]);
        assert!(rec.matches_id("146501_8.0101.123/4"));
        assert!(rec.matches_id("123/4"));
    }

    #[test]
    fn test_substring_does_not_match() {
        let rec = record(&[("ID_BUDYNKU", "14650101234567"), ("OPIS", "budynek 1465010123456 obok")]);
        assert!(!rec.matches_id("1465010123456"));
        assert!(!rec.matches_id(""));
    }

    #[test]
    fn test_match_ignores_surrounding_whitespace() {
        let rec = record(&[("ID_BUDYNKU", "\n   1465010123456  ")]);
        assert!(rec.matches_id("1465010123456"));
    }

    #[test]
    fn test_entity_query_accessors() {
        let query = EntityQuery::new(EntityType::Building, "1465010123456");
        assert_eq!(query.entity_id(), "1465010123456");
        assert_eq!(query.entity_type(), EntityType::Building);
        assert_eq!(query.entity_type().display_name(), "Building");
    }
}
