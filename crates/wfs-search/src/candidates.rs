//! Candidate layer names, identifying fields and search policy.
//!
//! Cadastral WFS services publish the same data under many layer names
//! (`dzialki`, `ms:dzialki`, `ewns:Dzialki`, ...) and ID attribute names.
//! The defaults below cover the naming schemes seen across Polish county
//! services; all of it can be overridden from the service config file.

use std::time::Duration;

use plot_common::{EntityType, PlotError, PlotResult};
use serde::{Deserialize, Serialize};

/// Layer and field aliases for one entity type, in priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSet {
    pub layers: Vec<String>,
    /// Identifying attribute names, primary first
    pub fields: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl CandidateSet {
    pub fn parcels() -> Self {
        Self {
            layers: strings(&[
                "Dzialki", "dzialki", "ms:dzialki", "ewns:dzialki", "wfs:dzialki",
                "ms:Dzialki", "ewns:Dzialki", "wfs:Dzialki",
            ]),
            fields: strings(&["ID_DZIALKI", "id_dzialki", "IDENTYFIKATOR", "identyfikator"]),
        }
    }

    pub fn buildings() -> Self {
        Self {
            layers: strings(&[
                "Budynki", "budynki", "budynki_wms",
                "ms:budynki", "ewns:budynki", "wfs:budynki",
                "ms:Budynki", "ewns:Budynki", "wfs:Budynki",
                "ms:budynki_wms", "ewns:budynki_wms", "wfs:budynki_wms",
                "blokbudynku", "ms:blokbudynku", "ewns:blokbudynku", "wfs:blokbudynku",
            ]),
            fields: strings(&["ID_BUDYNKU", "id_budynku", "IDENTYFIKATOR", "identyfikator"]),
        }
    }
}

/// One of the three dimensions the search iterates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchAxis {
    Field,
    Layer,
    Version,
}

/// How the search walks the candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPolicy {
    /// Protocol versions in the order they are tried
    #[serde(default = "default_versions")]
    pub versions: Vec<String>,

    /// Loop nesting, outermost first
    #[serde(default = "default_nesting")]
    pub nesting: [SearchAxis; 3],

    /// Timeout for each HTTP request, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// COUNT / MAXFEATURES for the unfiltered retry
    #[serde(default = "default_unfiltered_cap")]
    pub unfiltered_cap: u32,

    /// Budget for a whole lookup, in seconds; `None` means unbounded
    #[serde(default = "default_deadline_secs")]
    pub deadline_secs: Option<u64>,
}

fn default_versions() -> Vec<String> {
    strings(&["2.0.0", "1.1.0", "1.0.0"])
}

fn default_nesting() -> [SearchAxis; 3] {
    [SearchAxis::Field, SearchAxis::Layer, SearchAxis::Version]
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_unfiltered_cap() -> u32 {
    1000
}

fn default_deadline_secs() -> Option<u64> {
    Some(120)
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            versions: default_versions(),
            nesting: default_nesting(),
            request_timeout_secs: default_request_timeout_secs(),
            unfiltered_cap: default_unfiltered_cap(),
            deadline_secs: default_deadline_secs(),
        }
    }
}

impl SearchPolicy {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }

    /// Reject nestings that repeat an axis and empty version lists.
    pub fn validate(&self) -> PlotResult<()> {
        let [a, b, c] = self.nesting;
        if a == b || b == c || a == c {
            return Err(PlotError::Configuration(format!(
                "search nesting must name each axis once, got {:?}",
                self.nesting
            )));
        }
        if self.versions.is_empty() {
            return Err(PlotError::Configuration(
                "at least one WFS version is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Everything the fallback search needs besides the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "CandidateSet::parcels")]
    pub parcels: CandidateSet,

    #[serde(default = "CandidateSet::buildings")]
    pub buildings: CandidateSet,

    #[serde(default)]
    pub policy: SearchPolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            parcels: CandidateSet::parcels(),
            buildings: CandidateSet::buildings(),
            policy: SearchPolicy::default(),
        }
    }
}

impl SearchConfig {
    pub fn candidates(&self, entity_type: EntityType) -> &CandidateSet {
        match entity_type {
            EntityType::Parcel => &self.parcels,
            EntityType::Building => &self.buildings,
        }
    }
}

/// A single (field, layer, version) combination to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt<'a> {
    pub field: &'a str,
    pub layer: &'a str,
    pub version: &'a str,
}

/// Every combination of the candidate set, in the policy's nesting order.
pub fn search_plan<'a>(set: &'a CandidateSet, policy: &'a SearchPolicy) -> Vec<Attempt<'a>> {
    let axis_values = |axis: SearchAxis| -> &'a [String] {
        match axis {
            SearchAxis::Field => &set.fields,
            SearchAxis::Layer => &set.layers,
            SearchAxis::Version => &policy.versions,
        }
    };
    let [outer, middle, inner] = policy.nesting;

    let mut plan = Vec::with_capacity(set.fields.len() * set.layers.len() * policy.versions.len());
    for a in axis_values(outer) {
        for b in axis_values(middle) {
            for c in axis_values(inner) {
                let mut attempt = Attempt {
                    field: "",
                    layer: "",
                    version: "",
                };
                for (axis, value) in [(outer, a.as_str()), (middle, b.as_str()), (inner, c.as_str())] {
                    match axis {
                        SearchAxis::Field => attempt.field = value,
                        SearchAxis::Layer => attempt.layer = value,
                        SearchAxis::Version => attempt.version = value,
                    }
                }
                plan.push(attempt);
            }
        }
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_set() -> CandidateSet {
        CandidateSet {
            layers: strings(&["dzialki", "ms:dzialki"]),
            fields: strings(&["ID_DZIALKI", "IDENTYFIKATOR"]),
        }
    }

    #[test]
    fn test_default_plan_order() {
        let set = small_set();
        let policy = SearchPolicy::default();
        let plan = search_plan(&set, &policy);

        assert_eq!(plan.len(), 2 * 2 * 3);
        assert_eq!(
            plan[0],
            Attempt { field: "ID_DZIALKI", layer: "dzialki", version: "2.0.0" }
        );
        assert_eq!(plan[1].version, "1.1.0");
        assert_eq!(plan[3].layer, "ms:dzialki");
        assert_eq!(plan[6].field, "IDENTYFIKATOR");
    }

    #[test]
    fn test_custom_nesting() {
        let set = small_set();
        let policy = SearchPolicy {
            nesting: [SearchAxis::Version, SearchAxis::Layer, SearchAxis::Field],
            ..SearchPolicy::default()
        };
        let plan = search_plan(&set, &policy);

        assert_eq!(plan.len(), 12);
        assert!(plan[..4].iter().all(|a| a.version == "2.0.0"));
        assert_eq!(plan[1], Attempt { field: "IDENTYFIKATOR", layer: "dzialki", version: "2.0.0" });
    }

    #[test]
    fn test_builtin_sets() {
        assert_eq!(CandidateSet::parcels().layers.len(), 8);
        assert_eq!(CandidateSet::buildings().layers.len(), 16);
        assert_eq!(CandidateSet::buildings().fields[0], "ID_BUDYNKU");
        assert_eq!(
            SearchConfig::default().candidates(EntityType::Parcel).fields[0],
            "ID_DZIALKI"
        );
    }

    #[test]
    fn test_policy_validation() {
        assert!(SearchPolicy::default().validate().is_ok());

        let repeated = SearchPolicy {
            nesting: [SearchAxis::Field, SearchAxis::Field, SearchAxis::Version],
            ..SearchPolicy::default()
        };
        assert!(matches!(repeated.validate(), Err(PlotError::Configuration(_))));

        let no_versions = SearchPolicy {
            versions: vec![],
            ..SearchPolicy::default()
        };
        assert!(no_versions.validate().is_err());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "policy:\n  versions: [\"1.0.0\", \"2.0.0\"]\n  deadline_secs: null\n";
        let config: SearchConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.policy.versions, vec!["1.0.0", "2.0.0"]);
        assert_eq!(config.policy.deadline(), None);
        assert_eq!(config.policy.unfiltered_cap, 1000);
        assert_eq!(config.policy.nesting, default_nesting());
        assert_eq!(config.buildings, CandidateSet::buildings());
    }
}
