//! Application state and shared resources.

use anyhow::{Context, Result};
use std::sync::Arc;

use wfs_search::FallbackSearch;

use crate::config::ServiceConfig;
use crate::registry::Registry;

/// Derives the TERYT administrative code from an entity ID.
///
/// Returns `None` when the ID is too short to carry a code.
pub type AdminCodeRule = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// The default rule: the first `len` characters of the ID.
pub fn prefix_rule(len: usize) -> AdminCodeRule {
    Arc::new(move |id: &str| {
        let code: String = id.chars().take(len).collect();
        (code.chars().count() == len).then_some(code)
    })
}

/// Shared application state.
pub struct AppState {
    pub search: FallbackSearch,
    pub registry: Registry,
    pub admin_code: AdminCodeRule,
}

impl AppState {
    pub fn new(config: ServiceConfig, registry: Registry) -> Result<Self> {
        let admin_code = prefix_rule(config.admin_code_length);
        let search =
            FallbackSearch::with_http(config.search).context("Failed to build WFS client")?;
        Ok(Self::with_search(search, registry, admin_code))
    }

    pub fn with_search(search: FallbackSearch, registry: Registry, admin_code: AdminCodeRule) -> Self {
        Self {
            search,
            registry,
            admin_code,
        }
    }

    /// Administrative code for `entity_id` under the configured rule.
    pub fn admin_code(&self, entity_id: &str) -> Option<String> {
        (self.admin_code)(entity_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_rule() {
        let rule = prefix_rule(4);
        assert_eq!(rule("146501_8.0101.12/4").as_deref(), Some("1465"));
        assert_eq!(rule("1465").as_deref(), Some("1465"));
        assert_eq!(rule("146"), None);
        assert_eq!(rule(""), None);
    }

    #[test]
    fn test_rule_is_replaceable() {
        let state = AppState::with_search(
            FallbackSearch::with_http(Default::default()).unwrap(),
            Registry::default(),
            Arc::new(|id: &str| id.split('_').next().map(str::to_string)),
        );
        assert_eq!(state.admin_code("146501_8.0101.12").as_deref(), Some("146501"));
    }
}
