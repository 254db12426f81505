//! Registry of municipal WFS endpoints keyed by TERYT administrative code.
//!
//! The registry file is a `;`-delimited table with a header line:
//!
//! ```text
//! id;organizacja;teryt;url
//! 1;Starostwo Powiatowe w Piasecznie;1418;https://piaseczno.geoportal2.pl/map/geoportal/wfs.php
//! ```

use anyhow::{Context, Result};
use plot_common::ServiceEndpoint;
use std::path::Path;
use tracing::{debug, info, warn};

/// One row of the registry table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub record_id: String,
    pub organization: String,
    pub administrative_code: String,
    pub url: String,
}

impl RegistryEntry {
    pub fn endpoint(&self) -> ServiceEndpoint {
        ServiceEndpoint::new(&self.url, &self.organization, &self.administrative_code)
    }
}

/// In-memory registry, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
}

impl Registry {
    /// Load the registry file; a missing file yields an empty registry.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(path = %path.display(), "Registry file does not exist, no endpoints available");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read registry: {}", path.display()))?;
        let registry = Self::parse(&content);
        info!(path = %path.display(), endpoints = registry.len(), "Loaded WFS registry");
        Ok(registry)
    }

    /// Parse the table, skipping the header and rows with fewer than four fields.
    pub fn parse(content: &str) -> Self {
        let entries = content
            .lines()
            .skip(1)
            .enumerate()
            .filter_map(|(n, line)| {
                let line = line.trim_end_matches('\r');
                let fields: Vec<&str> = line.split(';').collect();
                if fields.len() < 4 {
                    if !line.trim().is_empty() {
                        debug!(line = n + 2, "Skipping malformed registry row");
                    }
                    return None;
                }
                Some(RegistryEntry {
                    record_id: fields[0].trim().to_string(),
                    organization: fields[1].trim().to_string(),
                    administrative_code: fields[2].trim().to_string(),
                    url: fields[3].trim().to_string(),
                })
            })
            .collect();
        Self { entries }
    }

    /// First endpoint registered for `code`.
    pub fn lookup(&self, code: &str) -> Option<ServiceEndpoint> {
        self.entries
            .iter()
            .find(|e| e.administrative_code == code)
            .map(RegistryEntry::endpoint)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "id;organizacja;teryt;url\n\
        1;Starostwo Powiatowe w Piasecznie;1418;https://piaseczno.example.pl/wfs\n\
        broken line\n\
        2;Miasto Stołeczne Warszawa;1465;https://warszawa.example.pl/wfs\r\n\
        3;Duplicate;1465;https://other.example.pl/wfs\n";

    #[test]
    fn test_header_and_malformed_rows_skipped() {
        let registry = Registry::parse(TABLE);
        assert_eq!(registry.len(), 3);
        assert!(registry.lookup("teryt").is_none());
    }

    #[test]
    fn test_first_match_wins() {
        let registry = Registry::parse(TABLE);
        let endpoint = registry.lookup("1465").unwrap();
        assert_eq!(endpoint.organization, "Miasto Stołeczne Warszawa");
        assert_eq!(endpoint.url, "https://warszawa.example.pl/wfs");
        assert_eq!(endpoint.administrative_code, "1465");
    }

    #[test]
    fn test_unknown_code() {
        assert!(Registry::parse(TABLE).lookup("0201").is_none());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::load(&dir.path().join("dane_WFS.txt")).unwrap();
        assert!(registry.is_empty());
    }
}
