//! Shared test utilities for the plot-api workspace.
//!
//! This crate provides:
//! - Canned WFS 1.0 / 1.1 / 2.0 responses and exception reports
//! - An in-process mock WFS endpoint that records requests
//! - Temporary registry files
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! ```ignore
//! use test_utils::{fixtures, MockWfs, Route, MockResponse};
//! ```

pub mod fixtures;
pub mod mock_wfs;

pub use fixtures::*;
pub use mock_wfs::{MockResponse, MockWfs, RecordedRequest, Route};

use std::io::Write;

/// Write a `;`-delimited registry file with a header line.
///
/// Each row is `(id, organization, administrative_code, url)`.
pub fn write_registry(rows: &[(&str, &str, &str, &str)]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp registry");
    writeln!(file, "{}", REGISTRY_HEADER).expect("write registry header");
    for (id, org, code, url) in rows {
        writeln!(file, "{id};{org};{code};{url}").expect("write registry row");
    }
    file.flush().expect("flush registry");
    file
}
