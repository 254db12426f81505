//! Feature extraction from GetFeature responses.
//!
//! Records are wrapped differently depending on the protocol revision:
//!
//! | Revision        | Wrapper                                  |
//! |-----------------|------------------------------------------|
//! | WFS 2.0         | `wfs:member`                             |
//! | WFS 1.x / GML 2 | `gml:featureMember`                      |
//! | GML 3.1         | `gml:featureMember`, `gml:featureMembers`|
//!
//! Namespace URIs vary between servers (GML 3.1 vs 3.2 in particular), so
//! wrappers are recognized by local name only.

use plot_common::RawFeatureRecord;
use tracing::debug;

use crate::error::ParseError;
use crate::xml::{parse_document, XmlElement};

/// Lowercase substrings marking a child element as geometry-bearing.
///
/// `geom` covers `geometry`, `the_geom`, `geometria` and `msGeometry`.
pub const GEOMETRY_KEYWORDS: [&str; 5] = ["geom", "polygon", "point", "line", "shape"];

/// Element whose content is an envelope, not an attribute.
const BOUNDED_BY: &str = "boundedBy";

/// True if a child element with this local name carries the geometry.
pub fn is_geometry_tag(local_name: &str) -> bool {
    let lower = local_name.to_ascii_lowercase();
    GEOMETRY_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Parse a GetFeature response into raw records, in document order.
pub fn extract_features(body: &str) -> Result<Vec<RawFeatureRecord>, ParseError> {
    let root = parse_document(body)?;
    let mut records = Vec::new();
    collect(&root, &mut records)?;
    debug!(count = records.len(), root = root.local_name(), "Extracted feature records");
    Ok(records)
}

fn collect(el: &XmlElement, out: &mut Vec<RawFeatureRecord>) -> Result<(), ParseError> {
    for child in el.child_elements() {
        match child.local_name() {
            "member" | "featureMember" => {
                if let Some(feature) = child.child_elements().next() {
                    out.push(split_feature(feature)?);
                }
            }
            "featureMembers" => {
                for feature in child.child_elements() {
                    out.push(split_feature(feature)?);
                }
            }
            _ => collect(child, out)?,
        }
    }
    Ok(())
}

/// Split one feature element into attributes and a geometry fragment.
fn split_feature(feature: &XmlElement) -> Result<RawFeatureRecord, ParseError> {
    let mut record = RawFeatureRecord::default();

    for child in feature.child_elements() {
        let name = child.local_name();
        if is_geometry_tag(name) {
            // A later geometry child replaces an earlier one.
            record.geometry_fragment = Some(child.to_markup()?);
        } else if !name.eq_ignore_ascii_case(BOUNDED_BY) {
            record
                .attributes
                .insert(name.to_string(), child.text().unwrap_or_default());
        }
    }

    Ok(record)
}
