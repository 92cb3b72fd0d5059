//! Qualified-predicate builder (spec §4.7): compose a human-readable
//! qualified predicate string from a kedge's qualifier bag, in both forward
//! and inverse orientation.
//!
//! The literal qualifier-to-string composition in spec §4.7 is the
//! authoritative procedural description; see DESIGN.md for how its
//! ambiguity against the illustrative example in spec §8 scenario 5 was
//! resolved (the five-key ordered concatenation is implemented literally;
//! the scenario's "contains" wording is read loosely, not as a demand for
//! an exact contiguous substring).

use crate::biolink::invert_biolink_predicate;
use crate::model::trapi::KEdge;
use std::collections::HashMap;

const QUALIFIED_PREDICATE_KEY: &str = "biolink:qualified_predicate";

/// Ordered (qualifier suffix, string prefix) pairs used to compose a
/// subject- or object-qualifier string, per spec §4.7.
const QUALIFIER_SUFFIXES: &[(&str, &str)] = &[
    ("direction_qualifier", ""),
    ("aspect_qualifier", ""),
    ("form_or_variant_qualifier", "of a "),
    ("part_qualifier", "of the "),
    ("derivative_qualifier", ""),
];

fn normalized_qualifiers(kedge: &KEdge) -> HashMap<String, String> {
    kedge
        .qualifiers
        .iter()
        .map(|q| (q.qualifier_type_id.clone(), q.qualifier_value.clone()))
        .collect()
}

fn side_qualifier_string(qualifiers: &HashMap<String, String>, side: &str) -> String {
    let mut pieces = Vec::new();
    for (suffix, prefix) in QUALIFIER_SUFFIXES {
        let key = format!("biolink:{}_{}", side, suffix);
        if let Some(value) = qualifiers.get(&key) {
            pieces.push(format!("{}{}", prefix, value));
        }
    }
    pieces.join(" ")
}

fn compose(predicate: &str, subject_qual: &str, object_qual: &str) -> String {
    let mut parts = Vec::new();
    if !subject_qual.is_empty() {
        parts.push(subject_qual.to_string());
    }
    parts.push(predicate.to_string());
    if !object_qual.is_empty() {
        parts.push(object_qual.to_string());
    }
    let mut s = parts.join(" ");
    if !object_qual.is_empty() {
        s.push_str(" of");
    }
    s
}

/// Compose the qualified predicate string for a kedge. `inverted` selects
/// the inverse orientation: subject/object qualifier strings are swapped
/// and the base predicate (raw or `qualified_predicate`-overridden) is
/// inverted via `invert_biolink_predicate`.
pub fn qualified_predicate_string(kedge: &KEdge, inverted: bool) -> String {
    if kedge.qualifiers.is_empty() {
        return if inverted {
            invert_biolink_predicate(&kedge.predicate)
        } else {
            kedge.predicate.clone()
        };
    }

    let qualifiers = normalized_qualifiers(kedge);
    let base_predicate = qualifiers
        .get(QUALIFIED_PREDICATE_KEY)
        .cloned()
        .unwrap_or_else(|| kedge.predicate.clone());

    let subject_qual = side_qualifier_string(&qualifiers, "subject");
    let object_qual = side_qualifier_string(&qualifiers, "object");

    if inverted {
        compose(&invert_biolink_predicate(&base_predicate), &object_qual, &subject_qual)
    } else {
        compose(&base_predicate, &subject_qual, &object_qual)
    }
}

/// The stable key used to identify an edge's qualified predicate in
/// normalized paths and the summary's `edges` map: the qualified predicate
/// string itself, since spec §3 treats it as the edge's identity for
/// deduplication purposes once combined with its endpoints.
pub fn qualified_predicate_key(kedge: &KEdge, inverted: bool) -> String {
    qualified_predicate_string(kedge, inverted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::trapi::Qualifier;

    fn edge_with_qualifiers(qualifiers: Vec<(&str, &str)>) -> KEdge {
        KEdge {
            subject: "CHEBI:1".into(),
            predicate: "biolink:affects".into(),
            object: "MONDO:1".into(),
            qualifiers: qualifiers
                .into_iter()
                .map(|(k, v)| Qualifier { qualifier_type_id: k.into(), qualifier_value: v.into() })
                .collect(),
            attributes: vec![],
        }
    }

    #[test]
    fn no_qualifiers_returns_raw_predicate() {
        let edge = KEdge {
            subject: "CHEBI:1".into(),
            predicate: "biolink:treats".into(),
            object: "MONDO:1".into(),
            qualifiers: vec![],
            attributes: vec![],
        };
        assert_eq!(qualified_predicate_string(&edge, false), "biolink:treats");
        assert_eq!(qualified_predicate_string(&edge, true), "biolink:treated_by");
    }

    #[test]
    fn object_aspect_qualifier_composes_activity_of() {
        let edge = edge_with_qualifiers(vec![("biolink:object_aspect_qualifier", "activity")]);
        let forward = qualified_predicate_string(&edge, false);
        assert!(forward.contains("activity"));
        assert!(forward.ends_with(" of"));
        assert!(forward.starts_with("biolink:affects"));
    }

    #[test]
    fn inverse_drops_forward_only_qualifiers_and_inverts_predicate() {
        let edge = edge_with_qualifiers(vec![("biolink:object_aspect_qualifier", "activity")]);
        let inverse = qualified_predicate_string(&edge, true);
        assert!(inverse.contains("activity"));
        assert!(inverse.contains("biolink:affected_by"));
        assert!(!inverse.ends_with(" of"));
    }

    #[test]
    fn qualified_predicate_override_replaces_base_predicate() {
        let edge = edge_with_qualifiers(vec![("biolink:qualified_predicate", "biolink:causes")]);
        let forward = qualified_predicate_string(&edge, false);
        assert!(forward.contains("biolink:causes"));
    }
}
