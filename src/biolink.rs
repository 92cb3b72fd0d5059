//! Tag/untag biolink CURIEs, invert predicates, and validate predicates
//! against the (small, fixed) registered vocabulary. The predicate and
//! inverse tables are loaded once as reference data, in the same
//! `lazy_static! { pub static ref ... }` style `biomedgps::model::core` uses
//! for its regexes.

use lazy_static::lazy_static;
use std::collections::HashMap;

pub const BIOLINK_PREFIX: &str = "biolink:";

/// Tag a bare predicate/category name with the `biolink:` prefix.
pub fn tag_biolink(name: &str) -> String {
    if name.starts_with(BIOLINK_PREFIX) {
        name.to_string()
    } else {
        format!("{}{}", BIOLINK_PREFIX, name)
    }
}

/// Strip the `biolink:` prefix (if present) and normalize case/spacing:
/// internal whitespace collapses to a single underscore, the result is
/// lowercased.
pub fn sanitize_biolink_element(s: &str) -> String {
    let stripped = s.strip_prefix(BIOLINK_PREFIX).unwrap_or(s);
    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

lazy_static! {
    /// The allowed biolink predicate vocabulary this pipeline recognizes.
    /// A small, representative subset of the full biolink model: enough to
    /// drive drug/disease/gene "affects"-family reasoning, extended with
    /// whatever future predicates the knowledge sources emit.
    pub static ref BIOLINK_PREDICATES: std::collections::HashSet<&'static str> = {
        let mut s = std::collections::HashSet::new();
        for p in [
            "biolink:treats",
            "biolink:treated_by",
            "biolink:affects",
            "biolink:affected_by",
            "biolink:related_to",
            "biolink:correlated_with",
            "biolink:causes",
            "biolink:caused_by",
            "biolink:contributes_to",
            "biolink:contributed_to_by",
            "biolink:interacts_with",
            "biolink:regulates",
            "biolink:regulated_by",
            "biolink:predisposes_to_condition",
            "biolink:has_predisposing_factor",
            "biolink:ameliorates_condition",
            "biolink:ameliorated_by",
            "biolink:exacerbates_condition",
            "biolink:exacerbated_by",
            "biolink:gene_associated_with_condition",
            "biolink:condition_associated_with_gene",
        ] {
            s.insert(p);
        }
        s
    };

    /// Registered inverse predicates. Predicates absent from this table and
    /// not self-symmetric are returned unchanged by `invert_biolink_predicate`
    /// (per spec §4.1: "unknown predicate -> returns p unchanged").
    pub static ref INVERSE_PREDICATES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("biolink:treats", "biolink:treated_by");
        m.insert("biolink:treated_by", "biolink:treats");
        m.insert("biolink:affects", "biolink:affected_by");
        m.insert("biolink:affected_by", "biolink:affects");
        m.insert("biolink:causes", "biolink:caused_by");
        m.insert("biolink:caused_by", "biolink:causes");
        m.insert("biolink:contributes_to", "biolink:contributed_to_by");
        m.insert("biolink:contributed_to_by", "biolink:contributes_to");
        m.insert("biolink:regulates", "biolink:regulated_by");
        m.insert("biolink:regulated_by", "biolink:regulates");
        m.insert(
            "biolink:predisposes_to_condition",
            "biolink:has_predisposing_factor",
        );
        m.insert(
            "biolink:has_predisposing_factor",
            "biolink:predisposes_to_condition",
        );
        m.insert("biolink:ameliorates_condition", "biolink:ameliorated_by");
        m.insert("biolink:ameliorated_by", "biolink:ameliorates_condition");
        m.insert("biolink:exacerbates_condition", "biolink:exacerbated_by");
        m.insert("biolink:exacerbated_by", "biolink:exacerbates_condition");
        m.insert(
            "biolink:gene_associated_with_condition",
            "biolink:condition_associated_with_gene",
        );
        m.insert(
            "biolink:condition_associated_with_gene",
            "biolink:gene_associated_with_condition",
        );
        // Symmetric predicates are their own inverse.
        m.insert("biolink:related_to", "biolink:related_to");
        m.insert("biolink:correlated_with", "biolink:correlated_with");
        m.insert("biolink:interacts_with", "biolink:interacts_with");
        m
    };
}

/// Return the registered inverse of `predicate`, or `predicate` unchanged if
/// it is unknown (caller is expected to log that upstream, per spec §4.1).
pub fn invert_biolink_predicate(predicate: &str) -> String {
    INVERSE_PREDICATES
        .get(predicate)
        .map(|s| s.to_string())
        .unwrap_or_else(|| predicate.to_string())
}

/// Whether `predicate` belongs to the recognized biolink predicate set.
pub fn is_biolink_predicate(predicate: &str) -> bool {
    BIOLINK_PREDICATES.contains(predicate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_bare_names() {
        assert_eq!(tag_biolink("treats"), "biolink:treats");
        assert_eq!(tag_biolink("biolink:treats"), "biolink:treats");
    }

    #[test]
    fn sanitizes_prefixed_and_spaced_elements() {
        assert_eq!(sanitize_biolink_element("biolink:Chemical Entity"), "chemical_entity");
        assert_eq!(sanitize_biolink_element("Gene"), "gene");
    }

    #[test]
    fn inverts_known_predicates() {
        assert_eq!(invert_biolink_predicate("biolink:treats"), "biolink:treated_by");
        assert_eq!(invert_biolink_predicate("biolink:related_to"), "biolink:related_to");
    }

    #[test]
    fn unknown_predicate_is_returned_unchanged() {
        assert_eq!(invert_biolink_predicate("biolink:made_up"), "biolink:made_up");
    }

    #[test]
    fn validates_membership() {
        assert!(is_biolink_predicate("biolink:treats"));
        assert!(!is_biolink_predicate("biolink:made_up"));
    }
}
