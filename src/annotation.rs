//! Classify an opaque annotation record as disease / chemical / gene and
//! extract the per-class fields the front-end needs (names, FDA phase,
//! descriptions, CHEBI roles, indications, OTC status, species).
//!
//! An annotation is deliberately untyped (`serde_json::Value`) the way a
//! TRAPI attribute's `value` is — the shape varies by upstream source and
//! the classifier dispatches on field presence rather than a tag, per spec
//! §3. Extraction functions are infallible: an unsupported class, or a
//! class missing the field being extracted, returns `None` rather than
//! panicking (`biomedgps`'s `CheckData` trait follows the same
//! collect-errors-don't-abort shape for CSV ingestion).

use lazy_static::lazy_static;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnnotationClass {
    Disease,
    Chemical,
    Gene,
}

/// Classify by presence of key fields, per spec §3: `disease_ontology` ->
/// disease; any of `chebi|chembl|ndc` -> chemical; `symbol` -> gene.
pub fn classify(annotation: &Value) -> Option<AnnotationClass> {
    let obj = annotation.as_object()?;
    if obj.contains_key("disease_ontology") {
        return Some(AnnotationClass::Disease);
    }
    if obj.contains_key("chebi") || obj.contains_key("chembl") || obj.contains_key("ndc") {
        return Some(AnnotationClass::Chemical);
    }
    if obj.contains_key("symbol") {
        return Some(AnnotationClass::Gene);
    }
    None
}

fn str_at<'a>(annotation: &'a Value, path: &[&str]) -> Option<&'a str> {
    let mut cur = annotation;
    for key in path {
        cur = cur.get(key)?;
    }
    cur.as_str()
}

/// Disease description: `disease_ontology.def`, truncated at the first `[`.
/// Chemical description: `unii.ncit_description`, falling back to
/// `chebi.definition`. Gene description: `summary`. Unsupported class or
/// missing field -> `None`.
pub fn get_description(class: AnnotationClass, annotation: &Value) -> Option<String> {
    match class {
        AnnotationClass::Disease => {
            let def = str_at(annotation, &["disease_ontology", "def"])?;
            Some(def.split('[').next().unwrap_or(def).trim().to_string())
        }
        AnnotationClass::Chemical => {
            if let Some(d) = str_at(annotation, &["unii", "ncit_description"]) {
                Some(d.to_string())
            } else {
                str_at(annotation, &["chebi", "definition"]).map(|s| s.to_string())
            }
        }
        AnnotationClass::Gene => str_at(annotation, &["summary"]).map(|s| s.to_string()),
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChemicalNames {
    pub commercial: Vec<String>,
    pub generic: Vec<String>,
}

/// `getNames`: class-specific name extraction. Only chemicals have a
/// structured commercial/generic split (from NDC entries); disease and gene
/// classes have no names extraction defined here and return `None` (their
/// names come from the knode's own `name` field upstream, not from the
/// annotation).
pub fn get_names(class: AnnotationClass, annotation: &Value) -> Option<ChemicalNames> {
    if class != AnnotationClass::Chemical {
        return None;
    }
    let ndc = annotation.get("ndc")?.as_array()?;
    let mut commercial = Vec::new();
    let mut generic = Vec::new();
    for entry in ndc {
        if let Some(name) = entry.get("proprietaryname").and_then(Value::as_str) {
            commercial.push(name.to_lowercase());
        }
        if let Some(name) = entry.get("nonproprietaryname").and_then(Value::as_str) {
            generic.push(name.to_lowercase());
        }
    }
    dedup_preserve_order(&mut commercial);
    dedup_preserve_order(&mut generic);
    Some(ChemicalNames { commercial, generic })
}

fn dedup_preserve_order(v: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    v.retain(|x| seen.insert(x.clone()));
}

/// FDA approval: integer max phase from `chembl.max_phase`, default 0.
/// Only defined for chemicals; other classes get 0.
pub fn get_fda_approval(class: AnnotationClass, annotation: &Value) -> i64 {
    if class != AnnotationClass::Chemical {
        return 0;
    }
    annotation
        .get("chembl")
        .and_then(|c| c.get("max_phase"))
        .and_then(Value::as_i64)
        .unwrap_or(0)
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChebiRole {
    pub id: String,
    pub name: String,
}

lazy_static! {
    /// External role-lookup table, standing in for the upstream CHEBI role
    /// ontology service (out of scope per spec §1's "external collaborators").
    /// Only the high-level roles the front-end renders are recognized; any
    /// other role id is dropped.
    static ref ROLE_LOOKUP: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("CHEBI:23888", "drug");
        m.insert("CHEBI:35222", "inhibitor");
        m.insert("CHEBI:35703", "agonist");
        m.insert("CHEBI:48001", "antagonist");
        m.insert("CHEBI:50906", "role");
        m
    };
}

/// Lift `chebi.relationship.has_role` (scalar or list) through the
/// role-lookup table, dropping unrecognized roles.
pub fn get_chebi_roles(class: AnnotationClass, annotation: &Value) -> Vec<ChebiRole> {
    if class != AnnotationClass::Chemical {
        return Vec::new();
    }
    let has_role = match annotation
        .get("chebi")
        .and_then(|c| c.get("relationship"))
        .and_then(|r| r.get("has_role"))
    {
        Some(v) => v,
        None => return Vec::new(),
    };
    let ids: Vec<String> = match has_role {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|s| s.to_string())
            .collect(),
        Value::String(s) => vec![s.clone()],
        _ => Vec::new(),
    };
    ids.into_iter()
        .filter_map(|id| {
            ROLE_LOOKUP.get(id.as_str()).map(|name| ChebiRole {
                id: id.clone(),
                name: name.to_string(),
            })
        })
        .collect()
}

/// Drug indications: `mesh_id` from each entry in `chembl.drug_indications`.
pub fn get_drug_indications(class: AnnotationClass, annotation: &Value) -> Vec<String> {
    if class != AnnotationClass::Chemical {
        return Vec::new();
    }
    annotation
        .get("chembl")
        .and_then(|c| c.get("drug_indications"))
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|e| e.get("mesh_id"))
                .filter_map(Value::as_str)
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// OTC status: `chembl.availability_type` mapped to a human label.
pub fn get_otc(class: AnnotationClass, annotation: &Value) -> Option<&'static str> {
    if class != AnnotationClass::Chemical {
        return None;
    }
    let availability = annotation
        .get("chembl")?
        .get("availability_type")?
        .as_i64()?;
    Some(match availability {
        2 => "Over the counter",
        1 => "Prescription only",
        0 => "Discontinued",
        -2 => "Withdrawn",
        _ => "Other",
    })
}

/// Disease MESH curies: `mondo.xrefs.mesh` then `disease_ontology.xrefs.mesh`,
/// prefixed with `MESH:`, path order preserved, missing sources skipped.
pub fn get_curies(class: AnnotationClass, annotation: &Value) -> Vec<String> {
    if class != AnnotationClass::Disease {
        return Vec::new();
    }
    let mut curies = Vec::new();
    for source in ["mondo", "disease_ontology"] {
        if let Some(mesh_ids) = annotation
            .get(source)
            .and_then(|s| s.get("xrefs"))
            .and_then(|x| x.get("mesh"))
            .and_then(Value::as_array)
        {
            for id in mesh_ids.iter().filter_map(Value::as_str) {
                curies.push(format!("MESH:{}", id));
            }
        }
    }
    curies
}

lazy_static! {
    static ref SPECIES_BY_TAXID: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("9606", "Human");
        m
    };
}

/// Species: `taxid` -> name via a fixed map; 9606 -> Human, else `None`.
pub fn get_species(class: AnnotationClass, annotation: &Value) -> Option<String> {
    if class != AnnotationClass::Gene {
        return None;
    }
    let taxid = str_at(annotation, &["taxid"])?;
    SPECIES_BY_TAXID.get(taxid).map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_disease_chemical_gene() {
        assert_eq!(
            classify(&json!({"disease_ontology": {}})),
            Some(AnnotationClass::Disease)
        );
        assert_eq!(classify(&json!({"chebi": {}})), Some(AnnotationClass::Chemical));
        assert_eq!(classify(&json!({"symbol": "TP53"})), Some(AnnotationClass::Gene));
        assert_eq!(classify(&json!({"nothing": 1})), None);
    }

    #[test]
    fn disease_description_truncates_at_bracket() {
        let a = json!({"disease_ontology": {"def": "A headache. [PMID:123]"}});
        assert_eq!(
            get_description(AnnotationClass::Disease, &a),
            Some("A headache.".to_string())
        );
    }

    #[test]
    fn chemical_names_merge_and_lowercase() {
        let a = json!({"ndc": [
            {"proprietaryname": "Tylenol", "nonproprietaryname": "Acetaminophen"},
            {"proprietaryname": "TYLENOL", "nonproprietaryname": "acetaminophen"}
        ]});
        let names = get_names(AnnotationClass::Chemical, &a).unwrap();
        assert_eq!(names.commercial, vec!["tylenol"]);
        assert_eq!(names.generic, vec!["acetaminophen"]);
    }

    #[test]
    fn fda_approval_defaults_to_zero() {
        assert_eq!(get_fda_approval(AnnotationClass::Chemical, &json!({})), 0);
        let a = json!({"chembl": {"max_phase": 3}});
        assert_eq!(get_fda_approval(AnnotationClass::Chemical, &a), 3);
    }

    #[test]
    fn otc_maps_availability_codes() {
        let a = json!({"chembl": {"availability_type": 2}});
        assert_eq!(get_otc(AnnotationClass::Chemical, &a), Some("Over the counter"));
        let a = json!({"chembl": {"availability_type": 99}});
        assert_eq!(get_otc(AnnotationClass::Chemical, &a), Some("Other"));
    }

    #[test]
    fn disease_curies_preserve_path_order_and_skip_missing() {
        let a = json!({
            "mondo": {"xrefs": {"mesh": ["D001"]}},
            "disease_ontology": {"xrefs": {}}
        });
        assert_eq!(get_curies(AnnotationClass::Disease, &a), vec!["MESH:D001"]);
    }

    #[test]
    fn species_maps_known_taxid_only() {
        assert_eq!(
            get_species(AnnotationClass::Gene, &json!({"taxid": "9606"})),
            Some("Human".to_string())
        );
        assert_eq!(get_species(AnnotationClass::Gene, &json!({"taxid": "10090"})), None);
    }
}
