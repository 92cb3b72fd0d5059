//! Summary merger (spec §4.9): fold every agent's `SummaryFragment` into the
//! final, published summary — extending results/paths/nodes/edges/scores,
//! applying transforms in agent-insertion order, deduplicating, synthesizing
//! inverse edges, averaging scores, sorting paths, and attaching
//! publications via module `publication`.

use crate::model::summary::{
    FinalSummary, NormalizedPath, PathEntry, PathKey, SummaryFragment, SummaryEdge, SummaryMeta, SummaryNode,
    SummaryResult,
};
use crate::publication::{splice_edge_publications, PublicationResolver};
use crate::qualified_predicate::qualified_predicate_string;
use indexmap::IndexMap;
use itertools::Itertools;
use serde_json::Value;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// A stable content hash over a normalized path, used as its `paths` key.
/// Grounded on the deterministic-hash idiom `biomedgps::model::util::match_color`
/// uses for its own color hashing: `DefaultHasher` over the value's `Hash`
/// impl, formatted as hex.
fn path_key(path: &NormalizedPath) -> PathKey {
    let mut hasher = DefaultHasher::new();
    path.hash(&mut hasher);
    format!("{:x}", hasher.finish())
}

fn dedupe_list_fields(fields: &mut serde_json::Map<String, Value>) {
    for value in fields.values_mut() {
        if let Value::Array(list) = value {
            *list = std::mem::take(list).into_iter().unique_by(|v| v.to_string()).collect();
        }
    }
}

/// Sort key for invariant 2 ("paths is sorted... no duplicates"): primary by
/// length, secondary lexicographically on the even-indexed (node) elements
/// only — the resolved reading of the spec's Open Question on path
/// tie-breaking (see DESIGN.md).
fn path_sort_key(path: &NormalizedPath) -> (usize, Vec<&str>) {
    let evens: Vec<&str> = path.iter().step_by(2).map(String::as_str).collect();
    (path.len(), evens)
}

struct PathBucket {
    subgraph: NormalizedPath,
    aras: Vec<String>,
}

/// Fold `fragments` (one per agent, in agent-insertion order) into the
/// published `FinalSummary`.
pub fn merge(qid: &str, fragments: &[(String, SummaryFragment)], resolver: &dyn PublicationResolver) -> FinalSummary {
    let mut drug_order: Vec<String> = Vec::new();
    let mut results_map: HashMap<String, Vec<PathKey>> = HashMap::new();
    let mut paths_table: IndexMap<PathKey, PathBucket> = IndexMap::new();
    let mut nodes_table: IndexMap<String, SummaryNode> = IndexMap::new();
    let mut edges_table: IndexMap<String, SummaryEdge> = IndexMap::new();
    let mut edge_witnesses: HashMap<String, (crate::model::trapi::KEdge, bool)> = HashMap::new();
    let mut scores: HashMap<String, Vec<f64>> = HashMap::new();

    for (agent, fragment) in fragments {
        for path in &fragment.paths {
            let Some(drug) = path.first() else { continue };
            let key = path_key(path);
            if !results_map.contains_key(drug) {
                drug_order.push(drug.clone());
            }
            results_map.entry(drug.clone()).or_default().push(key.clone());
            paths_table
                .entry(key)
                .or_insert_with(|| PathBucket { subgraph: path.clone(), aras: Vec::new() })
                .aras
                .push(agent.clone());
        }

        for kt in &fragment.nodes {
            let node = nodes_table.entry(kt.key.clone()).or_default();
            for transform in &kt.transforms {
                transform.apply(&mut node.fields);
                node.aras.push(agent.clone());
            }
        }

        for kt in &fragment.edges {
            if let Some(witness) = &kt.edge_witness {
                edge_witnesses.entry(kt.key.clone()).or_insert_with(|| witness.clone());
            }
            let edge = edges_table.entry(kt.key.clone()).or_default();
            for transform in &kt.transforms {
                transform.apply(&mut edge.fields);
                edge.aras.push(agent.clone());
            }
        }

        for (drug, values) in &fragment.scores {
            scores.entry(drug.clone()).or_default().extend(values.iter().copied());
        }
    }

    for edge in edges_table.values_mut() {
        dedupe_list_fields(&mut edge.fields);
    }

    let mut publications = IndexMap::new();
    for edge in edges_table.values_mut() {
        splice_edge_publications(&mut edge.fields, resolver, &mut publications);
    }

    let existing_keys: Vec<String> = edges_table.keys().cloned().collect();
    for key in existing_keys {
        let Some((kedge, inverted)) = edge_witnesses.get(&key) else { continue };
        let inverse_key = qualified_predicate_string(kedge, !inverted);
        if edges_table.contains_key(&inverse_key) {
            continue;
        }
        let Some(original) = edges_table.get(&key) else { continue };
        let mut inverse = original.clone();
        let subject = inverse.fields.get("subject").cloned();
        let object = inverse.fields.get("object").cloned();
        if let Some(object) = object {
            inverse.fields.insert("subject".to_string(), object);
        }
        if let Some(subject) = subject {
            inverse.fields.insert("object".to_string(), subject);
        }
        inverse.fields.insert("predicate".to_string(), Value::String(inverse_key.clone()));
        edges_table.insert(inverse_key, inverse);
    }

    for (key, node) in nodes_table.iter_mut() {
        dedupe_list_fields(&mut node.fields);
        let names_empty = node.fields.get("names").and_then(Value::as_array).map(|a| a.is_empty()).unwrap_or(true);
        if names_empty {
            node.fields.insert("names".to_string(), Value::Array(vec![Value::String(key.clone())]));
        }
        let curies_empty = node.fields.get("curies").and_then(Value::as_array).map(|a| a.is_empty()).unwrap_or(true);
        if curies_empty {
            node.fields.insert("curies".to_string(), Value::Array(vec![Value::String(key.clone())]));
        }
    }

    let mut results = Vec::with_capacity(drug_order.len());
    for drug in &drug_order {
        let mut keys = results_map.remove(drug).unwrap_or_default();
        keys.sort();
        keys.dedup();
        keys.sort_by_key(|k| path_sort_key(&paths_table[k].subgraph));

        let object = keys
            .first()
            .and_then(|k| paths_table.get(k))
            .and_then(|bucket| bucket.subgraph.last().cloned())
            .unwrap_or_else(|| drug.clone());

        let drug_name = nodes_table
            .get(drug)
            .and_then(|n| n.fields.get("names"))
            .and_then(Value::as_array)
            .and_then(|a| a.first())
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| drug.clone());

        let score = scores
            .get(drug)
            .filter(|v| !v.is_empty())
            .map(|v| v.iter().sum::<f64>() / v.len() as f64)
            .unwrap_or(0.0);

        results.push(SummaryResult { subject: drug.clone(), object, drug_name, paths: keys, score });
    }

    let paths = paths_table
        .into_iter()
        .map(|(key, bucket)| (key, PathEntry { subgraph: bucket.subgraph, aras: bucket.aras }))
        .collect();

    FinalSummary {
        meta: SummaryMeta { qid: qid.to_string(), aras: fragments.iter().map(|(a, _)| a.clone()).collect() },
        results,
        paths,
        nodes: nodes_table,
        edges: edges_table,
        publications,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::trapi::KEdge;
    use crate::model::summary::KeyedTransforms;
    use crate::publication::DefaultPublicationResolver;
    use crate::rules::{AttributeRule, apply_rules};
    use serde_json::json;

    fn direct_treats_fragment() -> SummaryFragment {
        let kedge = KEdge {
            subject: "CHEBI:1".into(),
            predicate: "biolink:treats".into(),
            object: "MONDO:1".into(),
            qualifiers: vec![],
            attributes: vec![],
        };
        let drug_obj = json!({"name": "aspirin", "curie": "CHEBI:1", "categories": ["biolink:ChemicalEntity"]});
        let disease_obj = json!({"name": "headache", "curie": "MONDO:1", "categories": ["biolink:Disease"]});
        let node_rules = vec![
            AttributeRule::AggregateProperty { key: "name".into(), path: "names".into() },
            AttributeRule::AggregateProperty { key: "curie".into(), path: "curies".into() },
        ];
        let edge_obj = json!({"subject": "CHEBI:1", "object": "MONDO:1", "predicate": "biolink:treats"});
        let edge_rules = vec![
            AttributeRule::GetProperty { key: "subject".into() },
            AttributeRule::GetProperty { key: "object".into() },
            AttributeRule::GetProperty { key: "predicate".into() },
        ];

        SummaryFragment {
            paths: vec![vec!["CHEBI:1".to_string(), "biolink:treats".to_string(), "MONDO:1".to_string()]],
            nodes: vec![
                KeyedTransforms { key: "CHEBI:1".into(), transforms: apply_rules(&node_rules, &drug_obj), edge_witness: None },
                KeyedTransforms { key: "MONDO:1".into(), transforms: apply_rules(&node_rules, &disease_obj), edge_witness: None },
            ],
            edges: vec![KeyedTransforms {
                key: "biolink:treats".into(),
                transforms: apply_rules(&edge_rules, &edge_obj),
                edge_witness: Some((kedge, false)),
            }],
            scores: HashMap::from([("CHEBI:1".to_string(), vec![0.5])]),
        }
    }

    #[test]
    fn synthesizes_inverse_edge_and_averages_score() {
        let resolver = DefaultPublicationResolver;
        let fragments = vec![("agentA".to_string(), direct_treats_fragment())];
        let summary = merge("Q1", &fragments, &resolver);

        assert_eq!(summary.results.len(), 1);
        let result = &summary.results[0];
        assert_eq!(result.subject, "CHEBI:1");
        assert_eq!(result.object, "MONDO:1");
        assert!((result.score - 0.5).abs() < 1e-9);

        assert!(summary.edges.contains_key("biolink:treats"));
        assert!(summary.edges.contains_key("biolink:treated_by"));
        let inverse = &summary.edges["biolink:treated_by"];
        assert_eq!(inverse.fields.get("subject"), Some(&json!("MONDO:1")));
        assert_eq!(inverse.fields.get("object"), Some(&json!("CHEBI:1")));
    }

    #[test]
    fn nodes_get_name_and_curie_fallback_when_empty() {
        let resolver = DefaultPublicationResolver;
        let fragment = SummaryFragment {
            paths: vec![],
            nodes: vec![KeyedTransforms { key: "CHEBI:9".into(), transforms: vec![], edge_witness: None }],
            edges: vec![],
            scores: HashMap::new(),
        };
        let fragments = vec![("agentA".to_string(), fragment)];
        let summary = merge("Q1", &fragments, &resolver);
        let node = &summary.nodes["CHEBI:9"];
        assert_eq!(node.fields.get("names"), Some(&json!(["CHEBI:9"])));
        assert_eq!(node.fields.get("curies"), Some(&json!(["CHEBI:9"])));
    }

    #[test]
    fn empty_fragments_produce_empty_summary() {
        let resolver = DefaultPublicationResolver;
        let summary = merge("Q1", &[], &resolver);
        assert_eq!(summary.meta.qid, "Q1");
        assert!(summary.meta.aras.is_empty());
        assert!(summary.results.is_empty());
        assert!(summary.paths.is_empty());
        assert!(summary.nodes.is_empty());
        assert!(summary.edges.is_empty());
        assert!(summary.publications.is_empty());
    }
}
