//! Result-graph builder (spec §4.5): reduce one TRAPI result to the
//! `{nodes, edges}` subset of the knowledge graph it actually touches,
//! dropping edges whose predicate isn't biolink-recognized and failing the
//! whole result if any bound CURIE is missing from the knowledge graph.

use crate::biolink::is_biolink_predicate;
use crate::model::trapi::{KnowledgeGraph, TrapiResult};

/// A reduced, per-result graph: the CURIEs and edge ids a single TRAPI
/// result binds, filtered to valid biolink-predicate edges.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Rgraph {
    pub nodes: Vec<String>,
    pub edges: Vec<String>,
}

fn flatten_bindings(bindings: &std::collections::HashMap<String, Vec<crate::model::trapi::Binding>>) -> Vec<String> {
    let mut ids: Vec<String> = bindings
        .values()
        .flat_map(|v| v.iter().map(|b| b.id.clone()))
        .collect();
    ids.dedup_by(|a, b| a == b);
    ids
}

/// Build the reduced graph for one result. Returns `None` (spec's "fail,
/// return false") if any bound node CURIE is absent from the knowledge
/// graph; the caller treats that as an unbindable result and skips it,
/// continuing with the rest of the message (spec §7).
pub fn trapi_result_to_rgraph(result: &TrapiResult, kgraph: &KnowledgeGraph) -> Option<Rgraph> {
    let mut nodes = flatten_bindings(&result.node_bindings);
    nodes.sort();
    nodes.dedup();
    for node in &nodes {
        if !kgraph.nodes.contains_key(node) {
            return None;
        }
    }

    let edge_ids = flatten_bindings(&result.edge_bindings);
    let mut edges = Vec::new();
    for eid in edge_ids {
        let Some(kedge) = kgraph.edges.get(&eid) else {
            continue;
        };
        if is_biolink_predicate(&kedge.predicate) {
            edges.push(eid);
        }
    }

    Some(Rgraph { nodes, edges })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::trapi::{Binding, KEdge, KNode};
    use indexmap::IndexMap;
    use std::collections::HashMap;

    fn kgraph() -> KnowledgeGraph {
        let mut nodes = IndexMap::new();
        nodes.insert("CHEBI:1".to_string(), KNode::default());
        nodes.insert("MONDO:1".to_string(), KNode::default());
        let mut edges = IndexMap::new();
        edges.insert(
            "e0".to_string(),
            KEdge {
                subject: "CHEBI:1".into(),
                predicate: "biolink:treats".into(),
                object: "MONDO:1".into(),
                qualifiers: vec![],
                attributes: vec![],
            },
        );
        edges.insert(
            "e1".to_string(),
            KEdge {
                subject: "CHEBI:1".into(),
                predicate: "not_a_real_predicate".into(),
                object: "MONDO:1".into(),
                qualifiers: vec![],
                attributes: vec![],
            },
        );
        KnowledgeGraph { nodes, edges }
    }

    fn result() -> TrapiResult {
        let mut node_bindings = HashMap::new();
        node_bindings.insert("sn".to_string(), vec![Binding { id: "CHEBI:1".into() }]);
        node_bindings.insert("on".to_string(), vec![Binding { id: "MONDO:1".into() }]);
        let mut edge_bindings = HashMap::new();
        edge_bindings.insert(
            "t_edge".to_string(),
            vec![Binding { id: "e0".into() }, Binding { id: "e1".into() }],
        );
        TrapiResult { node_bindings, edge_bindings, normalized_score: Some(0.5) }
    }

    #[test]
    fn drops_non_biolink_edges_keeps_valid_ones() {
        let rgraph = trapi_result_to_rgraph(&result(), &kgraph()).unwrap();
        assert_eq!(rgraph.edges, vec!["e0".to_string()]);
    }

    #[test]
    fn fails_when_a_bound_node_is_missing() {
        let mut r = result();
        r.node_bindings
            .insert("extra".to_string(), vec![Binding { id: "NOT:THERE".into() }]);
        assert!(trapi_result_to_rgraph(&r, &kgraph()).is_none());
    }
}
