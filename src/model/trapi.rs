//! The TRAPI wire shape the core ingests, trimmed to the fields the
//! summarizer actually reads. Field set and naming follow the `trapi-model-rs`
//! community crate; unlike that crate this one carries no `rocket_okapi`
//! schema annotations since the core has no HTTP surface of its own (that
//! lives in the external front-end, per spec §1).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

pub type Curie = String;
pub type BiolinkPredicate = String;

/// `{attribute_type_id, value}` plus the handful of optional fields the
/// classifier and rule DSL key off of.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub attribute_type_id: String,
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_type_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_source: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Qualifier {
    pub qualifier_type_id: String,
    pub qualifier_value: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KEdge {
    pub subject: Curie,
    pub predicate: BiolinkPredicate,
    pub object: Curie,
    #[serde(default)]
    pub qualifiers: Vec<Qualifier>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

/// `nodes`/`edges` use an order-preserving map: the canonical-ID resolver
/// (module D) picks its representative as the "first inserted" member of a
/// merged alias bag, which is only deterministic across runs if iterating
/// the knowledge graph's nodes replays the document's own key order rather
/// than a `std::collections::HashMap`'s randomly-seeded hash order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    #[serde(default)]
    pub nodes: IndexMap<Curie, KNode>,
    #[serde(default)]
    pub edges: IndexMap<String, KEdge>,
}

/// One member of a `node_bindings`/`edge_bindings` list; only `id` matters
/// to the core.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    pub id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrapiResult {
    #[serde(default)]
    pub node_bindings: HashMap<String, Vec<Binding>>,
    #[serde(default)]
    pub edge_bindings: HashMap<String, Vec<Binding>>,
    #[serde(default)]
    pub normalized_score: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub knowledge_graph: KnowledgeGraph,
    #[serde(default)]
    pub results: Vec<TrapiResult>,
}

/// One agent's (ARA's) answer to the inferred query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub agent: String,
    pub message: Message,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_message() {
        let data = r#"{
            "knowledge_graph": {
                "nodes": {
                    "CHEBI:1": {"name": "aspirin", "categories": ["biolink:ChemicalEntity"]},
                    "MONDO:1": {"name": "headache", "categories": ["biolink:Disease"]}
                },
                "edges": {
                    "e0": {"subject": "CHEBI:1", "predicate": "biolink:treats", "object": "MONDO:1"}
                }
            },
            "results": [
                {
                    "node_bindings": {"sn": [{"id": "CHEBI:1"}], "on": [{"id": "MONDO:1"}]},
                    "edge_bindings": {"t_edge": [{"id": "e0"}]},
                    "normalized_score": 0.5
                }
            ]
        }"#;
        let message: Message = serde_json::from_str(data).expect("valid message");
        assert_eq!(message.knowledge_graph.nodes.len(), 2);
        assert_eq!(message.results[0].normalized_score, Some(0.5));
    }
}
