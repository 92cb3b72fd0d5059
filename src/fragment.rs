//! Summary-fragment producer (spec §4.8): per result, build the reduced
//! graph, find its drug->disease paths, normalize them, and accumulate the
//! per-agent `SummaryFragment` that module `merge` folds into the final
//! summary.

use crate::canonical::CanonicalIndex;
use crate::model::summary::{KeyedTransforms, NormalizedPath, SummaryFragment};
use crate::model::trapi::{KEdge, KNode, Message};
use crate::pathfinder::{find_paths, RawPathElement};
use crate::qualified_predicate::qualified_predicate_key;
use crate::rgraph::trapi_result_to_rgraph;
use crate::rules::{apply_rules, AttributeRule, ValueFn};
use log::debug;
use serde_json::Value;

const SN: &str = "sn";
const ON: &str = "on";

fn node_rule_set() -> Vec<AttributeRule> {
    vec![
        AttributeRule::AggregateProperty { key: "name".into(), path: "names".into() },
        AttributeRule::AggregateProperty { key: "curie".into(), path: "curies".into() },
        AttributeRule::AggregateProperty { key: "categories".into(), path: "categories".into() },
    ]
}

fn edge_rule_set() -> Vec<AttributeRule> {
    vec![
        AttributeRule::GetProperty { key: "subject".into() },
        AttributeRule::GetProperty { key: "object".into() },
        AttributeRule::GetProperty { key: "predicate".into() },
        AttributeRule::AggregateAttributes {
            attr_ids: vec!["biolink:publications".into()],
            target_key: "publications".into(),
        },
        AttributeRule::RenameAndTransformAttribute {
            attr_id: "biolink:snippets".into(),
            path: "snippets".into(),
            f: ValueFn::Identity,
        },
    ]
}

fn node_object(raw_curie: &str, knode: &KNode) -> Value {
    let mut v = serde_json::to_value(knode).unwrap_or(Value::Null);
    if let Value::Object(ref mut map) = v {
        map.insert("curie".to_string(), Value::String(raw_curie.to_string()));
    }
    v
}

fn edge_object(kedge: &KEdge, canonical_subject: &str, canonical_object: &str, inverted: bool) -> Value {
    let mut v = serde_json::to_value(kedge).unwrap_or(Value::Null);
    if let Value::Object(ref mut map) = v {
        let (subj, obj) = if inverted {
            (canonical_object, canonical_subject)
        } else {
            (canonical_subject, canonical_object)
        };
        map.insert("subject".to_string(), Value::String(subj.to_string()));
        map.insert("object".to_string(), Value::String(obj.to_string()));
        map.insert(
            "predicate".to_string(),
            Value::String(qualified_predicate_key(kedge, inverted)),
        );
    }
    v
}

fn normalize_path(
    raw_path: &[RawPathElement],
    kgraph: &crate::model::trapi::KnowledgeGraph,
    canonical: &mut CanonicalIndex,
) -> NormalizedPath {
    raw_path
        .iter()
        .map(|elem| match elem {
            RawPathElement::Node(curie) => canonical
                .resolve(curie)
                .unwrap_or_else(|| curie.clone()),
            RawPathElement::Edge { id, inverted } => kgraph
                .edges
                .get(id)
                .map(|kedge| qualified_predicate_key(kedge, *inverted))
                .unwrap_or_else(|| id.clone()),
        })
        .collect()
}

/// Fold every result in one agent's message into a `SummaryFragment`.
/// Results that can't be bound to the knowledge graph, or that yield no
/// paths within `max_hops`, contribute nothing and are skipped (spec §7:
/// "skip the result, continue with remaining results").
pub fn build_fragment(agent: &str, message: &Message, max_hops: usize, canonical: &mut CanonicalIndex) -> SummaryFragment {
    let mut fragment = SummaryFragment::default();
    let kgraph = &message.knowledge_graph;

    for result in &message.results {
        let Some(rgraph) = trapi_result_to_rgraph(result, kgraph) else {
            debug!("agent {}: result has an unbindable node, skipping", agent);
            continue;
        };

        let Some(drug) = result.node_bindings.get(SN).and_then(|b| b.first()) else {
            debug!("agent {}: result missing '{}' binding, skipping", agent, SN);
            continue;
        };
        let Some(disease) = result.node_bindings.get(ON).and_then(|b| b.first()) else {
            debug!("agent {}: result missing '{}' binding, skipping", agent, ON);
            continue;
        };

        let raw_paths = find_paths(&rgraph, kgraph, &drug.id, &disease.id, max_hops, canonical);
        if raw_paths.is_empty() {
            continue;
        }

        let Some(canon_drug) = canonical.resolve(&drug.id) else {
            continue;
        };

        for raw_path in &raw_paths {
            fragment.paths.push(normalize_path(raw_path, kgraph, canonical));

            for elem in raw_path {
                match elem {
                    RawPathElement::Node(curie) => {
                        let Some(knode) = kgraph.nodes.get(curie) else { continue };
                        let Some(canon) = canonical.resolve(curie) else { continue };
                        let obj = node_object(curie, knode);
                        fragment.nodes.push(KeyedTransforms {
                            key: canon,
                            transforms: apply_rules(&node_rule_set(), &obj),
                            edge_witness: None,
                        });
                    }
                    RawPathElement::Edge { id, inverted } => {
                        let Some(kedge) = kgraph.edges.get(id) else { continue };
                        let Some(canon_subject) = canonical.resolve(&kedge.subject) else { continue };
                        let Some(canon_object) = canonical.resolve(&kedge.object) else { continue };
                        let obj = edge_object(kedge, &canon_subject, &canon_object, *inverted);
                        let key = qualified_predicate_key(kedge, *inverted);
                        fragment.edges.push(KeyedTransforms {
                            key,
                            transforms: apply_rules(&edge_rule_set(), &obj),
                            edge_witness: Some((kedge.clone(), *inverted)),
                        });
                    }
                }
            }
        }

        fragment
            .scores
            .entry(canon_drug)
            .or_default()
            .push(result.normalized_score.unwrap_or(0.0));
    }

    fragment
}
