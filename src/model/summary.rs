//! The output-side data model: paths, summary nodes/edges, fragments, and
//! the final consolidated summary described in spec §3. Struct layout and
//! derive list follow `biomedgps::model::core`'s plain data structs
//! (`Serialize`/`Deserialize`/`Clone`/`Debug`/`PartialEq`), minus the
//! `poem_openapi::Object` derive the teacher adds for its HTTP layer — this
//! crate has none.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// A normalized drug->disease path: `[node, edge, node, edge, ..., node]`.
/// Nodes at even indices are canonical CURIEs; edges at odd indices are
/// qualified-predicate keys (module G). Plain `Vec<String>` rather than a
/// tagged enum because the wire shape (`paths[key].subgraph`) is just that
/// alternating array, and nothing downstream needs to distinguish the two
/// kinds except by position.
pub type NormalizedPath = Vec<String>;

/// Stable content hash over a normalized path, used as the key into
/// `paths`. Two paths that hash equal are considered identical.
pub type PathKey = String;

/// A pure transform over a mutable accumulator, produced by the attribute
/// rule DSL (module C) and applied while folding fragments into the final
/// summary (module I). Represented as a `serde_json::Map` patch plus a list
/// of fields to aggregate-append, per the statically-typed re-design called
/// for in the Design Notes (see `crate::rules`).
pub type Accumulator = Map<String, Value>;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryNode {
    #[serde(flatten)]
    pub fields: Accumulator,
    pub aras: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryEdge {
    #[serde(flatten)]
    pub fields: Accumulator,
    pub aras: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PathEntry {
    pub subgraph: NormalizedPath,
    pub aras: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    #[serde(rename = "type")]
    pub pub_type: String,
    pub url: String,
    pub snippet: Option<String>,
    pub pubdate: Option<String>,
}

/// Per-agent intermediate summary, folded one at a time into the final
/// summary by module I.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SummaryFragment {
    /// Normalized `[node, edge, node, ...]` sequences produced per result.
    pub paths: Vec<NormalizedPath>,
    /// One entry per distinct rnode touched by any path in this fragment.
    pub nodes: Vec<KeyedTransforms>,
    /// One entry per distinct redge touched by any path in this fragment.
    pub edges: Vec<KeyedTransforms>,
    /// `canonical(drug) -> normalized_score` for every result in this
    /// fragment whose path survived pruning.
    pub scores: HashMap<String, Vec<f64>>,
}

/// A canonical/qualified key paired with the list of transforms to apply to
/// whatever summary object lives at that key. Edge entries additionally
/// carry the original kedge and traversal direction, used only by the
/// merger to synthesize the inverse edge (§4.9) — never part of the
/// serialized output.
#[derive(Clone)]
pub struct KeyedTransforms {
    pub key: String,
    pub transforms: Vec<crate::rules::Transform>,
    pub edge_witness: Option<(crate::model::trapi::KEdge, bool)>,
}

impl std::fmt::Debug for KeyedTransforms {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyedTransforms")
            .field("key", &self.key)
            .field("transform_count", &self.transforms.len())
            .finish()
    }
}

impl PartialEq for KeyedTransforms {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.transforms.len() == other.transforms.len()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub subject: String,
    pub object: String,
    pub drug_name: String,
    pub paths: Vec<PathKey>,
    pub score: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryMeta {
    pub qid: String,
    pub aras: Vec<String>,
}

/// `paths`/`nodes`/`edges`/`publications` use an order-preserving map: the
/// merger (module I) folds fragments in agent-insertion order, and that
/// fold order must survive to the serialized key order for two invocations
/// on identical input to produce byte-identical output (spec §8).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FinalSummary {
    pub meta: SummaryMeta,
    pub results: Vec<SummaryResult>,
    pub paths: IndexMap<PathKey, PathEntry>,
    pub nodes: IndexMap<String, SummaryNode>,
    pub edges: IndexMap<String, SummaryEdge>,
    pub publications: IndexMap<String, Publication>,
}
