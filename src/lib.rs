#![doc = include_str!("../README.md")]

//! Entry point for the biomedical knowledge-graph answer summarizer.
//!
//! `summarize` wires the whole pipeline (spec's Flow, §2): the canonical-ID
//! resolver runs once across every agent's nodes, then each agent's message
//! folds into a `SummaryFragment` (module `fragment`), and all fragments are
//! reduced into one `FinalSummary` (module `merge`), publications spliced in
//! along the way (module `publication`).

pub mod annotation;
pub mod biolink;
pub mod canonical;
pub mod config;
pub mod error;
pub mod fragment;
pub mod logging;
pub mod merge;
pub mod model;
pub mod pathfinder;
pub mod publication;
pub mod qualified_predicate;
pub mod rgraph;
pub mod rules;

pub use logging::init_logger;

use crate::canonical::CanonicalIndex;
use crate::error::SummarizeError;
use crate::model::summary::FinalSummary;
use crate::model::trapi::Answer;
use crate::publication::PublicationResolver;
use log::debug;

/// Run the summarization core over one or more agents' answers to a single
/// inferred query (spec §6's conceptual `summarize(qid, answers, maxHops,
/// annotationClient)`). The `annotationClient` named in spec §6 is external
/// plumbing the core never calls directly (§4.2's classifier is exposed as
/// pure functions in `annotation` instead); this entry point's signature
/// reflects that — it takes only what the core actually consumes.
///
/// `answers` with a zero-length list produce the empty summary described in
/// spec §8 scenario 1. `max_hops` must be >= 1 (spec §6); anything less is a
/// programmer-contract violation and fails fast before the core runs, per
/// spec §7.
pub fn summarize(
    qid: &str,
    answers: &[Answer],
    max_hops: i64,
    resolver: &dyn PublicationResolver,
) -> Result<FinalSummary, SummarizeError> {
    if max_hops < 1 {
        return Err(SummarizeError::InvalidMaxHops { max_hops });
    }

    let node_maps: Vec<_> = answers.iter().map(|a| &a.message.knowledge_graph.nodes).collect();
    let mut canonical = CanonicalIndex::build(node_maps);

    let fragments: Vec<(String, crate::model::summary::SummaryFragment)> = answers
        .iter()
        .map(|answer| {
            debug!("building fragment for agent {}", answer.agent);
            let fragment = fragment::build_fragment(
                &answer.agent,
                &answer.message,
                max_hops as usize,
                &mut canonical,
            );
            (answer.agent.clone(), fragment)
        })
        .collect();

    Ok(merge::merge(qid, &fragments, resolver))
}
