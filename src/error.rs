//! The single error boundary for the summarization core.
//!
//! Per the recover-and-continue policy the core follows internally, almost
//! nothing inside the pipeline produces an `Err` — a bad result, a bad edge,
//! or a miss in the canonical-ID resolver is logged and skipped, not
//! propagated. `SummarizeError` exists only for the programmer-contract
//! violations that must fail fast at the outer boundary, before the core is
//! ever entered: a malformed request, or a `max_hops` outside its contract.
//! Unknown-query-type rejection (spec §7) belongs to the external
//! query-builder boundary, not this core, so it has no variant here.

use custom_error::custom_error;
use serde_json::Value;

custom_error! {
    #[derive(PartialEq)]
    pub SummarizeError
    MalformedMessage{agent: String, reason: String} = "agent {agent} sent a malformed TRAPI message: {reason}",
    MissingKnowledgeGraph{agent: String} = "agent {agent}'s message has no knowledge_graph",
    InvalidMaxHops{max_hops: i64} = "max_hops must be >= 1, got {max_hops}",
}

/// Validate a parsed summarize request's top-level shape before any agent's
/// message reaches the core (spec §7: "malformed input: fail fast with a
/// typed error at the outer boundary; core is not entered"). Deliberately
/// shallow: it checks only the structural preconditions `summarize` itself
/// relies on (an `answers` array of `{agent, message}` objects, each with a
/// `knowledge_graph`), leaving field-level shape errors to `serde_json`'s
/// own deserialization, which runs afterward.
pub fn validate_request(raw: &Value) -> Result<(), SummarizeError> {
    let Some(obj) = raw.as_object() else {
        return Err(SummarizeError::MalformedMessage {
            agent: "<request>".to_string(),
            reason: "top-level request must be a JSON object".to_string(),
        });
    };
    let Some(answers) = obj.get("answers").and_then(Value::as_array) else {
        return Err(SummarizeError::MalformedMessage {
            agent: "<request>".to_string(),
            reason: "missing required field 'answers'".to_string(),
        });
    };
    for answer in answers {
        let Some(answer_obj) = answer.as_object() else {
            return Err(SummarizeError::MalformedMessage {
                agent: "<request>".to_string(),
                reason: "each entry in 'answers' must be a JSON object".to_string(),
            });
        };
        let agent = answer_obj.get("agent").and_then(Value::as_str).unwrap_or("<unknown>").to_string();
        let Some(message) = answer_obj.get("message").and_then(Value::as_object) else {
            return Err(SummarizeError::MalformedMessage { agent, reason: "missing required field 'message'".to_string() });
        };
        if !message.contains_key("knowledge_graph") {
            return Err(SummarizeError::MissingKnowledgeGraph { agent });
        }
    }
    Ok(())
}
