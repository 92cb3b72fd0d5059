//! Publication splicer (spec §4.10): lift `publications`/`snippets`
//! attributes off a merged summary edge into the top-level `publications`
//! table, then strip both from the edge.

use crate::model::summary::Publication;
use indexmap::IndexMap;
use serde_json::Value;

/// The external "id -> (type, url)" collaborator spec §6 describes as
/// external to the core. A default, prefix-based implementation is provided
/// below (grounded on the PubMed/PMC links `biomedgps`'s entity models
/// reference), but callers may supply their own.
pub trait PublicationResolver {
    fn is_valid_id(&self, id: &str) -> bool;
    fn resolve(&self, id: &str) -> Option<(String, String)>;
}

/// Resolves `PMID:`/`PMC:`/`DOI:` prefixed ids to their canonical URLs.
/// Anything else is treated as invalid (spec §7: "invalid publication id:
/// drop from the edge's publications list").
pub struct DefaultPublicationResolver;

impl PublicationResolver for DefaultPublicationResolver {
    fn is_valid_id(&self, id: &str) -> bool {
        self.resolve(id).is_some()
    }

    fn resolve(&self, id: &str) -> Option<(String, String)> {
        if let Some(pmid) = id.strip_prefix("PMID:") {
            return Some(("PMID".to_string(), format!("https://pubmed.ncbi.nlm.nih.gov/{}/", pmid)));
        }
        if let Some(pmc) = id.strip_prefix("PMC:") {
            return Some(("PMC".to_string(), format!("https://www.ncbi.nlm.nih.gov/pmc/articles/{}/", pmc)));
        }
        if let Some(doi) = id.strip_prefix("DOI:") {
            return Some(("DOI".to_string(), format!("https://doi.org/{}", doi)));
        }
        None
    }
}

fn snippet_for(snippets: Option<&Value>, id: &str) -> (Option<String>, Option<String>) {
    let Some(entry) = snippets.and_then(|s| s.get(id)) else {
        return (None, None);
    };
    let sentence = entry.get("sentence").and_then(Value::as_str).map(str::to_string);
    let pubdate = entry.get("publication date").and_then(Value::as_str).map(str::to_string);
    (sentence, pubdate)
}

/// Splice one edge's `publications`/`snippets` fields into the shared
/// `publications` table, then strip `snippets` and `qualifiers` from the
/// edge's own field map. Returns the ids that were valid and thus kept on
/// the edge's `publications` list.
pub fn splice_edge_publications(
    fields: &mut serde_json::Map<String, Value>,
    resolver: &dyn PublicationResolver,
    publications: &mut IndexMap<String, Publication>,
) {
    let ids: Vec<String> = fields
        .get("publications")
        .and_then(Value::as_array)
        .map(|a| a.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default();

    let snippets = fields.get("snippets").cloned();
    let mut kept = Vec::new();

    for id in ids {
        let Some((pub_type, url)) = resolver.resolve(&id) else {
            continue;
        };
        let (sentence, pubdate) = snippet_for(snippets.as_ref(), &id);
        publications.insert(id.clone(), Publication { pub_type, url, snippet: sentence, pubdate });
        kept.push(Value::String(id));
    }

    fields.insert("publications".to_string(), Value::Array(kept));
    fields.remove("snippets");
    fields.remove("qualifiers");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_pmid_and_keeps_snippet() {
        let resolver = DefaultPublicationResolver;
        let mut fields = serde_json::Map::new();
        fields.insert("publications".to_string(), json!(["PMID:123"]));
        fields.insert("snippets".to_string(), json!({"PMID:123": {"sentence": "aspirin helps", "publication date": "2020-01-01"}}));
        let mut publications = IndexMap::new();

        splice_edge_publications(&mut fields, &resolver, &mut publications);

        let pub_entry = publications.get("PMID:123").unwrap();
        assert_eq!(pub_entry.url, "https://pubmed.ncbi.nlm.nih.gov/123/");
        assert_eq!(pub_entry.snippet.as_deref(), Some("aspirin helps"));
        assert!(!fields.contains_key("snippets"));
        assert!(!fields.contains_key("qualifiers"));
    }

    #[test]
    fn drops_invalid_ids() {
        let resolver = DefaultPublicationResolver;
        let mut fields = serde_json::Map::new();
        fields.insert("publications".to_string(), json!(["PMID:1", "NOT_AN_ID"]));
        let mut publications = IndexMap::new();

        splice_edge_publications(&mut fields, &resolver, &mut publications);

        assert_eq!(fields.get("publications"), Some(&json!(["PMID:1"])));
        assert_eq!(publications.len(), 1);
    }
}
