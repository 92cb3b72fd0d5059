//! The attribute-rule DSL (spec §4.3): composable "mapping rules" over TRAPI
//! nodes/edges that produce per-object `Transform` lists, applied later
//! during merging (module `merge`).
//!
//! The spec's reference implementation returns boxed closures; per the
//! Design Notes this is re-implemented as a tagged `AttributeRule` enum
//! interpreted against the object (a `serde_json::Value` view of the knode
//! or kedge being summarized), producing `Transform` values — themselves
//! data, not closures — that are later applied to a mutable
//! `Accumulator`. This keeps every rule pure and inspectable instead of
//! hiding state inside a closure environment.

use crate::model::summary::Accumulator;
use serde_json::Value;

/// A resolved instruction to write or extend one field of a summary
/// node/edge. Produced by interpreting an `AttributeRule` against a source
/// object; applied to an `Accumulator` by `apply`.
#[derive(Clone, Debug, PartialEq)]
pub enum Transform {
    /// Assign `value` at `path` unconditionally (overwrites).
    Set { path: String, value: Value },
    /// Append `value` (or every element of `value` if it is itself an
    /// array) to the list at `path`, creating `[]` first if absent.
    Aggregate { path: String, value: Value },
    /// Ensure the list at `path` exists (as `[]`) without appending
    /// anything — the "aggregate but predicate failed" / "no attribute
    /// matched" case.
    EnsureList { path: String },
}

impl Transform {
    pub fn apply(&self, acc: &mut Accumulator) {
        match self {
            Transform::Set { path, value } => {
                set_at_path(acc, path, value.clone());
            }
            Transform::Aggregate { path, value } => {
                let list = ensure_list_at_path(acc, path);
                match value {
                    Value::Array(items) => list.extend(items.iter().cloned()),
                    Value::Null => {}
                    other => list.push(other.clone()),
                }
            }
            Transform::EnsureList { path } => {
                ensure_list_at_path(acc, path);
            }
        }
    }
}

/// A named value transform applied to an attribute/property value before
/// it's written. Named variants rather than function pointers so rules stay
/// plain data (serializable, comparable, free of captured environment).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ValueFn {
    Identity,
    ToLowerString,
    WrapScalarAsList,
    IntOrZero,
}

impl ValueFn {
    fn call(self, v: &Value) -> Value {
        match self {
            ValueFn::Identity => v.clone(),
            ValueFn::ToLowerString => match v {
                Value::String(s) => Value::String(s.to_lowercase()),
                other => other.clone(),
            },
            ValueFn::WrapScalarAsList => match v {
                Value::Array(_) => v.clone(),
                Value::Null => Value::Array(vec![]),
                other => Value::Array(vec![other.clone()]),
            },
            ValueFn::IntOrZero => Value::from(v.as_i64().unwrap_or(0)),
        }
    }
}

fn split_path(path: &str) -> Vec<&str> {
    path.split('.').collect()
}

fn set_at_path(acc: &mut Accumulator, path: &str, value: Value) {
    let segments = split_path(path);
    set_recursive(acc, &segments, value);
}

fn set_recursive(map: &mut Accumulator, segments: &[&str], value: Value) {
    if segments.len() == 1 {
        map.insert(segments[0].to_string(), value);
        return;
    }
    let entry = map
        .entry(segments[0].to_string())
        .or_insert_with(|| Value::Object(Default::default()));
    if !entry.is_object() {
        *entry = Value::Object(Default::default());
    }
    set_recursive(entry.as_object_mut().unwrap(), &segments[1..], value);
}

fn ensure_list_at_path<'a>(acc: &'a mut Accumulator, path: &str) -> &'a mut Vec<Value> {
    let segments = split_path(path);
    ensure_list_recursive(acc, &segments)
}

fn ensure_list_recursive<'a>(map: &'a mut Accumulator, segments: &[&str]) -> &'a mut Vec<Value> {
    if segments.len() == 1 {
        let entry = map
            .entry(segments[0].to_string())
            .or_insert_with(|| Value::Array(vec![]));
        if !entry.is_array() {
            *entry = Value::Array(vec![]);
        }
        return entry.as_array_mut().unwrap();
    }
    let entry = map
        .entry(segments[0].to_string())
        .or_insert_with(|| Value::Object(Default::default()));
    if !entry.is_object() {
        *entry = Value::Object(Default::default());
    }
    ensure_list_recursive(entry.as_object_mut().unwrap(), &segments[1..])
}

/// A rule over an object (a serialized knode or kedge): `obj -> Transform`.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeRule {
    GetProperty { key: String },
    TransformProperty { key: String, f: ValueFn },
    RenameProperty { key: String, path: String },
    AggregateProperty { key: String, path: String },
    AggregatePropertyWhen { key: String, path: String, keep_nonempty: bool },
    RenameAndTransformAttribute { attr_id: String, path: String, f: ValueFn },
    AggregateAttributes { attr_ids: Vec<String>, target_key: String },
    AggregateAndTransformAttributes { attr_ids: Vec<String>, target_key: String, f: ValueFn },
}

fn first_attribute_value<'a>(obj: &'a Value, attr_id: &str) -> Option<&'a Value> {
    obj.get("attributes")?
        .as_array()?
        .iter()
        .find(|a| a.get("attribute_type_id").and_then(Value::as_str) == Some(attr_id))
        .and_then(|a| a.get("value"))
}

fn matching_attribute_values<'a>(obj: &'a Value, attr_ids: &[String]) -> Vec<&'a Value> {
    obj.get("attributes")
        .and_then(Value::as_array)
        .map(|attrs| {
            attrs
                .iter()
                .filter(|a| {
                    a.get("attribute_type_id")
                        .and_then(Value::as_str)
                        .map(|id| attr_ids.iter().any(|want| want == id))
                        .unwrap_or(false)
                })
                .filter_map(|a| a.get("value"))
                .collect()
        })
        .unwrap_or_default()
}

/// Flatten one level of array-valued matches before they're concatenated
/// into an accumulator list: an attribute whose own `value` is an array
/// (e.g. `biolink:publications`'s list of PMIDs) contributes its elements,
/// not itself as one nested element (spec §4.3: "concatenates values of
/// all attributes... into obj[tgtKey]").
fn flatten_matches(values: Vec<&Value>) -> Vec<Value> {
    values
        .into_iter()
        .flat_map(|v| match v {
            Value::Array(items) => items.clone(),
            other => vec![other.clone()],
        })
        .collect()
}

impl AttributeRule {
    /// Interpret this rule against `obj`, producing the `Transform` it
    /// contributes to the object's summary entry.
    pub fn apply(&self, obj: &Value) -> Transform {
        match self {
            AttributeRule::GetProperty { key } => Transform::Set {
                path: key.clone(),
                value: obj.get(key).cloned().unwrap_or(Value::Null),
            },
            AttributeRule::TransformProperty { key, f } => Transform::Set {
                path: key.clone(),
                value: f.call(obj.get(key).unwrap_or(&Value::Null)),
            },
            AttributeRule::RenameProperty { key, path } => Transform::Set {
                path: path.clone(),
                value: obj.get(key).cloned().unwrap_or(Value::Null),
            },
            AttributeRule::AggregateProperty { key, path } => {
                let raw = obj.get(key).cloned().unwrap_or(Value::Null);
                Transform::Aggregate {
                    path: path.clone(),
                    value: ValueFn::WrapScalarAsList.call(&raw),
                }
            }
            AttributeRule::AggregatePropertyWhen { key, path, keep_nonempty } => {
                let raw = obj.get(key);
                let truthy = match raw {
                    Some(Value::Null) | None => false,
                    Some(Value::Bool(b)) => *b,
                    Some(Value::String(s)) => !s.is_empty(),
                    Some(Value::Array(a)) => !a.is_empty(),
                    Some(_) => true,
                };
                let do_update = truthy == *keep_nonempty;
                if do_update {
                    Transform::Aggregate {
                        path: path.clone(),
                        value: ValueFn::WrapScalarAsList.call(raw.unwrap_or(&Value::Null)),
                    }
                } else {
                    Transform::EnsureList { path: path.clone() }
                }
            }
            AttributeRule::RenameAndTransformAttribute { attr_id, path, f } => {
                let value = first_attribute_value(obj, attr_id)
                    .map(|v| f.call(v))
                    .unwrap_or(Value::Null);
                Transform::Set { path: path.clone(), value }
            }
            AttributeRule::AggregateAttributes { attr_ids, target_key } => {
                let values = flatten_matches(matching_attribute_values(obj, attr_ids));
                Transform::Aggregate { path: target_key.clone(), value: Value::Array(values) }
            }
            AttributeRule::AggregateAndTransformAttributes { attr_ids, target_key, f } => {
                let values: Vec<Value> = flatten_matches(matching_attribute_values(obj, attr_ids))
                    .into_iter()
                    .map(|v| f.call(&v))
                    .collect();
                Transform::Aggregate { path: target_key.clone(), value: Value::Array(values) }
            }
        }
    }
}

/// Interpret an ordered rule set against `obj`, producing the transform
/// list a summary-fragment producer attaches to one node or edge (spec
/// §4.3: "a rule set is `(obj)->[transform]`").
pub fn apply_rules(rules: &[AttributeRule], obj: &Value) -> Vec<Transform> {
    rules.iter().map(|r| r.apply(obj)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_property_reads_and_sets() {
        let obj = json!({"name": "aspirin"});
        let rule = AttributeRule::GetProperty { key: "name".into() };
        let t = rule.apply(&obj);
        let mut acc = Accumulator::new();
        t.apply(&mut acc);
        assert_eq!(acc.get("name"), Some(&json!("aspirin")));
    }

    #[test]
    fn aggregate_property_wraps_scalars_and_appends() {
        let obj = json!({"name": "aspirin"});
        let rule = AttributeRule::AggregateProperty { key: "name".into(), path: "names".into() };
        let mut acc = Accumulator::new();
        rule.apply(&obj).apply(&mut acc);
        rule.apply(&obj).apply(&mut acc);
        assert_eq!(acc.get("names"), Some(&json!(["aspirin", "aspirin"])));
    }

    #[test]
    fn aggregate_attributes_concatenates_matches() {
        let obj = json!({"attributes": [
            {"attribute_type_id": "biolink:publications", "value": ["PMID:1", "PMID:2"]},
            {"attribute_type_id": "biolink:other", "value": "x"}
        ]});
        let rule = AttributeRule::AggregateAttributes {
            attr_ids: vec!["biolink:publications".into()],
            target_key: "publications".into(),
        };
        let mut acc = Accumulator::new();
        rule.apply(&obj).apply(&mut acc);
        assert_eq!(acc.get("publications"), Some(&json!(["PMID:1", "PMID:2"])));
    }

    #[test]
    fn aggregate_attributes_with_no_match_still_initializes_empty_list() {
        let obj = json!({"attributes": []});
        let rule = AttributeRule::AggregateAttributes {
            attr_ids: vec!["biolink:publications".into()],
            target_key: "publications".into(),
        };
        let mut acc = Accumulator::new();
        rule.apply(&obj).apply(&mut acc);
        assert_eq!(acc.get("publications"), Some(&json!([])));
    }

    #[test]
    fn rename_and_transform_attribute_uses_first_match() {
        let obj = json!({"attributes": [
            {"attribute_type_id": "biolink:max_research_phase", "value": 2}
        ]});
        let rule = AttributeRule::RenameAndTransformAttribute {
            attr_id: "biolink:max_research_phase".into(),
            path: "fda_approval_status".into(),
            f: ValueFn::IntOrZero,
        };
        let mut acc = Accumulator::new();
        rule.apply(&obj).apply(&mut acc);
        assert_eq!(acc.get("fda_approval_status"), Some(&json!(2)));
    }
}
