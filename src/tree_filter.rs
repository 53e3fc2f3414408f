// Tree filtering for availability documents
// Two projections over arbitrary JSON trees: drop keys by substring, or keep only allowlisted paths

use serde_json::{Map, Value};
use std::collections::HashSet;

/// Removes every object key whose name contains one of `patterns`, at any depth.
///
/// Matching is case-insensitive and only looks at key names, never at values.
/// Arrays keep their length; only keys inside objects are ever dropped.
pub fn remove_by_key_substring<P: AsRef<str>>(tree: &Value, patterns: &[P]) -> Value {
    let folded: Vec<String> = patterns
        .iter()
        .map(|pattern| pattern.as_ref().to_lowercase())
        .collect();

    remove_folded(tree, &folded)
}

fn remove_folded(tree: &Value, folded: &[String]) -> Value {
    match tree {
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => tree.clone(),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| remove_folded(item, folded))
                .collect(),
        ),
        Value::Object(fields) => {
            let mut cleaned = Map::with_capacity(fields.len());
            for (key, value) in fields {
                let key_folded = key.to_lowercase();
                if folded
                    .iter()
                    .any(|pattern| key_folded.contains(pattern.as_str()))
                {
                    continue;
                }
                cleaned.insert(key.clone(), remove_folded(value, folded));
            }
            Value::Object(cleaned)
        }
    }
}

/// Keeps only the paths that lead to, or descend from, a key in `allowlist`.
///
/// The value under an allowlisted key is kept verbatim. Everything that is not on
/// such a path is pruned, and containers left without content are pruned too.
/// `None` means nothing in the tree qualified, which is different from an empty
/// container: callers should drop the branch rather than keep `{}` or `[]`.
pub fn project_by_allowlist(tree: &Value, allowlist: &HashSet<String>) -> Option<Value> {
    project(tree, allowlist, false)
}

// `inherited` is true when some ancestor key was allowlisted
fn project(tree: &Value, allowlist: &HashSet<String>, inherited: bool) -> Option<Value> {
    if inherited {
        return Some(tree.clone());
    }

    match tree {
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => None,
        Value::Array(items) => {
            let kept: Vec<Value> = items
                .iter()
                .filter_map(|item| project(item, allowlist, false))
                .collect();

            if kept.is_empty() {
                None
            } else {
                Some(Value::Array(kept))
            }
        }
        Value::Object(fields) => {
            let mut kept = Map::new();
            for (key, value) in fields {
                let child_inherited = allowlist.contains(key);
                if let Some(projected) = project(value, allowlist, child_inherited) {
                    kept.insert(key.clone(), projected);
                }
            }

            if kept.is_empty() {
                None
            } else {
                Some(Value::Object(kept))
            }
        }
    }
}

// Helper for building an allowlist from CLI flags or config
pub fn allowlist_from<I, S>(keys: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    keys.into_iter().map(Into::into).collect()
}
