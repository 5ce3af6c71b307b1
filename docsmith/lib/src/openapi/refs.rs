//! `$ref` walking helpers.

use std::collections::HashMap;

use serde_json::Value;

/// Rewrites every `$ref` in `value` whose target is a key of `mapping`.
/// Returns the number of references rewritten.
pub fn rewrite_refs(value: &mut Value, mapping: &HashMap<String, String>) -> usize {
    match value {
        Value::Object(map) => {
            let mut rewritten = 0;
            for (key, child) in map.iter_mut() {
                if key == "$ref" {
                    if let Value::String(target) = child
                        && let Some(replacement) = mapping.get(target.as_str())
                    {
                        *target = replacement.clone();
                        rewritten += 1;
                    }
                } else {
                    rewritten += rewrite_refs(child, mapping);
                }
            }
            rewritten
        }
        Value::Array(items) => items.iter_mut().map(|item| rewrite_refs(item, mapping)).sum(),
        _ => 0,
    }
}

/// Collects every `$ref` string in `value`, in document order.
pub fn collect_refs(value: &Value) -> Vec<String> {
    let mut refs = Vec::new();
    collect_into(value, &mut refs);
    refs
}

fn collect_into(value: &Value, refs: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                match (key.as_str(), child) {
                    ("$ref", Value::String(target)) => refs.push(target.clone()),
                    _ => collect_into(child, refs),
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|item| collect_into(item, refs)),
        _ => {}
    }
}

/// Returns local references (`#/...`) in `document` that do not resolve.
/// External references are ignored.
pub fn dangling_refs(document: &Value) -> Vec<String> {
    let mut dangling: Vec<String> = collect_refs(document)
        .into_iter()
        .filter(|target| {
            target
                .strip_prefix('#')
                .is_some_and(|pointer| document.pointer(pointer).is_none())
        })
        .collect();
    dangling.sort();
    dangling.dedup();
    dangling
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rewrite_refs_replaces_nested_targets() {
        let mut value = json!({
            "type": "array",
            "items": {"$ref": "#/components/schemas/Old"},
            "allOf": [{"$ref": "#/components/schemas/Old"}, {"$ref": "#/components/schemas/Other"}]
        });
        let mapping = HashMap::from([(
            "#/components/schemas/Old".to_string(),
            "#/components/schemas/New".to_string(),
        )]);

        assert_eq!(rewrite_refs(&mut value, &mapping), 2);
        assert_eq!(value["items"]["$ref"], "#/components/schemas/New");
        assert_eq!(value["allOf"][0]["$ref"], "#/components/schemas/New");
        assert_eq!(value["allOf"][1]["$ref"], "#/components/schemas/Other");
    }

    #[test]
    fn dangling_refs_reports_unresolved_local_targets() {
        let document = json!({
            "components": {"schemas": {"Present": {}}},
            "paths": {
                "/a": {"$ref": "#/components/schemas/Present"},
                "/b": {"$ref": "#/components/schemas/Missing"},
                "/c": {"$ref": "https://example.com/spec.json#/Thing"}
            }
        });

        assert_eq!(dangling_refs(&document), vec!["#/components/schemas/Missing"]);
    }
}
