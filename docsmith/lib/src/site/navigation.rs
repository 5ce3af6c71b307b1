//! Walking the site navigation tree.
//!
//! The tree is an arbitrary nesting of arrays and objects. A page reference
//! is any string directly inside an array; strings held by object keys
//! (group titles, icons, hrefs) are never treated as pages.

use serde_json::Value;

/// Keys whose array holds a group's or tab's children.
const CONTAINER_KEYS: [&str; 3] = ["pages", "groups", "tabs"];

/// Replaces every page reference equal to `from` with `to`, returning how
/// many references changed.
///
/// References are compared without their leading `/`, and a rewritten
/// reference keeps the slash style it had.
pub fn rewrite_page(navigation: &mut Value, from: &str, to: &str) -> usize {
    let from_bare = from.trim_start_matches('/');
    let to_bare = to.trim_start_matches('/');

    match navigation {
        Value::Array(items) => items
            .iter_mut()
            .map(|item| match item {
                Value::String(page) if page.trim_start_matches('/') == from_bare => {
                    *page = if page.starts_with('/') {
                        format!("/{to_bare}")
                    } else {
                        to_bare.to_string()
                    };
                    1
                }
                other => rewrite_page(other, from, to),
            })
            .sum(),
        Value::Object(map) => map
            .values_mut()
            .map(|value| rewrite_page(value, from, to))
            .sum(),
        _ => 0,
    }
}

/// Every page reference in the tree, in document order.
pub fn collect_pages(navigation: &Value) -> Vec<String> {
    let mut pages = Vec::new();
    collect_into(navigation, &mut pages);
    pages
}

fn collect_into(value: &Value, pages: &mut Vec<String>) {
    match value {
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::String(page) => pages.push(page.clone()),
                    other => collect_into(other, pages),
                }
            }
        }
        Value::Object(map) => map.values().for_each(|value| collect_into(value, pages)),
        _ => {}
    }
}

/// Removes groups and tabs left without children, innermost first, and
/// returns how many entries were removed. A group that only held empty
/// groups is removed too.
pub fn prune_empty(navigation: &mut Value) -> usize {
    match navigation {
        Value::Array(items) => {
            let mut removed: usize = items.iter_mut().map(prune_empty).sum();
            let before = items.len();
            items.retain(|item| !is_empty_container(item));
            removed += before - items.len();
            removed
        }
        Value::Object(map) => map.values_mut().map(prune_empty).sum(),
        _ => 0,
    }
}

/// An object whose only child lists are all empty.
fn is_empty_container(value: &Value) -> bool {
    let Some(map) = value.as_object() else {
        return false;
    };
    let mut lists = CONTAINER_KEYS
        .iter()
        .filter_map(|key| map.get(*key))
        .peekable();
    lists.peek().is_some()
        && lists.all(|list| list.as_array().is_some_and(|items| items.is_empty()))
}
