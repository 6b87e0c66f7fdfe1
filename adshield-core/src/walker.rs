//! JSON tree traversal
//!
//! Visits every object key at every depth of a decoded JSON value and hands
//! the visitor a dotted path for it (`data.result.ads`). Array elements are
//! descended with their index as the path segment (`data.list.0.type`), but an
//! index is never presented to the visitor as a key.

use serde_json::Value;

/// Visit every object key in `value`, depth-first, in each object's own key order.
pub fn walk<'a, F>(value: &'a Value, visitor: &mut F)
where
    F: FnMut(&'a str, &str, &'a Value),
{
    walk_at(value, "", visitor);
}

/// Walk `value` and collect whatever the visitor chooses to emit.
pub fn walk_collect<'a, T, F>(value: &'a Value, mut select: F) -> Vec<T>
where
    F: FnMut(&'a str, &str, &'a Value) -> Option<T>,
{
    let mut out = Vec::new();
    walk(value, &mut |key, path, child| {
        if let Some(item) = select(key, path, child) {
            out.push(item);
        }
    });
    out
}

fn walk_at<'a, F>(value: &'a Value, prefix: &str, visitor: &mut F)
where
    F: FnMut(&'a str, &str, &'a Value),
{
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = join_path(prefix, key);
                visitor(key.as_str(), &path, child);
                walk_at(child, &path, visitor);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                walk_at(child, &join_path(prefix, &index.to_string()), visitor);
            }
        }
        _ => {}
    }
}

fn join_path(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}.{segment}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn paths(value: &Value) -> Vec<String> {
        walk_collect(value, |_, path, _| Some(path.to_string()))
    }

    #[test]
    fn test_walk_visits_nested_keys_in_order() {
        let value = json!({
            "ret": ["SUCCESS"],
            "data": {"result": {"ads": [], "total": 0}, "flag": true}
        });

        assert_eq!(
            paths(&value),
            vec![
                "ret",
                "data",
                "data.result",
                "data.result.ads",
                "data.result.total",
                "data.flag"
            ]
        );
    }

    #[test]
    fn test_walk_descends_into_array_elements_by_index() {
        let value = json!({"data": {"list": [{"type": "ad"}, 3, {"bizType": "x"}]}});

        assert_eq!(
            paths(&value),
            vec!["data", "data.list", "data.list.0.type", "data.list.2.bizType"]
        );
    }

    #[test]
    fn test_walk_scalar_root_visits_nothing() {
        assert!(paths(&json!("plain")).is_empty());
        assert!(paths(&Value::Null).is_empty());
    }

    #[test]
    fn test_walk_top_level_array() {
        let value = json!([{"a": 1}]);
        assert_eq!(paths(&value), vec!["0.a"]);
    }

    #[test]
    fn test_walk_passes_key_and_value() {
        let value = json!({"outer": {"splash": null}});
        let mut seen = Vec::new();
        walk(&value, &mut |key, path, child| {
            seen.push((key.to_string(), path.to_string(), child.is_null()));
        });

        assert_eq!(
            seen,
            vec![
                ("outer".to_string(), "outer".to_string(), false),
                ("splash".to_string(), "outer.splash".to_string(), true),
            ]
        );
    }
}
