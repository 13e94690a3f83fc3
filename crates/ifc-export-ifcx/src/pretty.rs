// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFCX pretty-printer
//!
//! Two-space indented JSON with three deviations from the usual layout:
//! empty objects print as `{}`, numeric arrays print on one line, and
//! arrays of two or more numeric arrays (coordinate lists, matrices) print
//! on one line too, with `", "` between items. A lone numeric array inside
//! an array keeps the outer array multi-line.

use serde_json::Value;

const INDENT: &str = "  ";

/// Render a JSON document in the IFCX layout
pub fn to_ifcx_string(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value, 0);
    out.push('\n');
    out
}

fn write_value(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Object(map) if map.is_empty() => out.push_str("{}"),
        Value::Object(map) => {
            out.push_str("{\n");
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(",\n");
                }
                indent(out, depth + 1);
                out.push_str(&Value::from(key.as_str()).to_string());
                out.push_str(": ");
                write_value(out, item, depth + 1);
            }
            out.push('\n');
            indent(out, depth);
            out.push('}');
        }
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Array(items) if is_inline(items) => write_inline(out, value),
        Value::Array(items) => {
            out.push_str("[\n");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(",\n");
                }
                indent(out, depth + 1);
                write_value(out, item, depth + 1);
            }
            out.push('\n');
            indent(out, depth);
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

/// Numbers only, or at least two non-empty numeric arrays
fn is_inline(items: &[Value]) -> bool {
    let numeric = |items: &[Value]| items.iter().all(Value::is_number);
    numeric(items)
        || (items.len() >= 2
            && items.iter().all(|item| match item {
                Value::Array(inner) => !inner.is_empty() && numeric(inner),
                _ => false,
            }))
}

fn write_inline(out: &mut String, value: &Value) {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_inline(out, item);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Drop nulls, empty strings, empty arrays and empty objects, recursively
///
/// Returns `None` when nothing is left.
pub fn strip_empty(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::Array(items) => {
            let items: Vec<Value> = items.into_iter().filter_map(strip_empty).collect();
            (!items.is_empty()).then_some(Value::Array(items))
        }
        Value::Object(map) => {
            let map: serde_json::Map<String, Value> = map
                .into_iter()
                .filter_map(|(k, v)| strip_empty(v).map(|v| (k, v)))
                .collect();
            (!map.is_empty()).then_some(Value::Object(map))
        }
        other => Some(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_array_of_arrays_on_one_line() {
        let value = json!([[0, 0, 0], [1, 0, 0], [1, 1, 0]]);
        assert_eq!(to_ifcx_string(&value), "[[0, 0, 0], [1, 0, 0], [1, 1, 0]]\n");
    }

    #[test]
    fn test_single_inner_array_stays_multiline() {
        assert_eq!(to_ifcx_string(&json!([[1, 2]])), "[\n  [1, 2]\n]\n");
        assert_eq!(
            to_ifcx_string(&json!({ "m": [[0.5, 1]] })),
            "{\n  \"m\": [\n    [0.5, 1]\n  ]\n}\n"
        );
    }

    #[test]
    fn test_nested_layout() {
        let value = json!({
            "header": { "id": "a.ifcx" },
            "schemas": {},
            "data": [{ "path": "p", "attributes": { "m": [1.5, -2, 3e-7] } }],
        });
        let expected = "\
{
  \"header\": {
    \"id\": \"a.ifcx\"
  },
  \"schemas\": {},
  \"data\": [
    {
      \"path\": \"p\",
      \"attributes\": {
        \"m\": [1.5, -2, 3e-7]
      }
    }
  ]
}
";
        assert_eq!(to_ifcx_string(&value), expected);
    }

    #[test]
    fn test_mixed_arrays_stay_multiline() {
        let value = json!(["a", 1]);
        assert_eq!(to_ifcx_string(&value), "[\n  \"a\",\n  1\n]\n");
    }

    #[test]
    fn test_strip_empty() {
        let value = json!({
            "path": "p",
            "attributes": { "a": null, "b": [], "c": {}, "d": "", "e": [null] },
        });
        assert_eq!(strip_empty(value), Some(json!({ "path": "p" })));
        assert_eq!(strip_empty(json!({ "x": null })), None);
        assert_eq!(strip_empty(json!(false)), Some(json!(false)));
        assert_eq!(strip_empty(json!(0)), Some(json!(0)));
    }
}
