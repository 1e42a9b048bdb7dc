//! Structural comparison of serializable model values.
//!
//! Any two values of the same model type are compared through their serde
//! representation, so one routine covers interfaces, processes, policies
//! and whole configurations.

use serde::Serialize;
use serde_json::Value;

/// One difference, addressed by a JSON-pointer-like path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Difference {
    pub path: String,
    pub left: Option<Value>,
    pub right: Option<Value>,
}

/// Compare two values structurally.
///
/// Returns an empty list when they are equal. Objects are compared key by
/// key, arrays element by element; any other mismatch is reported at the
/// deepest common path. Values that fail to serialize compare as `null`.
pub fn structural_diff<T: Serialize + ?Sized>(left: &T, right: &T) -> Vec<Difference> {
    let left = serde_json::to_value(left).unwrap_or(Value::Null);
    let right = serde_json::to_value(right).unwrap_or(Value::Null);
    let mut out = Vec::new();
    diff_values(String::new(), Some(&left), Some(&right), &mut out);
    out
}

/// Whether two values are structurally equal.
pub fn structurally_equal<T: Serialize + ?Sized>(left: &T, right: &T) -> bool {
    structural_diff(left, right).is_empty()
}

fn diff_values(
    path: String,
    left: Option<&Value>,
    right: Option<&Value>,
    out: &mut Vec<Difference>,
) {
    match (left, right) {
        (Some(Value::Object(a)), Some(Value::Object(b))) => {
            for (key, value) in a {
                diff_values(format!("{path}/{key}"), Some(value), b.get(key), out);
            }
            for (key, value) in b {
                if !a.contains_key(key) {
                    diff_values(format!("{path}/{key}"), None, Some(value), out);
                }
            }
        }
        (Some(Value::Array(a)), Some(Value::Array(b))) => {
            for i in 0..a.len().max(b.len()) {
                diff_values(format!("{path}/{i}"), a.get(i), b.get(i), out);
            }
        }
        (a, b) if a == b => {}
        (a, b) => out.push(Difference {
            path: if path.is_empty() { "/".to_string() } else { path },
            left: a.cloned(),
            right: b.cloned(),
        }),
    }
}
