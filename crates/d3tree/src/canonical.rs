//! Canonical JSON encoding expected by the d3tree widget.
//!
//! Two rewrites are applied at every depth:
//! - auto-unboxing: an array holding exactly one scalar (null, bool, number,
//!   string) is replaced by that scalar. A singleton holding an object or an
//!   array is left alone, since a one-row table is still a table.
//! - row-oriented tables: in an array made only of objects, every row is
//!   re-emitted with its keys in the table's column order (union of row keys,
//!   first seen first). Missing cells stay missing.
//!
//! Children are rewritten before their parent, so `[[1]]` collapses to `1`.
//! Numbers pass through untouched and object key order is preserved, so the
//! rewrite is deterministic and idempotent.

use serde_json::{Map, Value};

use crate::{Error, Result};

pub fn canonicalize(v: &Value) -> Value {
    match v {
        Value::Null => Value::Null,
        Value::Bool(b) => Value::Bool(*b),
        Value::Number(n) => Value::Number(n.clone()),
        Value::String(s) => Value::String(s.clone()),
        Value::Array(items) => {
            let items: Vec<Value> = items.iter().map(canonicalize).collect();
            if let [only] = items.as_slice() {
                if is_scalar(only) {
                    return only.clone();
                }
            }
            match table_columns(&items) {
                Some(columns) => Value::Array(
                    items
                        .iter()
                        .filter_map(Value::as_object)
                        .map(|row| Value::Object(reorder_row(row, &columns)))
                        .collect(),
                ),
                None => Value::Array(items),
            }
        }
        Value::Object(m) => {
            let mut out = Map::with_capacity(m.len());
            for (k, vv) in m.iter() {
                out.insert(k.clone(), canonicalize(vv));
            }
            Value::Object(out)
        }
    }
}

/// Column order of a row-oriented table, or `None` when `arr` is empty or
/// holds anything other than objects.
pub fn table_columns(arr: &[Value]) -> Option<Vec<String>> {
    if arr.is_empty() {
        return None;
    }
    let mut columns: Vec<String> = Vec::new();
    for v in arr {
        let obj = v.as_object()?;
        for k in obj.keys() {
            if !columns.iter().any(|c| c == k) {
                columns.push(k.clone());
            }
        }
    }
    Some(columns)
}

pub fn to_canonical_string(v: &Value) -> Result<String> {
    Ok(serde_json::to_string(&canonicalize(v))?)
}

/// Parse JSON text and return its canonical form.
pub fn parse_canonical(s: &str) -> Result<Value> {
    let v: Value = serde_json::from_str(s).map_err(|e| Error::data_format(describe_text(s), e))?;
    Ok(canonicalize(&v))
}

fn is_scalar(v: &Value) -> bool {
    matches!(
        v,
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)
    )
}

fn reorder_row(row: &Map<String, Value>, columns: &[String]) -> Map<String, Value> {
    let mut out = Map::with_capacity(row.len());
    for c in columns {
        if let Some(cell) = row.get(c) {
            out.insert(c.clone(), cell.clone());
        }
    }
    out
}

/// Short, single-line description of JSON text for error messages.
pub(crate) fn describe_text(s: &str) -> String {
    const MAX: usize = 40;
    let flat: String = s
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .take(MAX + 1)
        .collect();
    if flat.chars().count() > MAX {
        let cut: String = flat.chars().take(MAX).collect();
        format!("JSON text `{}...`", cut)
    } else {
        format!("JSON text `{}`", flat)
    }
}
