use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use serde::de::IgnoredAny;
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Name of the aggregation table inside a treemap result container. It is
/// also the marker: an object whose first key is `tm` is an aggregation.
pub const AGGREGATION_KEY: &str = "tm";

/// Size column of an aggregation table.
pub const SIZE_COLUMN: &str = "vSize";

/// Depth column of an aggregation table; consumed, not passed through.
pub const LEVEL_COLUMN: &str = "level";

/// Everything `normalize` accepts.
#[derive(Debug)]
pub enum Input {
    /// Precomputed treemap aggregation plus its side metadata.
    Aggregation(Aggregation),
    /// JSON text or a resource holding JSON.
    Json(JsonSource),
    /// Object or array already in the widget's hierarchical shape.
    Nested(Value),
}

impl Input {
    /// Classify untyped data.
    ///
    /// - object whose first key is `tm`: aggregation
    /// - string: JSON text, URL or file path (see [`JsonSource::detect`])
    /// - any other object or array: nested structure
    /// - null, bool, number: [`Error::UnsupportedInput`]
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) if map.keys().next().map(String::as_str) == Some(AGGREGATION_KEY) => {
                Ok(Input::Aggregation(Aggregation::from_container(map)?))
            }
            Value::String(s) => Ok(Input::Json(JsonSource::detect(s))),
            v @ (Value::Object(_) | Value::Array(_)) => Ok(Input::Nested(v)),
            other => Err(Error::unsupported(json_type_name(&other))),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Input::Aggregation(_) => "aggregation",
            Input::Json(_) => "json",
            Input::Nested(_) => "nested",
        }
    }
}

impl From<Aggregation> for Input {
    fn from(a: Aggregation) -> Self {
        Input::Aggregation(a)
    }
}

impl From<JsonSource> for Input {
    fn from(s: JsonSource) -> Self {
        Input::Json(s)
    }
}

impl From<&str> for Input {
    fn from(s: &str) -> Self {
        Input::Json(JsonSource::detect(s))
    }
}

impl From<String> for Input {
    fn from(s: String) -> Self {
        Input::Json(JsonSource::detect(s))
    }
}

pub(crate) fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Where JSON text comes from.
pub enum JsonSource {
    Text(String),
    Path(PathBuf),
    /// `http://` or `https://` location, fetched with a blocking GET.
    Url(String),
    Reader(Box<dyn Read + Send>),
}

impl JsonSource {
    /// Pick a source the way JSON readers usually treat a bare string:
    /// leading `{` or `[` means JSON text, an `http(s)://` prefix means a URL,
    /// any other valid JSON document (`42`, `"x"`, `true`) is text, anything
    /// else is a file path.
    pub fn detect(s: impl Into<String>) -> Self {
        let s = s.into();
        let head = s.trim_start();
        if head.starts_with('{') || head.starts_with('[') {
            JsonSource::Text(s)
        } else if head.starts_with("http://") || head.starts_with("https://") {
            JsonSource::Url(head.trim_end().to_string())
        } else if serde_json::from_str::<IgnoredAny>(&s).is_ok() {
            JsonSource::Text(s)
        } else {
            JsonSource::Path(PathBuf::from(s))
        }
    }

    pub fn reader<R: Read + Send + 'static>(r: R) -> Self {
        JsonSource::Reader(Box::new(r))
    }

    /// Human readable origin used in error messages and logs.
    pub fn describe(&self) -> String {
        match self {
            JsonSource::Text(s) => crate::canonical::describe_text(s),
            JsonSource::Path(p) => format!("file {}", p.display()),
            JsonSource::Url(u) => format!("URL {}", u),
            JsonSource::Reader(_) => String::from("reader"),
        }
    }

    /// Read the whole resource into a string.
    pub fn read_to_string(self) -> Result<String> {
        let origin = self.describe();
        match self {
            JsonSource::Text(s) => Ok(s),
            JsonSource::Path(p) => {
                let mut s = String::new();
                File::open(&p)
                    .and_then(|mut f| f.read_to_string(&mut s))
                    .map_err(|e| Error::data_format(origin, e))?;
                Ok(s)
            }
            JsonSource::Url(u) => fetch(&u).map_err(|e| Error::data_format(origin, e)),
            JsonSource::Reader(mut r) => {
                let mut s = String::new();
                r.read_to_string(&mut s)
                    .map_err(|e| Error::data_format(origin, e))?;
                Ok(s)
            }
        }
    }

    /// Read and parse into a JSON value.
    pub fn parse(self) -> Result<Value> {
        let origin = self.describe();
        let text = self.read_to_string()?;
        serde_json::from_str(&text).map_err(|e| Error::data_format(origin, e))
    }
}

impl fmt::Debug for JsonSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonSource::Text(s) => f.debug_tuple("Text").field(s).finish(),
            JsonSource::Path(p) => f.debug_tuple("Path").field(p).finish(),
            JsonSource::Url(u) => f.debug_tuple("Url").field(u).finish(),
            JsonSource::Reader(_) => f.write_str("Reader(..)"),
        }
    }
}

#[cfg(feature = "fetch")]
fn fetch(url: &str) -> core::result::Result<String, reqwest::Error> {
    tracing::debug!(url, "fetching JSON resource");
    reqwest::blocking::get(url)?.error_for_status()?.text()
}

#[cfg(not(feature = "fetch"))]
fn fetch(_url: &str) -> core::result::Result<String, &'static str> {
    Err("URL sources need the `fetch` feature")
}

/// A treemap aggregation result: one row per leaf or intermediate group.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    /// Grouping-level column names, outermost first.
    pub index: Vec<String>,
    /// Rows of the aggregation table, one object per row.
    pub rows: Vec<Map<String, Value>>,
    /// Every container entry other than the table itself, in container order.
    pub meta: Map<String, Value>,
}

impl Aggregation {
    pub fn new(index: Vec<String>, rows: Vec<Map<String, Value>>) -> Self {
        Self {
            index,
            rows,
            meta: Map::new(),
        }
    }

    pub fn with_meta(mut self, meta: Map<String, Value>) -> Self {
        self.meta = meta;
        self
    }

    /// Split a result container into its table and side metadata.
    ///
    /// Grouping levels come from an `index` entry (array of column names) when
    /// the container has one, otherwise from the columns of the first row that
    /// precede `vSize`. A first row without `vSize` and no `index` is a
    /// [`Error::DataFormat`].
    pub fn from_container(mut container: Map<String, Value>) -> Result<Self> {
        let table = container
            .shift_remove(AGGREGATION_KEY)
            .ok_or_else(|| Error::data_format("treemap aggregation", "missing `tm` table"))?;
        let rows = table_rows(table)?;

        let index = match container.get("index") {
            Some(Value::Array(cols)) => cols
                .iter()
                .map(|c| {
                    c.as_str().map(str::to_string).ok_or_else(|| {
                        Error::data_format("treemap aggregation", "`index` must list column names")
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            Some(Value::String(col)) => vec![col.clone()],
            _ => leading_columns(&rows)?,
        };

        Ok(Self {
            index,
            rows,
            meta: container,
        })
    }
}

fn table_rows(table: Value) -> Result<Vec<Map<String, Value>>> {
    let items = match table {
        Value::Array(items) => items,
        other => {
            return Err(Error::data_format(
                "treemap aggregation",
                format!("`tm` must be an array of row objects, got {}", json_type_name(&other)),
            ));
        }
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, row)| match row {
            Value::Object(m) => Ok(m),
            other => Err(Error::data_format(
                "treemap aggregation",
                format!("row {} of `tm` is {}, not an object", i, json_type_name(&other)),
            )),
        })
        .collect()
}

/// Grouping levels inferred from the first row: the columns before `vSize`.
/// Without a `vSize` column there is no boundary to infer them from.
fn leading_columns(rows: &[Map<String, Value>]) -> Result<Vec<String>> {
    let Some(row) = rows.first() else {
        return Ok(Vec::new());
    };
    if !row.contains_key(SIZE_COLUMN) {
        return Err(Error::data_format(
            "treemap aggregation",
            "first row has no `vSize` column and the container has no `index`",
        ));
    }
    Ok(row
        .keys()
        .take_while(|k| k.as_str() != SIZE_COLUMN)
        .cloned()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detect_sources() {
        assert!(matches!(JsonSource::detect("  {\"a\":1}"), JsonSource::Text(_)));
        assert!(matches!(JsonSource::detect("[1]"), JsonSource::Text(_)));
        assert!(matches!(
            JsonSource::detect("https://example.org/tree.json"),
            JsonSource::Url(_)
        ));
        assert!(matches!(JsonSource::detect("data/tree.json"), JsonSource::Path(_)));
    }

    #[test]
    fn detect_scalar_json_text() {
        for text in ["42", " -1.5e3 ", "\"x\"", "true", "null"] {
            assert!(matches!(JsonSource::detect(text), JsonSource::Text(_)), "{}", text);
        }
        assert!(matches!(JsonSource::detect("tree"), JsonSource::Path(_)));
    }

    #[test]
    fn index_falls_back_to_columns_before_size() -> Result<()> {
        let container = json!({
            "tm": [{"continent": "Asia", "iso3": "CHN", "vSize": 1, "color": "#fff"}],
            "type": "index"
        });
        let Value::Object(map) = container else { unreachable!() };
        let agg = Aggregation::from_container(map)?;
        assert_eq!(agg.index, vec!["continent", "iso3"]);
        assert_eq!(agg.meta.keys().collect::<Vec<_>>(), vec!["type"]);
        Ok(())
    }

    #[test]
    fn explicit_index_wins() -> Result<()> {
        let container = json!({
            "tm": [{"vSize": 1, "region": "North"}],
            "index": ["region"]
        });
        let Value::Object(map) = container else { unreachable!() };
        let agg = Aggregation::from_container(map)?;
        assert_eq!(agg.index, vec!["region"]);
        assert!(agg.meta.contains_key("index"));
        Ok(())
    }

    #[test]
    fn inferred_index_needs_size_column() {
        let container = json!({"tm": [{"continent": "Asia", "pop": 1}]});
        let Value::Object(map) = container else { unreachable!() };
        let err = Aggregation::from_container(map).unwrap_err();
        assert!(matches!(err, Error::DataFormat { .. }));
        assert!(err.to_string().contains("vSize"));

        let container = json!({"tm": [{"continent": "Asia", "pop": 1}], "index": ["continent"]});
        let Value::Object(map) = container else { unreachable!() };
        assert!(Aggregation::from_container(map).is_ok());
    }

    #[test]
    fn empty_table_has_no_levels() -> Result<()> {
        let Value::Object(map) = json!({"tm": []}) else { unreachable!() };
        assert!(Aggregation::from_container(map)?.index.is_empty());
        Ok(())
    }

    #[test]
    fn table_must_hold_objects() {
        let container = json!({"tm": [1, 2]});
        let Value::Object(map) = container else { unreachable!() };
        let err = Aggregation::from_container(map).unwrap_err();
        assert!(matches!(err, Error::DataFormat { .. }));
    }
}
