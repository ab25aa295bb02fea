use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::value::RawValue;
use serde_json::{Map, Value};

use crate::legend::LegendEntry;
use crate::options::RenderOptions;
use crate::Result;

/// Tree data handed to the widget.
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadData {
    /// Structured tree (aggregation and nested inputs).
    Tree(Value),
    /// Canonical JSON text (JSON inputs), embedded verbatim on serialization.
    Encoded(String),
}

impl PayloadData {
    /// The data as a JSON value, parsing encoded text if needed.
    pub fn to_value(&self) -> Result<Value> {
        match self {
            PayloadData::Tree(v) => Ok(v.clone()),
            PayloadData::Encoded(s) => Ok(serde_json::from_str(s)?),
        }
    }

    pub fn as_encoded(&self) -> Option<&str> {
        match self {
            PayloadData::Encoded(s) => Some(s),
            PayloadData::Tree(_) => None,
        }
    }
}

impl Serialize for PayloadData {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        match self {
            PayloadData::Tree(v) => v.serialize(serializer),
            PayloadData::Encoded(s) => {
                let raw = RawValue::from_string(s.clone()).map_err(serde::ser::Error::custom)?;
                raw.serialize(serializer)
            }
        }
    }
}

/// Everything the widget needs for one render.
///
/// Serializes as `{"data", "meta"?, "legend"?, "options", "evals"?}`; `evals`
/// lists the members to evaluate as code and is left out when empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    pub data: PayloadData,
    pub meta: Option<Map<String, Value>>,
    pub legend: Option<Vec<LegendEntry>>,
    pub options: RenderOptions,
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        let evals = self.evals();
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("data", &self.data)?;
        if let Some(meta) = &self.meta {
            map.serialize_entry("meta", meta)?;
        }
        if let Some(legend) = &self.legend {
            map.serialize_entry("legend", legend)?;
        }
        map.serialize_entry("options", &self.options)?;
        if !evals.is_empty() {
            map.serialize_entry("evals", &evals)?;
        }
        map.end()
    }
}

impl Payload {
    /// Dotted paths of payload members the widget must evaluate as code.
    pub fn evals(&self) -> Vec<&'static str> {
        match &self.options.click_action {
            Some(action) if action.is_executable() => vec!["options.clickAction"],
            _ => Vec::new(),
        }
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_string_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
