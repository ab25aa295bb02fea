//! Legend entries derived from the palette metadata of an aggregation.
//!
//! The metadata keys read are `palette` (color strings) and one of
//! `breaks` (numeric, one more than the colors) or `labels` (one per color).

use serde::Serialize;
use serde_json::{Map, Value};

use crate::number::format_plain_f64;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub color: String,
    pub label: String,
    /// Lower and upper bound for numeric palettes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
    /// Category name for categorical palettes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Build the legend, or `None` when there is no usable palette. Malformed
/// palette metadata is logged and treated as absent.
pub fn from_meta(meta: &Map<String, Value>) -> Option<Vec<LegendEntry>> {
    let palette = meta.get("palette")?;
    match build(palette, meta.get("breaks"), meta.get("labels")) {
        Ok(entries) => Some(entries),
        Err(reason) => {
            tracing::warn!(reason, "ignoring malformed palette metadata");
            None
        }
    }
}

fn build(
    palette: &Value,
    breaks: Option<&Value>,
    labels: Option<&Value>,
) -> Result<Vec<LegendEntry>, &'static str> {
    let colors = string_list(palette).ok_or("`palette` must be an array of color strings")?;
    if colors.is_empty() {
        return Err("`palette` is empty");
    }

    if let Some(breaks) = breaks {
        let bounds = number_list(breaks).ok_or("`breaks` must be an array of finite numbers")?;
        if bounds.len() != colors.len() + 1 {
            return Err("`breaks` must have one more entry than `palette`");
        }
        return Ok(colors
            .into_iter()
            .zip(bounds.windows(2))
            .map(|(color, w)| LegendEntry {
                color,
                label: format!("{} - {}", format_plain_f64(w[0]), format_plain_f64(w[1])),
                range: Some([w[0], w[1]]),
                category: None,
            })
            .collect());
    }

    if let Some(labels) = labels {
        let names = string_list(labels).ok_or("`labels` must be an array of strings")?;
        if names.len() != colors.len() {
            return Err("`labels` must have one entry per `palette` color");
        }
        return Ok(colors
            .into_iter()
            .zip(names)
            .map(|(color, name)| LegendEntry {
                color,
                label: name.clone(),
                range: None,
                category: Some(name),
            })
            .collect());
    }

    Err("`palette` needs either `breaks` or `labels`")
}

fn string_list(v: &Value) -> Option<Vec<String>> {
    v.as_array()?
        .iter()
        .map(|s| s.as_str().map(str::to_string))
        .collect()
}

fn number_list(v: &Value) -> Option<Vec<f64>> {
    v.as_array()?
        .iter()
        .map(|n| n.as_f64().filter(|f| f.is_finite()))
        .collect()
}
