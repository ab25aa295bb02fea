//! Turns any accepted input into a widget [`Payload`].

use serde_json::Value;

use crate::hierarchy::{self, FieldNames};
use crate::input::{Aggregation, Input, JsonSource};
use crate::options::NormalizeOptions;
use crate::payload::{Payload, PayloadData};
use crate::{Result, canonical, legend};

pub fn normalize(input: Input, opts: &NormalizeOptions) -> Result<Payload> {
    tracing::debug!(kind = input.kind(), "normalizing input");
    let (data, meta, legend) = match input {
        Input::Aggregation(agg) => from_aggregation(agg, opts),
        Input::Json(source) => (from_json(source)?, None, None),
        Input::Nested(tree) => (PayloadData::Tree(tree), None, None),
    };
    Ok(Payload {
        data,
        meta,
        legend,
        options: opts.render_options(),
    })
}

/// Classify untyped data with [`Input::from_value`], then normalize it.
pub fn normalize_value(value: Value, opts: &NormalizeOptions) -> Result<Payload> {
    normalize(Input::from_value(value)?, opts)
}

type Parts = (
    PayloadData,
    Option<serde_json::Map<String, Value>>,
    Option<Vec<legend::LegendEntry>>,
);

fn from_aggregation(agg: Aggregation, opts: &NormalizeOptions) -> Parts {
    let tree = hierarchy::from_aggregation(&agg, opts.rootname());
    let fields = FieldNames {
        celltext: &opts.celltext,
        id: &opts.id,
        value: &opts.value_field,
    };
    if fields.celltext == fields.id || fields.value == fields.celltext || fields.value == fields.id {
        tracing::warn!(
            celltext = fields.celltext,
            id = fields.id,
            value_field = fields.value,
            "node field names overlap; the identifier overrides the label and the value overrides both"
        );
    }
    let legend = legend::from_meta(&agg.meta);
    (PayloadData::Tree(tree.to_value(fields)), Some(agg.meta), legend)
}

fn from_json(source: JsonSource) -> Result<PayloadData> {
    let v = source.parse()?;
    Ok(PayloadData::Encoded(canonical::to_canonical_string(&v)?))
}
