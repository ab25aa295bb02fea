#![doc = include_str!("../README.md")]

pub mod canonical;
pub mod error;
pub mod hierarchy;
pub mod input;
pub mod legend;
mod number;
pub mod normalize;
pub mod options;
pub mod payload;
pub mod widget;

pub use crate::error::{Error, Result};
pub use crate::hierarchy::HierarchyNode;
pub use crate::input::{Aggregation, Input, JsonSource};
pub use crate::legend::LegendEntry;
pub use crate::normalize::{normalize, normalize_value};
pub use crate::options::{DEFAULT_ROOTNAME, NormalizeOptions, RenderOptions, Snippet};
pub use crate::payload::{Payload, PayloadData};
pub use crate::widget::{
    BoundWidget, OutputPlaceholder, RenderD3tree, Size, Widget, d3tree, d3tree_output,
    render_d3tree,
};
