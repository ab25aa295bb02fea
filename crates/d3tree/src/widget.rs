//! Hand-off to an htmlwidgets-style host: build a widget, declare an output
//! placeholder, bind a render expression to it.

use std::fmt;

use serde::Serialize;

use crate::input::Input;
use crate::options::NormalizeOptions;
use crate::payload::Payload;
use crate::{Result, normalize};

/// Widget type name the host uses to find the JavaScript binding.
pub const WIDGET_NAME: &str = "d3tree";

/// Element id used when the caller does not pick one.
pub const DEFAULT_ELEMENT_ID: &str = "htmlwidget-d3tree";

/// CSS size of a widget container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Size {
    Px(u32),
    Css(String),
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Size::Px(n) => write!(f, "{}px", n),
            Size::Css(s) => f.write_str(s),
        }
    }
}

impl From<u32> for Size {
    fn from(n: u32) -> Self {
        Size::Px(n)
    }
}

impl From<&str> for Size {
    fn from(s: &str) -> Self {
        match s.parse::<u32>() {
            Ok(n) => Size::Px(n),
            Err(_) => Size::Css(s.to_string()),
        }
    }
}

impl From<String> for Size {
    fn from(s: String) -> Self {
        Size::from(s.as_str())
    }
}

/// A normalized payload registered as a d3tree widget.
#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    pub payload: Payload,
    pub width: Option<Size>,
    pub height: Option<Size>,
    pub element_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a> {
    x: &'a Payload,
    evals: Vec<&'static str>,
    js_hooks: &'static [&'static str],
}

/// Normalize `input` and wrap the result as a widget.
pub fn d3tree(
    input: impl Into<Input>,
    opts: &NormalizeOptions,
    width: Option<Size>,
    height: Option<Size>,
    element_id: Option<String>,
) -> Result<Widget> {
    let payload = normalize(input.into(), opts)?;
    Ok(Widget {
        payload,
        width,
        height,
        element_id,
    })
}

impl Widget {
    pub fn name(&self) -> &'static str {
        WIDGET_NAME
    }

    pub fn element_id(&self) -> &str {
        self.element_id.as_deref().unwrap_or(DEFAULT_ELEMENT_ID)
    }

    /// The JSON envelope the host ships to the page:
    /// `{"x": payload, "evals": [...], "jsHooks": []}`.
    pub fn to_json_string(&self) -> Result<String> {
        let env = Envelope {
            x: &self.payload,
            evals: self.payload.evals(),
            js_hooks: &[],
        };
        Ok(serde_json::to_string(&env)?)
    }

    /// Container element followed by the data script bound to it.
    pub fn to_html(&self) -> Result<String> {
        let id = self.element_id();
        let div = container_div(id, self.width.as_ref(), self.height.as_ref(), "html-widget");
        Ok(format!("{}\n{}", div, data_script(id, &self.to_json_string()?)))
    }
}

/// Output slot declared in a page before any data exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPlaceholder {
    pub output_id: String,
    pub width: Size,
    pub height: Size,
}

/// Declare an output slot; sizes default to `100%` by `400px`.
pub fn d3tree_output(
    output_id: impl Into<String>,
    width: Option<Size>,
    height: Option<Size>,
) -> OutputPlaceholder {
    OutputPlaceholder {
        output_id: output_id.into(),
        width: width.unwrap_or_else(|| Size::Css(String::from("100%"))),
        height: height.unwrap_or(Size::Px(400)),
    }
}

impl OutputPlaceholder {
    pub fn to_html(&self) -> String {
        container_div(
            &self.output_id,
            Some(&self.width),
            Some(&self.height),
            "html-widget-output",
        )
    }
}

/// Payload-producing expression waiting to be bound to a placeholder.
pub struct RenderD3tree<F> {
    expr: F,
}

/// Wrap an expression that produces a widget each time it is evaluated.
pub fn render_d3tree<F>(expr: F) -> RenderD3tree<F>
where
    F: Fn() -> Result<Widget>,
{
    RenderD3tree { expr }
}

impl<F> RenderD3tree<F>
where
    F: Fn() -> Result<Widget>,
{
    /// Evaluate the expression and attach its widget to `placeholder`.
    pub fn bind(&self, placeholder: &OutputPlaceholder) -> Result<BoundWidget> {
        let widget = (self.expr)()?;
        tracing::debug!(output_id = %placeholder.output_id, "bound d3tree render");
        Ok(BoundWidget {
            output_id: placeholder.output_id.clone(),
            widget,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundWidget {
    pub output_id: String,
    pub widget: Widget,
}

impl BoundWidget {
    /// Data script addressed to the placeholder's element.
    pub fn to_html(&self) -> Result<String> {
        Ok(data_script(&self.output_id, &self.widget.to_json_string()?))
    }
}

fn container_div(id: &str, width: Option<&Size>, height: Option<&Size>, class: &str) -> String {
    let mut style = String::new();
    if let Some(w) = width {
        style.push_str(&format!("width:{};", w));
    }
    if let Some(h) = height {
        style.push_str(&format!("height:{};", h));
    }
    format!(
        "<div id=\"{}\" class=\"{} {}\" style=\"{}\"></div>",
        escape_attr(id),
        WIDGET_NAME,
        class,
        escape_attr(&style)
    )
}

fn data_script(id: &str, json: &str) -> String {
    format!(
        "<script type=\"application/json\" data-for=\"{}\">{}</script>",
        escape_attr(id),
        json.replace("</", "<\\/")
    )
}

fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_from_str() {
        assert_eq!(Size::from("640"), Size::Px(640));
        assert_eq!(Size::from("100%").to_string(), "100%");
        assert_eq!(Size::Px(12).to_string(), "12px");
    }

    #[test]
    fn attributes_are_escaped() {
        assert_eq!(escape_attr("a\"<b>&"), "a&quot;&lt;b&gt;&amp;");
    }
}
