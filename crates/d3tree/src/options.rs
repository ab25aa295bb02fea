use serde::{Deserialize, Serialize};

/// Root label used for aggregation inputs when no `rootname` is given.
pub const DEFAULT_ROOTNAME: &str = "root";

/// A piece of text handed to the rendering side, tagged with how it is meant
/// to be read there. Neither variant is parsed or run by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "source", rename_all = "camelCase")]
pub enum Snippet {
    /// Plain string value.
    Literal(String),
    /// JavaScript source the widget evaluates, as a one-argument function
    /// receiving the clicked node's data.
    Executable(String),
}

impl Snippet {
    pub fn js(source: impl Into<String>) -> Self {
        Snippet::Executable(source.into())
    }

    pub fn source(&self) -> &str {
        match self {
            Snippet::Literal(s) | Snippet::Executable(s) => s,
        }
    }

    pub fn is_executable(&self) -> bool {
        matches!(self, Snippet::Executable(_))
    }

    /// Tag as executable; already-executable snippets come back unchanged.
    pub fn into_executable(self) -> Self {
        match self {
            Snippet::Literal(s) => Snippet::Executable(s),
            exec @ Snippet::Executable(_) => exec,
        }
    }
}

// Accepts either a bare string (a literal) or the tagged form produced by
// `Serialize`.
impl<'de> Deserialize<'de> for Snippet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(tag = "kind", content = "source", rename_all = "camelCase")]
        enum Tagged {
            Literal(String),
            Executable(String),
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Plain(String),
            Tagged(Tagged),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Plain(s) | Repr::Tagged(Tagged::Literal(s)) => Snippet::Literal(s),
            Repr::Tagged(Tagged::Executable(s)) => Snippet::Executable(s),
        })
    }
}

impl From<&str> for Snippet {
    fn from(s: &str) -> Self {
        Snippet::Literal(s.to_string())
    }
}

impl From<String> for Snippet {
    fn from(s: String) -> Self {
        Snippet::Literal(s)
    }
}

/// Arguments of a normalize call. Field names other than `rootname` are
/// forwarded verbatim into [`RenderOptions`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NormalizeOptions {
    /// Label of the synthetic root for aggregation inputs
    /// (falls back to [`DEFAULT_ROOTNAME`]).
    pub rootname: Option<String>,
    /// Field holding the cell label.
    pub celltext: String,
    /// Field holding the node identifier.
    pub id: String,
    /// Field holding the numeric size.
    pub value_field: String,
    pub click_action: Option<Snippet>,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            rootname: None,
            celltext: String::from("name"),
            id: String::from("id"),
            value_field: String::from("size"),
            click_action: None,
        }
    }
}

impl NormalizeOptions {
    pub fn rootname(&self) -> &str {
        self.rootname.as_deref().unwrap_or(DEFAULT_ROOTNAME)
    }

    pub(crate) fn render_options(&self) -> RenderOptions {
        RenderOptions {
            celltext: self.celltext.clone(),
            id: self.id.clone(),
            value_field: self.value_field.clone(),
            click_action: self.click_action.clone().map(Snippet::into_executable),
        }
    }
}

/// The `options` block of a payload, as read by the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub celltext: String,
    pub id: String,
    pub value_field: String,
    pub click_action: Option<Snippet>,
}

impl Serialize for RenderOptions {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let len = if self.click_action.is_some() { 4 } else { 3 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("celltext", &self.celltext)?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("valueField", &self.value_field)?;
        // The widget side learns which strings to evaluate from the envelope's
        // `evals` list, so the snippet itself travels as a bare string.
        if let Some(action) = &self.click_action {
            map.serialize_entry("clickAction", action.source())?;
        }
        map.end()
    }
}
