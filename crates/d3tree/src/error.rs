use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
    /// The data matched none of the accepted input shapes.
    #[error(
        "unsupported input: expected a treemap aggregation, JSON text/resource or nested object/array, got {received}"
    )]
    UnsupportedInput { received: String },

    /// JSON text or resource could not be read or parsed, or an aggregation
    /// table was not made of row objects.
    #[error("invalid data from {input}: {source}")]
    DataFormat {
        input: String,
        #[source]
        source: BoxError,
    },

    #[error("serde_json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn data_format(input: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Error::DataFormat {
            input: input.into(),
            source: source.into(),
        }
    }

    pub(crate) fn unsupported(received: impl Into<String>) -> Self {
        Error::UnsupportedInput {
            received: received.into(),
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
