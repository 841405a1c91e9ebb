use thiserror::Error;

use crate::element::DecodeError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed pipeline element at position {position}: {source}")]
    PipelineDecode {
        position: usize,
        #[source]
        source: DecodeError,
    },

    #[error("Pipeline is too complex for the restricted editor")]
    PipelineTooComplex,

    #[error("Plugin not found: {0}")]
    UnresolvedPlugin(String),

    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn code(&self) -> &'static str {
        match self {
            Error::PipelineDecode { .. } => "PIPELINE_DECODE_ERROR",
            Error::PipelineTooComplex => "PIPELINE_TOO_COMPLEX",
            Error::UnresolvedPlugin(_) => "PLUGIN_NOT_FOUND",
            Error::CommandNotFound(_) => "COMMAND_NOT_FOUND",
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Clipboard(_) => "CLIPBOARD_ERROR",
            Error::Io(_) => "IO_ERROR",
            Error::Json(_) => "JSON_ERROR",
        }
    }
}
