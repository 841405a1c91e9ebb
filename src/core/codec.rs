//! Encoding between a `Pipeline` and its persisted string form.
//!
//! The encoded form is the only representation that leaves the process, so
//! it must stay backward compatible: old strings keep decoding. Decoding is
//! eager and all-or-nothing; a malformed token fails the whole pipeline
//! with its position, never a partial result.

use crate::element::{self, PipelineElement, ELEMENT_DELIMITER};
use crate::error::{Error, Result};
use crate::pipeline::Pipeline;

/// Decode an encoded element string into a pipeline, preserving order.
/// An empty string decodes to the empty pipeline.
pub fn decode_pipeline(encoded: &str) -> Result<Pipeline> {
    if encoded.is_empty() {
        return Ok(Pipeline::default());
    }

    let mut elements = Vec::new();
    for (position, token) in element::split_escaped(encoded, ELEMENT_DELIMITER)
        .iter()
        .enumerate()
    {
        let decoded = PipelineElement::decode(token)
            .map_err(|source| Error::PipelineDecode { position, source })?;
        elements.push(decoded);
    }
    Ok(Pipeline::new(elements))
}

/// Encode a pipeline as a delimited token string. Total and deterministic
/// for any in-memory pipeline.
pub fn encode_pipeline(pipeline: &Pipeline) -> String {
    let tokens: Vec<String> = pipeline
        .elements()
        .iter()
        .map(PipelineElement::encode)
        .collect();
    tokens.join(&ELEMENT_DELIMITER.to_string())
}
