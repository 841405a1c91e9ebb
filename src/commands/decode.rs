use clap::Args;
use serde::Serialize;

use pathpipe::{codec, Pipeline};

use super::CmdResult;

#[derive(Args)]
pub struct DecodeArgs {
    /// Encoded pipeline elements to inspect
    #[arg(long)]
    pub elements: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodeOutput {
    pub pipeline: Pipeline,
    pub count: usize,
    pub simple: bool,
    /// Canonical re-encoding of the decoded pipeline
    pub encoded: String,
}

pub fn run(args: DecodeArgs, _global: &super::GlobalArgs) -> CmdResult<DecodeOutput> {
    let pipeline = codec::decode_pipeline(&args.elements)?;
    let encoded = codec::encode_pipeline(&pipeline);
    let count = pipeline.len();
    let simple = pipeline.is_simple();

    Ok((
        DecodeOutput {
            pipeline,
            count,
            simple,
            encoded,
        },
        0,
    ))
}
