use clap::Args;
use serde::Serialize;

use pathpipe::{codec, executor, log_status, plugin, settings, Error};

use super::CmdResult;

#[derive(Args)]
pub struct ApplyArgs {
    /// Source path to transform
    pub path: String,

    /// Stored command ID to apply
    #[arg(long, conflicts_with = "elements")]
    pub command: Option<String>,

    /// Encoded pipeline elements to apply directly
    #[arg(long)]
    pub elements: Option<String>,

    /// Copy the result to the clipboard
    #[arg(long)]
    pub copy: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyOutput {
    pub input: String,
    pub output: String,
    pub copied: bool,
}

pub fn run(args: ApplyArgs, _global: &super::GlobalArgs) -> CmdResult<ApplyOutput> {
    let settings = settings::load()?;

    let encoded = match (&args.command, &args.elements) {
        (Some(id), _) => settings
            .find(id)
            .ok_or_else(|| Error::CommandNotFound(id.clone()))?
            .elements
            .clone(),
        (None, Some(elements)) => elements.clone(),
        (None, None) => {
            return Err(Error::Validation(
                "either --command or --elements is required".to_string(),
            ))
        }
    };

    let pipeline = codec::decode_pipeline(&encoded)?;
    let registry = plugin::build_registry(&settings.commands)?;
    let output = executor::run(&pipeline, &args.path, &registry)?;

    let copied = if args.copy {
        copy_to_clipboard(&output)?;
        log_status!("apply", "Copied result to clipboard");
        true
    } else {
        false
    };

    Ok((
        ApplyOutput {
            input: args.path,
            output,
            copied,
        },
        0,
    ))
}

fn copy_to_clipboard(text: &str) -> pathpipe::Result<()> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| Error::Clipboard(e.to_string()))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| Error::Clipboard(e.to_string()))
}
