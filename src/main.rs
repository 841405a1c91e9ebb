use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{apply, command, decode, plugin, GlobalArgs};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "pathpipe")]
#[command(version = VERSION)]
#[command(about = "Composable copy-path pipelines exposed as host plugins")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage stored pipeline commands
    #[command(visible_alias = "commands")]
    Command(command::CommandArgs),
    /// Apply a pipeline to a source path
    Apply(apply::ApplyArgs),
    /// Decode an encoded pipeline for inspection
    Decode(decode::DecodeArgs),
    /// Inspect registered plugins
    Plugin(plugin::PluginArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let global = GlobalArgs {};

    let (result, exit_code) = match cli.command {
        Commands::Command(args) => to_json(command::run(args, &global)),
        Commands::Apply(args) => to_json(apply::run(args, &global)),
        Commands::Decode(args) => to_json(decode::run(args, &global)),
        Commands::Plugin(args) => to_json(plugin::run(args, &global)),
    };

    output::print_result(result);
    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn to_json<T: serde::Serialize>(
    result: commands::CmdResult<T>,
) -> (pathpipe::Result<serde_json::Value>, i32) {
    match result {
        Ok((data, exit_code)) => match serde_json::to_value(data) {
            Ok(value) => (Ok(value), exit_code),
            Err(err) => (Err(pathpipe::Error::Json(err)), 1),
        },
        Err(err) => {
            let exit_code = output::exit_code_for_error(&err);
            (Err(err), exit_code)
        }
    }
}

fn exit_code_to_u8(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}
