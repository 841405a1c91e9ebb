use clap::{Args, Subcommand};
use serde::Serialize;

use pathpipe::{plugin, settings, PathPlugin};

use super::CmdResult;

#[derive(Args)]
pub struct PluginArgs {
    #[command(subcommand)]
    command: PluginCommand,
}

#[derive(Subcommand)]
enum PluginCommand {
    /// List registered plugins (builtins and stored pipeline commands)
    List,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginListOutput {
    pub plugins: Vec<PluginSummary>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginSummary {
    pub id: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_position: Option<u32>,
}

pub fn run(args: PluginArgs, _global: &super::GlobalArgs) -> CmdResult<PluginListOutput> {
    match args.command {
        PluginCommand::List => {
            let settings = settings::load()?;
            let registry = plugin::build_registry(&settings.commands)?;
            let plugins = registry
                .plugins()
                .iter()
                .map(|p| PluginSummary {
                    id: p.id().to_string(),
                    description: p.description(),
                    help_text: p.help_text(),
                    group_id: p.group_id(),
                    group_position: p.group_position(),
                })
                .collect();

            Ok((PluginListOutput { plugins }, 0))
        }
    }
}
