use clap::{Args, Subcommand};
use serde::Serialize;

use pathpipe::{
    codec, log_status, settings, CommandDefinition, Error, PluginEditor,
};

use super::CmdResult;

#[derive(Args)]
pub struct CommandArgs {
    #[command(subcommand)]
    command: CommandCommand,
}

#[derive(Subcommand)]
enum CommandCommand {
    /// Create a new pipeline command
    Create {
        /// Display name for the command
        #[arg(long)]
        name: String,

        /// Encoded pipeline elements (e.g. "apply,long-path;quotes")
        #[arg(long)]
        elements: String,

        /// Command ID (generated when omitted)
        #[arg(long)]
        id: Option<String>,

        /// Optional help text
        #[arg(long)]
        description: Option<String>,

        /// Menu group ID
        #[arg(long)]
        group_id: Option<u32>,

        /// Position within the menu group
        #[arg(long)]
        group_position: Option<u32>,

        /// Regex on the file name gating the enabled predicate
        #[arg(long)]
        file_filter: Option<String>,
    },
    /// List stored pipeline commands
    List,
    /// Display one stored command with its decoded elements
    Show {
        /// Command ID
        id: String,
    },
    /// Update fields of a stored command
    #[command(visible_alias = "edit")]
    Set {
        /// Command ID
        id: String,

        #[arg(long)]
        name: Option<String>,

        /// Replacement encoded pipeline elements
        #[arg(long)]
        elements: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        group_id: Option<u32>,

        #[arg(long)]
        group_position: Option<u32>,

        #[arg(long)]
        file_filter: Option<String>,
    },
    /// Remove a stored command
    Remove {
        /// Command ID
        id: String,
    },
    /// Report whether a stored command is editable by the restricted editor
    Check {
        /// Command ID
        id: String,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandOutput {
    pub command: String,
    #[serde(flatten)]
    pub result: serde_json::Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CommandSummary {
    id: String,
    name: String,
    elements: String,
    simple: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckOutput {
    id: String,
    editable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

pub fn run(args: CommandArgs, _global: &super::GlobalArgs) -> CmdResult<CommandOutput> {
    match args.command {
        CommandCommand::Create {
            name,
            elements,
            id,
            description,
            group_id,
            group_position,
            file_filter,
        } => {
            let definition = CommandDefinition {
                id: id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                name,
                description,
                elements,
                group_id,
                group_position,
                file_filter,
            };
            validate_definition(&definition)?;

            let mut settings = settings::load()?;
            if settings.find(&definition.id).is_some() {
                return Err(Error::Validation(format!(
                    "command '{}' already exists; use 'command set' to modify it",
                    definition.id
                )));
            }
            settings.upsert(definition.clone());
            settings::save(&settings)?;
            log_status!("command", "Created {}", definition.id);

            output("command.create", serde_json::to_value(&definition)?)
        }
        CommandCommand::List => {
            let settings = settings::load()?;
            let commands: Vec<CommandSummary> = settings
                .commands
                .iter()
                .map(|def| CommandSummary {
                    id: def.id.clone(),
                    name: def.name.clone(),
                    elements: def.elements.clone(),
                    simple: codec::decode_pipeline(&def.elements)
                        .map(|p| p.is_simple())
                        .unwrap_or(false),
                })
                .collect();
            output("command.list", serde_json::json!({ "commands": commands }))
        }
        CommandCommand::Show { id } => {
            let settings = settings::load()?;
            let definition = settings
                .find(&id)
                .ok_or_else(|| Error::CommandNotFound(id.clone()))?;
            let pipeline = codec::decode_pipeline(&definition.elements)?;
            let simple = pipeline.is_simple();

            output(
                "command.show",
                serde_json::json!({
                    "definition": definition,
                    "pipeline": pipeline,
                    "simple": simple,
                }),
            )
        }
        CommandCommand::Set {
            id,
            name,
            elements,
            description,
            group_id,
            group_position,
            file_filter,
        } => {
            let mut settings = settings::load()?;
            let mut definition = settings
                .find(&id)
                .ok_or_else(|| Error::CommandNotFound(id.clone()))?
                .clone();

            if let Some(name) = name {
                definition.name = name;
            }
            if let Some(elements) = elements {
                definition.elements = elements;
            }
            if let Some(description) = description {
                definition.description = Some(description);
            }
            if let Some(group_id) = group_id {
                definition.group_id = Some(group_id);
            }
            if let Some(group_position) = group_position {
                definition.group_position = Some(group_position);
            }
            if let Some(file_filter) = file_filter {
                definition.file_filter = Some(file_filter);
            }
            validate_definition(&definition)?;

            settings.upsert(definition.clone());
            settings::save(&settings)?;
            log_status!("command", "Updated {}", definition.id);

            output("command.set", serde_json::to_value(&definition)?)
        }
        CommandCommand::Remove { id } => {
            let mut settings = settings::load()?;
            if !settings.remove(&id) {
                return Err(Error::CommandNotFound(id));
            }
            settings::save(&settings)?;
            log_status!("command", "Removed {}", id);

            output("command.remove", serde_json::json!({ "id": id }))
        }
        CommandCommand::Check { id } => {
            let settings = settings::load()?;
            let definition = settings
                .find(&id)
                .ok_or_else(|| Error::CommandNotFound(id.clone()))?
                .clone();

            let result = match PluginEditor::new(Some(definition)) {
                Ok(_) => CheckOutput {
                    id,
                    editable: true,
                    reason: None,
                },
                Err(err @ Error::PipelineTooComplex) => CheckOutput {
                    id,
                    editable: false,
                    reason: Some(err.to_string()),
                },
                Err(err) => return Err(err),
            };
            output("command.check", serde_json::to_value(&result)?)
        }
    }
}

/// Eager validation: the elements must decode and the file filter must
/// compile before anything is persisted.
fn validate_definition(definition: &CommandDefinition) -> pathpipe::Result<()> {
    if definition.name.trim().is_empty() {
        return Err(Error::Validation("command name must not be empty".to_string()));
    }
    codec::decode_pipeline(&definition.elements)?;
    if let Some(pattern) = &definition.file_filter {
        regex::Regex::new(pattern)
            .map_err(|e| Error::Validation(format!("invalid file filter: {}", e)))?;
    }
    Ok(())
}

fn output(command: &str, result: serde_json::Value) -> CmdResult<CommandOutput> {
    Ok((
        CommandOutput {
            command: command.to_string(),
            result,
        },
        0,
    ))
}
