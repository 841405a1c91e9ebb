//! Two-phase orchestration for editing a pipeline command.
//!
//! Phase 1 (`PluginEditor::new`) decodes and validates the existing
//! definition before any editing resource is acquired, so malformed or
//! too-complex pipelines surface as immediate failures instead of
//! corrupting an edit session. Phase 2 (`edit`) hands the decoded pipeline
//! to the restricted-editor collaborator and maps its result.

use crate::codec;
use crate::error::{Error, Result};
use crate::pipeline::Pipeline;
use crate::settings::CommandDefinition;

/// Result of a completed edit session.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    Saved(CommandDefinition),
    Cancelled,
}

/// The external restricted editing surface. It can only represent simple
/// pipelines: one base plugin followed by at most one of each refinement.
pub trait SimpleCommandEditor {
    /// Present the editor for the given pipeline. Returns the updated
    /// definition, or `None` when the user cancels.
    fn edit(
        &mut self,
        pipeline: &Pipeline,
        existing: Option<&CommandDefinition>,
    ) -> Result<Option<CommandDefinition>>;
}

#[derive(Debug)]
pub struct PluginEditor {
    pipeline: Pipeline,
    existing: Option<CommandDefinition>,
}

impl PluginEditor {
    /// Phase 1: decode and validate. No prior definition starts a blank,
    /// editable pipeline. An existing definition must decode and be simple;
    /// a non-simple pipeline is refused with `PipelineTooComplex` rather
    /// than routed to an advanced editor that does not exist.
    pub fn new(existing: Option<CommandDefinition>) -> Result<Self> {
        let pipeline = match &existing {
            None => Pipeline::default(),
            Some(definition) => {
                let pipeline = codec::decode_pipeline(&definition.elements)?;
                if !pipeline.is_simple() {
                    return Err(Error::PipelineTooComplex);
                }
                pipeline
            }
        };
        Ok(Self { pipeline, existing })
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Phase 2: delegate to the restricted editor. Only reachable when
    /// phase 1 succeeded.
    pub fn edit(self, editor: &mut dyn SimpleCommandEditor) -> Result<EditOutcome> {
        match editor.edit(&self.pipeline, self.existing.as_ref())? {
            Some(definition) => Ok(EditOutcome::Saved(definition)),
            None => Ok(EditOutcome::Cancelled),
        }
    }
}
