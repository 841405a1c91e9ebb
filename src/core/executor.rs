//! Pipeline execution: the host's "get transformed path" contract.

use crate::element::PipelineElement;
use crate::error::{Error, Result};
use crate::pipeline::Pipeline;
use crate::plugin::PluginRegistry;

/// Fold the pipeline over the input path, left to right. `ApplyPlugin`
/// elements delegate to the registry; an unknown plugin id fails
/// immediately with `UnresolvedPlugin`. Execution never retries since the
/// transformation is deterministic for a given input.
pub fn run(pipeline: &Pipeline, input: &str, registry: &PluginRegistry) -> Result<String> {
    let mut path = input.to_string();
    for element in pipeline.elements() {
        path = match element {
            PipelineElement::ApplyPlugin { plugin_id } => {
                let plugin = registry
                    .resolve(plugin_id)
                    .ok_or_else(|| Error::UnresolvedPlugin(plugin_id.clone()))?;
                plugin.get_path(&path)?
            }
            other => other.apply(&path),
        };
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elements_apply_in_sequence_order() {
        let pipeline = Pipeline::new(vec![
            PipelineElement::Uppercase,
            PipelineElement::AppendSuffix {
                suffix: ".bak".to_string(),
            },
        ]);
        let registry = PluginRegistry::with_builtins();
        let output = run(&pipeline, "C:\\a\\b", &registry).unwrap();
        assert_eq!(output, "C:\\A\\B.bak");
    }

    #[test]
    fn empty_pipeline_returns_the_input_unchanged() {
        let registry = PluginRegistry::with_builtins();
        assert_eq!(run(&Pipeline::default(), "/a/b", &registry).unwrap(), "/a/b");
    }

    #[test]
    fn unresolved_plugin_is_reported_not_swallowed() {
        let pipeline = Pipeline::new(vec![PipelineElement::ApplyPlugin {
            plugin_id: "missing".to_string(),
        }]);
        let registry = PluginRegistry::with_builtins();
        let err = run(&pipeline, "/a/b", &registry).unwrap_err();
        assert!(matches!(err, Error::UnresolvedPlugin(id) if id == "missing"));
    }

    #[test]
    fn apply_plugin_delegates_to_the_registry() {
        let pipeline = Pipeline::new(vec![
            PipelineElement::ApplyPlugin {
                plugin_id: "file-name".to_string(),
            },
            PipelineElement::Quotes,
        ]);
        let registry = PluginRegistry::with_builtins();
        let output = run(&pipeline, "/home/me/report.txt", &registry).unwrap();
        assert_eq!(output, "\"report.txt\"");
    }
}
