//! The host-facing plugin contract and the registry that resolves ids.
//!
//! A plugin exposes a description, optional help text, menu group hints, an
//! enabled predicate per invocation context, and the path transformation
//! itself. Stored pipeline commands are adapted onto the same contract by
//! `PipelinePlugin`, so the host cannot tell them apart from builtins.

use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;

use crate::codec;
use crate::error::{Error, Result};
use crate::executor;
use crate::pipeline::Pipeline;
use crate::settings::CommandDefinition;

pub trait PathPlugin: Send + Sync {
    fn id(&self) -> &str;

    /// Short human-readable description, shown as the menu caption.
    fn description(&self) -> String;

    fn help_text(&self) -> Option<String> {
        None
    }

    /// Transform the source path into the text to copy.
    fn get_path(&self, path: &str) -> Result<String>;

    fn group_id(&self) -> Option<u32> {
        None
    }

    fn group_position(&self) -> Option<u32> {
        None
    }

    /// Whether this plugin applies to the given invocation context.
    fn enabled(&self, _parent_path: &str, _file_name: &str) -> bool {
        true
    }
}

/// Plugins keyed by id. Registration replaces an existing id, so stored
/// commands can shadow a builtin of the same name.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    plugins: HashMap<String, Arc<dyn PathPlugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with the builtin base plugins.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(LongPathPlugin));
        registry.register(Arc::new(FileNamePlugin));
        registry.register(Arc::new(ParentPathPlugin));
        registry
    }

    pub fn register(&mut self, plugin: Arc<dyn PathPlugin>) {
        self.plugins.insert(plugin.id().to_string(), plugin);
    }

    pub fn resolve(&self, id: &str) -> Option<Arc<dyn PathPlugin>> {
        self.plugins.get(id).cloned()
    }

    /// All registered plugins, sorted by id for stable listings.
    pub fn plugins(&self) -> Vec<Arc<dyn PathPlugin>> {
        let mut plugins: Vec<Arc<dyn PathPlugin>> = self.plugins.values().cloned().collect();
        plugins.sort_by(|a, b| a.id().cmp(b.id()));
        plugins
    }
}

/// Build the full registry: builtins plus one `PipelinePlugin` per stored
/// command. Pipeline commands resolve their `ApplyPlugin` references
/// against the builtin set only; a pipeline is anchored to a concrete base
/// plugin, never to another pipeline.
pub fn build_registry(commands: &[CommandDefinition]) -> Result<PluginRegistry> {
    let base = Arc::new(PluginRegistry::with_builtins());
    let mut registry = (*base).clone();
    for definition in commands {
        let plugin = PipelinePlugin::from_definition(definition.clone(), Arc::clone(&base))?;
        registry.register(Arc::new(plugin));
    }
    Ok(registry)
}

/// Copies the path as-is.
pub struct LongPathPlugin;

impl PathPlugin for LongPathPlugin {
    fn id(&self) -> &str {
        "long-path"
    }

    fn description(&self) -> String {
        "Long path".to_string()
    }

    fn help_text(&self) -> Option<String> {
        Some("Copy the full path of the file or folder".to_string())
    }

    fn get_path(&self, path: &str) -> Result<String> {
        Ok(path.to_string())
    }
}

/// Copies the final path component only.
pub struct FileNamePlugin;

impl PathPlugin for FileNamePlugin {
    fn id(&self) -> &str {
        "file-name"
    }

    fn description(&self) -> String {
        "File name".to_string()
    }

    fn help_text(&self) -> Option<String> {
        Some("Copy the name of the file or folder without its location".to_string())
    }

    fn get_path(&self, path: &str) -> Result<String> {
        let name_start = path.rfind(['/', '\\']).map_or(0, |i| i + 1);
        Ok(path[name_start..].to_string())
    }
}

/// Copies the containing folder's path.
pub struct ParentPathPlugin;

impl PathPlugin for ParentPathPlugin {
    fn id(&self) -> &str {
        "parent-path"
    }

    fn description(&self) -> String {
        "Parent folder path".to_string()
    }

    fn help_text(&self) -> Option<String> {
        Some("Copy the path of the folder containing the file".to_string())
    }

    fn get_path(&self, path: &str) -> Result<String> {
        match path.rfind(['/', '\\']) {
            // Keep the separator for root-level entries ("/file" -> "/")
            Some(0) => Ok(path[..1].to_string()),
            Some(i) => Ok(path[..i].to_string()),
            None => Ok(path.to_string()),
        }
    }
}

/// Adapter exposing a stored pipeline command as a `PathPlugin`. The
/// definition's metadata maps 1:1 onto the plugin contract; `get_path`
/// runs the decoded pipeline through the executor.
pub struct PipelinePlugin {
    definition: CommandDefinition,
    pipeline: Pipeline,
    base: Arc<PluginRegistry>,
    filter: Option<Regex>,
}

impl PipelinePlugin {
    /// Decode the stored elements and compile the enabled filter up front,
    /// so a broken definition surfaces here rather than at menu time.
    pub fn from_definition(
        definition: CommandDefinition,
        base: Arc<PluginRegistry>,
    ) -> Result<Self> {
        let pipeline = codec::decode_pipeline(&definition.elements)?;
        let filter = match &definition.file_filter {
            Some(pattern) => Some(Regex::new(pattern).map_err(|e| {
                Error::Config(format!(
                    "invalid file filter for command '{}': {}",
                    definition.id, e
                ))
            })?),
            None => None,
        };
        Ok(Self {
            definition,
            pipeline,
            base,
            filter,
        })
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }
}

impl PathPlugin for PipelinePlugin {
    fn id(&self) -> &str {
        &self.definition.id
    }

    fn description(&self) -> String {
        self.definition.name.clone()
    }

    fn help_text(&self) -> Option<String> {
        self.definition.description.clone()
    }

    fn get_path(&self, path: &str) -> Result<String> {
        executor::run(&self.pipeline, path, &self.base)
    }

    fn group_id(&self) -> Option<u32> {
        self.definition.group_id
    }

    fn group_position(&self) -> Option<u32> {
        self.definition.group_position
    }

    fn enabled(&self, _parent_path: &str, file_name: &str) -> bool {
        match &self.filter {
            Some(re) => re.is_match(file_name),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(elements: &str) -> CommandDefinition {
        CommandDefinition {
            id: "quoted-path".to_string(),
            name: "Quoted path".to_string(),
            description: Some("Full path in quotes".to_string()),
            elements: elements.to_string(),
            group_id: Some(2),
            group_position: Some(1),
            file_filter: None,
        }
    }

    #[test]
    fn builtin_plugins_transform_paths() {
        let registry = PluginRegistry::with_builtins();
        let file_name = registry.resolve("file-name").unwrap();
        assert_eq!(file_name.get_path("/a/b/c.txt").unwrap(), "c.txt");

        let parent = registry.resolve("parent-path").unwrap();
        assert_eq!(parent.get_path("/a/b/c.txt").unwrap(), "/a/b");
        assert_eq!(parent.get_path("/c.txt").unwrap(), "/");
        assert_eq!(parent.get_path("c.txt").unwrap(), "c.txt");
    }

    #[test]
    fn pipeline_commands_expose_their_metadata() {
        let registry = build_registry(&[definition("apply,long-path;quotes")]).unwrap();
        let plugin = registry.resolve("quoted-path").unwrap();
        assert_eq!(plugin.description(), "Quoted path");
        assert_eq!(plugin.help_text(), Some("Full path in quotes".to_string()));
        assert_eq!(plugin.group_id(), Some(2));
        assert_eq!(plugin.group_position(), Some(1));
        assert_eq!(plugin.get_path("/a/b c").unwrap(), "\"/a/b c\"");
    }

    #[test]
    fn broken_definitions_fail_at_registry_build_time() {
        assert!(build_registry(&[definition("bogus")]).is_err());
    }

    #[test]
    fn file_filter_drives_the_enabled_predicate() {
        let mut def = definition("apply,long-path");
        def.file_filter = Some(r"\.txt$".to_string());
        let registry = build_registry(&[def]).unwrap();
        let plugin = registry.resolve("quoted-path").unwrap();
        assert!(plugin.enabled("/a", "notes.txt"));
        assert!(!plugin.enabled("/a", "notes.md"));
    }

    #[test]
    fn listing_is_sorted_by_id() {
        let registry = PluginRegistry::with_builtins();
        let plugins = registry.plugins();
        let ids: Vec<&str> = plugins.iter().map(|p| p.id()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }
}
