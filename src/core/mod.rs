// Public modules
pub mod codec;
pub mod editor;
pub mod element;
pub mod error;
pub mod executor;
pub mod pipeline;
pub mod plugin;
pub mod settings;

// Internal modules - not part of public API
pub(crate) mod paths;

// Re-export common types for convenience
pub use editor::{EditOutcome, PluginEditor, SimpleCommandEditor};
pub use element::{DecodeError, ElementKind, PipelineElement};
pub use error::{Error, Result};
pub use pipeline::Pipeline;
pub use plugin::{PathPlugin, PluginRegistry};
pub use settings::{CommandDefinition, Settings};
