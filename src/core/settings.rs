//! Persisted pipeline command definitions.
//!
//! The settings store treats each pipeline as an opaque encoded string; it
//! is produced and consumed only by the codec. Writes are atomic (temp
//! file then rename) so a crash never leaves a half-written store.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::paths;

/// The persisted form of one pipeline command: metadata plus the encoded
/// element string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandDefinition {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Encoded pipeline elements; see the codec for the grammar.
    pub elements: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_position: Option<u32>,
    /// Regex matched against the invoked file name; `None` means the
    /// command is enabled everywhere.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_filter: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub commands: Vec<CommandDefinition>,
}

impl Settings {
    pub fn find(&self, id: &str) -> Option<&CommandDefinition> {
        self.commands.iter().find(|c| c.id == id)
    }

    /// Replace the definition with the same id, or append a new one.
    pub fn upsert(&mut self, definition: CommandDefinition) {
        match self.commands.iter_mut().find(|c| c.id == definition.id) {
            Some(existing) => *existing = definition,
            None => self.commands.push(definition),
        }
    }

    /// Remove a definition by id; returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.commands.len();
        self.commands.retain(|c| c.id != id);
        self.commands.len() != before
    }
}

pub fn settings_path() -> Result<PathBuf> {
    paths::settings_file()
}

/// Load settings from the default store; a missing file is an empty store.
pub fn load() -> Result<Settings> {
    load_from(&settings_path()?)
}

pub fn load_from(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| Error::Config(format!("invalid settings file {}: {}", path.display(), e)))
}

pub fn save(settings: &Settings) -> Result<()> {
    save_to(&settings_path()?, settings)
}

pub fn save_to(path: &Path, settings: &Settings) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| Error::Config(format!("settings path has no parent: {}", path.display())))?;
    fs::create_dir_all(parent)?;

    let content = serde_json::to_string_pretty(settings)?;

    // Atomic write: write to temp file, then rename
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, content)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(id: &str) -> CommandDefinition {
        CommandDefinition {
            id: id.to_string(),
            name: format!("Command {}", id),
            description: None,
            elements: "apply,long-path;quotes".to_string(),
            group_id: None,
            group_position: None,
            file_filter: None,
        }
    }

    #[test]
    fn missing_file_loads_as_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_from(&dir.path().join("pathpipe.json")).unwrap();
        assert!(settings.commands.is_empty());
    }

    #[test]
    fn save_and_reload_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("pathpipe.json");

        let mut settings = Settings::default();
        settings.upsert(definition("a"));
        settings.upsert(definition("b"));
        save_to(&path, &settings).unwrap();

        assert_eq!(load_from(&path).unwrap(), settings);
    }

    #[test]
    fn upsert_replaces_by_id() {
        let mut settings = Settings::default();
        settings.upsert(definition("a"));
        let mut updated = definition("a");
        updated.name = "Renamed".to_string();
        settings.upsert(updated);

        assert_eq!(settings.commands.len(), 1);
        assert_eq!(settings.find("a").unwrap().name, "Renamed");
    }

    #[test]
    fn remove_reports_whether_anything_changed() {
        let mut settings = Settings::default();
        settings.upsert(definition("a"));
        assert!(settings.remove("a"));
        assert!(!settings.remove("a"));
    }

    #[test]
    fn corrupt_store_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pathpipe.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(load_from(&path), Err(Error::Config(_))));
    }
}
