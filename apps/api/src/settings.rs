use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::review::{AiModel, AiProvider};

/// Current on-disk settings version. Version 1 files predate the OpenAI default.
pub const SETTINGS_VERSION: u32 = 2;
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Persisted AI preference: which provider and model reviews use by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiSettings {
    /// Files written before versioning carry no version field.
    #[serde(default = "legacy_version")]
    pub version: u32,
    #[serde(default)]
    pub provider: AiProvider,
    #[serde(default = "default_model")]
    pub model: String,
}

fn legacy_version() -> u32 {
    1
}

fn default_model() -> String {
    DEFAULT_OPENAI_MODEL.to_string()
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            provider: AiProvider::OpenAi,
            model: default_model(),
        }
    }
}

impl AiSettings {
    pub fn selected_model(&self) -> AiModel {
        AiModel {
            provider: self.provider,
            model: self.model.clone(),
        }
    }

    pub fn needs_migration(&self) -> bool {
        self.version < SETTINGS_VERSION
    }

    /// Brings legacy settings up to the current version. A legacy Ollama
    /// choice is replaced by the OpenAI default; a legacy OpenAI choice keeps
    /// its model.
    pub fn migrate(self) -> Self {
        if !self.needs_migration() {
            return self;
        }
        match self.provider {
            AiProvider::Ollama => Self::default(),
            AiProvider::OpenAi => Self {
                version: SETTINGS_VERSION,
                ..self
            },
        }
    }

    /// Loads the settings file, creating it with defaults when absent and
    /// rewriting it when a migration applied. Call once at startup.
    pub fn load_or_migrate(path: &Path) -> Result<Self> {
        if !path.exists() {
            let settings = Self::default();
            settings.save(path)?;
            info!(
                "No AI settings at {}, wrote defaults ({} / {})",
                path.display(),
                settings.provider,
                settings.model
            );
            return Ok(settings);
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read AI settings from {}", path.display()))?;
        let stored: AiSettings = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid AI settings in {}", path.display()))?;

        if !stored.needs_migration() {
            return Ok(stored);
        }

        let from = stored.selected_model();
        let migrated = stored.migrate();
        migrated.save(path)?;
        info!(
            "Migrated AI settings in {} from {} / {} to {} / {}",
            path.display(),
            from.provider,
            from.model,
            migrated.provider,
            migrated.model
        );
        Ok(migrated)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write AI settings to {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("ai_settings.json");

        let settings = AiSettings::load_or_migrate(&path).unwrap();
        assert_eq!(settings, AiSettings::default());
        assert_eq!(settings.model, "gpt-4o-mini");

        let written: AiSettings =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, settings);
    }

    #[test]
    fn test_legacy_ollama_migrates_to_openai_and_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ai_settings.json");
        std::fs::write(&path, r#"{"provider":"ollama","model":"llama3"}"#).unwrap();

        let settings = AiSettings::load_or_migrate(&path).unwrap();
        assert_eq!(settings.provider, AiProvider::OpenAi);
        assert_eq!(settings.model, DEFAULT_OPENAI_MODEL);
        assert_eq!(settings.version, SETTINGS_VERSION);

        // second load sees the persisted result
        assert_eq!(AiSettings::load_or_migrate(&path).unwrap(), settings);
    }

    #[test]
    fn test_legacy_openai_keeps_model() {
        let migrated = AiSettings {
            version: 1,
            provider: AiProvider::OpenAi,
            model: "gpt-4o".to_string(),
        }
        .migrate();
        assert_eq!(migrated.model, "gpt-4o");
        assert_eq!(migrated.version, SETTINGS_VERSION);
    }

    #[test]
    fn test_current_ollama_choice_is_respected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ai_settings.json");
        std::fs::write(&path, r#"{"version":2,"provider":"ollama","model":"llama3"}"#).unwrap();

        let settings = AiSettings::load_or_migrate(&path).unwrap();
        assert_eq!(settings.provider, AiProvider::Ollama);
        assert_eq!(settings.model, "llama3");
    }

    #[test]
    fn test_bad_json_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ai_settings.json");
        std::fs::write(&path, "{ provider: ").unwrap();

        assert!(AiSettings::load_or_migrate(&path).is_err());
    }
}
