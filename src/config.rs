// Configuration de commune-i18n
// Deserialise le fichier TOML avec des valeurs par defaut pour chaque section.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::resolver::KeyMode;

/// Configuration racine de l'application
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CommuneConfig {
    #[serde(default)]
    pub translations: TranslationsConfig,
    #[serde(default)]
    pub preferences: PreferencesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Origine des documents de traduction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationSource {
    /// Tables embarquees dans le binaire
    #[default]
    Bundled,
    /// `{base_url}/{code}.json` par HTTP
    Remote,
}

/// Chargement et resolution des traductions
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranslationsConfig {
    #[serde(default)]
    pub source: TranslationSource,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub key_mode: KeyMode,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_preload_delay_ms")]
    pub preload_delay_ms: u64,
}

/// Emplacement de la preference de langue
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PreferencesConfig {
    #[serde(default = "default_preferences_path")]
    pub path: String,
}

/// Configuration du logging (niveau, repertoire)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080/translations/".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_preload_delay_ms() -> u64 {
    2000
}

fn default_preferences_path() -> String {
    "./data/preferences.toml".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "./logs".to_string()
}

impl Default for TranslationsConfig {
    fn default() -> Self {
        Self {
            source: TranslationSource::default(),
            base_url: default_base_url(),
            key_mode: KeyMode::default(),
            timeout_secs: default_timeout_secs(),
            preload_delay_ms: default_preload_delay_ms(),
        }
    }
}

impl TranslationsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn preload_delay(&self) -> Duration {
        Duration::from_millis(self.preload_delay_ms)
    }
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            path: default_preferences_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_dir: default_log_dir(),
        }
    }
}

impl CommuneConfig {
    /// Sauvegarde la configuration dans un fichier TOML.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config to TOML")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Charge la configuration depuis un fichier TOML.
    /// Si le fichier n'existe pas, utilise les valeurs par defaut.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: CommuneConfig = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            Ok(config)
        } else {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CommuneConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.translations.source, TranslationSource::Bundled);
        assert_eq!(config.translations.key_mode, KeyMode::Path);
        assert_eq!(config.translations.preload_delay(), Duration::from_secs(2));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("commune.toml");
        std::fs::write(
            &path,
            "[translations]\nsource = \"remote\"\nkey_mode = \"flat\"\nbase_url = \"https://example.org/i18n/\"\n",
        )
        .unwrap();

        let config = CommuneConfig::load(&path).unwrap();
        assert_eq!(config.translations.source, TranslationSource::Remote);
        assert_eq!(config.translations.key_mode, KeyMode::Flat);
        assert_eq!(config.translations.base_url, "https://example.org/i18n/");
        assert_eq!(config.translations.timeout(), Duration::from_secs(10));
        assert_eq!(config.preferences.path, "./data/preferences.toml");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("commune.toml");
        let mut config = CommuneConfig::default();
        config.translations.preload_delay_ms = 500;
        config.logging.level = "debug".into();
        config.save(&path).unwrap();

        let loaded = CommuneConfig::load(&path).unwrap();
        assert_eq!(loaded.translations.preload_delay_ms, 500);
        assert_eq!(loaded.logging.level, "debug");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("commune.toml");
        std::fs::write(&path, "[translations]\nsource = \"ftp\"\n").unwrap();
        assert!(CommuneConfig::load(&path).is_err());
    }
}
