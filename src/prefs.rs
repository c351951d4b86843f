// Persistance de la langue choisie par l'utilisateur.
// Lue une seule fois au demarrage, ecrite apres chaque changement reussi.
// Les echecs ne sont jamais propages : ils sont journalises puis ignores.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::locale::Locale;

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid preference file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize preference: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Stockage durable de la preference de langue
pub trait PreferenceStore: Send + Sync {
    /// Langue enregistree ; absente ou inconnue donne `None`.
    fn load(&self) -> Option<Locale>;

    /// Ecriture sans retour d'erreur.
    fn save(&self, locale: Locale);
}

/// Interprete une valeur brute ; un code hors de l'ensemble connu est ignore.
fn parse_stored(raw: Option<String>) -> Option<Locale> {
    let raw = raw?;
    match raw.parse() {
        Ok(locale) => Some(locale),
        Err(e) => {
            warn!(error = %e, "ignoring stored language preference");
            None
        }
    }
}

/// Document TOML : une seule entree `commune.preferred_language`
#[derive(Debug, Default, Deserialize, Serialize)]
struct PreferenceFile {
    #[serde(default)]
    commune: Namespace,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct Namespace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    preferred_language: Option<String>,
}

/// Preference stockee dans un fichier TOML
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_raw(&self) -> Result<Option<String>, PreferenceError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let file: PreferenceFile = toml::from_str(&content)?;
        Ok(file.commune.preferred_language)
    }

    fn write(&self, locale: Locale) -> Result<(), PreferenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = PreferenceFile {
            commune: Namespace {
                preferred_language: Some(locale.code().to_string()),
            },
        };
        std::fs::write(&self.path, toml::to_string_pretty(&file)?)?;
        Ok(())
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> Option<Locale> {
        match self.read_raw() {
            Ok(raw) => parse_stored(raw),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read language preference");
                None
            }
        }
    }

    fn save(&self, locale: Locale) {
        match self.write(locale) {
            Ok(()) => debug!(path = %self.path.display(), locale = %locale, "language preference saved"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "failed to save language preference"),
        }
    }
}

/// Preference en memoire ; garde la valeur brute et compte les ecritures.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    raw: Mutex<Option<String>>,
    writes: AtomicUsize,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: &str) -> Self {
        Self {
            raw: Mutex::new(Some(raw.to_string())),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.raw.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Option<Locale> {
        parse_stored(self.raw())
    }

    fn save(&self, locale: Locale) {
        *self.raw.lock().unwrap_or_else(PoisonError::into_inner) = Some(locale.code().to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}
