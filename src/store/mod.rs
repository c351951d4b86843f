// Sources de tables de traductions.
// Deux strategies derriere le meme trait : documents distants (HTTP)
// ou tables en memoire (dont les tables embarquees dans le binaire).

mod embedded;
mod remote;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::locale::{Locale, UnknownLocale};
use crate::table::TranslationTable;

pub use embedded::StaticStore;
pub use remote::RemoteStore;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error(transparent)]
    UnknownLocale(#[from] UnknownLocale),

    #[error("translations for {locale} unavailable: {reason}")]
    Unavailable { locale: Locale, reason: String },
}

impl StoreError {
    pub(crate) fn unavailable(locale: Locale, reason: impl ToString) -> Self {
        Self::Unavailable {
            locale,
            reason: reason.to_string(),
        }
    }
}

/// Produit la table complete d'une langue
#[async_trait]
pub trait TranslationStore: Send + Sync {
    async fn load(&self, locale: Locale) -> Result<Arc<TranslationTable>, StoreError>;
}
