// Strategie statique : tables gardees en memoire, indexees par langue.
// Les documents JSON du site sont embarques dans le binaire.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::{StoreError, TranslationStore};
use crate::locale::{Locale, UnknownLocale};
use crate::table::{TableParseError, TranslationTable};

// Fichiers JSON embarques dans le binaire
const EN_JSON: &str = include_str!("../../langs/en.json");
const AR_JSON: &str = include_str!("../../langs/ar.json");
const FR_JSON: &str = include_str!("../../langs/fr.json");
const TZ_JSON: &str = include_str!("../../langs/tz.json");

/// Tables en memoire ; une langue absente donne `UnknownLocale`.
#[derive(Debug, Clone, Default)]
pub struct StaticStore {
    tables: HashMap<Locale, Arc<TranslationTable>>,
}

impl StaticStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tables des quatre langues du site, parsees depuis les documents embarques.
    pub fn bundled() -> Result<Self, TableParseError> {
        let mut store = Self::new();
        for (locale, json) in [
            (Locale::En, EN_JSON),
            (Locale::Ar, AR_JSON),
            (Locale::Fr, FR_JSON),
            (Locale::Tz, TZ_JSON),
        ] {
            store.insert(locale, TranslationTable::from_json_str(json)?);
        }
        Ok(store)
    }

    /// Construit une table plate pour `locale` a partir de paires (cle, texte).
    pub fn with_flat<I, K, V>(mut self, locale: Locale, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.insert(locale, TranslationTable::from_flat(entries));
        self
    }

    pub fn insert(&mut self, locale: Locale, table: TranslationTable) {
        self.tables.insert(locale, Arc::new(table));
    }

    pub fn contains(&self, locale: Locale) -> bool {
        self.tables.contains_key(&locale)
    }
}

#[async_trait]
impl TranslationStore for StaticStore {
    async fn load(&self, locale: Locale) -> Result<Arc<TranslationTable>, StoreError> {
        self.tables
            .get(&locale)
            .cloned()
            .ok_or_else(|| UnknownLocale(locale.code().to_string()).into())
    }
}
