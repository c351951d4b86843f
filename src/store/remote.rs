// Strategie distante : telecharge `{base_url}/{code}.json` par HTTP.
// Les tables chargees avec succes sont gardees en cache pour la session,
// ce qui permet au prechargement d'eviter les appels reseau suivants.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, info};
use url::Url;

use super::{StoreError, TranslationStore};
use crate::locale::Locale;
use crate::table::TranslationTable;

pub struct RemoteStore {
    base_url: Url,
    http: reqwest::Client,
    cache: Mutex<HashMap<Locale, Arc<TranslationTable>>>,
}

impl RemoteStore {
    pub fn new(base_url: Url, http: reqwest::Client) -> Self {
        Self {
            base_url: with_trailing_slash(base_url),
            http,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Cree le client HTTP avec un delai maximal par requete.
    pub fn with_timeout(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::new(base_url, http))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn document_url(&self, locale: Locale) -> Result<Url, StoreError> {
        self.base_url
            .join(&format!("{}.json", locale.code()))
            .map_err(|e| StoreError::unavailable(locale, format!("invalid URL: {e}")))
    }

    pub fn cached(&self, locale: Locale) -> Option<Arc<TranslationTable>> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&locale)
            .cloned()
    }

    async fn fetch(&self, locale: Locale) -> Result<TranslationTable, StoreError> {
        let url = self.document_url(locale)?;
        debug!(locale = %locale, url = %url, "fetching translation document");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| StoreError::unavailable(locale, e))?;

        match response.status() {
            StatusCode::OK => {}
            status => {
                return Err(StoreError::unavailable(
                    locale,
                    format!("unexpected status: {status}"),
                ))
            }
        }

        let body = response
            .text()
            .await
            .map_err(|e| StoreError::unavailable(locale, e))?;
        TranslationTable::from_json_str(&body).map_err(|e| StoreError::unavailable(locale, e))
    }
}

#[async_trait]
impl TranslationStore for RemoteStore {
    async fn load(&self, locale: Locale) -> Result<Arc<TranslationTable>, StoreError> {
        if let Some(table) = self.cached(locale) {
            debug!(locale = %locale, "translation table served from cache");
            return Ok(table);
        }

        let table = Arc::new(self.fetch(locale).await?);
        info!(locale = %locale, texts = table.text_count(), "translation table loaded");
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(locale, Arc::clone(&table));
        Ok(table)
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
