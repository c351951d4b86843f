// Prechargement des autres langues apres le premier rendu.
// Au mieux : les echecs sont journalises puis ignores.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::controller::{LocaleSwitchController, SwitchError};
use crate::locale::Locale;
use crate::prefs::PreferenceStore;
use crate::store::TranslationStore;
use crate::surface::RenderSurface;

/// Demarre le controleur ; le prechargement n'est planifie qu'apres un
/// premier rendu reussi.
pub async fn start_with_preload<S, P, R>(
    controller: &LocaleSwitchController<S, P, R>,
    delay: Duration,
) -> Result<JoinHandle<usize>, SwitchError>
where
    S: TranslationStore + ?Sized + 'static,
    P: PreferenceStore + ?Sized,
    R: RenderSurface + ?Sized,
{
    controller.start().await?;
    Ok(spawn_preload(
        Arc::clone(controller.store()),
        controller.active_locale(),
        delay,
    ))
}

/// Lance le prechargement apres `delay`, dans une tache tokio independante.
pub fn spawn_preload<S>(store: Arc<S>, active: Locale, delay: Duration) -> JoinHandle<usize>
where
    S: TranslationStore + ?Sized + 'static,
{
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        preload(&*store, active).await
    })
}

/// Charge en parallele toutes les langues sauf `active`.
/// Retourne le nombre de tables chargees avec succes.
pub async fn preload<S>(store: &S, active: Locale) -> usize
where
    S: TranslationStore + ?Sized,
{
    let results = join_all(
        active
            .others()
            .map(|locale| async move { (locale, store.load(locale).await) }),
    )
    .await;

    let mut loaded = 0;
    for (locale, result) in results {
        match result {
            Ok(_) => loaded += 1,
            Err(e) => debug!(locale = %locale, error = %e, "preload failed"),
        }
    }
    info!(active = %active, loaded, "translation preload finished");
    loaded
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::prefs::MemoryPreferenceStore;
    use crate::resolver::KeyMode;
    use crate::store::{StaticStore, StoreError};
    use crate::surface::MemorySurface;
    use crate::table::TranslationTable;

    struct RecordingStore {
        failing: Vec<Locale>,
        calls: Mutex<Vec<Locale>>,
    }

    impl RecordingStore {
        fn failing(failing: &[Locale]) -> Self {
            Self {
                failing: failing.to_vec(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<Locale> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TranslationStore for RecordingStore {
        async fn load(&self, locale: Locale) -> Result<Arc<TranslationTable>, StoreError> {
            self.calls.lock().unwrap().push(locale);
            if self.failing.contains(&locale) {
                return Err(StoreError::unavailable(locale, "offline"));
            }
            Ok(Arc::new(TranslationTable::new()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_preload_skips_active_and_swallows_failures() {
        let store = Arc::new(RecordingStore::failing(&[Locale::Tz]));
        let handle = spawn_preload(Arc::clone(&store), Locale::Ar, Duration::from_secs(2));

        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert!(store.calls.lock().unwrap().is_empty());

        assert_eq!(handle.await.unwrap(), 2);
        let mut calls = store.calls.lock().unwrap().clone();
        calls.sort();
        assert_eq!(calls, vec![Locale::En, Locale::Fr, Locale::Tz]);
    }

    #[tokio::test]
    async fn test_preload_with_partial_static_store() {
        let store = StaticStore::new()
            .with_flat(Locale::En, [("title", "City")])
            .with_flat(Locale::Fr, [("title", "Commune")]);
        assert_eq!(preload(&store, Locale::En).await, 1);
    }

    fn controller(
        store: &Arc<RecordingStore>,
    ) -> LocaleSwitchController<RecordingStore, MemoryPreferenceStore, MemorySurface> {
        LocaleSwitchController::new(
            Arc::clone(store),
            Arc::new(MemoryPreferenceStore::new()),
            Arc::new(MemorySurface::new()),
            KeyMode::Path,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_preload_when_initial_load_fails() {
        let store = Arc::new(RecordingStore::failing(&[Locale::En]));
        let ctrl = controller(&store);

        assert!(start_with_preload(&ctrl, Duration::from_secs(2)).await.is_err());
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(store.calls(), vec![Locale::En]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_preload_follows_successful_start() {
        let store = Arc::new(RecordingStore::failing(&[]));
        let ctrl = controller(&store);

        let handle = start_with_preload(&ctrl, Duration::from_secs(2)).await.unwrap();
        assert_eq!(handle.await.unwrap(), 3);
        assert_eq!(store.calls().len(), 4);
    }
}
