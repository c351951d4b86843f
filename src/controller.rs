// Controleur de changement de langue.
// Orchestre chargement -> application -> persistance, avec un seul repli
// vers la langue par defaut en cas d'echec.
// Chaque demande recoit un numero de sequence : seul le resultat de la
// demande la plus recente est applique, les autres sont ignores.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::locale::Locale;
use crate::prefs::PreferenceStore;
use crate::resolver::{resolve, KeyMode};
use crate::store::{StoreError, TranslationStore};
use crate::surface::RenderSurface;
use crate::table::TranslationTable;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwitchError {
    #[error("failed to load default locale: {0}")]
    DefaultUnavailable(StoreError),

    #[error("failed to load {requested} ({primary}) and default locale fallback failed ({fallback})")]
    FallbackFailed {
        requested: Locale,
        primary: StoreError,
        fallback: StoreError,
    },
}

/// Issue d'une demande de changement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// Langue deja active : rien n'est charge ni enregistre
    Unchanged,
    /// Table appliquee ; `fell_back` si c'est la langue par defaut qui a ete chargee
    Applied { locale: Locale, fell_back: bool },
    /// Une demande plus recente a pris le relais ; resultat ignore
    Superseded,
}

/// Vue coherente de l'etat actif : langue et table vont toujours ensemble
#[derive(Debug, Clone)]
pub struct ActiveLocale {
    pub locale: Locale,
    pub table: Arc<TranslationTable>,
    pub loading: bool,
}

/// Resultat de la sequence de chargement (demande, puis defaut)
enum Acquired {
    Loaded {
        locale: Locale,
        table: Arc<TranslationTable>,
        fell_back: bool,
    },
    Failed(SwitchError),
}

struct SwitchState {
    active: ActiveLocale,
    /// Derniere langue demandee ; egale a la langue active hors chargement
    target: Locale,
    /// Numero de la demande la plus recente
    latest: u64,
}

pub struct LocaleSwitchController<S: ?Sized, P: ?Sized, R: ?Sized> {
    store: Arc<S>,
    prefs: Arc<P>,
    surface: Arc<R>,
    mode: KeyMode,
    state: Mutex<SwitchState>,
}

impl<S, P, R> LocaleSwitchController<S, P, R>
where
    S: TranslationStore + ?Sized,
    P: PreferenceStore + ?Sized,
    R: RenderSurface + ?Sized,
{
    /// L'etat initial est la langue par defaut avec une table vide,
    /// jusqu'a l'appel de `initialize`.
    pub fn new(store: Arc<S>, prefs: Arc<P>, surface: Arc<R>, mode: KeyMode) -> Self {
        Self {
            store,
            prefs,
            surface,
            mode,
            state: Mutex::new(SwitchState {
                active: ActiveLocale {
                    locale: Locale::DEFAULT,
                    table: Arc::new(TranslationTable::new()),
                    loading: false,
                },
                target: Locale::DEFAULT,
                latest: 0,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, SwitchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> ActiveLocale {
        self.state().active.clone()
    }

    pub fn active_locale(&self) -> Locale {
        self.state().active.locale
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn surface(&self) -> &Arc<R> {
        &self.surface
    }

    /// Traduit une cle avec la table active (ex : message de confirmation du formulaire).
    pub fn translate(&self, key: &str) -> Option<String> {
        let table = Arc::clone(&self.state().active.table);
        resolve(&table, key, self.mode).map(str::to_string)
    }

    pub fn translate_or(&self, key: &str, fallback: &str) -> String {
        self.translate(key).unwrap_or_else(|| fallback.to_string())
    }

    /// Demarrage : lit la preference enregistree puis charge cette langue.
    pub async fn start(&self) -> Result<SwitchOutcome, SwitchError> {
        let preferred = self.prefs.load();
        self.initialize(preferred).await
    }

    /// Charge la langue preferee (ou celle par defaut) et l'applique,
    /// meme si c'est deja la langue de l'etat initial. N'ecrit pas la preference.
    pub async fn initialize(&self, preferred: Option<Locale>) -> Result<SwitchOutcome, SwitchError> {
        let requested = preferred.unwrap_or(Locale::DEFAULT);
        info!(locale = %requested, "initializing translations");
        let seq = self.begin(requested);
        let acquired = self.acquire(requested).await;
        self.finish(seq, acquired, false)
    }

    /// Changement de langue demande par l'utilisateur.
    pub async fn switch_to(&self, requested: Locale) -> Result<SwitchOutcome, SwitchError> {
        {
            let mut st = self.state();
            if requested == st.target {
                debug!(locale = %requested, "language already active or pending");
                return Ok(SwitchOutcome::Unchanged);
            }
            if requested == st.active.locale {
                // retour a la langue active : le chargement en cours est abandonne
                st.latest += 1;
                st.target = requested;
                st.active.loading = false;
                self.surface.set_loading(false);
                info!(locale = %requested, "pending language switch cancelled");
                return Ok(SwitchOutcome::Unchanged);
            }
        }

        info!(from = %self.active_locale(), to = %requested, "switching language");
        let seq = self.begin(requested);
        let acquired = self.acquire(requested).await;
        self.finish(seq, acquired, true)
    }

    /// Variante recevant un code brut ; un code inconnu est ignore.
    pub async fn request(&self, code: &str) -> Option<Result<SwitchOutcome, SwitchError>> {
        match code.parse::<Locale>() {
            Ok(locale) => Some(self.switch_to(locale).await),
            Err(e) => {
                warn!(error = %e, "ignoring language switch request");
                None
            }
        }
    }

    fn begin(&self, requested: Locale) -> u64 {
        let mut st = self.state();
        st.latest += 1;
        st.target = requested;
        st.active.loading = true;
        self.surface.set_loading(true);
        st.latest
    }

    async fn acquire(&self, requested: Locale) -> Acquired {
        let primary = match self.store.load(requested).await {
            Ok(table) => {
                return Acquired::Loaded {
                    locale: requested,
                    table,
                    fell_back: false,
                }
            }
            Err(e) => e,
        };
        warn!(locale = %requested, error = %primary, "failed to load translations");

        if requested.is_default() {
            return Acquired::Failed(SwitchError::DefaultUnavailable(primary));
        }

        match self.store.load(Locale::DEFAULT).await {
            Ok(table) => {
                info!(requested = %requested, locale = %Locale::DEFAULT, "falling back to default locale");
                Acquired::Loaded {
                    locale: Locale::DEFAULT,
                    table,
                    fell_back: true,
                }
            }
            Err(fallback) => Acquired::Failed(SwitchError::FallbackFailed {
                requested,
                primary,
                fallback,
            }),
        }
    }

    /// Seul point de mutation de l'etat actif. Le verrou reste pris de la
    /// verification de sequence jusqu'a la persistance : aucun autre
    /// changement ne peut s'intercaler, meme sur un runtime multi-thread.
    fn finish(&self, seq: u64, acquired: Acquired, persist: bool) -> Result<SwitchOutcome, SwitchError> {
        match acquired {
            Acquired::Loaded {
                locale,
                table,
                fell_back,
            } => {
                let mut st = self.state();
                if st.latest != seq {
                    debug!(locale = %locale, seq, latest = st.latest, "discarding stale translation load");
                    return Ok(SwitchOutcome::Superseded);
                }
                st.active.locale = locale;
                st.active.table = Arc::clone(&table);
                st.target = locale;

                self.render(locale, &table);

                st.active.loading = false;
                self.surface.set_loading(false);

                if persist {
                    self.prefs.save(locale);
                }
                drop(st);
                info!(locale = %locale, fell_back, "language applied");
                Ok(SwitchOutcome::Applied { locale, fell_back })
            }
            Acquired::Failed(err) => {
                let mut st = self.state();
                if st.latest != seq {
                    debug!(seq, latest = st.latest, "discarding stale translation failure");
                    return Ok(SwitchOutcome::Superseded);
                }
                st.target = st.active.locale;
                st.active.loading = false;
                self.surface.set_loading(false);
                drop(st);
                error!(error = %err, "language switch abandoned");
                Err(err)
            }
        }
    }

    fn render(&self, locale: Locale, table: &TranslationTable) {
        let mut misses = 0usize;
        for binding in self.surface.bindings() {
            match resolve(table, &binding.key, self.mode) {
                Some(text) => self.surface.set_text(&binding.element, text),
                None => {
                    misses += 1;
                    debug!(locale = %locale, key = %binding.key, "missing translation, keeping text");
                }
            }
        }
        self.surface.set_root_attributes(locale.direction(), locale);
        self.surface.mark_active_locale(locale);
        debug!(locale = %locale, misses, "page rendered");
    }
}
