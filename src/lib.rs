// Moteur de traduction du site municipal : tables par langue, resolution des
// cles, changement de langue avec repli, direction du texte, persistance
// de la preference et prechargement.

pub mod config;
pub mod controller;
pub mod intent;
pub mod locale;
pub mod preload;
pub mod prefs;
pub mod resolver;
pub mod store;
pub mod surface;
pub mod table;

pub use controller::{ActiveLocale, LocaleSwitchController, SwitchError, SwitchOutcome};
pub use intent::Intent;
pub use locale::{Direction, Locale, UnknownLocale};
pub use prefs::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
pub use resolver::{resolve, KeyMode};
pub use store::{RemoteStore, StaticStore, StoreError, TranslationStore};
pub use surface::{KeyBinding, MemorySurface, RenderSurface};
pub use table::TranslationTable;
