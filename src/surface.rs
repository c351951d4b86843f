// Surface de rendu : la page vue par le moteur de traduction.
// Le moteur ne connait que ce trait ; `MemorySurface` est l'implementation
// en memoire utilisee par le binaire de demonstration et les tests.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::locale::{Direction, Locale};

/// Association fixe entre un element et sa cle de traduction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub element: String,
    pub key: String,
}

/// Operations dont le moteur a besoin sur la page
pub trait RenderSurface: Send + Sync {
    /// Elements portant une cle, dans l'ordre du document
    fn bindings(&self) -> Vec<KeyBinding>;

    fn set_text(&self, element: &str, text: &str);

    /// Attributs `dir` et `lang` de la racine
    fn set_root_attributes(&self, direction: Direction, locale: Locale);

    fn set_loading(&self, visible: bool);

    /// Met en evidence la langue active dans le selecteur
    fn mark_active_locale(&self, locale: Locale);
}

/// Evenements enregistres par `MemorySurface`, dans l'ordre d'arrivee
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Text { element: String, text: String },
    Root { dir: &'static str, lang: &'static str },
    Loading(bool),
    ActiveLocale(Locale),
}

#[derive(Debug, Clone)]
struct Element {
    key: Option<String>,
    text: String,
}

#[derive(Debug, Default)]
struct Page {
    order: Vec<String>,
    elements: BTreeMap<String, Element>,
    dir: Option<Direction>,
    lang: Option<Locale>,
    loading: bool,
    switcher_label: Option<&'static str>,
    events: Vec<SurfaceEvent>,
}

#[derive(Debug, Default)]
pub struct MemorySurface {
    page: Mutex<Page>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ajoute un element lie a `key`, avec son texte initial.
    pub fn with_bound(self, element: &str, key: &str, text: &str) -> Self {
        self.push(element, Some(key.to_string()), text);
        self
    }

    /// Ajoute un element sans cle ; il n'est jamais retraduit.
    pub fn with_plain(self, element: &str, text: &str) -> Self {
        self.push(element, None, text);
        self
    }

    fn push(&self, element: &str, key: Option<String>, text: &str) {
        let mut page = self.page();
        if !page.elements.contains_key(element) {
            page.order.push(element.to_string());
        }
        page.elements.insert(
            element.to_string(),
            Element {
                key,
                text: text.to_string(),
            },
        );
    }

    fn page(&self) -> MutexGuard<'_, Page> {
        self.page.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn text(&self, element: &str) -> Option<String> {
        self.page().elements.get(element).map(|e| e.text.clone())
    }

    /// (`dir`, `lang`) de la racine, si deja appliques
    pub fn root_attributes(&self) -> Option<(&'static str, &'static str)> {
        let page = self.page();
        Some((page.dir?.as_html_dir(), page.lang?.code()))
    }

    pub fn is_loading(&self) -> bool {
        self.page().loading
    }

    pub fn switcher_label(&self) -> Option<&'static str> {
        self.page().switcher_label
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.page().events.clone()
    }

    pub fn clear_events(&self) {
        self.page().events.clear();
    }

    /// Rendu texte de la page, une ligne par element
    pub fn render(&self) -> String {
        let page = self.page();
        let mut out = String::new();
        let _ = writeln!(
            out,
            "[dir={} lang={} switcher={}]",
            page.dir.map_or("-", |d| d.as_html_dir()),
            page.lang.map_or("-", |l| l.code()),
            page.switcher_label.unwrap_or("-"),
        );
        for id in &page.order {
            if let Some(element) = page.elements.get(id) {
                let _ = writeln!(out, "{id:>16} | {}", element.text);
            }
        }
        out
    }
}

impl RenderSurface for MemorySurface {
    fn bindings(&self) -> Vec<KeyBinding> {
        let page = self.page();
        page.order
            .iter()
            .filter_map(|id| {
                let key = page.elements.get(id)?.key.clone()?;
                Some(KeyBinding {
                    element: id.clone(),
                    key,
                })
            })
            .collect()
    }

    fn set_text(&self, element: &str, text: &str) {
        let mut guard = self.page();
        let page = &mut *guard;
        if let Some(el) = page.elements.get_mut(element) {
            el.text = text.to_string();
            page.events.push(SurfaceEvent::Text {
                element: element.to_string(),
                text: text.to_string(),
            });
        }
    }

    fn set_root_attributes(&self, direction: Direction, locale: Locale) {
        let mut page = self.page();
        page.dir = Some(direction);
        page.lang = Some(locale);
        page.events.push(SurfaceEvent::Root {
            dir: direction.as_html_dir(),
            lang: locale.code(),
        });
    }

    fn set_loading(&self, visible: bool) {
        let mut page = self.page();
        page.loading = visible;
        page.events.push(SurfaceEvent::Loading(visible));
    }

    fn mark_active_locale(&self, locale: Locale) {
        let mut page = self.page();
        page.switcher_label = Some(locale.switcher_label());
        page.events.push(SurfaceEvent::ActiveLocale(locale));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindings_skip_plain_elements_and_keep_order() {
        let surface = MemorySurface::new()
            .with_bound("title", "hero.title", "")
            .with_plain("logo", "LOGO")
            .with_bound("home", "nav.home", "Home");
        let keys: Vec<String> = surface.bindings().into_iter().map(|b| b.key).collect();
        assert_eq!(keys, vec!["hero.title", "nav.home"]);
    }

    #[test]
    fn test_set_text_ignores_unknown_elements() {
        let surface = MemorySurface::new().with_bound("home", "nav.home", "Home");
        surface.set_text("missing", "x");
        surface.set_text("home", "Accueil");
        assert_eq!(surface.text("home").as_deref(), Some("Accueil"));
        assert_eq!(surface.events().len(), 1);
    }

    #[test]
    fn test_root_attributes_and_switcher() {
        let surface = MemorySurface::new();
        assert_eq!(surface.root_attributes(), None);
        surface.set_root_attributes(Direction::Rtl, Locale::Ar);
        surface.mark_active_locale(Locale::Tz);
        assert_eq!(surface.root_attributes(), Some(("rtl", "ar")));
        assert_eq!(surface.switcher_label(), Some("ⵜⵣ"));
        assert!(surface.render().starts_with("[dir=rtl lang=ar switcher=ⵜⵣ]"));
    }
}
