// Resolution d'une cle de traduction contre une table.
// Deux modes d'adressage : cle plate (correspondance exacte au premier niveau)
// ou chemin pointe (descente dans les groupes imbriques).
// Une cle introuvable donne None, jamais une erreur.

use serde::{Deserialize, Serialize};

use crate::table::{Node, TranslationTable};

/// Separateur des segments en mode chemin
pub const PATH_SEPARATOR: char = '.';

/// Mode d'adressage des cles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyMode {
    Flat,
    #[default]
    Path,
}

/// Resout `key` dans `table`. Seule une feuille est un resultat valide :
/// un chemin qui s'arrete sur un groupe est absent.
pub fn resolve<'t>(table: &'t TranslationTable, key: &str, mode: KeyMode) -> Option<&'t str> {
    match mode {
        KeyMode::Flat => match table.root().get(key)? {
            Node::Text(text) => Some(text),
            Node::Group(_) => None,
        },
        KeyMode::Path => {
            let mut segments = key.split(PATH_SEPARATOR);
            let first = segments.next()?;
            let mut node = table.root().get(first)?;
            for segment in segments {
                node = match node {
                    Node::Group(children) => children.get(segment)?,
                    Node::Text(_) => return None,
                };
            }
            match node {
                Node::Text(text) => Some(text),
                Node::Group(_) => None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested() -> TranslationTable {
        TranslationTable::from_json_str(
            r#"{"a": {"b": "x", "c": {"d": "deep"}}, "leaf": "top", "hero.title": "dotted"}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_path_walks_nested_groups() {
        let table = nested();
        assert_eq!(resolve(&table, "a.b", KeyMode::Path), Some("x"));
        assert_eq!(resolve(&table, "a.c.d", KeyMode::Path), Some("deep"));
        assert_eq!(resolve(&table, "leaf", KeyMode::Path), Some("top"));
    }

    #[test]
    fn test_path_ending_on_group_is_absent() {
        assert_eq!(resolve(&nested(), "a", KeyMode::Path), None);
        assert_eq!(resolve(&nested(), "a.c", KeyMode::Path), None);
    }

    #[test]
    fn test_path_cannot_descend_into_leaf() {
        let table = TranslationTable::from_json_str(r#"{"a": "x"}"#).unwrap();
        assert_eq!(resolve(&table, "a.b", KeyMode::Path), None);
    }

    #[test]
    fn test_missing_keys_are_absent() {
        let table = nested();
        for key in ["", "zz", "a.zz", "a.b.c", ".", "a.", ".a"] {
            assert_eq!(resolve(&table, key, KeyMode::Path), None, "key {key:?}");
            assert_eq!(resolve(&table, key, KeyMode::Flat), None, "key {key:?}");
        }
        assert_eq!(resolve(&TranslationTable::new(), "a.b", KeyMode::Path), None);
    }

    #[test]
    fn test_flat_mode_matches_whole_key() {
        let table = nested();
        assert_eq!(resolve(&table, "hero.title", KeyMode::Flat), Some("dotted"));
        assert_eq!(resolve(&table, "leaf", KeyMode::Flat), Some("top"));
        // pas de descente en mode plat
        assert_eq!(resolve(&table, "a.b", KeyMode::Flat), None);
        assert_eq!(resolve(&table, "a", KeyMode::Flat), None);
    }

    #[test]
    fn test_flat_table_with_path_mode_treats_dotted_key_as_path() {
        let table = TranslationTable::from_flat([("hero.title", "Welcome")]);
        assert_eq!(resolve(&table, "hero.title", KeyMode::Path), None);
        assert_eq!(resolve(&table, "hero.title", KeyMode::Flat), Some("Welcome"));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let table = nested();
        let first = resolve(&table, "a.c.d", KeyMode::Path);
        let _ = resolve(&table, "zz", KeyMode::Path);
        assert_eq!(resolve(&table, "a.c.d", KeyMode::Path), first);
    }
}
