// Table de traductions d'une langue : arbre dont les feuilles sont des textes
// et les noeuds internes des groupes indexes par segment de cle.
// Construite depuis un document JSON ou depuis des paires (cle, texte).

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("translation document root must be an object")]
    NotAnObject,
}

/// Noeud de l'arbre de traductions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Texte localise, jamais vide
    Text(String),
    /// Sous-arbre indexe par segment
    Group(BTreeMap<String, Node>),
}

/// Table complete pour une langue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationTable {
    root: BTreeMap<String, Node>,
}

impl TranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse un document JSON. Les feuilles non textuelles ou vides sont ignorees.
    pub fn from_json_str(json: &str) -> Result<Self, TableParseError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self, TableParseError> {
        match value {
            Value::Object(obj) => Ok(Self {
                root: convert_object(obj),
            }),
            _ => Err(TableParseError::NotAnObject),
        }
    }

    /// Table plate (profondeur 1) : chaque cle est un identifiant entier,
    /// points compris.
    pub fn from_flat<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let root = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k, Node::Text(v)))
            .collect();
        Self { root }
    }

    pub fn root(&self) -> &BTreeMap<String, Node> {
        &self.root
    }

    /// Nombre de textes dans l'arbre
    pub fn text_count(&self) -> usize {
        fn count(nodes: &BTreeMap<String, Node>) -> usize {
            nodes
                .values()
                .map(|n| match n {
                    Node::Text(_) => 1,
                    Node::Group(children) => count(children),
                })
                .sum()
        }
        count(&self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.text_count() == 0
    }
}

fn convert_object(obj: &Map<String, Value>) -> BTreeMap<String, Node> {
    let mut nodes = BTreeMap::new();
    for (key, val) in obj {
        match val {
            Value::Object(children) => {
                nodes.insert(key.clone(), Node::Group(convert_object(children)));
            }
            Value::String(s) if !s.is_empty() => {
                nodes.insert(key.clone(), Node::Text(s.clone()));
            }
            _ => {}
        }
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_document_is_parsed() {
        let table =
            TranslationTable::from_json_str(r#"{"nav": {"home": "Home", "news": "News"}, "title": "City"}"#)
                .unwrap();
        assert_eq!(table.text_count(), 3);
        assert!(matches!(table.root().get("nav"), Some(Node::Group(_))));
        assert_eq!(table.root().get("title"), Some(&Node::Text("City".into())));
    }

    #[test]
    fn test_non_string_and_empty_leaves_are_dropped() {
        let table = TranslationTable::from_json_str(
            r#"{"a": "", "b": 0, "c": false, "d": null, "e": ["x"], "f": "kept"}"#,
        )
        .unwrap();
        assert_eq!(table.text_count(), 1);
        assert!(table.root().contains_key("f"));
    }

    #[test]
    fn test_non_object_root_is_rejected() {
        assert!(matches!(
            TranslationTable::from_json_str(r#"["a", "b"]"#),
            Err(TableParseError::NotAnObject)
        ));
        assert!(matches!(
            TranslationTable::from_json_str("{not json"),
            Err(TableParseError::Json(_))
        ));
    }

    #[test]
    fn test_flat_table_keeps_dotted_keys_whole() {
        let table = TranslationTable::from_flat([("hero.title", "Welcome"), ("empty", "")]);
        assert_eq!(table.text_count(), 1);
        assert_eq!(
            table.root().get("hero.title"),
            Some(&Node::Text("Welcome".into()))
        );
    }

    #[test]
    fn test_empty_table() {
        assert!(TranslationTable::new().is_empty());
        assert!(TranslationTable::from_json_str(r#"{"group": {}}"#).unwrap().is_empty());
    }
}
