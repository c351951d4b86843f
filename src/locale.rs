// Ensemble ferme des langues supportees par le site municipal
// et politique de direction du texte (gauche-a-droite / droite-a-gauche).

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Code de langue hors de l'ensemble connu
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown locale code: {0:?}")]
pub struct UnknownLocale(pub String);

/// Langues connues a la compilation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Locale {
    En,
    Ar,
    Fr,
    Tz,
}

/// Direction du texte appliquee a la racine du document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    /// Valeur de l'attribut `dir` ("ltr" ou "rtl")
    pub fn as_html_dir(&self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }
}

impl Locale {
    /// Langue de repli utilisee quand le chargement echoue
    pub const DEFAULT: Locale = Locale::En;

    /// Toutes les langues, dans l'ordre du selecteur
    pub const ALL: [Locale; 4] = [Locale::En, Locale::Ar, Locale::Fr, Locale::Tz];

    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ar => "ar",
            Locale::Fr => "fr",
            Locale::Tz => "tz",
        }
    }

    /// Libelle court affiche dans le selecteur de langue
    pub fn switcher_label(&self) -> &'static str {
        match self {
            Locale::En => "EN",
            Locale::Ar => "AR",
            Locale::Fr => "FR",
            Locale::Tz => "ⵜⵣ",
        }
    }

    /// Les deux langues en ecriture non latine s'affichent de droite a gauche.
    pub fn direction(&self) -> Direction {
        match self {
            Locale::Ar | Locale::Tz => Direction::Rtl,
            Locale::En | Locale::Fr => Direction::Ltr,
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::DEFAULT
    }

    /// Langues autres que `self`, dans l'ordre de `ALL`
    pub fn others(self) -> impl Iterator<Item = Locale> {
        Self::ALL.into_iter().filter(move |l| *l != self)
    }
}

impl FromStr for Locale {
    type Err = UnknownLocale;

    /// Correspondance exacte sur le code ; pas de normalisation de casse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|l| l.code() == s)
            .ok_or_else(|| UnknownLocale(s.to_string()))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
