// Intentions produites par l'interface et consommees par la boucle principale.
// Les evenements de la page deviennent des valeurs plutot que des callbacks.

/// Action demandee par l'utilisateur
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Code brut ; la validation est faite par le controleur
    SwitchLocale(String),
    /// Envoi du formulaire de contact : affiche la confirmation traduite
    SubmitContact,
    /// Afficher la page rendue
    Show,
    Quit,
}

impl Intent {
    /// Commande texte : `lang <code>`, `contact`, `show`, `quit`.
    /// Une ligne vide ou inconnue ne produit rien.
    pub fn parse_command(line: &str) -> Option<Intent> {
        let mut words = line.split_whitespace();
        let intent = match words.next()? {
            "lang" | "language" => Intent::SwitchLocale(words.next()?.to_string()),
            "contact" => Intent::SubmitContact,
            "show" => Intent::Show,
            "quit" | "exit" => Intent::Quit,
            _ => return None,
        };
        match words.next() {
            Some(_) => None,
            None => Some(intent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Intent::parse_command("lang ar"),
            Some(Intent::SwitchLocale("ar".into()))
        );
        assert_eq!(
            Intent::parse_command("  language   tz "),
            Some(Intent::SwitchLocale("tz".into()))
        );
        assert_eq!(Intent::parse_command("show"), Some(Intent::Show));
        assert_eq!(Intent::parse_command("contact"), Some(Intent::SubmitContact));
        assert_eq!(Intent::parse_command("exit"), Some(Intent::Quit));
    }

    #[test]
    fn test_unknown_or_malformed_commands() {
        assert_eq!(Intent::parse_command(""), None);
        assert_eq!(Intent::parse_command("lang"), None);
        assert_eq!(Intent::parse_command("lang ar fr"), None);
        assert_eq!(Intent::parse_command("scroll news"), None);
    }

    #[test]
    fn test_unknown_locale_code_is_passed_through() {
        // le controleur decide ; l'analyse ne filtre pas
        assert_eq!(
            Intent::parse_command("lang de"),
            Some(Intent::SwitchLocale("de".into()))
        );
    }
}
