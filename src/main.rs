// Point d'entree de commune-i18n.
// Charge la configuration, initialise le logging, applique la langue preferee
// a la page puis traite les commandes lues sur l'entree standard.
// Chaque changement de langue s'execute dans sa propre tache tokio.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use url::Url;

use commune_i18n::config::{CommuneConfig, LoggingConfig, TranslationSource, TranslationsConfig};
use commune_i18n::preload::start_with_preload;
use commune_i18n::{
    FilePreferenceStore, Intent, LocaleSwitchController, MemorySurface, RemoteStore, StaticStore,
    SwitchOutcome, TranslationStore,
};

type Controller = LocaleSwitchController<dyn TranslationStore, FilePreferenceStore, MemorySurface>;

/// Message affiche si la table active n'a pas de confirmation d'envoi
const CONTACT_SUCCESS_FALLBACK: &str = "Message sent successfully!";

#[derive(Parser, Debug)]
#[command(name = "commune-i18n", about = "Translation engine for the municipal website")]
struct Cli {
    /// Chemin vers le fichier de configuration
    #[arg(short, long, default_value = "commune.toml")]
    config: PathBuf,

    /// Ecrit la configuration effective (valeurs par defaut comprises) puis quitte
    #[arg(long)]
    write_config: bool,
}

fn main() {
    let cli = Cli::parse();

    let config = match CommuneConfig::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            std::process::exit(1);
        }
    };

    if cli.write_config {
        if let Err(e) = config.save(&cli.config) {
            eprintln!("Configuration error: {:#}", e);
            std::process::exit(1);
        }
        println!("Configuration written to {}", cli.config.display());
        return;
    }

    // Le guard doit vivre jusqu'a la fin pour vider le fichier de logs
    let _guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Logging error: {:#}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        config = %cli.config.display(),
        source = ?config.translations.source,
        key_mode = ?config.translations.key_mode,
        "commune-i18n starting"
    );

    // Un seul thread : les changements de langue s'entrelacent aux points
    // d'attente, jamais en parallele
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!(error = %e, "failed to create tokio runtime");
            std::process::exit(1);
        }
    };

    let result = rt.block_on(run(config));
    // La lecture de stdin bloque un thread : ne pas attendre sa fin
    rt.shutdown_background();

    if let Err(e) = result {
        let message = format!("{:#}", e);
        tracing::error!(error = %message, "commune-i18n stopped");
        std::process::exit(1);
    }
    tracing::info!("commune-i18n stopped");
}

/// Logging vers la console et vers un fichier journalier dans `{log_dir}/AAAA/MM/`.
fn init_logging(logging: &LoggingConfig) -> Result<WorkerGuard> {
    let now = Local::now();
    let log_dir = PathBuf::from(&logging.log_dir)
        .join(now.format("%Y").to_string())
        .join(now.format("%m").to_string());
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "commune-i18n");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(non_blocking);

    // stderr : stdout est reserve au rendu de la page
    let console_layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(std::io::stderr);

    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

fn build_store(config: &TranslationsConfig) -> Result<Arc<dyn TranslationStore>> {
    match config.source {
        TranslationSource::Bundled => {
            let store = StaticStore::bundled().context("Failed to parse bundled translations")?;
            Ok(Arc::new(store))
        }
        TranslationSource::Remote => {
            let base_url = Url::parse(&config.base_url)
                .with_context(|| format!("Invalid translations base URL: {}", config.base_url))?;
            let store = RemoteStore::with_timeout(base_url, config.timeout())
                .context("Failed to build HTTP client")?;
            tracing::info!(base_url = %store.base_url(), "loading translations over HTTP");
            Ok(Arc::new(store))
        }
    }
}

/// Page d'accueil du site : chaque element porte sa cle de traduction.
fn home_page() -> MemorySurface {
    [
        ("site-name", "site.name"),
        ("nav-home", "nav.home"),
        ("nav-services", "nav.services"),
        ("nav-news", "nav.news"),
        ("nav-contact", "nav.contact"),
        ("hero-title", "hero.title"),
        ("hero-subtitle", "hero.subtitle"),
        ("services-title", "services.title"),
        ("civil-status", "services.civil_status"),
        ("urbanism", "services.urbanism"),
        ("news-title", "news.title"),
        ("contact-title", "contact.title"),
        ("contact-send", "contact.send"),
        ("footer-rights", "footer.rights"),
    ]
    .into_iter()
    .fold(MemorySurface::new().with_plain("map", "[map]"), |page, (id, key)| {
        page.with_bound(id, key, key)
    })
}

async fn run(config: CommuneConfig) -> Result<()> {
    let store = build_store(&config.translations)?;
    let prefs = Arc::new(FilePreferenceStore::new(&config.preferences.path));
    let surface = Arc::new(home_page());
    let controller: Arc<Controller> = Arc::new(LocaleSwitchController::new(
        store,
        prefs,
        surface,
        config.translations.key_mode,
    ));

    // Un echec au demarrage laisse la page dans son etat initial, sans prechargement
    if let Err(e) = start_with_preload(&*controller, config.translations.preload_delay()).await {
        tracing::error!(error = %e, "initial translation load failed");
    }
    print!("{}", controller.surface().render());

    let (tx, mut rx) = mpsc::channel::<Intent>(16);
    tokio::spawn(read_commands(tx));

    while let Some(intent) = rx.recv().await {
        match intent {
            Intent::SwitchLocale(code) => {
                let ctrl = Arc::clone(&controller);
                tokio::spawn(async move {
                    if let Some(Ok(SwitchOutcome::Applied { .. })) = ctrl.request(&code).await {
                        print!("{}", ctrl.surface().render());
                    }
                });
            }
            Intent::SubmitContact => {
                println!(
                    "{}",
                    controller.translate_or("contact.success", CONTACT_SUCCESS_FALLBACK)
                );
            }
            Intent::Show => print!("{}", controller.surface().render()),
            Intent::Quit => break,
        }
    }

    Ok(())
}

/// Lit les commandes sur stdin et les transmet comme intentions.
async fn read_commands(tx: mpsc::Sender<Intent>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match Intent::parse_command(&line) {
                Some(intent) => {
                    if tx.send(intent).await.is_err() {
                        return;
                    }
                }
                None if line.trim().is_empty() => {}
                None => tracing::warn!(command = %line.trim(), "unknown command"),
            },
            Ok(None) => {
                let _ = tx.send(Intent::Quit).await;
                return;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read stdin");
                let _ = tx.send(Intent::Quit).await;
                return;
            }
        }
    }
}
