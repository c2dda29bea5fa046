use clap::Parser;
use console::style;
use mosh_launcher::cli::{self, Cli, Commands};
use mosh_launcher::models::SSH_KEY_NAME;
use mosh_launcher::services::config_service::{ConfigService, LauncherSettings};
use mosh_launcher::services::engine::ProcessEngine;
use mosh_launcher::services::key_service::KeyService;
use mosh_launcher::services::launcher::Launcher;
use mosh_launcher::services::log_service::LogService;
use mosh_launcher::services::secret_store::{FileSecretStore, SecretStore};
use mosh_launcher::services::session_controller::SessionServices;
use mosh_launcher::state::{ConnectionForm, CredentialSlot};
use mosh_launcher::ui::CrosstermTerminal;
use mosh_launcher::utils::error::describe_error;
use mosh_launcher::utils::logger;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

/// Failure entries shown when no session could be started
const FAILURE_LOG_LINES: usize = 5;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), describe_error(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config_dir {
        Some(dir) => ConfigService::with_dir(dir.clone())?,
        None => ConfigService::new()?,
    };
    let mut settings = config.load_settings()?;
    if let Some(engine) = &cli.engine {
        settings.engine_path = engine.clone();
    }
    if let Some(level) = &cli.log_level {
        settings.log_level = level.clone();
    }

    match &cli.command {
        None | Some(Commands::Connect) => connect(&cli, &config, settings).await,
        Some(Commands::StoreKey { path }) => {
            logger::init();
            store_key(&config, path).await
        }
        Some(Commands::ForgetKey) => {
            logger::init();
            let store = FileSecretStore::new(config.secrets_file());
            if store.remove(SSH_KEY_NAME).await? {
                println!("{} Stored key removed", style("✓").green());
            } else {
                println!("No key was stored");
            }
            Ok(())
        }
        Some(Commands::ShowSettings) => {
            println!("{}", style(format!("# {}", config.config_dir().display())).dim());
            print!("{}", toml::to_string_pretty(&settings)?);
            println!("{}", style(format!("# log file: {}", config.log_file(&settings).display())).dim());
            Ok(())
        }
        Some(Commands::SaveSettings) => {
            config.save_settings(&settings)?;
            println!(
                "{} Settings saved to {}",
                style("✓").green(),
                config.config_dir().display()
            );
            Ok(())
        }
    }
}

async fn connect(cli: &Cli, config: &ConfigService, settings: LauncherSettings) -> anyhow::Result<()> {
    let mut form = ConnectionForm::with_mode(settings.default_mode);
    cli::apply_overrides(&mut form, cli);
    if !cli.no_prompt {
        cli::prompt_form(&mut form)?;
    }

    let credential = CredentialSlot::empty();
    if let Some(path) = &cli.ssh_key_file {
        let (pem, info) = KeyService::read_private_key(path).await?;
        eprintln!("Using {} key {} ({})", info.algorithm, info.fingerprint, info.comment);
        credential.put(pem);
    }

    // The terminal is about to go raw; from here on logs go to a file
    logger::init_with_file(&settings.log_level, &config.log_file(&settings))?;
    tracing::info!("Mosh launcher v{} starting", env!("CARGO_PKG_VERSION"));

    let services = SessionServices {
        loader: Arc::new(ProcessEngine::new(settings.engine_args.clone())),
        secrets: Arc::new(FileSecretStore::new(config.secrets_file())),
        log: Arc::new(LogService::default()),
        credential,
    };
    let mut launcher = Launcher::new(settings, form, services);

    let Some(state) = launcher.on_connect(&CrosstermTerminal).await? else {
        for entry in launcher.log().get_recent(FAILURE_LOG_LINES).await {
            eprintln!("{}", style(entry.format()).red());
        }
        anyhow::bail!("no session was started");
    };

    if let Some(session) = launcher.registry().current().await {
        eprintln!(
            "{} {} after {} ({})",
            style("Session").bold(),
            state.display_str(),
            session.format_duration(),
            session.format_traffic()
        );
    }

    if state.is_error() {
        anyhow::bail!("mosh client crashed");
    }
    Ok(())
}

async fn store_key(config: &ConfigService, path: &Path) -> anyhow::Result<()> {
    let (pem, info) = KeyService::read_private_key(path).await?;
    if info.encrypted {
        eprintln!(
            "{} key is passphrase protected; the engine must be able to decrypt it",
            style("!").yellow()
        );
    }

    let store = FileSecretStore::new(config.secrets_file());
    store.set(SSH_KEY_NAME, &pem).await?;

    println!(
        "{} Stored {} key {} in {}",
        style("✓").green(),
        info.algorithm,
        info.fingerprint,
        store.path().display()
    );
    Ok(())
}
