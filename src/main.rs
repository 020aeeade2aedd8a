use anyhow::Context;
use clap::Parser;
use service_hours::core::ConfigProvider;
use service_hours::utils::{logger, validation::Validate};
use service_hours::{
    CliConfig, GroupMeClient, LocalStorage, RosterError, RosterStore, Session, Settings, SyncEngine,
    TomlConfig,
};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting service-hours");

    let mut settings = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path);
            let config = TomlConfig::from_file(path)
                .with_context(|| format!("failed to load config file '{}'", path))?;
            if let Err(e) = config.validate() {
                exit_with(&e);
            }
            Settings::from_toml(&config)
        }
        None => Settings::default(),
    };
    settings.apply_cli(&cli);

    if let Err(e) = settings.validate() {
        exit_with(&e);
    }
    tracing::debug!("Effective group: {}, roster file: {}", settings.group_name(), settings.roster_path());

    let sync = if settings.members_url().is_some() {
        let client = GroupMeClient::from_config(&settings, settings.timeout())
            .context("failed to build the member API client")?;
        Some(SyncEngine::new(client))
    } else {
        tracing::info!("No group id configured; populate/sync are disabled");
        None
    };

    let store = RosterStore::new(LocalStorage::default());
    let mut session = Session::start(store, sync, settings).await;

    println!(
        "Tracking '{}' ({} members). Type 'help' for commands.",
        session.roster().name(),
        session.roster().len()
    );

    let stdin = BufReader::new(tokio::io::stdin());
    session
        .run(stdin, tokio::io::stdout())
        .await
        .context("interactive session failed")?;

    Ok(())
}

fn exit_with(e: &RosterError) -> ! {
    if e.is_config_error() {
        tracing::error!("Configuration validation failed: {}", e);
    } else {
        tracing::error!("Startup failed: {}", e);
    }
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}
