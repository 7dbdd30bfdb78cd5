use maestro::core::ConfigProvider;
use maestro::utils::error::{ErrorSeverity, MaestroError};
use maestro::utils::{logger, validation::Validate};
use maestro::{
    AppointmentManager, CliConfig, LocalStorage, OpenAiClient, PromptBuilder, SalesAssistant,
    Session, TomlConfig,
};

#[tokio::main]
async fn main() {
    let cli = CliConfig::load();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting maestro");

    let result = match cli.config.clone() {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path);
            match TomlConfig::from_file(&path) {
                Ok(mut config) => {
                    if let Some(inventory) = &cli.inventory {
                        tracing::info!("Inventory overridden to: {}", inventory);
                        config.inventory.path = Some(inventory.clone());
                    }
                    run(config).await
                }
                Err(e) => Err(e),
            }
        }
        None => run(cli).await,
    };

    if let Err(e) = result {
        tracing::error!(
            "maestro failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run<C: ConfigProvider + Validate>(config: C) -> Result<(), MaestroError> {
    config.validate()?;

    let backend = OpenAiClient::from_config(&config)?;
    let prompt = PromptBuilder::new(config.assistant_name())
        .with_thinking_framework(config.thinking_framework());

    let mut assistant = SalesAssistant::new(backend, prompt);
    if let Some(max) = config.max_history_messages() {
        assistant = assistant.with_history_limit(max);
    }
    match config.inventory_path() {
        Some(path) => assistant.load_inventory(path),
        None => tracing::warn!("No inventory file given; answering without car data"),
    }

    let storage = LocalStorage::new(config.appointments_dir().to_string());
    let mut session = Session::new(assistant, AppointmentManager::new(storage));

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();
    let summary = session.run(&mut input, &mut output).await?;

    tracing::info!(
        "Session ended after {} turns, {} appointments booked",
        summary.turns,
        summary.appointments.len()
    );
    Ok(())
}
