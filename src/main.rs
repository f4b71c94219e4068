use clap::Parser;
use review_queue::core::ConfigProvider;
use review_queue::utils::{logger, validation::Validate};
use review_queue::{
    CliConfig, EtlEngine, EtlError, LocalStorage, ReviewQueuePipeline, ScanBound, ScanDatePrompt,
    TomlConfig,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting review-queue");

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            TomlConfig::from_file(path).unwrap_or_else(|e| fail(e))
        }
        None => TomlConfig::default(),
    };
    config.apply_cli(&cli);
    tracing::debug!("Effective config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        fail(e);
    }

    // The report must be there before the user is asked anything.
    let storage = LocalStorage::new(".");
    if let Err(e) = storage.ensure_readable(config.input_path()) {
        tracing::error!("❌ Cannot open report '{}': {}", config.input_path(), e);
        fail(e);
    }

    let now = chrono::Local::now().naive_local();
    let bound = match &cli.since {
        Some(since) => ScanBound::from_flag(since, now, config.default_lookback())
            .unwrap_or_else(|e| fail(e)),
        None => {
            let stdin = std::io::stdin();
            ScanDatePrompt::new(stdin.lock(), std::io::stdout(), config.default_lookback())
                .ask(now)
                .unwrap_or_else(|e| fail(e))
        }
    };
    tracing::info!("Scan bound: {} rows", bound);

    let pipeline = ReviewQueuePipeline::new(storage, config, bound);
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Review queue built successfully!");
            println!("✅ Review queue written to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Review queue build failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            fail(e);
        }
    }

    Ok(())
}

fn fail(e: EtlError) -> ! {
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code().max(1));
}
