//! Transport Connectivity Tester - Main CLI Application

use clap::Parser;
use std::process;
use transport_connectivity_tester::{
    cli::Cli,
    collector,
    error::{AppError, Result},
    executor::ConnectivityTester,
    logging::{LogLevel, Logger},
    output::{FormattingOptions, SummaryFormatter},
    store::SettingsStore,
    PKG_NAME, VERSION,
};

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(1);
    }));

    // Pick up TCT_* variables from a local .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    if let Err(message) = cli.validate() {
        eprintln!("Error: {}", message);
        process::exit(1);
    }

    if let Err(e) = run_application(cli).await {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> Result<()> {
    let min_level = if cli.debug {
        LogLevel::Debug
    } else if cli.verbose {
        LogLevel::Info
    } else {
        LogLevel::Warn
    };
    let logger = Logger::new("tct")
        .with_min_level(min_level)
        .with_color(!cli.no_color);

    if cli.debug {
        logger.debug(&format!(
            "{} v{} ({}, built {})",
            PKG_NAME,
            VERSION,
            option_env!("GIT_COMMIT").unwrap_or("unversioned"),
            env!("BUILD_TIME"),
        ));
    }

    let store = SettingsStore::new(&cli.settings);
    let mut settings = store.load()?;
    cli.apply_to(&mut settings);

    if !cli.add.is_empty() {
        // Persist newly added configurations even when testing fails later.
        store.save(&settings)?;
        logger.info(&format!("added {} configuration(s)", cli.add.len()));
    }

    let formatter = SummaryFormatter::new(FormattingOptions {
        enable_color: !cli.no_color,
        verbose: cli.verbose || cli.debug,
    });

    if cli.list {
        println!("{}", formatter.format_summary(&settings));
        return Ok(());
    }

    if settings.configs.is_empty() {
        return Err(AppError::config(
            "no transport configurations to test; add one with --add <descriptor>",
        ));
    }

    let tester = ConnectivityTester::new(logger.child("executor"));
    match cli.index {
        Some(index) => {
            tester.test_one(&mut settings, index).await?;
        }
        None => {
            let failures = tester.test_all(&mut settings).await;
            for (index, error) in &failures {
                logger.warn(&format!("configuration {} was not tested: {}", index, error));
            }
        }
    }
    store.save(&settings)?;

    if cli.submit {
        collector::submit_all(&mut settings, &logger.child("collector")).await?;
        store.save(&settings)?;
    }

    println!("{}", formatter.format_summary(&settings));
    Ok(())
}
