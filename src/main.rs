mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use sf_av::ToolRegistry;
use sf_core::Config;
use sf_pipeline::{BatchCoordinator, ProcessRunner};

fn main() -> ExitCode {
    // Load .env before anything reads the environment (RUST_LOG included).
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "steadyforge=debug,sf_pipeline=debug,sf_av=debug,sf_core=debug".to_string()
        } else {
            "steadyforge=info,sf_pipeline=info,sf_av=info,sf_core=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run_batch(&cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(exit_code(&e))
        }
    }
}

/// Exit code for a fatal error. Per-file failures never get here.
fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<sf_core::Error>()
        .map(sf_core::Error::exit_code)
        .unwrap_or(1)
}

async fn run_batch(cli: &Cli) -> Result<()> {
    let config = cli.apply(Config::from_env());
    for warning in config.validate() {
        tracing::warn!("{warning}");
    }

    tracing::info!("Input directory: {}", config.input_dir.display());
    tracing::info!("Output directory: {}", config.output_dir.display());

    let tools = ToolRegistry::discover(&config.tools);
    for tool in tools.check_all().iter().filter(|t| t.available) {
        if let Some(ref path) = tool.path {
            tracing::info!(
                "Using {}: {} ({})",
                tool.name,
                path.display(),
                tool.version.as_deref().unwrap_or("unknown version")
            );
        }
    }

    let coordinator = BatchCoordinator::new(config, tools, Arc::new(ProcessRunner))
        .with_only(cli.only.clone());
    let report = coordinator.run().await?;

    print!("{report}");

    if let Some(ref path) = cli.report {
        // Report problems never change the exit code.
        match report.to_json() {
            Ok(json) => match std::fs::write(path, json) {
                Ok(()) => println!("Report written to {}", path.display()),
                Err(e) => tracing::warn!("Failed to write report {}: {e}", path.display()),
            },
            Err(e) => tracing::warn!("Failed to serialize report: {e}"),
        }
    }

    Ok(())
}
