//! Employee Directory - REST backend for employee records.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use employee_directory as app;

use app::api::{self, AppState};
use app::config::{AppConfig, ConfigLoadResult};
use app::db;
use app::service::EmployeeService;

/// REST backend for employee records.
#[derive(Parser)]
#[command(name = "employee-directory")]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,

    /// Explicit config file path
    #[arg(long, value_name = "PATH", conflicts_with = "dev")]
    config: Option<PathBuf>,

    /// Validate the config file and exit
    #[arg(long)]
    check_config: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = match (&cli.config, cli.dev) {
        (Some(path), _) => path.clone(),
        (None, true) => PathBuf::from("config.toml"),
        (None, false) => AppConfig::default_path(),
    };

    let (config, missing) = match AppConfig::try_load(&config_path) {
        ConfigLoadResult::Loaded(config) => (config, false),
        ConfigLoadResult::Missing => (AppConfig::default(), true),
        ConfigLoadResult::Invalid(e) => {
            eprintln!("Config invalid ({}): {e}", config_path.display());
            return ExitCode::FAILURE;
        }
    };

    if cli.check_config {
        return match toml::to_string_pretty(&config) {
            Ok(effective) => {
                println!("# {}{}", config_path.display(), if missing { " (missing, defaults)" } else { "" });
                println!("{effective}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Failed to render config: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let _log_guard = app::logging::init(&config.logging);
    tracing::info!("Employee Directory starting...");
    tracing::info!("Config path: {:?}", config_path);
    if missing {
        tracing::warn!("Config missing, using defaults");
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to create tokio runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Server error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Connect, prepare the schema and serve until Ctrl+C.
async fn run(config: AppConfig) -> anyhow::Result<()> {
    let conn = db::connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    db::test_connection(&conn).await.context("Database is not responding")?;
    db::ensure_schema(&conn).await.context("Failed to prepare schema")?;

    tracing::info!("Database: {}", db::backend_name(&conn));
    if let Ok(counts) = db::get_table_counts(&conn).await {
        tracing::info!(
            "Tables: {} employees ({} active)",
            counts.employees,
            counts.active_employees
        );
    }

    let app = api::build_app(AppState::new(EmployeeService::new(conn)));

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
