//! BloodLink server binary

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bloodlink::config::{AppConfig, LogFormat, LogTarget, LoggingConfig};
use bloodlink::services::{start_sweep_scheduler, SmsClient};
use bloodlink::{create_router, db, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let config = AppConfig::load()?;
    let _log_guard = init_logging(&config.logging)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting BloodLink server"
    );

    ensure_database_dir(&config.database.url)?;
    let pool = db::init_pool(&config.database).await?;
    info!(url = %config.database.url, "Database ready");

    let sms = match &config.sms {
        Some(sms_config) => {
            let client = SmsClient::new(sms_config.clone())
                .context("Failed to build SMS client")?;
            info!(from = %sms_config.from_phone, "SMS provider configured");
            Some(Arc::new(client))
        }
        None => {
            warn!("No SMS provider configured; notifications will be recorded as failed");
            None
        }
    };

    let _sweep = start_sweep_scheduler(pool.clone(), config.donor.clone());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server host/port")?;

    let state = AppState {
        config,
        db: pool,
        sms,
    };
    let router = create_router(state);

    info!(%addr, "Listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}

/// Initialize the tracing subscriber per the logging config
///
/// Returns the file appender guard, which must stay alive for buffered log
/// lines to be flushed.
fn init_logging(
    config: &LoggingConfig,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    let mut guard = None;

    if matches!(config.target, LogTarget::Console | LogTarget::Both) {
        let layer = match config.format {
            LogFormat::Pretty => fmt::layer().pretty().boxed(),
            LogFormat::Json => fmt::layer().json().boxed(),
            LogFormat::Compact => fmt::layer().compact().boxed(),
        };
        layers.push(layer);
    }

    if matches!(config.target, LogTarget::File | LogTarget::Both) {
        std::fs::create_dir_all(&config.log_dir)
            .with_context(|| format!("Failed to create log directory {:?}", config.log_dir))?;

        let appender = if config.daily_rotation {
            tracing_appender::rolling::daily(&config.log_dir, &config.log_prefix)
        } else {
            tracing_appender::rolling::never(&config.log_dir, &config.log_prefix)
        };
        let (writer, writer_guard) = tracing_appender::non_blocking(appender);
        guard = Some(writer_guard);

        let layer = match config.format {
            LogFormat::Pretty => fmt::layer().with_writer(writer).with_ansi(false).pretty().boxed(),
            LogFormat::Json => fmt::layer().with_writer(writer).with_ansi(false).json().boxed(),
            LogFormat::Compact => fmt::layer().with_writer(writer).with_ansi(false).compact().boxed(),
        };
        layers.push(layer);
    }

    tracing_subscriber::registry().with(layers).with(filter).init();

    Ok(guard)
}

/// Create the parent directory for a `sqlite://` database path if needed
fn ensure_database_dir(url: &str) -> Result<()> {
    if let Some(path) = url.strip_prefix("sqlite://") {
        if path != ":memory:" {
            if let Some(parent) = std::path::Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create database directory {:?}", parent)
                    })?;
                }
            }
        }
    }
    Ok(())
}

fn print_help() {
    println!(
        "{} {}\n\n\
         Blood donor matching and notification backend.\n\n\
         USAGE:\n    bloodlink [OPTIONS]\n\n\
         OPTIONS:\n    \
         -h, --help       Print this help message\n    \
         -V, --version    Print version information\n\n\
         CONFIGURATION:\n    \
         Reads config.yaml from the working directory, or the file named by\n    \
         the BLOODLINK_CONFIG environment variable, or /etc/bloodlink/config.yaml.",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
}
