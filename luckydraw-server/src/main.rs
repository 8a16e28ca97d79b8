//! Lucky draw backend: draw endpoints, SMS relay and an optional static UI.

#[cfg(test)]
mod http_tests;
mod routes;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use clap::Parser;
use luckydraw::io::config::{DEFAULT_CONFIG_PATH, SmsConfig, load_config};
use luckydraw::io::sms::{HttpSmsTransport, LoggingSmsTransport};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::info;

use crate::state::{AppState, SharedSms};

#[derive(Parser)]
#[command(name = "luckydraw-server")]
#[command(about = "Backend for lotto and pension draws and SMS delivery")]
struct Args {
    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to listen on
    #[arg(long, default_value = "3000")]
    port: u16,

    /// Config file (TOML); only the `[sms]` section is used
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Directory containing UI static files
    #[arg(long)]
    ui_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("luckydraw_server=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let cfg = load_config(&args.config)?;
    cfg.validate()?;
    let sms_cfg = cfg.sms.clone();
    // The blocking HTTP client must be built off the async workers.
    let sms = tokio::task::spawn_blocking(move || build_sms(&sms_cfg))
        .await
        .context("build sms transport")??;
    info!(
        config = %args.config.display(),
        sms_endpoint = ?cfg.sms.endpoint,
        "starting luckydraw-server"
    );

    let state = AppState::new(sms);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .merge(routes::router())
        .layer(cors)
        .with_state(state);

    if let Some(ui_dir) = args.ui_dir {
        if ui_dir.exists() {
            info!(ui_dir = %ui_dir.display(), "serving static UI files");
            app = app
                .fallback_service(ServeDir::new(ui_dir).append_index_html_on_directories(true));
        } else {
            info!(ui_dir = %ui_dir.display(), "UI directory not found, API-only mode");
        }
    }

    let addr: SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_sms(cfg: &SmsConfig) -> anyhow::Result<SharedSms> {
    match &cfg.endpoint {
        Some(endpoint) => {
            let timeout = Duration::from_secs(cfg.timeout_secs);
            Ok(Arc::new(HttpSmsTransport::new(endpoint, timeout)?))
        }
        None => Ok(Arc::new(LoggingSmsTransport)),
    }
}
