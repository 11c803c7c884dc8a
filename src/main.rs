use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use tokio::sync::Notify;
use tracing_subscriber::EnvFilter;

use blog_api_rust::authors::AuthorDirectory;
use blog_api_rust::config;
use blog_api_rust::posts::{PostStore, ValidationRules};
use blog_api_rust::router;
use blog_api_rust::seed::{self, SeedData};
use blog_api_rust::state::AppState;

#[derive(Parser)]
#[command(name = "blog-api")]
#[command(about = "Multi-author blog backend")]
#[command(version)]
struct Args {
    #[arg(long, help = "Port to listen on (overrides BLOG_API_PORT)")]
    port: Option<u16>,

    #[arg(long, value_name = "SECS", help = "Seconds to wait for open connections on shutdown")]
    graceful_timeout: Option<u64>,

    #[arg(long, help = "Seed data file (overrides SEED_FILE)")]
    seed_file: Option<String>,

    #[arg(long, help = "Start with an empty store")]
    no_seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up SECURITY_JWT_SECRET, SEED_FILE, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = config::config();
    tracing::info!("Starting Blog API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        bail!("SECURITY_JWT_SECRET must be set in {:?} mode", config.environment);
    }
    if blog_api_rust::is_production!() && config.security.admin_password == "admin" {
        bail!("refusing to start in production with the default admin password");
    }

    let store = PostStore::with_rules(ValidationRules::new(&config.validation.spam_phrases));

    let seed_data = if config.seed.enabled && !args.no_seed {
        let path = args.seed_file.as_deref().unwrap_or(&config.seed.path);
        tracing::info!("Seeding blog posts from {}", path);
        seed::load_seed_file(path).with_context(|| format!("loading seed data from {}", path))?
    } else {
        SeedData::default()
    };
    seed::seed_store(&store, &seed_data).await;

    tracing::info!("Creating author directory");
    let authors = AuthorDirectory::seeded(seed_data.authors(), &config.security.admin_password);

    let app = router::app(AppState::new(store, authors));

    let port = args.port.unwrap_or(config.server.port);
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Blog API listening on http://{}", bind_addr);

    let shutdown = Arc::new(Notify::new());
    let server = tokio::spawn(
        axum::serve(listener, app)
            .with_graceful_shutdown({
                let shutdown = Arc::clone(&shutdown);
                async move { shutdown.notified().await }
            })
            .into_future(),
    );

    shutdown_signal().await;
    tracing::info!("Shutting down server");
    shutdown.notify_one();

    let grace = Duration::from_secs(args.graceful_timeout.unwrap_or(config.server.graceful_timeout_secs));
    match tokio::time::timeout(grace, server).await {
        Ok(joined) => joined.context("server task failed")?.context("server error")?,
        Err(_) => tracing::warn!("Open connections still active after {:?}; exiting", grace),
    }

    tracing::info!("Server exited properly");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
