use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use records_api::{app, config, database, AppState};

#[derive(Debug, Parser)]
#[command(name = "records-api", version, about = "Academic records API server")]
struct Args {
    /// Port to listen on
    #[arg(long, env = "RECORDS_API_PORT")]
    port: Option<u16>,

    /// postgres://... or memory:
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Apply schema migrations before serving
    #[arg(long)]
    migrate: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting Records API in {:?} mode", config.environment);

    let store = database::connect(&args.database_url, &config.database)
        .await
        .with_context(|| format!("failed to open {}", database::manager::redacted_url(&args.database_url)))?;

    if args.migrate {
        store.migrate().await.context("failed to apply migrations")?;
        tracing::info!("Migrations applied");
    }

    let app = app(AppState::new(store));

    // Fall back to PORT for platforms that inject it
    let port = args
        .port
        .or_else(|| std::env::var("PORT").ok().and_then(|s| s.parse::<u16>().ok()))
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Records API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
