//! Single-elimination bracket server.
//!
//! Serves keyed tournaments over HTTP, kept in memory or in PostgreSQL, with
//! optional champion notarization on an external ledger.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Error;
use knockout::{
    MemoryTournamentStore, PgTournamentStore, Randomness, TournamentManager, TournamentStore,
    db::Database,
    history::{HttpChampionLedger, LogMatchRecorder, MatchRecorder, PgMatchRecorder},
};
use ko_server::{
    api,
    config::{ServerConfig, StoreBackend},
    logging, metrics,
};
use pico_args::Arguments;
use tracing::{error, info, warn};

const HELP: &str = "\
Run a single-elimination tournament bracket server

USAGE:
  ko_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:6969]
  --db-url     URL         Database connection string  [default: env DATABASE_URL]
  --store      BACKEND     memory or postgres          [default: env STORE_BACKEND or memory]
  --seed       N           Seed bracket shuffles for reproducible draws

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  STORE_BACKEND            memory | postgres
  DATABASE_URL             PostgreSQL connection string
  MIN_PLAYERS/MAX_PLAYERS  Accepted tournament sizes
  LEDGER_URL               Champion ledger base URL (optional)
  METRICS_BIND             Prometheus exporter address (optional)
  (See .env file for all configuration options)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let bind: Option<SocketAddr> = pargs.opt_value_from_str("--bind")?;
    let database_url: Option<String> = pargs.opt_value_from_str("--db-url")?;
    let store: Option<StoreBackend> = pargs.opt_value_from_str("--store")?;
    let seed: Option<u64> = pargs.opt_value_from_str("--seed")?;

    logging::init();

    let config = ServerConfig::from_env(bind, database_url, store, seed)?;
    config.validate()?;

    info!("Starting bracket server at {}", config.bind);

    if let Some(addr) = config.metrics_bind {
        metrics::init_metrics(addr).map_err(|e| anyhow::anyhow!(e))?;
        info!("Prometheus metrics exported on {}", addr);
    }

    // Select store and match history backends
    let mut database = None;
    let (store, recorder): (Arc<dyn TournamentStore>, Arc<dyn MatchRecorder>) =
        match config.store {
            StoreBackend::Memory => {
                info!("Using in-memory tournament store");
                (
                    Arc::new(MemoryTournamentStore::new()),
                    Arc::new(LogMatchRecorder),
                )
            }
            StoreBackend::Postgres => {
                info!("Connecting to database: {}", config.database.database_url);
                let db = Database::new(&config.database)
                    .await
                    .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;

                let started = Instant::now();
                db.migrate()
                    .await
                    .map_err(|e| anyhow::anyhow!("Failed to prepare schema: {}", e))?;
                logging::log_database_operation(
                    "ensure_schema",
                    "*",
                    started.elapsed().as_millis() as u64,
                );

                info!("Database connected successfully");
                let pool = db.pool().clone();
                database = Some(db);
                (
                    Arc::new(PgTournamentStore::new(pool.clone())),
                    Arc::new(PgMatchRecorder::new(pool)),
                )
            }
        };

    let mut manager = TournamentManager::new(store, recorder)
        .with_randomness(Randomness::from_seed(config.seed));

    if let Some(seed) = config.seed {
        warn!("Bracket shuffles seeded with {seed}; draws are reproducible");
    }

    if let Some(ledger) = &config.ledger {
        let client = HttpChampionLedger::new(&ledger.url, Duration::from_secs(ledger.timeout_secs))
            .map_err(|e| anyhow::anyhow!("Failed to build ledger client: {}", e))?;
        logging::log_ledger_event(
            None,
            "configured",
            &format!("Notarizing champions at {}", client.endpoint()),
        );
        manager = manager.with_ledger(Arc::new(client));
    }

    let manager = Arc::new(manager);
    let api_state = api::AppState {
        manager: manager.clone(),
        limits: config.limits,
    };

    // Create router
    let app = api::create_router(api_state);

    // Start HTTP server
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", config.bind, e))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Shutting down server...");

    // Let in-flight notarizations finish before the runtime goes away
    manager.wait_for_ledger().await;
    logging::log_ledger_event(None, "drained", "All notarizations finished");

    if let Some(db) = database {
        db.close().await;
    }

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
