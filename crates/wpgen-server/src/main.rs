//! wpgen server - waypoint dialogue backend

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wpgen_server::config::{Config, LogFormat};
use wpgen_server::state::AppState;
use wpgen_server::{api, loops, persistence};

const HISTORY_QUEUE_CAPACITY: usize = 1024;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    let (text_layer, json_layer) = match config.log_format {
        LogFormat::Text => (Some(tracing_subscriber::fmt::layer()), None),
        LogFormat::Json => (None, Some(tracing_subscriber::fmt::layer().json())),
    };
    tracing_subscriber::registry()
        .with(text_layer)
        .with(json_layer)
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wpgen_server=debug".parse()?),
        )
        .init();

    tracing::info!("Starting wpgen server...");
    tracing::info!(
        "Distance model {:?}, max segments {}, exports to {}",
        config.distance_model,
        config.max_segments,
        config.export_dir.display()
    );

    let db = persistence::init_database(&config.database_path, config.database_max_connections)
        .await?;
    let port = config.server_port;

    for admin_id in &config.admin_ids {
        persistence::admins::add_admin(db.pool(), *admin_id, None, None).await?;
    }
    if !config.admin_ids.is_empty() {
        tracing::info!("Admin registry seeded with {} ids", config.admin_ids.len());
    }

    let (history_tx, history_rx) = mpsc::channel(HISTORY_QUEUE_CAPACITY);
    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    let state = Arc::new(AppState::new(config, db.clone(), history_tx));

    // Start background loops
    let persist = tokio::spawn(loops::persist_loop::run_persist_loop(
        db,
        history_rx,
        shutdown_tx.subscribe(),
    ));
    let expiry = tokio::spawn(loops::session_expiry_loop::run_session_expiry_loop(
        state.clone(),
        shutdown_tx.subscribe(),
    ));

    let app = api::routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let signal_tx = shutdown_tx.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", err);
                std::future::pending::<()>().await;
            }
            tracing::info!("Shutdown requested");
            let _ = signal_tx.send(());
        })
        .await?;

    let _ = shutdown_tx.send(());
    let _ = persist.await;
    let _ = expiry.await;
    tracing::info!("wpgen server stopped");
    Ok(())
}
