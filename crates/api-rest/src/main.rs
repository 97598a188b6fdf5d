//! Wardbook REST API server binary.
//!
//! ## Purpose
//! Runs the hospital record REST API: a single `hospital` table of patient
//! rows behind JSON endpoints, with Swagger UI mounted at `/swagger-ui`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wardbook_core::RecordStore;

/// Main entry point for the Wardbook REST API server
///
/// # Environment Variables
/// - `WARDBOOK_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `DATABASE_URL`: SQLite connection string (default:
///   "sqlite://wardbook.db?mode=rwc")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the store cannot be opened or its schema created,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("wardbook_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("WARDBOOK_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://wardbook.db?mode=rwc".into());

    tracing::info!("-- Starting Wardbook REST API on {}", addr);

    let store = RecordStore::connect(&database_url).await?;
    store.init_schema().await?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, api_rest::app(store)).await?;

    Ok(())
}
