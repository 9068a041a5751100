use dotenvy::dotenv;
use std::sync::Arc;
use stocklens::{
    config,
    core::insights::InsightsClient,
    errors::Result,
    web::{self, AppState},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok(); // Make it non-fatal, env vars can be set externally
    info!("Attempted to load .env file.");

    // 3. Load settings (config.toml, defaults if absent)
    let settings = config::settings::load_default_settings()?;
    info!("Successfully processed application configuration.");

    // 4. Initialize database
    let database_url = config::database::get_database_url();
    let db = config::database::create_connection(&database_url, settings.ingest.lock_wait())
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| tracing::error!("Failed to initialize database: {}", e))?;
    config::database::create_tables(&db).await?;

    // 5. Seed the bootstrap tenant (if configured)
    if let Some(seeded) = config::accounts::seed_bootstrap_user(&db).await? {
        info!(email = %seeded.email, "Seeded bootstrap tenant.");
    }

    // 6. Run the server
    let insights = InsightsClient::from_env(&settings.insights).map(Arc::new);
    if insights.is_none() {
        warn!("INSIGHTS_API_KEY not set; /api/ai/insights will report itself unconfigured.");
    }

    let state = AppState::new(
        db,
        insights,
        Arc::new(settings.ingest),
        settings.session.ttl(),
    );

    let listener = tokio::net::TcpListener::bind(&settings.server.bind_addr).await?;
    info!(addr = %settings.server.bind_addr, "stocklens listening");
    web::serve(listener, state, settings.server.max_upload_bytes).await
}
