use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shelfwatch_api::config::ServerConfig;
use shelfwatch_api::dispatch::DispatchEngine;
use shelfwatch_api::router::build_app_router;
use shelfwatch_api::state::AppState;
use shelfwatch_db::resolver::PgRelationResolver;
use shelfwatch_events::delivery::email::{EmailConfig, EmailDelivery, EmailSender};
use shelfwatch_events::EventBus;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shelfwatch_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = shelfwatch_db::create_pool(&database_url).await?;
    tracing::info!("Database connection pool created");

    shelfwatch_db::health_check(&pool).await?;
    shelfwatch_db::run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());

    // --- Email (optional) ---
    let mailer: Option<Arc<dyn EmailSender>> = match EmailConfig::from_env() {
        Some(email_config) => {
            tracing::info!(host = %email_config.smtp_host, "Email delivery configured");
            Some(Arc::new(EmailDelivery::new(email_config)))
        }
        None => {
            tracing::info!("SMTP_HOST not set, alert emails disabled");
            None
        }
    };

    // --- Dispatch engine ---
    let resolver = Arc::new(PgRelationResolver::new(pool.clone()));
    let engine = DispatchEngine::new(
        pool.clone(),
        resolver.clone(),
        mailer,
        config.frontend_url.clone(),
    );
    let engine_handle = tokio::spawn(engine.run(event_bus.subscribe()));
    tracing::info!("Dispatch engine started");

    // --- State & router ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus,
        resolver,
    };
    let app = build_app_router(state, &config);

    // --- Serve ---
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!(%addr, "Shelfwatch API listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    engine_handle.abort();
    Ok(())
}
