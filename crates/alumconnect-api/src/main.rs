//! AlumConnect API Server

use alumconnect_api::mail::{HttpMailer, LogMailer, Mailer};
use alumconnect_api::{auth::MemoryUserStore, create_router, state::AppState};
use alumconnect_core::AppConfig;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "alumconnect_api=debug,tower_http=debug".into()),
        )
        .init();

    // Load configuration
    let config = AppConfig::from_env()?;
    config.check_secrets()?;

    tokio::fs::create_dir_all(&config.uploads.dir).await?;

    // Without a configured relay, email flows log instead of delivering.
    let mailer: Arc<dyn Mailer> = match config.mail.api_url.clone() {
        Some(api_url) => Arc::new(HttpMailer::new(
            api_url,
            config.mail.api_key.clone().unwrap_or_default(),
            config.mail.from_address.clone(),
        )),
        None => {
            tracing::warn!("MAIL_API_URL not set, emails will only be logged");
            Arc::new(LogMailer)
        }
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(
        config,
        Arc::new(MemoryUserStore::new()),
        mailer,
    ));

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("AlumConnect API starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);
    tracing::info!("OpenAPI spec at http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
