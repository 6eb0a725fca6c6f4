//! # Portfolio Assistant API
//!
//! The web server for the portfolio chat assistant. It exposes the chat
//! surface (sessions and grounded replies) and the scheduling surface
//! (free-slot listing and meeting booking) as a small JSON API.
//!
//! ## Architecture
//!
//! - **Routes**: endpoint and URL structure
//! - **Handlers**: request processing on top of the domain crates
//! - **Middleware**: error-to-HTTP mapping
//! - **Config**: environment configuration
//!
//! Handlers hold only trait objects for the external boundaries, so tests
//! drive them with the mock implementations from the domain crates.

/// Environment configuration
pub mod config;
/// Request handlers
pub mod handlers;
/// Error-mapping middleware
pub mod middleware;
/// Route definitions
pub mod routes;

use std::sync::Arc;

use axum::Router;
use eyre::{Result, WrapErr};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use portfolio_calendar::{
    CredentialProvider, FreeBusyOracle, GoogleCalendarClient, RefreshingTokenProvider, Scheduler,
    SlotFinder, StaticTokenProvider,
};
use portfolio_chat::{OpenAiClient, Responder, SessionStore};
use portfolio_core::config::SchedulingConfig;
use portfolio_knowledge::ChromaClient;

/// Shared application state handed to every handler.
pub struct ApiState {
    pub slot_finder: SlotFinder,
    pub scheduler: Scheduler,
    pub responder: Responder,
    pub sessions: SessionStore,
    pub scheduling: SchedulingConfig,
}

/// Wire the real external clients into an [`ApiState`].
pub fn build_state(config: &config::ApiConfig) -> Result<Arc<ApiState>> {
    let timeout = std::time::Duration::from_secs(config.request_timeout);

    let credentials: Arc<dyn CredentialProvider> = match (
        &config.google_client_id,
        &config.google_client_secret,
        &config.google_refresh_token,
    ) {
        (Some(id), Some(secret), Some(refresh)) => Arc::new(
            RefreshingTokenProvider::new(id.clone(), secret.clone(), refresh.clone(), timeout)
                .wrap_err("Failed to build refreshing credential provider")?,
        ),
        _ => {
            let token = config
                .google_access_token
                .as_ref()
                .ok_or_else(|| eyre::eyre!(
                    "Either GOOGLE_CLIENT_ID/GOOGLE_CLIENT_SECRET/GOOGLE_REFRESH_TOKEN or GOOGLE_ACCESS_TOKEN must be set"
                ))?;
            Arc::new(StaticTokenProvider::new(token.clone()))
        }
    };

    let calendar = GoogleCalendarClient::new(credentials, timeout)
        .wrap_err("Failed to build calendar client")?;
    let calendar: Arc<dyn portfolio_calendar::CalendarApi> = Arc::new(calendar);

    let oracle: Arc<dyn portfolio_calendar::AvailabilityOracle> = Arc::new(FreeBusyOracle::new(
        calendar.clone(),
        config.scheduling.calendar_id.clone(),
    ));

    let slot_finder = SlotFinder::new(oracle.clone(), config.scheduling.clone());
    let scheduler = Scheduler::new(oracle, calendar, config.scheduling.clone());

    let knowledge: Arc<dyn portfolio_knowledge::KnowledgeIndex> = Arc::new(
        ChromaClient::new(
            config.knowledge_base_url.clone(),
            config.knowledge_collection.clone(),
            timeout,
        )
        .wrap_err("Failed to build knowledge client")?,
    );

    let mut completions =
        OpenAiClient::new(config.openai_api_key.clone(), config.chat_model.clone(), timeout)
            .wrap_err("Failed to build completions client")?;
    if let Some(base_url) = &config.openai_base_url {
        completions = completions.with_base_url(base_url.clone());
    }
    let completions: Arc<dyn portfolio_chat::CompletionApi> = Arc::new(completions);

    let responder = Responder::new(
        completions,
        knowledge,
        Responder::default_system_prompt(&config.owner_name),
    );

    Ok(Arc::new(ApiState {
        slot_finder,
        scheduler,
        responder,
        sessions: SessionStore::new(),
        scheduling: config.scheduling.clone(),
    }))
}

/// Build the application router over the given state.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        .merge(routes::health::routes())
        .merge(routes::chat::routes())
        .merge(routes::slots::routes())
        .merge(routes::meetings::routes())
        .with_state(state)
}

/// Start the API server.
pub async fn start_server(config: config::ApiConfig, state: Arc<ApiState>) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let app = app(state);

    let app = if let Some(origins) = &config.cors_origins {
        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(
                origins
                    .iter()
                    .filter_map(|origin| origin.parse().ok())
                    .collect::<Vec<_>>(),
            );

        app.layer(cors)
    } else {
        app
    };

    let app = app.layer(tower_http::timeout::TimeoutLayer::new(
        std::time::Duration::from_secs(config.request_timeout),
    ));

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
