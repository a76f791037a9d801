// Main entry point - Dependency injection and server setup
use std::sync::Arc;
use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use election_watch::application::analysis_service::AnalysisService;
use election_watch::application::dashboard_service::DashboardService;
use election_watch::application::insight_panel::InsightPanel;
use election_watch::infrastructure::config::load_config;
use election_watch::infrastructure::dataset_loader::load_dataset;
use election_watch::infrastructure::gemini_client::GeminiClient;
use election_watch::presentation::app_state::AppState;
use election_watch::presentation::handlers::{
    get_analysis, get_dashboard, health_check, refresh, search_constituencies,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_config().context("Failed to load configuration")?;
    tracing::debug!("Configuration: {:?}", config);

    // Load the results snapshot (infrastructure layer)
    let dataset = Arc::new(load_dataset(&config.dataset)?);
    let generator = Arc::new(GeminiClient::new(
        config.analysis.endpoint.clone(),
        config.analysis.model.clone(),
        config.analysis.timeout(),
    )?);

    // Create services (application layer)
    let analysis_service = AnalysisService::new(config.analysis.settings(), generator);
    let insight_panel = Arc::new(InsightPanel::new(analysis_service));
    insight_panel.load(dataset.clone());
    let dashboard_service = DashboardService::new(dataset);

    // Create application state
    let state = Arc::new(AppState {
        dashboard_service,
        insight_panel,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(get_dashboard))
        .route("/constituencies", get(search_constituencies))
        .route("/analysis", get(get_analysis))
        .route("/refresh", post(refresh))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;
    tracing::info!("Starting election-watch service on {}", config.server.bind);

    axum::serve(listener, router).await?;

    Ok(())
}
