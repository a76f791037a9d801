// HTTP request handlers
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Serialize)]
struct RefreshResponse {
    last_updated: DateTime<Utc>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Stats, seat chart, party table and the current insight panel state
pub async fn get_dashboard(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let analysis = state.insight_panel.snapshot();
    let dashboard = state.dashboard_service.dashboard(analysis).await;

    match json_response(&dashboard, accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Constituency search; an empty `q` lists every constituency
pub async fn search_constituencies(
    Query(query): Query<SearchQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let results = state.dashboard_service.search(&query.q);
    tracing::debug!("Search {:?} matched {} constituencies", query.q, results.results.len());

    match json_response(&results, accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Insight panel state: loading, success or fallback
pub async fn get_analysis(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let analysis = state.insight_panel.snapshot();

    match json_response(&analysis, accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Re-stamp the last-updated time
pub async fn refresh(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let last_updated = state.dashboard_service.refresh().await;

    match json_response(&RefreshResponse { last_updated }, accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::analysis_service::{
        AnalysisService, AnalysisSettings, MISSING_KEY_PLACEHOLDER,
    };
    use crate::application::dashboard_service::DashboardService;
    use crate::application::insight_panel::InsightPanel;
    use crate::domain::dashboard::AnalysisState;
    use crate::infrastructure::dataset_loader::mock_dataset;
    use crate::infrastructure::gemini_client::GeminiClient;
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use std::time::Duration;

    fn state() -> Arc<AppState> {
        let dataset = Arc::new(mock_dataset().unwrap());
        let generator = GeminiClient::new(
            "http://127.0.0.1:9".to_string(),
            "test-model".to_string(),
            Duration::from_secs(1),
        )
        .unwrap();
        let service = AnalysisService::new(AnalysisSettings::default(), Arc::new(generator));
        let insight_panel = Arc::new(InsightPanel::new(service));
        insight_panel.load(dataset.clone());

        Arc::new(AppState {
            dashboard_service: DashboardService::new(dataset),
            insight_panel,
        })
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_search_without_match() {
        let query = SearchQuery {
            q: "xyz123".to_string(),
        };
        let response = search_constituencies(Query(query), HeaderMap::new(), State(state()))
            .await
            .into_response();
        let json = body_json(response).await;
        assert_eq!(json["no_results"], true);
        assert_eq!(json["results"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_search_matches_code() {
        let query = SearchQuery {
            q: "SYL".to_string(),
        };
        let response = search_constituencies(Query(query), HeaderMap::new(), State(state()))
            .await
            .into_response();
        let json = body_json(response).await;
        assert_eq!(json["results"][0]["name"], "Sylhet-1");
        assert_eq!(json["results"][0]["status"], "WON");
    }

    #[tokio::test]
    async fn test_analysis_without_key_serves_placeholder() {
        let state = state();
        assert_eq!(
            state.insight_panel.settled().await,
            AnalysisState::Fallback(MISSING_KEY_PLACEHOLDER.to_string())
        );

        let response = get_analysis(HeaderMap::new(), State(state)).await.into_response();
        let json = body_json(response).await;
        assert_eq!(json["state"], "fallback");
        assert_eq!(json["text"], MISSING_KEY_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_dashboard_payload() {
        let response = get_dashboard(HeaderMap::new(), State(state())).await.into_response();
        let json = body_json(response).await;
        assert_eq!(json["stats"]["total_seats"], 300);
        assert_eq!(json["stats"]["announced_seats"], 208);
        assert_eq!(json["seat_chart"][0]["short_name"], "AL");
        assert_eq!(json["parties"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_refresh_returns_stamp() {
        let response = refresh(HeaderMap::new(), State(state())).await.into_response();
        let json = body_json(response).await;
        assert!(json["last_updated"].is_string());
    }
}
