// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::application::insight_panel::InsightPanel;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub dashboard_service: DashboardService,
    pub insight_panel: Arc<InsightPanel>,
}
