// Application layer - Aggregation, filtering and analysis use cases
pub mod aggregation;
pub mod analysis_service;
pub mod dashboard_service;
pub mod filter;
pub mod insight_panel;
