// Presentation layer - HTTP handlers
pub mod app_state;
pub mod handlers;
