// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod dataset_loader;
pub mod gemini_client;
pub mod http_response;
