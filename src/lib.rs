// Election results dashboard: snapshot aggregation, constituency search and
// AI trend summaries behind a small JSON API.
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
