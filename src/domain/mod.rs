// Domain layer - Election records and dashboard read models
pub mod dashboard;
pub mod election;
