// Dashboard read models
use super::election::ResultStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElectionStats {
    pub total_seats: u32,
    pub announced_seats: u32,
    pub leading_seats: u32,
    pub remaining_seats: u32,
    pub turnout_percent: f64,
}

/// One bar of the seat-distribution chart, or one row of the party table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartyStanding {
    pub short_name: String,
    pub name: String,
    pub won: u32,
    pub leading: u32,
    pub total: u32,
    pub color: String,
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateShare {
    pub id: String,
    pub name: String,
    pub party: String,
    pub symbol: String,
    pub color: String,
    pub votes: u64,
    pub share_percent: f64,
    /// `share_percent` formatted to one decimal place.
    pub display_percent: String,
    pub is_leader: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstituencyCard {
    pub id: String,
    pub code: String,
    pub name: String,
    pub status: ResultStatus,
    pub total_votes: u64,
    pub counted_votes: u64,
    pub top_candidates: Vec<CandidateShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub results: Vec<ConstituencyCard>,
    pub no_results: bool,
}

impl SearchResults {
    pub fn new(query: String, results: Vec<ConstituencyCard>) -> Self {
        let no_results = results.is_empty();
        Self {
            query,
            results,
            no_results,
        }
    }
}

/// Insight panel state: `Loading` until the analysis request settles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "text", rename_all = "lowercase")]
pub enum AnalysisState {
    Loading,
    Success(String),
    Fallback(String),
}

impl AnalysisState {
    pub fn is_loading(&self) -> bool {
        matches!(self, AnalysisState::Loading)
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            AnalysisState::Loading => None,
            AnalysisState::Success(text) | AnalysisState::Fallback(text) => Some(text),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub stats: ElectionStats,
    pub seat_chart: Vec<PartyStanding>,
    pub parties: Vec<PartyStanding>,
    pub last_updated: DateTime<Utc>,
    pub analysis: AnalysisState,
}
