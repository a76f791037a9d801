// Dashboard service - Use case for building the dashboard widgets
use crate::application::aggregation::{
    candidate_share_percent, election_stats, format_one_decimal, party_ranking,
};
use crate::application::filter::filter_constituencies;
use crate::domain::dashboard::{
    AnalysisState, CandidateShare, ConstituencyCard, Dashboard, ElectionStats, PartyStanding,
    SearchResults,
};
use crate::domain::election::{Constituency, ElectionDataset, PartySummary};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

const DASHBOARD_TITLE: &str = "ElectionWatchBD";
const PREVIEW_CANDIDATES: usize = 2;

#[derive(Clone)]
pub struct DashboardService {
    dataset: Arc<ElectionDataset>,
    last_updated: Arc<RwLock<DateTime<Utc>>>,
}

impl DashboardService {
    pub fn new(dataset: Arc<ElectionDataset>) -> Self {
        Self {
            dataset,
            last_updated: Arc::new(RwLock::new(Utc::now())),
        }
    }

    pub fn dataset(&self) -> &Arc<ElectionDataset> {
        &self.dataset
    }

    pub fn stats(&self) -> ElectionStats {
        election_stats(&self.dataset)
    }

    /// Seat chart bars, largest won + leading first.
    pub fn seat_chart(&self) -> Vec<PartyStanding> {
        party_ranking(self.dataset.parties())
            .into_iter()
            .map(standing)
            .collect()
    }

    /// Party table rows in dataset order.
    pub fn party_table(&self) -> Vec<PartyStanding> {
        self.dataset.parties().iter().map(standing).collect()
    }

    pub fn search(&self, query: &str) -> SearchResults {
        let cards = filter_constituencies(self.dataset.constituencies(), query)
            .into_iter()
            .map(card)
            .collect();
        SearchResults::new(query.to_string(), cards)
    }

    pub async fn last_updated(&self) -> DateTime<Utc> {
        *self.last_updated.read().await
    }

    /// Re-stamp the last-updated time. The dataset itself is not reloaded.
    pub async fn refresh(&self) -> DateTime<Utc> {
        let now = Utc::now();
        *self.last_updated.write().await = now;
        tracing::info!("Dashboard refreshed at {}", now.to_rfc3339());
        now
    }

    pub async fn dashboard(&self, analysis: AnalysisState) -> Dashboard {
        Dashboard {
            title: DASHBOARD_TITLE.to_string(),
            stats: self.stats(),
            seat_chart: self.seat_chart(),
            parties: self.party_table(),
            last_updated: self.last_updated().await,
            analysis,
        }
    }
}

fn standing(party: &PartySummary) -> PartyStanding {
    PartyStanding {
        short_name: party.short_name().to_string(),
        name: party.name().to_string(),
        won: party.seats_won(),
        leading: party.seats_leading(),
        total: party.seats_total(),
        color: party.color().to_string(),
        symbol: party.symbol().to_string(),
    }
}

fn card(constituency: &Constituency) -> ConstituencyCard {
    let top_candidates = constituency
        .candidates()
        .iter()
        .take(PREVIEW_CANDIDATES)
        .enumerate()
        .map(|(idx, candidate)| {
            let share_percent = candidate_share_percent(candidate, constituency);
            CandidateShare {
                id: candidate.id.clone(),
                name: candidate.name.clone(),
                party: candidate.party.clone(),
                symbol: candidate.symbol.clone(),
                color: candidate.color.clone(),
                votes: candidate.votes,
                share_percent,
                display_percent: format_one_decimal(share_percent),
                is_leader: idx == 0,
            }
        })
        .collect();

    ConstituencyCard {
        id: constituency.id().to_string(),
        code: constituency.code().to_string(),
        name: constituency.name().to_string(),
        status: constituency.status(),
        total_votes: constituency.total_votes(),
        counted_votes: constituency.counted_votes(),
        top_candidates,
    }
}
