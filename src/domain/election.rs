// Election results domain model
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Seats contested in a general election.
pub const DEFAULT_TOTAL_SEATS: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResultStatus {
    Won,
    Leading,
    Pending,
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ResultStatus::Won => "WON",
            ResultStatus::Leading => "LEADING",
            ResultStatus::Pending => "PENDING",
        };
        f.write_str(label)
    }
}

/// Invariant violations found while building the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    #[error("constituency {code}: counted votes {counted} exceed total votes {total}")]
    CountedExceedsTotal { code: String, counted: u64, total: u64 },

    #[error("constituency {code}: status {status} requires at least one candidate")]
    MissingCandidates { code: String, status: ResultStatus },

    #[error(
        "constituency {code}: candidate votes {candidate_votes} exceed counted votes {counted}"
    )]
    CandidateVotesExceedCounted {
        code: String,
        candidate_votes: u64,
        counted: u64,
    },

    #[error(
        "party {short_name}: {seats} seats won or leading exceed the {total_seats} seat ceiling"
    )]
    SeatsExceedTotal {
        short_name: String,
        seats: u32,
        total_seats: u32,
    },

    #[error("parties hold {seats} seats won or leading, more than the {total_seats} contested")]
    AllocatedSeatsExceedTotal { seats: u64, total_seats: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub party: String,
    pub symbol: String,
    pub votes: u64,
    pub color: String,
}

impl Candidate {
    pub fn new(
        id: String,
        name: String,
        party: String,
        symbol: String,
        votes: u64,
        color: String,
    ) -> Self {
        Self {
            id,
            name,
            party,
            symbol,
            votes,
            color,
        }
    }
}

/// An electoral district and its tally. Fields are private so the
/// vote-count invariants checked in `new` hold for the whole session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Constituency {
    id: String,
    name: String,
    code: String,
    total_votes: u64,
    counted_votes: u64,
    status: ResultStatus,
    candidates: Vec<Candidate>,
}

impl Constituency {
    pub fn new(
        id: String,
        name: String,
        code: String,
        total_votes: u64,
        counted_votes: u64,
        status: ResultStatus,
        candidates: Vec<Candidate>,
    ) -> Result<Self, DatasetError> {
        if counted_votes > total_votes {
            return Err(DatasetError::CountedExceedsTotal {
                code,
                counted: counted_votes,
                total: total_votes,
            });
        }

        if status != ResultStatus::Pending && candidates.is_empty() {
            return Err(DatasetError::MissingCandidates { code, status });
        }

        let candidate_votes = candidates
            .iter()
            .map(|c| c.votes)
            .fold(0u64, u64::saturating_add);
        if candidate_votes > counted_votes {
            return Err(DatasetError::CandidateVotesExceedCounted {
                code,
                candidate_votes,
                counted: counted_votes,
            });
        }

        Ok(Self {
            id,
            name,
            code,
            total_votes,
            counted_votes,
            status,
            candidates,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn total_votes(&self) -> u64 {
        self.total_votes
    }

    pub fn counted_votes(&self) -> u64 {
        self.counted_votes
    }

    pub fn status(&self) -> ResultStatus {
        self.status
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartySummary {
    name: String,
    short_name: String,
    seats_won: u32,
    seats_leading: u32,
    color: String,
    symbol: String,
}

impl PartySummary {
    pub fn new(
        name: String,
        short_name: String,
        seats_won: u32,
        seats_leading: u32,
        color: String,
        symbol: String,
    ) -> Self {
        Self {
            name,
            short_name,
            seats_won,
            seats_leading,
            color,
            symbol,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn seats_won(&self) -> u32 {
        self.seats_won
    }

    pub fn seats_leading(&self) -> u32 {
        self.seats_leading
    }

    /// Won plus leading, the figure the seat chart is ordered by.
    pub fn seats_total(&self) -> u32 {
        self.seats_won.saturating_add(self.seats_leading)
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

/// The canonical, immutable snapshot every other component reads from.
#[derive(Debug, Clone, PartialEq)]
pub struct ElectionDataset {
    parties: Vec<PartySummary>,
    constituencies: Vec<Constituency>,
    total_seats: u32,
}

impl ElectionDataset {
    pub fn new(
        parties: Vec<PartySummary>,
        constituencies: Vec<Constituency>,
        total_seats: u32,
    ) -> Result<Self, DatasetError> {
        if let Some(party) = parties.iter().find(|p| p.seats_total() > total_seats) {
            return Err(DatasetError::SeatsExceedTotal {
                short_name: party.short_name.clone(),
                seats: party.seats_total(),
                total_seats,
            });
        }

        let allocated: u64 = parties.iter().map(|p| u64::from(p.seats_total())).sum();
        if allocated > u64::from(total_seats) {
            return Err(DatasetError::AllocatedSeatsExceedTotal {
                seats: allocated,
                total_seats,
            });
        }

        Ok(Self {
            parties,
            constituencies,
            total_seats,
        })
    }

    pub fn parties(&self) -> &[PartySummary] {
        &self.parties
    }

    pub fn constituencies(&self) -> &[Constituency] {
        &self.constituencies
    }

    pub fn total_seats(&self) -> u32 {
        self.total_seats
    }
}
