// Aggregation engine - Seat totals, vote shares and party ranking
use crate::domain::dashboard::ElectionStats;
use crate::domain::election::{Candidate, Constituency, ElectionDataset, PartySummary};

pub fn total_seats_won(parties: &[PartySummary]) -> u32 {
    parties
        .iter()
        .map(PartySummary::seats_won)
        .fold(0, u32::saturating_add)
}

pub fn total_seats_leading(parties: &[PartySummary]) -> u32 {
    parties
        .iter()
        .map(PartySummary::seats_leading)
        .fold(0, u32::saturating_add)
}

/// Candidate's share of the counted votes, in percent, at full precision.
/// Returns 0.0 when nothing has been counted yet.
pub fn candidate_share_percent(candidate: &Candidate, constituency: &Constituency) -> f64 {
    let counted = constituency.counted_votes();
    if counted == 0 {
        return 0.0;
    }
    candidate.votes as f64 / counted as f64 * 100.0
}

/// One-decimal display string, rounded from the exact binary value the
/// way `Number.prototype.toFixed(1)` does. The double nearest 1.45 is
/// slightly below it, so it shows as "1.4"; exact midpoints (x.25, x.75)
/// round up.
pub fn format_one_decimal(value: f64) -> String {
    let is_midpoint = (value * 4.0).fract() == 0.0 && (value * 2.0).fract() != 0.0;
    if is_midpoint {
        return format!("{:.1}", value + 0.05);
    }
    format!("{:.1}", value)
}

pub fn round_one_decimal(value: f64) -> f64 {
    format_one_decimal(value).parse().unwrap_or(value)
}

/// Parties ordered by won + leading, highest first. `sort_by` is stable,
/// so ties keep their input order.
pub fn party_ranking(parties: &[PartySummary]) -> Vec<&PartySummary> {
    let mut ranked: Vec<&PartySummary> = parties.iter().collect();
    ranked.sort_by(|a, b| b.seats_total().cmp(&a.seats_total()));
    ranked
}

/// Counted votes over registered votes across all constituencies.
pub fn turnout_percent(constituencies: &[Constituency]) -> f64 {
    let (counted, total) = constituencies.iter().fold((0u64, 0u64), |(counted, total), c| {
        (
            counted.saturating_add(c.counted_votes()),
            total.saturating_add(c.total_votes()),
        )
    });
    if total == 0 {
        return 0.0;
    }
    counted as f64 / total as f64 * 100.0
}

pub fn election_stats(dataset: &ElectionDataset) -> ElectionStats {
    let announced_seats = total_seats_won(dataset.parties());
    let leading_seats = total_seats_leading(dataset.parties());
    let remaining_seats = dataset
        .total_seats()
        .saturating_sub(announced_seats)
        .saturating_sub(leading_seats);

    ElectionStats {
        total_seats: dataset.total_seats(),
        announced_seats,
        leading_seats,
        remaining_seats,
        turnout_percent: round_one_decimal(turnout_percent(dataset.constituencies())),
    }
}
