// Dataset provider - Built-in results or a dataset file, validated on load
use crate::domain::election::{
    Candidate, Constituency, DatasetError, ElectionDataset, PartySummary, ResultStatus,
    DEFAULT_TOTAL_SEATS,
};
use crate::infrastructure::config::DatasetSettings;
use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct DatasetFile {
    #[serde(default)]
    pub parties: Vec<PartyRecord>,
    #[serde(default)]
    pub constituencies: Vec<ConstituencyRecord>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PartyRecord {
    pub name: String,
    pub short_name: String,
    pub seats_won: u32,
    pub seats_leading: u32,
    pub color: String,
    pub symbol: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConstituencyRecord {
    pub id: String,
    pub name: String,
    pub code: String,
    pub total_votes: u64,
    pub counted_votes: u64,
    pub status: ResultStatus,
    #[serde(default)]
    pub candidates: Vec<CandidateRecord>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CandidateRecord {
    pub id: String,
    pub name: String,
    pub party: String,
    pub symbol: String,
    pub votes: u64,
    pub color: String,
}

impl DatasetFile {
    pub fn into_dataset(self, total_seats: u32) -> Result<ElectionDataset, DatasetError> {
        let parties = self
            .parties
            .into_iter()
            .map(|p| {
                PartySummary::new(
                    p.name,
                    p.short_name,
                    p.seats_won,
                    p.seats_leading,
                    p.color,
                    p.symbol,
                )
            })
            .collect();

        let constituencies = self
            .constituencies
            .into_iter()
            .map(ConstituencyRecord::into_constituency)
            .collect::<Result<Vec<_>, _>>()?;

        ElectionDataset::new(parties, constituencies, total_seats)
    }
}

impl ConstituencyRecord {
    fn into_constituency(self) -> Result<Constituency, DatasetError> {
        let candidates = self
            .candidates
            .into_iter()
            .map(|c| Candidate::new(c.id, c.name, c.party, c.symbol, c.votes, c.color))
            .collect();

        Constituency::new(
            self.id,
            self.name,
            self.code,
            self.total_votes,
            self.counted_votes,
            self.status,
            candidates,
        )
    }
}

/// The configured dataset file, or the built-in results when none is set.
pub fn load_dataset(settings: &DatasetSettings) -> anyhow::Result<ElectionDataset> {
    let dataset = match &settings.path {
        Some(path) => {
            let file = read_dataset_file(path)?;
            file.into_dataset(settings.total_seats)
                .with_context(|| format!("Invalid election dataset in {}", path))?
        }
        None => mock_records()
            .into_dataset(settings.total_seats)
            .context("Invalid built-in election dataset")?,
    };

    tracing::info!(
        "Loaded {} parties and {} constituencies ({} seats)",
        dataset.parties().len(),
        dataset.constituencies().len(),
        dataset.total_seats()
    );
    Ok(dataset)
}

fn read_dataset_file(path: &str) -> anyhow::Result<DatasetFile> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(path))
        .build()
        .with_context(|| format!("Failed to read election dataset {}", path))?;

    settings
        .try_deserialize()
        .with_context(|| format!("Failed to parse election dataset {}", path))
}

pub fn mock_dataset() -> Result<ElectionDataset, DatasetError> {
    mock_records().into_dataset(DEFAULT_TOTAL_SEATS)
}

fn party(
    name: &str,
    short_name: &str,
    won: u32,
    leading: u32,
    color: &str,
    symbol: &str,
) -> PartyRecord {
    PartyRecord {
        name: name.to_string(),
        short_name: short_name.to_string(),
        seats_won: won,
        seats_leading: leading,
        color: color.to_string(),
        symbol: symbol.to_string(),
    }
}

fn candidate(
    id: &str,
    name: &str,
    party: &str,
    symbol: &str,
    votes: u64,
    color: &str,
) -> CandidateRecord {
    CandidateRecord {
        id: id.to_string(),
        name: name.to_string(),
        party: party.to_string(),
        symbol: symbol.to_string(),
        votes,
        color: color.to_string(),
    }
}

fn constituency(
    id: &str,
    name: &str,
    code: &str,
    total_votes: u64,
    counted_votes: u64,
    status: ResultStatus,
    candidates: Vec<CandidateRecord>,
) -> ConstituencyRecord {
    ConstituencyRecord {
        id: id.to_string(),
        name: name.to_string(),
        code: code.to_string(),
        total_votes,
        counted_votes,
        status,
        candidates,
    }
}

const AL: &str = "#1a7a40";
const BNP: &str = "#2c4ea3";
const JP: &str = "#f0c419";
const IND: &str = "#6366f1";
const OTH: &str = "#94a3b8";

fn mock_records() -> DatasetFile {
    let parties = vec![
        party("Bangladesh Awami League", "AL", 124, 42, AL, "নৌকা"),
        party("Bangladesh Nationalist Party", "BNP", 45, 15, BNP, "ধানের শীষ"),
        party("Jatiya Party", "JP", 12, 5, JP, "লাঙ্গল"),
        party("Independent", "IND", 22, 8, IND, "ট্রাক"),
        party("Others", "OTH", 5, 2, OTH, "অন্যান্য"),
    ];

    let constituencies = vec![
        constituency(
            "1",
            "Dhaka-1",
            "DH1",
            450_000,
            420_000,
            ResultStatus::Won,
            vec![
                candidate("c1", "Salman F Rahman", "AL", "Boat", 245_000, AL),
                candidate("c2", "Abu Taleb", "IND", "Truck", 150_000, IND),
                candidate("c3", "Jasim Uddin", "JP", "Plough", 25_000, JP),
            ],
        ),
        constituency(
            "2",
            "Gopalganj-3",
            "GP3",
            380_000,
            375_000,
            ResultStatus::Won,
            vec![
                candidate("c4", "Sheikh Hasina", "AL", "Boat", 360_000, AL),
                candidate("c5", "Nizam Uddin", "JP", "Plough", 15_000, JP),
            ],
        ),
        constituency(
            "3",
            "Chittagong-9",
            "CTG9",
            520_000,
            410_000,
            ResultStatus::Leading,
            vec![
                candidate("c6", "Mohibul Hassan Chowdhury", "AL", "Boat", 210_000, AL),
                candidate("c7", "Abdullah Al Noman", "BNP", "Sheaf of Paddy", 180_000, BNP),
            ],
        ),
        constituency(
            "4",
            "Sylhet-1",
            "SYL1",
            440_000,
            390_000,
            ResultStatus::Won,
            vec![
                candidate("c8", "A K Abdul Momen", "AL", "Boat", 220_000, AL),
                candidate("c9", "Misbah Uddin", "IND", "Kettle", 170_000, IND),
            ],
        ),
        constituency(
            "5",
            "Rajshahi-2",
            "RAJ2",
            480_000,
            320_000,
            ResultStatus::Leading,
            vec![
                candidate("c10", "Fazle Hossain Badsha", "AL", "Boat", 165_000, AL),
                candidate("c11", "Shafiqul Haque", "BNP", "Sheaf of Paddy", 155_000, BNP),
            ],
        ),
    ];

    DatasetFile {
        parties,
        constituencies,
    }
}
