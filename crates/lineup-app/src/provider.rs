// Data provider seam: roster, projections and current starters.
//
// `CsvProvider` reads local exports. Projections may also be a JSON array of
// per-player stat maps, the shape fantasy platforms publish.

use async_trait::async_trait;
use lineup_core::projections::ProjectionRecord;
use lineup_core::roster::player::{Player, PlayerId, PlayerStatus};
use lineup_core::roster::position::Position;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::config::{parse_starter_id, Config};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A rostered player before a projection is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    /// Fantasy-eligible positions beyond the primary one.
    pub extra_positions: Vec<Position>,
    pub status: PlayerStatus,
}

impl RosterEntry {
    pub fn into_player(self, projected_points: f64) -> Player {
        Player::new(
            self.id.0,
            self.name,
            self.position,
            &self.extra_positions,
            self.status,
            projected_points,
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("loader task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Source of everything the engine consumes for one team.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// The team's rostered players.
    async fn roster(&self) -> Result<Vec<RosterEntry>, ProviderError>;

    /// Projection records for any players and scopes; the aggregator filters.
    async fn projections(&self) -> Result<Vec<ProjectionRecord>, ProviderError>;

    /// Current starters in slot order, if known.
    async fn starters(&self) -> Result<Option<Vec<Option<PlayerId>>>, ProviderError>;
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawRosterRow {
    player_id: String,
    name: String,
    position: String,
    /// `;`-separated, e.g. "RB;WR".
    #[serde(default)]
    fantasy_positions: String,
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct RawProjectionRow {
    player_id: String,
    season: u16,
    #[serde(default)]
    week: Option<u8>,
    #[serde(default)]
    source: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pts_ppr: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pts_half_ppr: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pts_std: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    rec: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawStarterRow {
    player_id: String,
}

// ---------------------------------------------------------------------------
// Reader-based loaders (private, enable testing without temp files)
// ---------------------------------------------------------------------------

fn load_roster_from_reader<R: Read>(rdr: R) -> Result<Vec<RosterEntry>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut roster = Vec::new();
    let mut seen = HashSet::new();
    for result in reader.deserialize::<RawRosterRow>() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed roster row: {}", e);
                continue;
            }
        };

        let id = raw.player_id.trim().to_string();
        let name = raw.name.trim().to_string();
        let Some(position) = Position::from_str_pos(&raw.position) else {
            warn!("skipping player '{}': unknown position '{}'", name, raw.position);
            continue;
        };
        if !seen.insert(id.clone()) {
            warn!("duplicate roster entry for player {}, keeping the first", id);
            continue;
        }

        let mut extra_positions = Vec::new();
        for token in raw.fantasy_positions.split(';').filter(|t| !t.trim().is_empty()) {
            match Position::from_str_pos(token) {
                Some(pos) if pos != position => extra_positions.push(pos),
                Some(_) => {}
                None => warn!("ignoring unknown fantasy position '{}' for '{}'", token, name),
            }
        }

        let status = PlayerStatus::from_str_status(&raw.status).unwrap_or_else(|| {
            warn!("unknown status '{}' for '{}', treating as inactive", raw.status, name);
            PlayerStatus::Inactive
        });

        roster.push(RosterEntry {
            id: PlayerId::new(id),
            name,
            position,
            extra_positions,
            status,
        });
    }
    Ok(roster)
}

fn load_projections_from_reader<R: Read>(rdr: R) -> Result<Vec<ProjectionRecord>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut records = Vec::new();
    for result in reader.deserialize::<RawProjectionRow>() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed projection row: {}", e);
                continue;
            }
        };

        let mut stats = HashMap::new();
        for (key, value) in [
            ("pts_ppr", raw.pts_ppr),
            ("pts_half_ppr", raw.pts_half_ppr),
            ("pts_std", raw.pts_std),
            ("rec", raw.rec),
        ] {
            if let Some(v) = value {
                stats.insert(key.to_string(), v);
            }
        }

        records.push(ProjectionRecord {
            player_id: PlayerId::new(raw.player_id.trim()),
            season: raw.season,
            week: raw.week,
            source: raw.source.trim().to_string(),
            stats,
        });
    }
    Ok(records)
}

/// Parse a JSON array of projection records. Entries that do not match the
/// record shape are skipped; a document that is not an array is an error.
fn load_projections_from_json<R: Read>(rdr: R) -> Result<Vec<ProjectionRecord>, serde_json::Error> {
    let values: Vec<serde_json::Value> = serde_json::from_reader(rdr)?;
    let mut records = Vec::with_capacity(values.len());
    for value in values {
        match serde_json::from_value::<ProjectionRecord>(value) {
            Ok(record) => records.push(record),
            Err(e) => warn!("skipping malformed projection entry: {}", e),
        }
    }
    Ok(records)
}

fn load_starters_from_reader<R: Read>(rdr: R) -> Result<Vec<Option<PlayerId>>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut starters = Vec::new();
    for result in reader.deserialize::<RawStarterRow>() {
        let raw = result?;
        starters.push(parse_starter_id(&raw.player_id));
    }
    Ok(starters)
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

fn open(path: &Path) -> Result<std::fs::File, ProviderError> {
    std::fs::File::open(path).map_err(|e| ProviderError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load the roster CSV. An empty roster is an error.
pub fn load_roster(path: &Path) -> Result<Vec<RosterEntry>, ProviderError> {
    let roster = load_roster_from_reader(open(path)?).map_err(|e| ProviderError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;
    if roster.is_empty() {
        return Err(ProviderError::Validation(format!(
            "roster file {} produced zero valid rows",
            path.display()
        )));
    }
    Ok(roster)
}

/// Load projections from CSV, or from JSON when the extension is `.json`.
pub fn load_projections(path: &Path) -> Result<Vec<ProjectionRecord>, ProviderError> {
    let file = open(path)?;
    if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
        load_projections_from_json(file).map_err(|e| ProviderError::Json {
            path: path.display().to_string(),
            source: e,
        })
    } else {
        load_projections_from_reader(file).map_err(|e| ProviderError::Csv {
            path: path.display().to_string(),
            source: e,
        })
    }
}

/// Load the starters file (header `player_id`, one row per slot).
pub fn load_starters(path: &Path) -> Result<Vec<Option<PlayerId>>, ProviderError> {
    load_starters_from_reader(open(path)?).map_err(|e| ProviderError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// CsvProvider
// ---------------------------------------------------------------------------

/// File-backed provider. Paths are resolved against a base directory.
/// Starters listed in league.toml take precedence over a starters file.
#[derive(Debug, Clone)]
pub struct CsvProvider {
    roster_path: PathBuf,
    projections_path: PathBuf,
    starters_path: Option<PathBuf>,
    configured_starters: Option<Vec<Option<PlayerId>>>,
}

impl CsvProvider {
    pub fn new(roster_path: PathBuf, projections_path: PathBuf) -> Self {
        CsvProvider {
            roster_path,
            projections_path,
            starters_path: None,
            configured_starters: None,
        }
    }

    pub fn with_starters_file(mut self, path: PathBuf) -> Self {
        self.starters_path = Some(path);
        self
    }

    pub fn from_config(config: &Config, base_dir: &Path) -> Self {
        let paths = &config.data_paths;
        let mut provider = CsvProvider::new(
            base_dir.join(&paths.roster),
            base_dir.join(&paths.projections),
        );
        if let Some(starters) = &paths.starters {
            provider = provider.with_starters_file(base_dir.join(starters));
        }
        provider.configured_starters = config.configured_starters();
        provider
    }
}

#[async_trait]
impl DataProvider for CsvProvider {
    async fn roster(&self) -> Result<Vec<RosterEntry>, ProviderError> {
        let path = self.roster_path.clone();
        tokio::task::spawn_blocking(move || load_roster(&path)).await?
    }

    async fn projections(&self) -> Result<Vec<ProjectionRecord>, ProviderError> {
        let path = self.projections_path.clone();
        tokio::task::spawn_blocking(move || load_projections(&path)).await?
    }

    async fn starters(&self) -> Result<Option<Vec<Option<PlayerId>>>, ProviderError> {
        if let Some(starters) = &self.configured_starters {
            return Ok(Some(starters.clone()));
        }
        let Some(path) = self.starters_path.clone() else {
            return Ok(None);
        };
        let starters = tokio::task::spawn_blocking(move || load_starters(&path)).await??;
        Ok(Some(starters))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
