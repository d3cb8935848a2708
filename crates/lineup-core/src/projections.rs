// Projection aggregation: one canonical projected-points value per player
// for a given season/week/scoring-format scope.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

use crate::roster::player::PlayerId;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Fantasy scoring systems, which differ only in the per-reception bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringFormat {
    Ppr,
    HalfPpr,
    #[serde(alias = "standard")]
    Std,
}

impl ScoringFormat {
    pub const ALL: [ScoringFormat; 3] = [ScoringFormat::Ppr, ScoringFormat::HalfPpr, ScoringFormat::Std];

    /// Parse a scoring format name ("ppr", "half_ppr", "half", "std", "standard").
    pub fn from_str_format(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "ppr" => Some(ScoringFormat::Ppr),
            "half_ppr" | "half-ppr" | "half" => Some(ScoringFormat::HalfPpr),
            "std" | "standard" => Some(ScoringFormat::Std),
            _ => None,
        }
    }

    /// Stat key carrying the pre-computed total for this format.
    pub fn points_key(&self) -> &'static str {
        match self {
            ScoringFormat::Ppr => "pts_ppr",
            ScoringFormat::HalfPpr => "pts_half_ppr",
            ScoringFormat::Std => "pts_std",
        }
    }

    pub fn reception_bonus(&self) -> f64 {
        match self {
            ScoringFormat::Ppr => 1.0,
            ScoringFormat::HalfPpr => 0.5,
            ScoringFormat::Std => 0.0,
        }
    }
}

impl fmt::Display for ScoringFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScoringFormat::Ppr => "PPR",
            ScoringFormat::HalfPpr => "Half PPR",
            ScoringFormat::Std => "Standard",
        };
        f.write_str(s)
    }
}

/// Which slice of the season a projection covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    Week(u8),
    Season,
}

impl Period {
    fn matches(&self, week: Option<u8>) -> bool {
        match (self, week) {
            (Period::Week(w), Some(rw)) => *w == rw,
            (Period::Season, None) => true,
            _ => false,
        }
    }
}

/// Scope key for a projection lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectionScope {
    pub season: u16,
    pub period: Period,
    pub format: ScoringFormat,
}

/// One source's projection for one player and period.
///
/// `stats` holds whatever keys the source publishes (pts_ppr, pts_std, rec,
/// rush_yd, ...); only the points keys and `rec` are read here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRecord {
    pub player_id: PlayerId,
    pub season: u16,
    /// None for a full-season projection.
    pub week: Option<u8>,
    pub source: String,
    pub stats: HashMap<String, f64>,
}

impl ProjectionRecord {
    /// Points for `format`, or None when the record cannot supply them.
    ///
    /// Uses the format's own total when published. Otherwise derives it from
    /// the standard total plus receptions times the format's bonus. A missing
    /// total is never filled from another format's total.
    fn points_for(&self, format: ScoringFormat) -> Option<f64> {
        if let Some(&pts) = self.stats.get(format.points_key()) {
            return Some(pts);
        }
        let std = *self.stats.get(ScoringFormat::Std.points_key())?;
        if format == ScoringFormat::Std {
            return Some(std);
        }
        let rec = *self.stats.get("rec")?;
        Some(std + rec * format.reception_bonus())
    }
}

/// Per-format values for one player, side by side.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FormatPoints {
    pub ppr: f64,
    pub half_ppr: f64,
    pub std: f64,
}

impl FormatPoints {
    pub fn get(&self, format: ScoringFormat) -> f64 {
        match format {
            ScoringFormat::Ppr => self.ppr,
            ScoringFormat::HalfPpr => self.half_ppr,
            ScoringFormat::Std => self.std,
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

/// Reduces any number of projection records into one value per player and
/// scope. Lookups never fail: missing or malformed data yields `0.0`.
#[derive(Debug, Clone, Default)]
pub struct ProjectionAggregator {
    by_player: HashMap<PlayerId, Vec<ProjectionRecord>>,
}

impl ProjectionAggregator {
    pub fn new(records: impl IntoIterator<Item = ProjectionRecord>) -> Self {
        let mut by_player: HashMap<PlayerId, Vec<ProjectionRecord>> = HashMap::new();
        for record in records {
            by_player.entry(record.player_id.clone()).or_default().push(record);
        }
        ProjectionAggregator { by_player }
    }

    /// Number of distinct players with at least one record.
    pub fn player_count(&self) -> usize {
        self.by_player.len()
    }

    /// Consensus projected points for `player_id` in `scope`.
    ///
    /// Matching records are averaged across sources. Records whose value is
    /// negative or not finite are skipped with a warning. With no usable
    /// record the result is `0.0`.
    pub fn points(&self, player_id: &PlayerId, scope: &ProjectionScope) -> f64 {
        let Some(records) = self.by_player.get(player_id) else {
            return 0.0;
        };

        let mut total = 0.0;
        let mut count = 0usize;
        for record in records
            .iter()
            .filter(|r| r.season == scope.season && scope.period.matches(r.week))
        {
            let Some(pts) = record.points_for(scope.format) else {
                continue;
            };
            if !pts.is_finite() || pts < 0.0 {
                warn!(
                    "skipping {} projection for player {} from '{}': malformed value {}",
                    scope.format, player_id, record.source, pts
                );
                continue;
            }
            total += pts;
            count += 1;
        }

        if count == 0 {
            0.0
        } else {
            total / count as f64
        }
    }

    /// All three scoring formats for `player_id`, each computed independently.
    /// The scope's own `format` is ignored.
    pub fn all_formats(&self, player_id: &PlayerId, scope: &ProjectionScope) -> FormatPoints {
        let at = |format: ScoringFormat| {
            self.points(
                player_id,
                &ProjectionScope {
                    format,
                    ..*scope
                },
            )
        };
        FormatPoints {
            ppr: at(ScoringFormat::Ppr),
            half_ppr: at(ScoringFormat::HalfPpr),
            std: at(ScoringFormat::Std),
        }
    }
}

// ---------------------------------------------------------------------------
// Presentation
// ---------------------------------------------------------------------------

/// Round `value` to `precision` fractional digits for display.
///
/// Only used when rendering; comparisons and totals keep full precision.
pub fn round_points(value: f64, precision: u8) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

/// Format `value` with exactly `precision` fractional digits.
pub fn format_points(value: f64, precision: u8) -> String {
    format!("{:.*}", precision as usize, round_points(value, precision))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
