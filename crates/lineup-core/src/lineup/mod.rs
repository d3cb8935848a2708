// Lineup assignment engine: slot filling and starter comparison.

pub mod assign;
pub mod diff;
pub mod slot;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::roster::player::{Player, PlayerId};
use slot::Slot;

pub use assign::{assign, assign_and_compare};
pub use diff::{diff, Change, ChangeKind};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Input problems that abort an assignment call before any slot is filled.
///
/// An unfillable slot is not an error; it shows up as an empty entry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LineupError {
    #[error("invalid slot definition `{label}`: {reason}")]
    InvalidSlotDefinition { label: String, reason: String },

    #[error("invalid projection for player {player_id}: {value}")]
    InvalidProjection { player_id: PlayerId, value: f64 },

    #[error("player {player_id} appears more than once in the pool")]
    DuplicatePlayer { player_id: PlayerId },
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// One non-bench slot and the player chosen for it, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineupEntry {
    pub slot: Slot,
    pub player: Option<Player>,
}

impl LineupEntry {
    pub fn player_id(&self) -> Option<&PlayerId> {
        self.player.as_ref().map(|p| &p.id)
    }

    /// Projected points contributed by this entry; empty slots contribute zero.
    pub fn points(&self) -> f64 {
        self.player.as_ref().map_or(0.0, |p| p.projected_points)
    }
}

/// Starting lineup in slot declaration order (bench slots omitted).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Lineup {
    pub entries: Vec<LineupEntry>,
}

impl Lineup {
    pub fn total_points(&self) -> f64 {
        self.entries.iter().map(LineupEntry::points).sum()
    }

    pub fn filled_count(&self) -> usize {
        self.entries.iter().filter(|e| e.player.is_some()).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the entry holding `id`, if that player starts.
    pub fn position_of(&self, id: &PlayerId) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.player_id() == Some(id))
    }

    pub fn contains(&self, id: &PlayerId) -> bool {
        self.position_of(id).is_some()
    }

    /// Starter ids in slot order; `None` marks an empty slot.
    pub fn starter_ids(&self) -> Vec<Option<PlayerId>> {
        self.entries.iter().map(|e| e.player_id().cloned()).collect()
    }
}

/// Output of one assignment run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentResult {
    pub lineup: Lineup,
    pub total_points: f64,
    /// Present only when an actual lineup was supplied for comparison.
    pub changes: Option<Vec<Change>>,
}

impl AssignmentResult {
    /// Net projected gain of switching from the compared lineup to the optimum.
    pub fn projected_gain(&self) -> f64 {
        self.changes
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|c| c.point_gain)
            .sum()
    }
}
