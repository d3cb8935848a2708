// Index-aligned comparison of actual starters against a computed lineup.

use serde::{Deserialize, Serialize};

use super::slot::Slot;
use super::Lineup;
use crate::roster::player::{Player, PlayerId};

/// Why a slot's starter should change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeKind {
    /// The team has nobody in this slot.
    FillEmpty,
    /// The current starter is not active, or is not on the roster at all.
    ReplaceUnavailable,
    /// The current starter still starts, just in another slot.
    Reshuffle,
    /// The current starter should sit for a higher-projected player.
    Upgrade,
    /// No eligible active player is left for this slot; the starter should sit.
    Vacate,
}

/// A suggested substitution at one lineup index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub index: usize,
    pub slot: Slot,
    pub current: Option<PlayerId>,
    pub suggested: Option<PlayerId>,
    /// Suggested player's projection minus the current player's projection.
    pub point_gain: f64,
    pub kind: ChangeKind,
}

/// Compare `actual` starters with `optimal`, slot by slot.
///
/// The comparison covers every entry of `optimal`; `actual` entries past its
/// end are ignored and missing ones count as empty. Both sides are read at
/// the same index, so they must follow the same slot order. Projections for
/// both sides come from `pool`; a current starter not found there counts as
/// zero points.
pub fn diff(actual: &[Option<PlayerId>], optimal: &Lineup, pool: &[Player]) -> Vec<Change> {
    let lookup = |id: &PlayerId| pool.iter().find(|p| &p.id == id);

    let mut changes = Vec::new();
    for (index, entry) in optimal.entries.iter().enumerate() {
        let current = actual.get(index).cloned().flatten();
        let suggested = entry.player_id().cloned();
        if current == suggested {
            continue;
        }

        let current_player = current.as_ref().and_then(lookup);
        let current_points = current_player.map_or(0.0, |p| p.projected_points);
        let point_gain = entry.points() - current_points;

        let kind = match (&current, &suggested) {
            (None, _) => ChangeKind::FillEmpty,
            (Some(_), _) if !current_player.is_some_and(Player::is_available) => {
                ChangeKind::ReplaceUnavailable
            }
            (Some(_), None) => ChangeKind::Vacate,
            (Some(id), Some(_)) if optimal.contains(id) => ChangeKind::Reshuffle,
            (Some(_), Some(_)) => ChangeKind::Upgrade,
        };

        changes.push(Change {
            index,
            slot: entry.slot.clone(),
            current,
            suggested,
            point_gain,
            kind,
        });
    }
    changes
}
