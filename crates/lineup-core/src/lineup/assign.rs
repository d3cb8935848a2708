// Greedy slot-order lineup assignment.
//
// Slots are filled one at a time in the order the league declares them, and
// each choice is committed before moving on. This is O(slots x players) and
// mirrors how leagues are laid out (dedicated positions first, flex slots
// last). It is not a global maximum-weight matching: a flex slot declared
// ahead of a fixed slot can take a player the fixed slot needed more.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use super::diff::diff;
use super::slot::Slot;
use super::{AssignmentResult, Lineup, LineupEntry, LineupError};
use crate::roster::player::{Player, PlayerId};
use crate::roster::position::{Position, PositionSet};

/// Compute the highest-projected lineup for `slots` from `players`.
///
/// Only active players are considered. Equal projections are resolved in
/// favor of the player that appears first in `players`. Bench slots are
/// skipped and produce no lineup entry.
pub fn assign(players: &[Player], slots: &[Slot]) -> Result<AssignmentResult, LineupError> {
    validate(players, slots)?;

    let mut pool = PositionPool::new(players);
    let mut entries = Vec::with_capacity(slots.len());

    for slot in slots.iter().filter(|s| !s.is_bench()) {
        let chosen = pool.take_best(slot.accepted());
        match chosen {
            Some(idx) => debug!(
                "slot {} -> {} ({:.2})",
                slot, players[idx].name, players[idx].projected_points
            ),
            None => debug!("slot {} left empty: no eligible active player", slot),
        }
        entries.push(LineupEntry {
            slot: slot.clone(),
            player: chosen.map(|idx| players[idx].clone()),
        });
    }

    let lineup = Lineup { entries };
    let total_points = lineup.total_points();

    Ok(AssignmentResult {
        lineup,
        total_points,
        changes: None,
    })
}

/// Run [`assign`] and compare the result against the team's actual starters.
///
/// `actual` is index-aligned with the non-bench slots; `None` marks a slot
/// the team left empty.
pub fn assign_and_compare(
    players: &[Player],
    slots: &[Slot],
    actual: &[Option<PlayerId>],
) -> Result<AssignmentResult, LineupError> {
    let mut result = assign(players, slots)?;
    result.changes = Some(diff(actual, &result.lineup, players));
    Ok(result)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(players: &[Player], slots: &[Slot]) -> Result<(), LineupError> {
    for slot in slots {
        slot.validate()?;
    }

    let mut seen = HashSet::with_capacity(players.len());
    for player in players {
        let pts = player.projected_points;
        if !pts.is_finite() || pts < 0.0 {
            return Err(LineupError::InvalidProjection {
                player_id: player.id.clone(),
                value: pts,
            });
        }
        if !seen.insert(&player.id) {
            return Err(LineupError::DuplicatePlayer {
                player_id: player.id.clone(),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Working state
// ---------------------------------------------------------------------------

/// Per-call working state: active players grouped by eligible position.
///
/// Each group holds indices into the input slice, sorted by projection
/// descending with input order breaking ties. A cursor per group skips
/// players already used so each lookup only walks forward.
struct PositionPool<'a> {
    players: &'a [Player],
    groups: BTreeMap<Position, Vec<usize>>,
    cursors: BTreeMap<Position, usize>,
    used: Vec<bool>,
}

impl<'a> PositionPool<'a> {
    fn new(players: &'a [Player]) -> Self {
        let mut groups: BTreeMap<Position, Vec<usize>> = BTreeMap::new();
        for (idx, player) in players.iter().enumerate() {
            if !player.is_available() {
                continue;
            }
            for pos in player.eligible.iter() {
                groups.entry(pos).or_default().push(idx);
            }
        }

        // Stable sort keeps first-seen order among equal projections.
        for group in groups.values_mut() {
            group.sort_by(|&a, &b| {
                players[b]
                    .projected_points
                    .total_cmp(&players[a].projected_points)
            });
        }

        let cursors = groups.keys().map(|&pos| (pos, 0)).collect();

        PositionPool {
            players,
            groups,
            cursors,
            used: vec![false; players.len()],
        }
    }

    /// Best unused player in one group, advancing that group's cursor past
    /// players consumed by earlier slots.
    fn head(&mut self, pos: Position) -> Option<usize> {
        let group = self.groups.get(&pos)?;
        let cursor = self.cursors.entry(pos).or_insert(0);
        while *cursor < group.len() && self.used[group[*cursor]] {
            *cursor += 1;
        }
        group.get(*cursor).copied()
    }

    /// Pick and mark used the best unused player eligible for any position in
    /// `accepted`.
    fn take_best(&mut self, accepted: PositionSet) -> Option<usize> {
        let mut best: Option<usize> = None;
        for pos in accepted.iter() {
            let Some(candidate) = self.head(pos) else {
                continue;
            };
            best = match best {
                Some(current) if !self.beats(candidate, current) => Some(current),
                _ => Some(candidate),
            };
        }
        if let Some(idx) = best {
            self.used[idx] = true;
        }
        best
    }

    /// Higher projection wins; equal projections go to the earlier input.
    fn beats(&self, a: usize, b: usize) -> bool {
        let pa = self.players[a].projected_points;
        let pb = self.players[b].projected_points;
        pa > pb || (pa == pb && a < b)
    }
}
