// Football positions and position sets used for lineup eligibility.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Offensive and special-teams positions a player can be rostered at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    Quarterback,
    RunningBack,
    WideReceiver,
    TightEnd,
    Kicker,
    Defense,
}

impl Position {
    /// All positions in display order.
    pub const ALL: [Position; 6] = [
        Position::Quarterback,
        Position::RunningBack,
        Position::WideReceiver,
        Position::TightEnd,
        Position::Kicker,
        Position::Defense,
    ];

    /// Parse a position abbreviation into a Position.
    ///
    /// Accepts the platform spellings seen in roster exports:
    /// - "DEF", "DST", "D/ST" -> Defense
    /// - "K", "PK" -> Kicker
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            "K" | "PK" => Some(Position::Kicker),
            "DEF" | "DST" | "D/ST" => Some(Position::Defense),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Kicker => "K",
            Position::Defense => "DEF",
        }
    }

    /// Whether this is an offensive skill position (QB/RB/WR/TE).
    pub fn is_offensive_skill(&self) -> bool {
        matches!(
            self,
            Position::Quarterback
                | Position::RunningBack
                | Position::WideReceiver
                | Position::TightEnd
        )
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// A set of positions.
///
/// Backs both a player's eligible positions and a slot's accepted positions.
/// Iteration always follows `Position::ALL` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PositionSet(u8);

impl PositionSet {
    pub const fn empty() -> Self {
        PositionSet(0)
    }

    /// RB/WR/TE, the conventional FLEX set.
    pub fn flex() -> Self {
        Self::from_positions(&[
            Position::RunningBack,
            Position::WideReceiver,
            Position::TightEnd,
        ])
    }

    /// QB/RB/WR/TE, accepted by SUPER_FLEX.
    pub fn offensive_skill() -> Self {
        Position::ALL
            .iter()
            .copied()
            .filter(Position::is_offensive_skill)
            .collect()
    }

    pub fn single(pos: Position) -> Self {
        PositionSet(pos.bit())
    }

    pub fn from_positions(positions: &[Position]) -> Self {
        positions.iter().copied().collect()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.0 & pos.bit() != 0
    }

    pub fn insert(&mut self, pos: Position) {
        self.0 |= pos.bit();
    }

    pub fn union(&self, other: PositionSet) -> PositionSet {
        PositionSet(self.0 | other.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether any position in `other` is also in this set.
    pub fn intersects(&self, other: PositionSet) -> bool {
        self.0 & other.0 != 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        Position::ALL.into_iter().filter(move |p| self.contains(*p))
    }
}

impl FromIterator<Position> for PositionSet {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        let mut set = PositionSet::empty();
        for pos in iter {
            set.insert(pos);
        }
        set
    }
}

impl fmt::Display for PositionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<&str> = self.iter().map(|p| p.display_str()).collect();
        write!(f, "{}", labels.join("/"))
    }
}
