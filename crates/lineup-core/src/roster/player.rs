// Player records consumed by the lineup engine.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::position::{Position, PositionSet};

/// Opaque, unique player identifier as issued by the data platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        PlayerId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        PlayerId(s.to_string())
    }
}

/// Injury report designations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InjuryDesignation {
    Questionable,
    Doubtful,
    Out,
    InjuredReserve,
    Suspended,
}

/// Availability of a player for the scope being optimized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerStatus {
    Active,
    Inactive,
    Injured(InjuryDesignation),
}

impl PlayerStatus {
    /// Parse a status string as reported by roster feeds.
    ///
    /// An empty string is treated as `Active`; platforms omit the field for
    /// healthy players. Unknown strings return None.
    pub fn from_str_status(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "" | "ACTIVE" | "A" => Some(PlayerStatus::Active),
            "INACTIVE" | "NA" => Some(PlayerStatus::Inactive),
            "QUESTIONABLE" | "Q" => Some(PlayerStatus::Injured(InjuryDesignation::Questionable)),
            "DOUBTFUL" | "D" => Some(PlayerStatus::Injured(InjuryDesignation::Doubtful)),
            "OUT" | "O" => Some(PlayerStatus::Injured(InjuryDesignation::Out)),
            "IR" | "INJURED RESERVE" | "INJURED_RESERVE" => {
                Some(PlayerStatus::Injured(InjuryDesignation::InjuredReserve))
            }
            "SUS" | "SUSPENDED" => Some(PlayerStatus::Injured(InjuryDesignation::Suspended)),
            _ => None,
        }
    }

    /// Only active players may be placed in a starting slot.
    pub fn is_available(&self) -> bool {
        matches!(self, PlayerStatus::Active)
    }
}

/// A rostered player with a scope-specific projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    /// Always contains `position`.
    pub eligible: PositionSet,
    pub status: PlayerStatus,
    pub projected_points: f64,
}

impl Player {
    /// Build a player whose eligibility is its primary position plus any
    /// additional fantasy-eligible positions.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        position: Position,
        extra_positions: &[Position],
        status: PlayerStatus,
        projected_points: f64,
    ) -> Self {
        let mut eligible = PositionSet::single(position);
        for &pos in extra_positions {
            eligible.insert(pos);
        }
        Player {
            id: PlayerId::new(id),
            name: name.into(),
            position,
            eligible,
            status,
            projected_points,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status.is_available()
    }

    pub fn is_eligible_for(&self, accepted: PositionSet) -> bool {
        self.eligible.intersects(accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eligibility_includes_primary_position() {
        let p = Player::new("1", "Dual Threat", Position::RunningBack, &[Position::WideReceiver], PlayerStatus::Active, 10.0);
        assert!(p.eligible.contains(Position::RunningBack));
        assert!(p.eligible.contains(Position::WideReceiver));
        assert!(!p.eligible.contains(Position::TightEnd));
        assert!(p.is_eligible_for(PositionSet::flex()));
        assert!(!p.is_eligible_for(PositionSet::single(Position::Quarterback)));
    }

    #[test]
    fn status_parsing() {
        assert_eq!(PlayerStatus::from_str_status("Active"), Some(PlayerStatus::Active));
        assert_eq!(PlayerStatus::from_str_status(""), Some(PlayerStatus::Active));
        assert_eq!(PlayerStatus::from_str_status("inactive"), Some(PlayerStatus::Inactive));
        assert_eq!(
            PlayerStatus::from_str_status("Q"),
            Some(PlayerStatus::Injured(InjuryDesignation::Questionable))
        );
        assert_eq!(
            PlayerStatus::from_str_status("IR"),
            Some(PlayerStatus::Injured(InjuryDesignation::InjuredReserve))
        );
        assert_eq!(PlayerStatus::from_str_status("retired"), None);
    }

    #[test]
    fn only_active_is_available() {
        assert!(PlayerStatus::Active.is_available());
        assert!(!PlayerStatus::Inactive.is_available());
        assert!(!PlayerStatus::Injured(InjuryDesignation::Questionable).is_available());
        assert!(!PlayerStatus::Injured(InjuryDesignation::Out).is_available());
    }

    #[test]
    fn player_id_display() {
        let id = PlayerId::from("4984");
        assert_eq!(id.to_string(), "4984");
        assert_eq!(id.as_str(), "4984");
    }
}
