// Lineup slot definitions parsed from a league's roster positions.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::LineupError;
use crate::roster::position::{Position, PositionSet};

/// What a slot accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotKind {
    /// Exactly one position.
    Fixed(Position),
    /// A small fixed set of positions (FLEX, WRRB_FLEX, REC_FLEX).
    Flex(PositionSet),
    /// Any offensive skill position, QB included.
    SuperFlex,
    /// Never filled by the optimizer (BN, IR, TAXI).
    Bench,
}

impl SlotKind {
    /// Positions a player must be eligible for to fill this slot.
    /// Bench accepts nothing.
    pub fn accepted(&self) -> PositionSet {
        match self {
            SlotKind::Fixed(pos) => PositionSet::single(*pos),
            SlotKind::Flex(set) => *set,
            SlotKind::SuperFlex => PositionSet::offensive_skill(),
            SlotKind::Bench => PositionSet::empty(),
        }
    }

    pub fn is_bench(&self) -> bool {
        matches!(self, SlotKind::Bench)
    }
}

/// One entry of a league's ordered roster positions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    /// The label as declared by the league, upper-cased (e.g. "FLEX").
    pub label: String,
    pub kind: SlotKind,
}

impl Slot {
    /// Parse a roster-position label.
    ///
    /// Recognized labels:
    /// - QB, RB, WR, TE, K, DEF (and the aliases `Position` accepts)
    /// - FLEX (RB/WR/TE), WRRB_FLEX (RB/WR), REC_FLEX (WR/TE)
    /// - SUPER_FLEX / SUPERFLEX / OP
    /// - BN, BE, IR, TAXI (bench)
    pub fn parse(label: &str) -> Result<Self, LineupError> {
        let normalized = label.trim().to_uppercase();
        let kind = match normalized.as_str() {
            "FLEX" | "W/R/T" => SlotKind::Flex(PositionSet::flex()),
            "WRRB_FLEX" | "W/R" => SlotKind::Flex(PositionSet::from_positions(&[
                Position::RunningBack,
                Position::WideReceiver,
            ])),
            "REC_FLEX" | "W/T" => SlotKind::Flex(PositionSet::from_positions(&[
                Position::WideReceiver,
                Position::TightEnd,
            ])),
            "SUPER_FLEX" | "SUPERFLEX" | "OP" => SlotKind::SuperFlex,
            "BN" | "BE" | "IR" | "TAXI" => SlotKind::Bench,
            other => match Position::from_str_pos(other) {
                Some(pos) => SlotKind::Fixed(pos),
                None => {
                    return Err(LineupError::InvalidSlotDefinition {
                        label: label.to_string(),
                        reason: "unrecognized slot label".into(),
                    })
                }
            },
        };
        Ok(Slot {
            label: normalized,
            kind,
        })
    }

    /// Build a slot from an explicit kind. The label is derived from the kind.
    pub fn from_kind(kind: SlotKind) -> Self {
        let label = match kind {
            SlotKind::Fixed(pos) => pos.display_str().to_string(),
            SlotKind::Flex(set) if set == PositionSet::flex() => "FLEX".to_string(),
            SlotKind::Flex(set) => format!("FLEX({set})"),
            SlotKind::SuperFlex => "SUPER_FLEX".to_string(),
            SlotKind::Bench => "BN".to_string(),
        };
        Slot { label, kind }
    }

    pub fn accepted(&self) -> PositionSet {
        self.kind.accepted()
    }

    pub fn is_bench(&self) -> bool {
        self.kind.is_bench()
    }

    /// Check the slot can be interpreted by the engine.
    pub fn validate(&self) -> Result<(), LineupError> {
        if let SlotKind::Flex(set) = self.kind {
            if set.is_empty() {
                return Err(LineupError::InvalidSlotDefinition {
                    label: self.label.clone(),
                    reason: "flex slot accepts no positions".into(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Parse an ordered list of slot labels, preserving declaration order.
/// Fails on the first label that cannot be interpreted.
pub fn parse_slots<S: AsRef<str>>(labels: &[S]) -> Result<Vec<Slot>, LineupError> {
    labels.iter().map(|l| Slot::parse(l.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_fixed_slots() {
        assert_eq!(Slot::parse("QB").unwrap().kind, SlotKind::Fixed(Position::Quarterback));
        assert_eq!(Slot::parse("te").unwrap().kind, SlotKind::Fixed(Position::TightEnd));
        assert_eq!(Slot::parse("DST").unwrap().kind, SlotKind::Fixed(Position::Defense));
    }

    #[test]
    fn parse_flex_variants() {
        let flex = Slot::parse("FLEX").unwrap();
        assert_eq!(flex.accepted(), PositionSet::flex());

        let wrrb = Slot::parse("WRRB_FLEX").unwrap();
        assert!(wrrb.accepted().contains(Position::RunningBack));
        assert!(!wrrb.accepted().contains(Position::TightEnd));

        let rec = Slot::parse("REC_FLEX").unwrap();
        assert!(rec.accepted().contains(Position::TightEnd));
        assert!(!rec.accepted().contains(Position::RunningBack));
    }

    #[test]
    fn parse_super_flex_and_bench() {
        let sf = Slot::parse("SUPER_FLEX").unwrap();
        assert_eq!(sf.kind, SlotKind::SuperFlex);
        assert!(sf.accepted().contains(Position::Quarterback));
        assert!(!sf.accepted().contains(Position::Kicker));

        for label in ["BN", "BE", "IR", "TAXI"] {
            let slot = Slot::parse(label).unwrap();
            assert!(slot.is_bench(), "{label} should be bench");
            assert!(slot.accepted().is_empty());
        }
    }

    #[test]
    fn parse_unknown_label_is_invalid() {
        let err = Slot::parse("IDP_FLEX").unwrap_err();
        match err {
            LineupError::InvalidSlotDefinition { label, .. } => assert_eq!(label, "IDP_FLEX"),
            other => panic!("expected InvalidSlotDefinition, got: {other}"),
        }
    }

    #[test]
    fn parse_slots_keeps_order() {
        let slots = parse_slots(&["QB", "RB", "FLEX", "BN"]).unwrap();
        let labels: Vec<&str> = slots.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["QB", "RB", "FLEX", "BN"]);
    }

    #[test]
    fn parse_slots_fails_on_any_bad_label() {
        assert!(parse_slots(&["QB", "XX", "RB"]).is_err());
    }

    #[test]
    fn empty_flex_fails_validation() {
        let slot = Slot::from_kind(SlotKind::Flex(PositionSet::empty()));
        assert!(slot.validate().is_err());
        assert!(Slot::parse("FLEX").unwrap().validate().is_ok());
    }

    #[test]
    fn from_kind_labels() {
        assert_eq!(Slot::from_kind(SlotKind::Fixed(Position::WideReceiver)).label, "WR");
        assert_eq!(Slot::from_kind(SlotKind::Flex(PositionSet::flex())).label, "FLEX");
        assert_eq!(Slot::from_kind(SlotKind::SuperFlex).label, "SUPER_FLEX");
        assert_eq!(Slot::from_kind(SlotKind::Bench).label, "BN");
    }
}
