// Plain-text rendering of an assignment result.

use std::fmt::Write;

use lineup_core::lineup::{AssignmentResult, ChangeKind};
use lineup_core::projections::format_points;
use lineup_core::roster::player::{Player, PlayerId};

fn kind_label(kind: ChangeKind) -> &'static str {
    match kind {
        ChangeKind::FillEmpty => "fill empty slot",
        ChangeKind::ReplaceUnavailable => "replace unavailable starter",
        ChangeKind::Reshuffle => "move between slots",
        ChangeKind::Upgrade => "upgrade",
        ChangeKind::Vacate => "no eligible starter",
    }
}

fn display_name(id: Option<&PlayerId>, pool: &[Player]) -> String {
    match id {
        None => "(empty)".to_string(),
        Some(id) => pool
            .iter()
            .find(|p| &p.id == id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("#{id}")),
    }
}

/// Render the optimal lineup and, if present, the suggested changes.
///
/// Points are rounded to `precision` digits here and nowhere else.
pub fn render(result: &AssignmentResult, pool: &[Player], precision: u8) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Optimal lineup");
    for entry in &result.lineup.entries {
        match &entry.player {
            Some(p) => {
                let _ = writeln!(
                    out,
                    "  {:<10} {:<24} {:>3} {:>7}",
                    entry.slot.label,
                    p.name,
                    p.position.display_str(),
                    format_points(p.projected_points, precision)
                );
            }
            None => {
                let _ = writeln!(out, "  {:<10} (empty)", entry.slot.label);
            }
        }
    }
    let _ = writeln!(
        out,
        "  {:<10} {:>36}",
        "TOTAL",
        format_points(result.total_points, precision)
    );

    let Some(changes) = &result.changes else {
        return out;
    };

    let _ = writeln!(out);
    if changes.is_empty() {
        let _ = writeln!(out, "Current lineup is already optimal.");
        return out;
    }

    let _ = writeln!(out, "Suggested changes");
    for change in changes {
        let gain = change.point_gain;
        let sign = if gain >= 0.0 { "+" } else { "-" };
        let _ = writeln!(
            out,
            "  [{}] {:<10} {} -> {} ({}{}, {})",
            change.index,
            change.slot.label,
            display_name(change.current.as_ref(), pool),
            display_name(change.suggested.as_ref(), pool),
            sign,
            format_points(gain.abs(), precision),
            kind_label(change.kind)
        );
    }
    let net = result.projected_gain();
    let _ = writeln!(
        out,
        "  Net projected gain: {}{}",
        if net >= 0.0 { "+" } else { "-" },
        format_points(net.abs(), precision)
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineup_core::lineup::assign::{assign, assign_and_compare};
    use lineup_core::lineup::slot::parse_slots;
    use lineup_core::roster::player::PlayerStatus;
    use lineup_core::roster::position::Position;

    fn pool() -> Vec<Player> {
        vec![
            Player::new("1", "Josh Allen", Position::Quarterback, &[], PlayerStatus::Active, 24.567),
            Player::new("2", "Gardner Minshew", Position::Quarterback, &[], PlayerStatus::Active, 11.2),
            Player::new("3", "Bijan Robinson", Position::RunningBack, &[], PlayerStatus::Active, 17.0),
        ]
    }

    #[test]
    fn renders_lineup_with_rounding() {
        let players = pool();
        let result = assign(&players, &parse_slots(&["QB", "RB", "TE"]).unwrap()).unwrap();
        let text = render(&result, &players, 1);
        assert!(text.contains("Josh Allen"));
        assert!(text.contains("24.6"));
        assert!(text.contains("TE         (empty)"));
        assert!(text.contains("41.6"));
        assert!(!text.contains("Suggested changes"));
    }

    #[test]
    fn renders_changes_with_names() {
        let players = pool();
        let actual = vec![Some(PlayerId::from("2")), Some(PlayerId::from("3"))];
        let result = assign_and_compare(&players, &parse_slots(&["QB", "RB"]).unwrap(), &actual).unwrap();
        let text = render(&result, &players, 2);
        assert!(text.contains("Gardner Minshew -> Josh Allen (+13.37, upgrade)"));
        assert!(text.contains("Net projected gain: +13.37"));
    }

    #[test]
    fn renders_already_optimal() {
        let players = pool();
        let actual = vec![Some(PlayerId::from("1"))];
        let result = assign_and_compare(&players, &parse_slots(&["QB"]).unwrap(), &actual).unwrap();
        let text = render(&result, &players, 2);
        assert!(text.contains("already optimal"));
    }

    #[test]
    fn unknown_starter_shown_by_id() {
        let players = pool();
        let actual = vec![Some(PlayerId::from("777"))];
        let result = assign_and_compare(&players, &parse_slots(&["QB"]).unwrap(), &actual).unwrap();
        let text = render(&result, &players, 2);
        assert!(text.contains("#777 -> Josh Allen"));
    }
}
