// One optimization run: fan out data loads, attach projections, assign.

use anyhow::Context;
use lineup_core::lineup::{self, AssignmentResult};
use lineup_core::projections::{ProjectionAggregator, ProjectionScope};
use lineup_core::roster::player::Player;
use tracing::{info, warn};

use crate::config::Config;
use crate::provider::{DataProvider, RosterEntry};

/// Everything produced by a run, kept together for reporting.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub players: Vec<Player>,
    pub result: AssignmentResult,
}

/// Attach the scope's consensus projection to each roster entry.
pub fn build_players(
    roster: Vec<RosterEntry>,
    aggregator: &ProjectionAggregator,
    scope: &ProjectionScope,
) -> Vec<Player> {
    roster
        .into_iter()
        .map(|entry| {
            let points = aggregator.points(&entry.id, scope);
            entry.into_player(points)
        })
        .collect()
}

/// Load inputs through `provider` and compute the optimal lineup for the
/// configured team, comparing against current starters when they are known.
pub async fn run<P: DataProvider + ?Sized>(config: &Config, provider: &P) -> anyhow::Result<RunOutput> {
    let (roster, records, starters) = tokio::try_join!(
        provider.roster(),
        provider.projections(),
        provider.starters(),
    )
    .context("failed to load league data")?;

    let scope = config.scope();
    let aggregator = ProjectionAggregator::new(records);
    info!(
        "Loaded {} rostered players, projections for {} players ({} {:?})",
        roster.len(),
        aggregator.player_count(),
        scope.format,
        scope.period
    );

    let players = build_players(roster, &aggregator, &scope);
    let unprojected = players.iter().filter(|p| p.projected_points == 0.0).count();
    if unprojected > 0 {
        warn!("{} rostered players have no projection for this scope", unprojected);
    }

    let result = match &starters {
        Some(actual) => lineup::assign_and_compare(&players, &config.slots, actual),
        None => lineup::assign(&players, &config.slots),
    }
    .context("lineup assignment failed")?;

    info!(
        "Team {} in league {}: {} of {} starting slots filled, {:.2} projected",
        config.team.team_id,
        config.league.league_id,
        result.lineup.filled_count(),
        result.lineup.len(),
        result.total_points
    );
    if let Some(changes) = &result.changes {
        info!("{} suggested lineup changes", changes.len());
    }

    Ok(RunOutput { players, result })
}
