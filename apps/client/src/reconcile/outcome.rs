//! Game end and elimination.

use tracing::info;

use super::{roster, ReconcileCtx};
use crate::protocol::inbound::{GameEnd, PlayersEliminated};
use crate::session::phase::enter_phase;
use crate::session::state::{Outcome, Phase, SessionState, Winner};

pub fn game_end(state: &mut SessionState, p: &GameEnd) {
    let winners: Vec<Winner> = p
        .winners
        .iter()
        .map(|w| Winner {
            username: w.winner_username.clone(),
            points: w.points,
        })
        .collect();
    info!(winners = winners.len(), "[RECONCILE] game over");
    enter_phase(state, Phase::AnnounceWinner);
    state.outcome = Some(Outcome::Winners(winners));
}

/// Our own elimination ends the game for us; others just leave the roster.
pub fn players_eliminated(state: &mut SessionState, ctx: &ReconcileCtx<'_>, p: &PlayersEliminated) {
    if p.eliminated_players.iter().any(|u| u == ctx.username) {
        info!("[RECONCILE] eliminated");
        enter_phase(state, Phase::AnnounceWinner);
        state.outcome = Some(Outcome::Eliminated);
        return;
    }
    for username in &p.eliminated_players {
        roster::remove_player(state, username);
    }
}
