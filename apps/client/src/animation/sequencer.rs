//! Score Animation Sequencer.
//!
//! A reveal is planned up front from counts alone: every step gets a fixed
//! offset (in animation units) and the generation of its run. The runtime
//! delivers steps back in offset order; a step whose generation is no
//! longer current does nothing.

use tracing::{debug, warn};

use crate::domain::{Card, Catalog};
use crate::errors::domain::DomainError;
use crate::session::effects::{Effect, TimerKind};
use crate::session::state::SessionState;

/// Offset, in units, of the first scored card.
pub const FIRST_STEP_UNITS: u64 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreStep {
    /// Highlight played card `index` and add its rank value to blue.
    Card { index: usize, value: i64 },
    /// Highlight joker `slot` and show the server's final totals.
    Joker { slot: usize, blue: i64, red: i64 },
    /// Clear the table and charge the score against the blind.
    Settle { total: i64 },
    /// Zero the running display totals.
    ResetDisplay,
}

/// Terminal result of a played hand, as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreReveal {
    /// 0-based index into the local hand type table.
    pub hand_type: i64,
    pub blue: i64,
    pub red: i64,
    pub total: i64,
    pub jokers_triggered: Vec<bool>,
    pub scored_cards: Vec<Card>,
}

/// Steps with their offsets in units, in delivery order.
pub fn plan(played: &[Card], reveal: &ScoreReveal) -> Vec<(u64, ScoreStep)> {
    let mut steps = Vec::new();
    let mut offset = FIRST_STEP_UNITS;

    let mut remaining: Vec<&Card> = reveal.scored_cards.iter().collect();
    for (index, card) in played.iter().enumerate() {
        if let Some(pos) = remaining.iter().position(|c| c.same_face(card)) {
            remaining.swap_remove(pos);
            steps.push((
                offset,
                ScoreStep::Card {
                    index,
                    value: card.rank.value(),
                },
            ));
            offset += 1;
        }
    }

    for (slot, _) in reveal
        .jokers_triggered
        .iter()
        .enumerate()
        .filter(|&(_, &triggered)| triggered)
    {
        steps.push((
            offset,
            ScoreStep::Joker {
                slot,
                blue: reveal.blue,
                red: reveal.red,
            },
        ));
        offset += 1;
    }

    steps.push((
        offset,
        ScoreStep::Settle {
            total: reveal.total,
        },
    ));
    steps.push((offset + 1, ScoreStep::ResetDisplay));
    steps
}

/// Start a reveal run: apply the hand type's base scores now and schedule
/// the rest. An unknown hand type aborts the run before anything changes.
pub fn start(
    state: &mut SessionState,
    catalog: &Catalog,
    reveal: ScoreReveal,
    unit_ms: u64,
) -> Result<Vec<Effect>, DomainError> {
    let hand_type = usize::try_from(reveal.hand_type)
        .ok()
        .and_then(|idx| catalog.hand_type(idx).map(|ht| (idx, ht)));
    let Some((index, base)) = hand_type else {
        warn!(
            hand_type = reveal.hand_type,
            known = catalog.hand_type_count(),
            "[ANIMATION] unknown hand type, reveal aborted"
        );
        return Err(DomainError::out_of_range(format!(
            "hand type {} (table has {})",
            reveal.hand_type,
            catalog.hand_type_count()
        )));
    };

    let played: Vec<Card> = if state.played_cards.is_empty() {
        reveal.scored_cards.clone()
    } else {
        state.played_cards.iter().map(|c| c.card).collect()
    };
    let steps = plan(&played, &reveal);

    state.anim.reset();
    let generation = state.anim.generation;
    state.anim.running = true;
    state.anim.hand_type = Some(index);
    state.anim.blue = base.blue;
    state.anim.red = base.red;
    state.anim.activated_jokers = reveal.jokers_triggered;
    state.anim.scored_cards = reveal.scored_cards;

    debug!(
        generation,
        hand_type = base.name,
        steps = steps.len(),
        "[ANIMATION] reveal scheduled"
    );

    Ok(steps
        .into_iter()
        .map(|(units, step)| {
            Effect::schedule(units * unit_ms, TimerKind::Animation { generation, step })
        })
        .collect())
}

/// Apply one step. Returns false when the step belongs to an older run.
pub fn apply_step(state: &mut SessionState, generation: u64, step: &ScoreStep) -> bool {
    if generation != state.anim.generation {
        debug!(
            generation,
            current = state.anim.generation,
            "[ANIMATION] stale step ignored"
        );
        return false;
    }
    match *step {
        ScoreStep::Card { index, value } => {
            state.anim.blue += value;
            state.anim.highlighted_card = Some(index);
        }
        ScoreStep::Joker { slot, blue, red } => {
            state.anim.blue = blue;
            state.anim.red = red;
            state.anim.highlighted_card = None;
            state.anim.highlighted_joker = Some(slot);
        }
        ScoreStep::Settle { total } => {
            state.played_cards.clear();
            state.min_score -= total;
            state.action_blocked = state.min_score < 0;
            state.anim.highlighted_card = None;
            state.anim.highlighted_joker = None;
        }
        ScoreStep::ResetDisplay => {
            state.anim.blue = 0;
            state.anim.red = 0;
            state.anim.running = false;
        }
    }
    true
}
