//! `GameSession`: the single event-processing sequence.
//!
//! Inbound events, timer callbacks and player intents all pass through
//! here, one at a time, and come back out as messages to emit. Timers are
//! kept on a virtual timeline the driver maps onto real time.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;
use time::OffsetDateTime;
use tracing::{debug, error, info, warn};

use super::intents::UserIntent;
use super::timeline::Timeline;
use crate::animation::sequencer;
use crate::config::Config;
use crate::domain::Catalog;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::protocol::{InboundEvent, Outbound};
use crate::reconcile::{full_state, outcome, roster, rounds, ReconcileCtx};
use crate::session::effects::{Effect, TimerKind};
use crate::session::phase::provisional_draw_step;
use crate::session::state::{Phase, SessionState};
use crate::session::{actions, SessionStore};
use crate::shop::{confirmations, packs, validation};
use crate::vouchers;

pub struct GameSession {
    store: SessionStore,
    catalog: Catalog,
    config: Config,
    rng: StdRng,
    timeline: Timeline,
}

impl GameSession {
    pub fn new(config: Config, catalog: Catalog) -> Self {
        Self::with_rng(config, catalog, StdRng::from_rng(&mut rand::rng()))
    }

    /// Session with a fixed random source (provisional draws).
    pub fn with_rng(config: Config, catalog: Catalog, rng: StdRng) -> Self {
        Self {
            store: SessionStore::default(),
            catalog,
            config,
            rng,
            timeline: Timeline::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        self.store.state()
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn next_due_ms(&self) -> Option<u64> {
        self.timeline.next_due_ms()
    }

    /// Socket.IO namespace connected: join our lobby.
    pub fn on_connected(&mut self) -> Vec<Outbound> {
        let lobby = self.config.lobby_code.clone();
        vec![
            Outbound::JoinLobby {
                lobby: lobby.clone(),
            },
            Outbound::GetLobbyInfo { lobby },
        ]
    }

    /// Decode and handle one server event. Undecodable payloads are logged
    /// and dropped.
    pub fn handle_inbound(&mut self, name: &str, args: Vec<Value>, now: OffsetDateTime) -> Vec<Outbound> {
        match InboundEvent::decode(name, args) {
            Ok(event) => self.handle_event(event, now),
            Err(err) => {
                warn!(event = name, error = %err, "[RECONCILE] dropping malformed event");
                Vec::new()
            }
        }
    }

    pub fn handle_event(&mut self, event: InboundEvent, now: OffsetDateTime) -> Vec<Outbound> {
        let ctx = ReconcileCtx {
            catalog: &self.catalog,
            username: &self.config.username,
            lobby_code: &self.config.lobby_code,
            now,
            phase_durations: self.config.phase_durations,
            animation_unit_ms: self.config.animation_speed_ms,
            provisional_draw: self.config.provisional_draw,
        };
        let lobby = self.config.lobby_code.clone();

        let effects = self.store.update(|state| match &event {
            InboundEvent::ConnectionSuccess => {
                debug!("[WS] connection acknowledged");
                Vec::new()
            }
            InboundEvent::JoinedLobby => {
                vec![Effect::Emit(Outbound::RequestGamePhasePlayerInfo { lobby })]
            }
            InboundEvent::LobbyInfo(p) => {
                roster::lobby_info(state, p);
                Vec::new()
            }
            InboundEvent::NewUserInLobby(p) => {
                roster::add_player(state, &p.username);
                Vec::new()
            }
            InboundEvent::PlayerLeft(p) => {
                roster::remove_player(state, &p.username);
                Vec::new()
            }
            InboundEvent::PlayerKicked(p) => {
                roster::remove_player(state, &p.kicked_user);
                Vec::new()
            }
            InboundEvent::YouWereKicked => Vec::new(),
            InboundEvent::GamePhasePlayerInfo(p) => full_state::apply(state, &ctx, p),
            InboundEvent::StartingNextBlind(p) => {
                rounds::starting_next_blind(state, &ctx, p);
                Vec::new()
            }
            InboundEvent::BlindUpdated(p) => {
                rounds::blind_updated(state, &ctx, p);
                Vec::new()
            }
            InboundEvent::StartingRound(p) => rounds::starting_round(state, &ctx, p),
            InboundEvent::GotCards(p) => {
                rounds::got_cards(state, p);
                Vec::new()
            }
            InboundEvent::PlayedHand(p) => rounds::played_hand(state, &ctx, p),
            InboundEvent::DiscardedCards(p) => {
                rounds::discarded_cards(state, p);
                Vec::new()
            }
            InboundEvent::FullDeck(p) => {
                rounds::full_deck(state, p);
                Vec::new()
            }
            InboundEvent::StartingShop(p) => {
                confirmations::starting_shop(state, &ctx, p);
                Vec::new()
            }
            InboundEvent::JokerPurchased(p) => {
                confirmations::joker_purchased(state, p);
                Vec::new()
            }
            InboundEvent::VoucherPurchased(p) => {
                confirmations::voucher_purchased(state, p);
                Vec::new()
            }
            InboundEvent::PackPurchased(p) => {
                packs::pack_purchased(state, ctx.catalog, p);
                Vec::new()
            }
            InboundEvent::PackSelectionComplete(p) => {
                packs::pack_selection_complete(state, p);
                Vec::new()
            }
            InboundEvent::JokerSold(p) => {
                confirmations::joker_sold(state, p);
                Vec::new()
            }
            InboundEvent::RerolledJokers(p) => {
                confirmations::rerolled_jokers(state, p);
                Vec::new()
            }
            InboundEvent::StartingVouchers(p) => rounds::starting_vouchers(state, &ctx, p),
            InboundEvent::ModifiersActivated(p) => {
                vouchers::modifiers_activated(state, p);
                Vec::new()
            }
            InboundEvent::ModifiersReceived(p) => {
                vouchers::modifiers_received(state, ctx.catalog, p);
                Vec::new()
            }
            InboundEvent::GameEnd(p) => {
                outcome::game_end(state, p);
                Vec::new()
            }
            InboundEvent::PlayersEliminated(p) => {
                outcome::players_eliminated(state, &ctx, p);
                Vec::new()
            }
            InboundEvent::Unhandled { name } => {
                error!(event = %name, "[RECONCILE] no handler for server event");
                Vec::new()
            }
        });

        if matches!(event, InboundEvent::YouWereKicked) {
            warn!("[RECONCILE] kicked from the lobby");
            self.store.reset();
        }
        self.perform(effects)
    }

    /// Move the virtual clock and run every timer that became due, in order.
    pub fn advance(&mut self, now_ms: u64) -> Vec<Outbound> {
        self.timeline.advance_to(now_ms);
        let mut out = Vec::new();
        while let Some(kind) = self.timeline.pop_due() {
            out.extend(self.handle_timer(kind));
        }
        out
    }

    /// Run all pending timers regardless of the clock.
    pub fn run_until_idle(&mut self) -> Vec<Outbound> {
        let mut out = Vec::new();
        while let Some(kind) = self.timeline.pop_next() {
            out.extend(self.handle_timer(kind));
        }
        out
    }

    pub fn handle_timer(&mut self, kind: TimerKind) -> Vec<Outbound> {
        let lobby = self.config.lobby_code.clone();
        let rng = &mut self.rng;
        let effects = self.store.update(|state| match kind {
            TimerKind::RetrySnapshot => {
                vec![Effect::Emit(Outbound::RequestGamePhasePlayerInfo { lobby })]
            }
            TimerKind::AutoAdvanceVouchers { phase_epoch } => {
                let current = phase_epoch == state.phase_epoch
                    && state.phase == Phase::Vouchers
                    && state.vouchers.is_empty();
                if !current {
                    debug!(phase_epoch, "[PHASE] stale auto-advance ignored");
                    return Vec::new();
                }
                match actions::continue_to_next_blind(state) {
                    Ok(msg) => vec![Effect::Emit(msg)],
                    Err(err) => {
                        debug!(error = %err, "[PHASE] auto-advance skipped");
                        Vec::new()
                    }
                }
            }
            TimerKind::Animation { generation, step } => {
                sequencer::apply_step(state, generation, &step);
                Vec::new()
            }
            TimerKind::ProvisionalDraw { phase_epoch } => {
                provisional_draw_step(state, phase_epoch, rng);
                Vec::new()
            }
        });
        self.perform(effects)
    }

    /// Validate a player intent and return what to emit. A local rejection
    /// emits nothing.
    pub fn handle_intent(&mut self, intent: UserIntent) -> Vec<Outbound> {
        if matches!(intent, UserIntent::Status) {
            info!(summary = %self.summary(), "[INTENT] status");
            return Vec::new();
        }
        if matches!(intent, UserIntent::ExitLobby) {
            let lobby = self.config.lobby_code.clone();
            self.store.reset();
            return vec![Outbound::ExitLobby { lobby }];
        }

        let lobby = self.config.lobby_code.clone();
        let me = self.config.username.clone();
        let result = self.store.update(|state| -> Result<Option<Outbound>, DomainError> {
            let msg = match intent {
                UserIntent::StartGame => Outbound::StartGame { lobby },
                UserIntent::RequestSnapshot => Outbound::RequestGamePhasePlayerInfo { lobby },
                UserIntent::RequestFullDeck => Outbound::GetFullDeck { lobby },
                UserIntent::ProposeBlind(blind) => actions::propose_blind(state, blind, &lobby)?,
                UserIntent::TogglePick(item) => {
                    actions::toggle_pick(state, item)?;
                    return Ok(None);
                }
                UserIntent::PlayHand => actions::play_hand(state)?,
                UserIntent::Discard => actions::discard(state)?,
                UserIntent::BuyJoker(item) => validation::buy_joker(state, item)?,
                UserIntent::BuyVoucher(item) => validation::buy_voucher(state, item)?,
                UserIntent::BuyPack(item) => validation::buy_pack(state, item)?,
                UserIntent::SellJoker(item) => validation::sell_joker(state, item)?,
                UserIntent::Reroll => validation::reroll(state)?,
                UserIntent::TogglePackItem(item) => {
                    packs::toggle_pack_item(state, item)?;
                    return Ok(None);
                }
                UserIntent::ChoosePackItems => packs::choose_pack_items(state)?,
                UserIntent::Continue => match state.phase {
                    Phase::Shop => actions::continue_to_vouchers(state)?,
                    Phase::Vouchers => actions::continue_to_next_blind(state)?,
                    other => {
                        return Err(DomainError::validation(
                            ValidationKind::PhaseMismatch,
                            format!("nothing to continue from in {other:?}"),
                        ))
                    }
                },
                UserIntent::ToggleVoucher(item) => {
                    vouchers::toggle_voucher(state, item)?;
                    return Ok(None);
                }
                UserIntent::ActivateVouchers => vouchers::activate(state)?,
                UserIntent::SendVouchers(targets) => vouchers::send(state, targets)?,
                UserIntent::KickPlayer(target) => roster::kick(state, &me, &target, &lobby)?,
                UserIntent::ExitLobby | UserIntent::Status => return Ok(None),
            };
            Ok(Some(msg))
        });

        match result {
            Ok(Some(msg)) => {
                debug!(event = msg.name(), "[INTENT] emitting");
                vec![msg]
            }
            Ok(None) => Vec::new(),
            Err(err) => {
                info!(reason = %err, "[INTENT] rejected locally");
                Vec::new()
            }
        }
    }

    /// Queue timers and collect emits.
    fn perform(&mut self, effects: Vec<Effect>) -> Vec<Outbound> {
        let mut out = Vec::new();
        for effect in effects {
            match effect {
                Effect::Emit(msg) => out.push(msg),
                Effect::Schedule(timer) => self.timeline.schedule(timer.delay_ms, timer.kind),
            }
        }
        out
    }

    /// One-line view of the session for the status command.
    pub fn summary(&self) -> String {
        let s = self.state();
        let hand: Vec<String> = s
            .hand
            .cards()
            .iter()
            .map(|c| format!("{}{}{}", c.id, c.card.rank, c.card.suit) + if c.picked { "*" } else { "" })
            .collect();
        let jokers: Vec<String> = s
            .jokers
            .iter()
            .map(|j| match self.catalog.joker(j.joker.joker_id) {
                Some(def) => format!("{}:{}", j.id, def.name),
                None => format!("{}:#{}", j.id, j.joker.joker_id),
            })
            .collect();
        format!(
            "phase={:?} round={}/{} score_to_beat={} money={} hands={} discards={} time_left={} hand=[{}] jokers=[{}] vouchers={} active={} shop={}/{}/{} blocked={}",
            s.phase,
            s.round,
            s.max_rounds,
            s.min_score,
            s.money,
            s.hands,
            s.discards,
            s.time_left,
            hand.join(" "),
            jokers.join(" "),
            s.vouchers.len(),
            s.active_vouchers.len(),
            s.shop.jokers.len(),
            s.shop.vouchers.len(),
            s.shop.packs.len(),
            s.action_blocked,
        )
    }
}
