//! Voucher Targeting Subsystem.
//!
//! `vouchers` holds what the player owns; `active_vouchers` what currently
//! affects them, including vouchers other players sent. The server updates
//! the two independently.

use tracing::debug;

use crate::domain::items::{rewrap, wrap_all, Wrapped};
use crate::domain::{Catalog, ItemId, VoucherItem};
use crate::errors::domain::{DomainError, ValidationKind};
use crate::protocol::inbound::{ModifiersActivated, ModifiersReceived};
use crate::protocol::Outbound;
use crate::session::state::{Phase, SessionState};

fn ensure_voucher_phase(state: &SessionState) -> Result<(), DomainError> {
    if state.phase != Phase::Vouchers {
        return Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            format!("vouchers are played in the Vouchers phase, not {:?}", state.phase),
        ));
    }
    if state.action_blocked {
        return Err(DomainError::validation(
            ValidationKind::ActionBlocked,
            "waiting for the next phase",
        ));
    }
    Ok(())
}

fn picked_ids(state: &SessionState) -> Vec<u32> {
    state
        .vouchers
        .iter()
        .filter(|v| v.picked)
        .map(|v| v.voucher.voucher_id)
        .collect()
}

/// Flip selection of an owned voucher.
pub fn toggle_voucher(state: &mut SessionState, item: ItemId) -> Result<(), DomainError> {
    let voucher = state
        .vouchers
        .iter_mut()
        .find(|v| v.id == item)
        .ok_or_else(|| {
            DomainError::validation(ValidationKind::UnknownItem, format!("{item} is not owned"))
        })?;
    voucher.picked = !voucher.picked;
    Ok(())
}

/// Activate the picked vouchers on ourselves.
pub fn activate(state: &SessionState) -> Result<Outbound, DomainError> {
    ensure_voucher_phase(state)?;
    let vouchers = picked_ids(state);
    if vouchers.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::InvalidSelection,
            "no voucher picked",
        ));
    }
    Ok(Outbound::ActivateModifiers { vouchers })
}

/// Send the picked vouchers to other players.
pub fn send(state: &SessionState, targets: Vec<String>) -> Result<Outbound, DomainError> {
    ensure_voucher_phase(state)?;
    let vouchers = picked_ids(state);
    if vouchers.is_empty() || targets.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::InvalidSelection,
            "pick at least one voucher and one target",
        ));
    }
    Ok(Outbound::SendModifiers { vouchers, targets })
}

/// `modifiers_activated`: the payload is the whole owned set.
pub fn modifiers_activated(state: &mut SessionState, confirmed: &ModifiersActivated) {
    let owned = confirmed
        .vouchers
        .as_ref()
        .map(|list| list.vouchers(None))
        .unwrap_or_default();
    state.vouchers = rewrap(&state.vouchers, owned, &mut state.ids);
}

/// `modifiers_received`: drop non-targeted vouchers from the active set,
/// then append what arrived.
pub fn modifiers_received(state: &mut SessionState, catalog: &Catalog, received: &ModifiersReceived) {
    let before = state.active_vouchers.len();
    state
        .active_vouchers
        .retain(|v| !catalog.is_non_targeted(v.voucher.voucher_id));
    let incoming = received
        .modifiers
        .as_ref()
        .map(|list| list.vouchers(received.sender.as_deref()))
        .unwrap_or_default();
    debug!(
        dropped = before - state.active_vouchers.len(),
        received = incoming.len(),
        "[VOUCHERS] active set updated"
    );
    let mut added: Vec<VoucherItem> = wrap_all(incoming, &mut state.ids);
    state.active_vouchers.append(&mut added);
}

/// Ids of the active vouchers, for display.
pub fn active_ids(state: &SessionState) -> Vec<u32> {
    state
        .active_vouchers
        .iter()
        .map(|v| v.value().voucher_id)
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn received(payload: serde_json::Value) -> ModifiersReceived {
        serde_json::from_value(payload).expect("payload")
    }

    #[test]
    fn non_targeted_vouchers_do_not_accumulate() {
        let catalog = Catalog::standard();
        let mut state = SessionState::new();
        // 2 and 4 are non-targeted in the standard catalog
        modifiers_received(&mut state, &catalog, &received(json!({"modifiers": [2]})));
        modifiers_received(&mut state, &catalog, &received(json!({"modifiers": [4]})));
        assert_eq!(active_ids(&state), vec![4]);
    }

    #[test]
    fn targeted_voucher_survives_a_non_targeted_receipt() {
        let catalog = Catalog::standard();
        let mut state = SessionState::new();
        modifiers_received(
            &mut state,
            &catalog,
            &received(json!({"modifiers": [1], "sender": "bob"})),
        );
        modifiers_received(&mut state, &catalog, &received(json!({"modifiers": [2]})));
        assert_eq!(active_ids(&state), vec![1, 2]);
        assert_eq!(state.active_vouchers[0].voucher.sender.as_deref(), Some("bob"));
    }

    #[test]
    fn activation_confirmation_replaces_owned_set() {
        let mut state = SessionState::new();
        modifiers_activated(
            &mut state,
            &serde_json::from_value(json!({"vouchers": [1, 3, 3]})).expect("payload"),
        );
        assert_eq!(state.vouchers.len(), 3);
        modifiers_activated(
            &mut state,
            &serde_json::from_value(json!({"vouchers": {"modifiers": [3]}})).expect("payload"),
        );
        assert_eq!(state.vouchers.len(), 1);
        assert_eq!(state.vouchers[0].voucher.voucher_id, 3);
    }

    #[test]
    fn send_requires_picks_and_targets() {
        let mut state = SessionState::new();
        state.phase = Phase::Vouchers;
        modifiers_activated(
            &mut state,
            &serde_json::from_value(json!({"vouchers": [1]})).expect("payload"),
        );
        assert!(send(&state, vec!["bob".into()]).is_err());

        let item = state.vouchers[0].id;
        toggle_voucher(&mut state, item).unwrap();
        assert_eq!(
            send(&state, vec!["bob".into()]).unwrap(),
            Outbound::SendModifiers {
                vouchers: vec![1],
                targets: vec!["bob".into()]
            }
        );
        assert_eq!(
            activate(&state).unwrap(),
            Outbound::ActivateModifiers { vouchers: vec![1] }
        );
    }
}
