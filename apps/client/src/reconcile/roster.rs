//! Lobby roster: who is in the game with us.

use crate::errors::domain::{DomainError, ValidationKind};
use crate::protocol::inbound::{LobbyInfo, RosterEntry};
use crate::protocol::Outbound;
use crate::session::state::{LobbyPlayer, SessionState};

/// `lobby_info`: wholesale replace; the creator is the host.
pub fn lobby_info(state: &mut SessionState, info: &LobbyInfo) {
    let host = info.creator.as_ref().map(|c| c.username.as_str());
    state.roster = info
        .players
        .iter()
        .map(|p| LobbyPlayer {
            username: p.username.clone(),
            is_host: Some(p.username.as_str()) == host,
        })
        .collect();
}

/// Add a player unless already listed.
pub fn add_player(state: &mut SessionState, username: &str) {
    if !state.roster.iter().any(|p| p.username == username) {
        state.roster.push(LobbyPlayer {
            username: username.to_owned(),
            is_host: false,
        });
    }
}

pub fn remove_player(state: &mut SessionState, username: &str) {
    state.roster.retain(|p| p.username != username);
}

/// Ask the server to remove `target`. Only the host may kick, and never
/// themselves; the roster changes when `kick_success` arrives.
pub fn kick(
    state: &SessionState,
    me: &str,
    target: &str,
    lobby: &str,
) -> Result<Outbound, DomainError> {
    if !state.roster.iter().any(|p| p.is_host && p.username == me) {
        return Err(DomainError::validation(
            ValidationKind::NotHost,
            "only the lobby host can kick",
        ));
    }
    if target == me || !state.roster.iter().any(|p| p.username == target) {
        return Err(DomainError::validation(
            ValidationKind::InvalidSelection,
            format!("cannot kick '{target}'"),
        ));
    }
    Ok(Outbound::KickFromLobby {
        lobby: lobby.to_owned(),
        username: target.to_owned(),
    })
}

/// Roster carried inside game payloads: wholesale replace, keeping host
/// flags of players already known.
pub fn replace_from_game(state: &mut SessionState, users: &[RosterEntry]) {
    let roster = users
        .iter()
        .map(|u| LobbyPlayer {
            username: u.username().to_owned(),
            is_host: state
                .roster
                .iter()
                .any(|p| p.is_host && p.username == u.username()),
        })
        .collect();
    state.roster = roster;
}
