//! Player intents, as the UI (here: a line-oriented command reader) sends
//! them.

use std::str::FromStr;

use crate::domain::ItemId;
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIntent {
    StartGame,
    RequestSnapshot,
    RequestFullDeck,
    ProposeBlind(i64),
    TogglePick(ItemId),
    PlayHand,
    Discard,
    BuyJoker(ItemId),
    BuyVoucher(ItemId),
    BuyPack(ItemId),
    SellJoker(ItemId),
    Reroll,
    TogglePackItem(ItemId),
    ChoosePackItems,
    /// Leave the current phase (Shop or Vouchers).
    Continue,
    ToggleVoucher(ItemId),
    ActivateVouchers,
    SendVouchers(Vec<String>),
    ExitLobby,
    /// Host only: remove a player from the lobby.
    KickPlayer(String),
    Status,
}

fn item(cmd: &str, arg: Option<&str>) -> Result<ItemId, DomainError> {
    let raw = arg
        .map(|a| a.trim_start_matches('#'))
        .ok_or_else(|| DomainError::payload(cmd, "missing item id"))?;
    raw.parse::<u64>()
        .map(ItemId::from_raw)
        .map_err(|_| DomainError::payload(cmd, format!("'{raw}' is not an item id")))
}

impl FromStr for UserIntent {
    type Err = DomainError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let cmd = words
            .next()
            .ok_or_else(|| DomainError::payload("command", "empty line"))?
            .to_ascii_lowercase();
        let arg = words.next();
        let intent = match cmd.as_str() {
            "start" => UserIntent::StartGame,
            "sync" => UserIntent::RequestSnapshot,
            "deck" => UserIntent::RequestFullDeck,
            "blind" => {
                let raw = arg.ok_or_else(|| DomainError::payload("blind", "missing amount"))?;
                let blind = raw
                    .parse::<i64>()
                    .map_err(|_| DomainError::payload("blind", format!("'{raw}' is not a number")))?;
                UserIntent::ProposeBlind(blind)
            }
            "pick" => UserIntent::TogglePick(item(&cmd, arg)?),
            "play" => UserIntent::PlayHand,
            "discard" => UserIntent::Discard,
            "buy-joker" => UserIntent::BuyJoker(item(&cmd, arg)?),
            "buy-voucher" => UserIntent::BuyVoucher(item(&cmd, arg)?),
            "buy-pack" => UserIntent::BuyPack(item(&cmd, arg)?),
            "sell" => UserIntent::SellJoker(item(&cmd, arg)?),
            "reroll" => UserIntent::Reroll,
            "pack-pick" => UserIntent::TogglePackItem(item(&cmd, arg)?),
            "pack-choose" => UserIntent::ChoosePackItems,
            "continue" | "next" => UserIntent::Continue,
            "voucher" => UserIntent::ToggleVoucher(item(&cmd, arg)?),
            "activate" => UserIntent::ActivateVouchers,
            "send" => {
                let targets: Vec<String> = arg.into_iter().chain(words).map(str::to_owned).collect();
                UserIntent::SendVouchers(targets)
            }
            "exit" | "leave" => UserIntent::ExitLobby,
            "kick" => {
                let name = arg.ok_or_else(|| DomainError::payload("kick", "missing username"))?;
                UserIntent::KickPlayer(name.to_owned())
            }
            "status" => UserIntent::Status,
            other => {
                return Err(DomainError::payload(
                    "command",
                    format!("unknown command '{other}'"),
                ))
            }
        };
        Ok(intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_with_item_ids() {
        assert_eq!(
            "pick #12".parse::<UserIntent>().unwrap(),
            UserIntent::TogglePick(ItemId::from_raw(12))
        );
        assert_eq!(
            "BUY-JOKER 3".parse::<UserIntent>().unwrap(),
            UserIntent::BuyJoker(ItemId::from_raw(3))
        );
        assert_eq!("blind 300".parse::<UserIntent>().unwrap(), UserIntent::ProposeBlind(300));
    }

    #[test]
    fn kick_takes_a_username() {
        assert_eq!(
            "kick bob".parse::<UserIntent>().unwrap(),
            UserIntent::KickPlayer("bob".into())
        );
    }

    #[test]
    fn send_collects_every_target() {
        assert_eq!(
            "send bob carol".parse::<UserIntent>().unwrap(),
            UserIntent::SendVouchers(vec!["bob".into(), "carol".into()])
        );
    }

    #[test]
    fn rejects_bad_lines() {
        assert!("".parse::<UserIntent>().is_err());
        assert!("pick".parse::<UserIntent>().is_err());
        assert!("pick twelve".parse::<UserIntent>().is_err());
        assert!("dance".parse::<UserIntent>().is_err());
        assert!("kick".parse::<UserIntent>().is_err());
    }
}
