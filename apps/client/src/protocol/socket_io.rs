//! Socket.IO v5 over Engine.IO v4, websocket transport, text frames only.
//!
//! A frame is one Engine.IO packet: a type digit then its data. Engine.IO
//! `4` (message) carries a Socket.IO packet: a type digit, an optional
//! `/namespace,`, an optional ack id, then JSON.

use serde_json::{json, Value};

use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    /// Engine.IO handshake with `sid`, `pingInterval`, `pingTimeout`.
    Open(Value),
    Close,
    Ping,
    Pong,
    Noop,
    /// Socket.IO namespace connect; outbound carries the auth object.
    Connect(Option<Value>),
    Disconnect,
    Event { name: String, args: Vec<Value> },
    Ack { id: u64, args: Vec<Value> },
    ConnectError(Value),
}

impl Packet {
    pub fn event(name: &str, args: Vec<Value>) -> Self {
        Packet::Event {
            name: name.to_owned(),
            args,
        }
    }

    /// Connect packet with a bearer token, the auth shape the game server
    /// reads.
    pub fn connect_with_token(username: &str, token: &str) -> Self {
        Packet::Connect(Some(json!({
            "username": username,
            "authorization": format!("Bearer {token}"),
        })))
    }

    pub fn encode(&self) -> String {
        match self {
            Packet::Open(data) => format!("0{data}"),
            Packet::Close => "1".to_owned(),
            Packet::Ping => "2".to_owned(),
            Packet::Pong => "3".to_owned(),
            Packet::Noop => "6".to_owned(),
            Packet::Connect(None) => "40".to_owned(),
            Packet::Connect(Some(auth)) => format!("40{auth}"),
            Packet::Disconnect => "41".to_owned(),
            Packet::Event { name, args } => {
                let mut items = Vec::with_capacity(args.len() + 1);
                items.push(Value::String(name.clone()));
                items.extend(args.iter().cloned());
                format!("42{}", Value::Array(items))
            }
            Packet::Ack { id, args } => format!("43{id}{}", Value::Array(args.clone())),
            Packet::ConnectError(data) => format!("44{data}"),
        }
    }

    pub fn decode(frame: &str) -> Result<Self, ClientError> {
        let mut chars = frame.chars();
        let kind = chars
            .next()
            .ok_or_else(|| ClientError::protocol("empty frame"))?;
        let rest = chars.as_str();
        match kind {
            '0' => Ok(Packet::Open(serde_json::from_str(rest)?)),
            '1' => Ok(Packet::Close),
            '2' => Ok(Packet::Ping),
            '3' => Ok(Packet::Pong),
            '6' => Ok(Packet::Noop),
            '4' => decode_socket_packet(rest),
            other => Err(ClientError::protocol(format!(
                "unknown engine.io packet type '{other}'"
            ))),
        }
    }
}

fn decode_socket_packet(data: &str) -> Result<Packet, ClientError> {
    let mut chars = data.chars();
    let kind = chars
        .next()
        .ok_or_else(|| ClientError::protocol("empty socket.io packet"))?;
    let rest = skip_namespace(chars.as_str());
    match kind {
        '0' => {
            if rest.is_empty() {
                Ok(Packet::Connect(None))
            } else {
                Ok(Packet::Connect(Some(serde_json::from_str(rest)?)))
            }
        }
        '1' => Ok(Packet::Disconnect),
        '2' => {
            let (_, json) = split_ack_id(rest);
            let mut items = match serde_json::from_str::<Value>(json)? {
                Value::Array(items) => items.into_iter(),
                _ => return Err(ClientError::protocol("event payload is not an array")),
            };
            let name = match items.next() {
                Some(Value::String(name)) => name,
                _ => return Err(ClientError::protocol("event without a name")),
            };
            Ok(Packet::Event {
                name,
                args: items.collect(),
            })
        }
        '3' => {
            let (id, json) = split_ack_id(rest);
            let id = id.ok_or_else(|| ClientError::protocol("ack without id"))?;
            let args = match serde_json::from_str::<Value>(json)? {
                Value::Array(items) => items,
                other => vec![other],
            };
            Ok(Packet::Ack { id, args })
        }
        '4' => Ok(Packet::ConnectError(
            serde_json::from_str(rest).unwrap_or(Value::Null),
        )),
        other => Err(ClientError::protocol(format!(
            "unsupported socket.io packet type '{other}'"
        ))),
    }
}

fn skip_namespace(data: &str) -> &str {
    if data.starts_with('/') {
        match data.find(',') {
            Some(idx) => &data[idx + 1..],
            None => "",
        }
    } else {
        data
    }
}

fn split_ack_id(data: &str) -> (Option<u64>, &str) {
    let digits = data.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return (None, data);
    }
    (data[..digits].parse().ok(), &data[digits..])
}

/// Websocket endpoint for a server base URL.
pub fn endpoint(base: &str) -> String {
    let base = base.trim_end_matches('/');
    let base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        base.to_owned()
    };
    format!("{base}/socket.io/?EIO=4&transport=websocket")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_event_with_namespace_and_ack_id() {
        let packet = Packet::decode(r#"42/game,7["played_hand",{"total_score":3}]"#).unwrap();
        assert_eq!(
            packet,
            Packet::event("played_hand", vec![json!({"total_score": 3})])
        );
    }

    #[test]
    fn encodes_event_with_positional_args() {
        let packet = Packet::event("propose_blind", vec![json!(300), json!("ABCD")]);
        assert_eq!(packet.encode(), r#"42["propose_blind",300,"ABCD"]"#);
    }

    #[test]
    fn heartbeat_and_connect_frames() {
        assert_eq!(Packet::decode("2").unwrap(), Packet::Ping);
        assert_eq!(Packet::Pong.encode(), "3");
        assert_eq!(Packet::decode("40").unwrap(), Packet::Connect(None));
        assert!(matches!(
            Packet::decode(r#"40{"sid":"abc"}"#).unwrap(),
            Packet::Connect(Some(_))
        ));
        assert_eq!(
            Packet::connect_with_token("ana", "t0k").encode(),
            r#"40{"authorization":"Bearer t0k","username":"ana"}"#
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(Packet::decode("").is_err());
        assert!(Packet::decode("9").is_err());
        assert!(Packet::decode(r#"42{"not":"array"}"#).is_err());
    }

    #[test]
    fn endpoint_switches_scheme() {
        assert_eq!(
            endpoint("https://game.example.com/"),
            "wss://game.example.com/socket.io/?EIO=4&transport=websocket"
        );
        assert_eq!(
            endpoint("ws://localhost:8080"),
            "ws://localhost:8080/socket.io/?EIO=4&transport=websocket"
        );
    }
}
