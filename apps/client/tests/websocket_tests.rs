//! Driver against an in-process Socket.IO-speaking websocket server.

mod common;

use std::time::Duration;

use client::domain::Catalog;
use client::runtime::{driver, UserIntent};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_async, WebSocketStream};
use tokio_util::sync::CancellationToken;

type ServerWs = WebSocketStream<TcpStream>;

async fn next_text(ws: &mut ServerWs) -> String {
    loop {
        match ws.next().await {
            Some(Ok(Message::Text(text))) => return text.as_str().to_owned(),
            Some(Ok(_)) => continue,
            other => panic!("expected a text frame, got {other:?}"),
        }
    }
}

async fn send(ws: &mut ServerWs, frame: &str) {
    ws.send(Message::text(frame)).await.expect("server send");
}

#[tokio::test]
async fn driver_handshakes_joins_and_emits_intents() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    let mut config = common::config();
    config.server_url = format!("http://{addr}");
    config.token = "t0k".into();

    let shutdown = CancellationToken::new();
    let (tx, rx) = mpsc::channel(8);
    let driver_task = tokio::spawn(driver::run(config, Catalog::standard(), rx, shutdown.clone()));

    let (stream, _) = listener.accept().await.expect("accept");
    let mut ws = accept_async(stream).await.expect("websocket upgrade");

    let script = async {
        send(&mut ws, r#"0{"sid":"s1","pingInterval":25000,"pingTimeout":20000}"#).await;
        let connect = next_text(&mut ws).await;
        assert!(connect.starts_with("40{"), "got {connect}");
        assert!(connect.contains("Bearer t0k"));
        send(&mut ws, r#"40{"sid":"n1"}"#).await;

        assert_eq!(next_text(&mut ws).await, r#"42["join_lobby","ABCD"]"#);
        assert_eq!(next_text(&mut ws).await, r#"42["get_lobby_info","ABCD"]"#);

        send(&mut ws, "2").await;
        assert_eq!(next_text(&mut ws).await, "3");

        send(&mut ws, r#"42["joined_lobby"]"#).await;
        assert_eq!(
            next_text(&mut ws).await,
            r#"42["request_game_phase_player_info","ABCD"]"#
        );

        tx.send(UserIntent::StartGame).await.expect("intent queued");
        assert_eq!(next_text(&mut ws).await, r#"42["start_game","ABCD"]"#);

        shutdown.cancel();
        assert_eq!(next_text(&mut ws).await, "41");
        while let Some(Ok(_)) = ws.next().await {}
    };
    tokio::time::timeout(Duration::from_secs(10), script)
        .await
        .expect("script finished in time");

    let result = tokio::time::timeout(Duration::from_secs(5), driver_task)
        .await
        .expect("driver stopped")
        .expect("driver task joined");
    assert!(result.is_ok(), "driver error: {result:?}");
}

#[tokio::test]
async fn server_disconnect_ends_the_driver_with_an_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    let mut config = common::config();
    config.server_url = format!("ws://{addr}");

    let (_tx, rx) = mpsc::channel(1);
    let driver_task = tokio::spawn(driver::run(
        config,
        Catalog::standard(),
        rx,
        CancellationToken::new(),
    ));

    let (stream, _) = listener.accept().await.expect("accept");
    let mut ws = accept_async(stream).await.expect("websocket upgrade");
    send(&mut ws, r#"0{"sid":"s1"}"#).await;
    next_text(&mut ws).await;
    send(&mut ws, "40").await;
    next_text(&mut ws).await;
    next_text(&mut ws).await;
    send(&mut ws, "41").await;

    let result = tokio::time::timeout(Duration::from_secs(5), driver_task)
        .await
        .expect("driver stopped")
        .expect("driver task joined");
    assert!(matches!(result, Err(client::ClientError::Closed)));
}

#[tokio::test]
async fn undecodable_frames_are_dropped_and_the_session_goes_on() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    let mut config = common::config();
    config.server_url = format!("ws://{addr}");

    let shutdown = CancellationToken::new();
    let (_tx, rx) = mpsc::channel(1);
    let driver_task = tokio::spawn(driver::run(config, Catalog::standard(), rx, shutdown.clone()));

    let (stream, _) = listener.accept().await.expect("accept");
    let mut ws = accept_async(stream).await.expect("websocket upgrade");

    let script = async {
        send(&mut ws, r#"0{"sid":"s1"}"#).await;
        next_text(&mut ws).await;
        send(&mut ws, "40").await;
        next_text(&mut ws).await;
        next_text(&mut ws).await;

        send(&mut ws, "42{not json").await;
        send(&mut ws, "9").await;
        send(&mut ws, r#"45-["binary_event",{"_placeholder":true,"num":0}]"#).await;
        ws.send(Message::binary(vec![1u8, 2, 3])).await.expect("server send");

        send(&mut ws, r#"42["joined_lobby"]"#).await;
        assert_eq!(
            next_text(&mut ws).await,
            r#"42["request_game_phase_player_info","ABCD"]"#
        );

        shutdown.cancel();
        assert_eq!(next_text(&mut ws).await, "41");
        while let Some(Ok(_)) = ws.next().await {}
    };
    tokio::time::timeout(Duration::from_secs(10), script)
        .await
        .expect("script finished in time");

    let result = tokio::time::timeout(Duration::from_secs(5), driver_task)
        .await
        .expect("driver stopped")
        .expect("driver task joined");
    assert!(result.is_ok(), "driver error: {result:?}");
}
