//! Connection manager against a loopback WebSocket server.
//!
//! Every test binds a fresh listener on 127.0.0.1 and drives the real
//! `tokio-tungstenite` handshake, so the pumps run against an actual socket.

use std::{
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};

use chrono::Utc;
use futures::{Sink, SinkExt, Stream, StreamExt};
use motbwa_client::{
    AUTH_HEADER, CloseOutcome, ConnectionEvent, ConnectionManager, REFRESH_TOKEN_HEADER, Room,
    ServerConfig, Session, UserInfo, WsTransport, connect,
};
use motbwa_proto::{SEND_MESSAGE, decode, encode};
use tokio::{
    net::{TcpListener, TcpStream},
    sync::oneshot,
    time::timeout,
};
use tokio_tungstenite::{
    WebSocketStream,
    tungstenite::{
        Error as WsError, Message as WsMessage,
        handshake::server::{Request, Response},
    },
};
use uuid::Uuid;

const STEP: Duration = Duration::from_secs(5);

fn alice() -> UserInfo {
    UserInfo { name: "alice123456".into(), id: Uuid::new_v4() }
}

/// Bind a listener and return it with the streaming URL pointing at it.
async fn listen() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}/ws", listener.local_addr().unwrap());
    (listener, url)
}

async fn accept(listener: &TcpListener) -> WebSocketStream<TcpStream> {
    let (stream, _) = listener.accept().await.unwrap();
    tokio_tungstenite::accept_async(stream).await.unwrap()
}

/// Connect a manager to `url` with a default room.
async fn manager(url: &str) -> ConnectionManager<WsTransport> {
    let (transport, _) = tokio_tungstenite::connect_async(url).await.unwrap();
    ConnectionManager::new(transport, alice(), Room::default())
}

#[tokio::test]
async fn new_records_single_current_room() {
    let (listener, url) = listen().await;
    let server = tokio::spawn(async move { accept(&listener).await });

    let (transport, _) = tokio_tungstenite::connect_async(url.as_str()).await.unwrap();
    let room = Room::new("lobby");
    let manager = ConnectionManager::new(transport, alice(), room.clone());

    assert_eq!(manager.current_room(), &room);
    assert_eq!(manager.rooms(), std::slice::from_ref(&room));
    assert_eq!(manager.user().name, "alice123456");

    let _server = server.await.unwrap();
    manager.close().await.unwrap();
}

#[tokio::test]
async fn sends_arrive_in_submission_order() {
    let (listener, url) = listen().await;
    let server = tokio::spawn(async move {
        let mut ws = accept(&listener).await;
        let mut frames = Vec::new();
        while frames.len() < 5 {
            match ws.next().await {
                Some(Ok(WsMessage::Text(text))) => frames.push(text.to_string()),
                Some(Ok(_)) => {},
                other => panic!("stream ended early: {other:?}"),
            }
        }
        frames
    });

    let manager = manager(&url).await;
    let room = manager.current_room().id;
    for i in 0..5 {
        manager.send_message(format!("message {i}")).await.unwrap();
    }

    let frames = timeout(STEP, server).await.unwrap().unwrap();
    assert_eq!(frames.len(), 5);
    for (i, frame) in frames.iter().enumerate() {
        let event = decode(frame.as_bytes()).unwrap();
        assert_eq!(event.kind, SEND_MESSAGE);
        assert_eq!(event.room, room);
        assert_eq!(event.message.sender, "alice123456");
        assert_eq!(event.message.content, format!("message {i}"));
    }

    manager.close().await.unwrap();
}

#[tokio::test]
async fn hello_is_written_as_one_send_message_frame() {
    let (listener, url) = listen().await;
    let server = tokio::spawn(async move {
        let mut ws = accept(&listener).await;
        loop {
            if let Some(Ok(WsMessage::Text(text))) = ws.next().await {
                return text.to_string();
            }
        }
    });

    let manager = manager(&url).await;
    manager.send_message("hello").await.unwrap();

    let frame = timeout(STEP, server).await.unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&frame).unwrap();
    assert_eq!(json["type"], "send_message");
    assert_eq!(json["message"]["content"], "hello");
    assert_eq!(json["message"]["sender"], "alice123456");

    manager.close().await.unwrap();
}

#[tokio::test]
async fn inbound_message_is_delivered() {
    let (listener, url) = listen().await;
    let room = Uuid::new_v4();
    let server = tokio::spawn(async move {
        let mut ws = accept(&listener).await;
        let frame = encode(room, "bob", "hi", Utc::now()).unwrap();
        ws.send(WsMessage::Text(frame.into())).await.unwrap();
        ws
    });

    let mut manager = manager(&url).await;
    let event = timeout(STEP, manager.recv()).await.unwrap();

    let Some(ConnectionEvent::Message(message)) = event else {
        panic!("expected a message, got {event:?}");
    };
    assert_eq!(message.sender, "bob");
    assert_eq!(message.content, "hi");

    let _server = server.await.unwrap();
    manager.close().await.unwrap();
}

#[tokio::test]
async fn inbound_messages_keep_receipt_order() {
    let (listener, url) = listen().await;
    let server = tokio::spawn(async move {
        let mut ws = accept(&listener).await;
        for i in 0..10 {
            let frame = encode(Uuid::nil(), "bob", &i.to_string(), Utc::now()).unwrap();
            ws.send(WsMessage::Text(frame.into())).await.unwrap();
        }
        ws
    });

    let mut manager = manager(&url).await;
    for i in 0..10 {
        match timeout(STEP, manager.recv()).await.unwrap() {
            Some(ConnectionEvent::Message(message)) => assert_eq!(message.content, i.to_string()),
            other => panic!("expected message {i}, got {other:?}"),
        }
    }

    let _server = server.await.unwrap();
    manager.close().await.unwrap();
}

#[tokio::test]
async fn peer_close_reports_closed() {
    let (listener, url) = listen().await;
    let server = tokio::spawn(async move {
        let mut ws = accept(&listener).await;
        ws.close(None).await.unwrap();
        ws
    });

    let mut manager = manager(&url).await;
    let event = timeout(STEP, manager.recv()).await.unwrap();
    assert_eq!(event, Some(ConnectionEvent::Closed));

    let _server = server.await.unwrap();
    manager.close().await.unwrap();
}

#[tokio::test]
async fn dropped_peer_reports_lost() {
    let (listener, url) = listen().await;
    let server = tokio::spawn(async move {
        let ws = accept(&listener).await;
        drop(ws);
    });

    let mut manager = manager(&url).await;
    server.await.unwrap();

    let event = timeout(STEP, manager.recv()).await.unwrap();
    assert!(matches!(event, Some(ConnectionEvent::Lost { .. })), "got {event:?}");

    manager.close().await.unwrap();
}

#[tokio::test]
async fn malformed_frame_stops_inbound_delivery() {
    let (listener, url) = listen().await;
    let server = tokio::spawn(async move {
        let mut ws = accept(&listener).await;
        ws.send(WsMessage::Text("{\"type\":".into())).await.unwrap();
        let frame = encode(Uuid::nil(), "bob", "after", Utc::now()).unwrap();
        ws.send(WsMessage::Text(frame.into())).await.unwrap();
        ws
    });

    let mut manager = manager(&url).await;
    let _server = server.await.unwrap();

    let next = timeout(Duration::from_millis(300), manager.recv()).await;
    assert!(next.is_err(), "nothing should be delivered, got {next:?}");

    manager.close().await.unwrap();
}

#[tokio::test]
async fn close_is_acknowledged_by_peer() {
    let (listener, url) = listen().await;
    let server = tokio::spawn(async move {
        let mut ws = accept(&listener).await;
        // Reading drives the automatic close reply.
        while let Some(Ok(_)) = ws.next().await {}
    });

    let manager = manager(&url).await;
    let outcome = timeout(STEP, manager.close()).await.unwrap().unwrap();
    assert_eq!(outcome, CloseOutcome::Acknowledged);

    timeout(STEP, server).await.unwrap().unwrap();
}

#[tokio::test]
async fn close_gives_up_on_silent_peer() {
    let (listener, url) = listen().await;
    let (release_tx, release_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        let ws = accept(&listener).await;
        let _ = release_rx.await;
        drop(ws);
    });

    let manager = manager(&url).await;
    let outcome = timeout(STEP, manager.close()).await.unwrap().unwrap();
    assert_eq!(outcome, CloseOutcome::TimedOut);

    release_tx.send(()).unwrap();
    server.await.unwrap();
}

#[tokio::test]
async fn close_after_peer_closed_does_not_hang() {
    let (listener, url) = listen().await;
    let server = tokio::spawn(async move {
        let mut ws = accept(&listener).await;
        ws.close(None).await.unwrap();
        while let Some(Ok(_)) = ws.next().await {}
    });

    let mut manager = manager(&url).await;
    assert_eq!(timeout(STEP, manager.recv()).await.unwrap(), Some(ConnectionEvent::Closed));

    timeout(STEP, manager.close()).await.unwrap().unwrap();
    timeout(STEP, server).await.unwrap().unwrap();
}

#[tokio::test]
async fn connect_sends_auth_headers() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let (headers_tx, headers_rx) = oneshot::channel();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let callback = move |request: &Request, response: Response| {
            let header = |name: &str| {
                request.headers().get(name).and_then(|v| v.to_str().ok()).map(str::to_string)
            };
            let _ = headers_tx.send((
                request.uri().path().to_string(),
                header(AUTH_HEADER),
                header(REFRESH_TOKEN_HEADER),
            ));
            Ok(response)
        };
        tokio_tungstenite::accept_hdr_async(stream, callback).await.unwrap()
    });

    let session = Session {
        user_id: Uuid::new_v4(),
        username: "alice123456".into(),
        auth_token: "access".into(),
        refresh_token: "refresh".into(),
    };
    let manager = connect(&ServerConfig::new("127.0.0.1", port), &session).await.unwrap();

    let (path, auth, refresh) = timeout(STEP, headers_rx).await.unwrap().unwrap();
    assert_eq!(path, "/ws");
    assert_eq!(auth.as_deref(), Some("Bearer access"));
    assert_eq!(refresh.as_deref(), Some("Token refresh"));
    assert_eq!(manager.user().name, "alice123456");
    assert_eq!(manager.current_room().name, "default");

    let _server = server.await.unwrap();
    manager.close().await.unwrap();
}

#[tokio::test]
async fn connect_to_missing_server_fails() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let session = Session {
        user_id: Uuid::nil(),
        username: "alice123456".into(),
        auth_token: String::new(),
        refresh_token: String::new(),
    };
    let result = connect(&ServerConfig::new("127.0.0.1", port), &session).await;
    assert!(matches!(result, Err(motbwa_client::ConnectionError::Handshake { .. })));
}

/// Transport whose reads never complete and whose writes always fail.
struct BrokenTransport;

impl Stream for BrokenTransport {
    type Item = Result<WsMessage, WsError>;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Poll::Pending
    }
}

impl Sink<WsMessage> for BrokenTransport {
    type Error = WsError;

    fn poll_ready(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), WsError>> {
        Poll::Ready(Ok(()))
    }

    fn start_send(self: Pin<&mut Self>, _item: WsMessage) -> Result<(), WsError> {
        Err(WsError::AlreadyClosed)
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), WsError>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), WsError>> {
        Poll::Ready(Ok(()))
    }
}

#[tokio::test]
async fn write_failure_reports_lost_and_close_is_forced() {
    let mut manager = ConnectionManager::new(BrokenTransport, alice(), Room::default());

    manager.send_message("hello").await.unwrap();
    let event = timeout(STEP, manager.recv()).await.unwrap();
    assert!(matches!(event, Some(ConnectionEvent::Lost { .. })), "got {event:?}");

    let outcome = timeout(STEP, manager.close()).await.unwrap().unwrap();
    assert_eq!(outcome, CloseOutcome::Forced);
}

#[tokio::test]
async fn send_after_writer_stopped_fails() {
    let mut manager = ConnectionManager::new(BrokenTransport, alice(), Room::default());

    manager.send_message("first").await.unwrap();
    let _lost = timeout(STEP, manager.recv()).await.unwrap();

    // An intent may still fit the buffer until the writer's receiver is gone.
    let error = timeout(STEP, async {
        loop {
            if let Err(e) = manager.send_message("again").await {
                return e;
            }
        }
    })
    .await
    .unwrap();
    assert!(matches!(error, motbwa_client::ConnectionError::Closed));
}
