//! Connection manager.
//!
//! Owns one duplex WebSocket connection and splits it across two tasks:
//!
//! - the inbound pump reads frames, decodes them and pushes
//!   [`ConnectionEvent`]s onto a capacity-1 channel the caller drains
//! - the outbound pump waits for send intents on a capacity-1 channel, encodes
//!   them and writes one frame per intent
//!
//! The two channels and a shared cancellation token are the only state the
//! tasks share. Transport failures end the pumps and are reported to the
//! caller as [`ConnectionEvent::Lost`]; [`ConnectionManager::close`] cancels
//! both pumps, joins them, and runs the close handshake on the transport they
//! hand back.

use std::time::Duration;

use chrono::Utc;
use futures::{
    Sink, SinkExt, Stream, StreamExt,
    stream::{SplitSink, SplitStream},
};
use motbwa_proto::{Message, Room, decode, encode};
use tokio::{net::TcpStream, sync::mpsc, task::JoinHandle};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream,
    tungstenite::{
        Error as WsError, Message as WsMessage,
        client::IntoClientRequest,
        http::HeaderValue,
        protocol::{CloseFrame, frame::coding::CloseCode},
    },
};
use tokio_util::sync::{CancellationToken, DropGuard};
use uuid::Uuid;

use crate::{ConnectionError, ServerConfig, Session, UserInfo};

/// Deadline for each step of the close handshake.
const CLOSE_DEADLINE: Duration = Duration::from_secs(1);

/// Capacity of both the inbound and outbound channels.
const CHANNEL_CAPACITY: usize = 1;

/// WebSocket stream produced by [`connect`].
pub type WsTransport = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Duplex transport a [`ConnectionManager`] can own.
///
/// Implemented for every WebSocket stream from `tokio-tungstenite`.
pub trait Transport:
    Stream<Item = Result<WsMessage, WsError>> + Sink<WsMessage, Error = WsError> + Send + Unpin + 'static
{
}

impl<T> Transport for T where
    T: Stream<Item = Result<WsMessage, WsError>>
        + Sink<WsMessage, Error = WsError>
        + Send
        + Unpin
        + 'static
{
}

/// Events delivered on the inbound channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// Chat message received.
    Message(Message),

    /// Peer closed the connection normally.
    Closed,

    /// Connection failed. No further messages will arrive or be sent.
    Lost {
        /// Failure description
        reason: String,
    },
}

/// How the close handshake ended.
///
/// All outcomes leave the transport released; they only differ in what the
/// peer did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// Peer answered our close frame with a normal closure.
    Acknowledged,
    /// Peer went away or errored before acknowledging.
    PeerGone,
    /// No acknowledgement within the read deadline.
    TimedOut,
    /// Close frame could not be sent; the transport was dropped.
    Forced,
}

/// Owner of a single streaming connection.
///
/// Created from an already-authenticated transport. Construction spawns the
/// inbound and outbound pumps and returns immediately, so it must be called
/// from within a tokio runtime.
pub struct ConnectionManager<T: Transport> {
    user: UserInfo,
    rooms: Vec<Room>,
    current_room: Room,
    events: mpsc::Receiver<ConnectionEvent>,
    egress: mpsc::Sender<String>,
    shutdown: DropGuard,
    reader: JoinHandle<SplitStream<T>>,
    writer: JoinHandle<SplitSink<T, WsMessage>>,
}

impl<T: Transport> ConnectionManager<T> {
    /// Take ownership of `transport` and start both pumps.
    ///
    /// `room` becomes both the only member of the room list and the current
    /// room.
    pub fn new(transport: T, user: UserInfo, room: Room) -> Self {
        let (sink, stream) = transport.split::<WsMessage>();
        let (events_tx, events_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (egress_tx, egress_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let token = CancellationToken::new();

        let reader = tokio::spawn(read_messages(stream, events_tx.clone(), token.clone()));
        let writer = tokio::spawn(send_messages(
            sink,
            Outbound { room: room.id, sender: user.name.clone() },
            egress_rx,
            events_tx,
            token.clone(),
        ));

        tracing::debug!(user = %user.name, room = %room.id, "connection manager started");

        Self {
            user,
            rooms: vec![room.clone()],
            current_room: room,
            events: events_rx,
            egress: egress_tx,
            shutdown: token.drop_guard(),
            reader,
            writer,
        }
    }

    /// Queue `text` for sending.
    ///
    /// Waits until the outbound channel accepts the intent. The channel holds
    /// one intent, so a slow network makes callers wait rather than buffer.
    pub async fn send_message(&self, text: impl Into<String>) -> Result<(), ConnectionError> {
        self.egress.send(text.into()).await.map_err(|_| ConnectionError::Closed)
    }

    /// Wait for the next inbound event.
    ///
    /// Returns `None` once both pumps have stopped. The inbound pump blocks
    /// until each event is taken, so callers should keep one `recv`
    /// outstanding at all times.
    pub async fn recv(&mut self) -> Option<ConnectionEvent> {
        self.events.recv().await
    }

    /// Identity outgoing messages are sent as.
    pub fn user(&self) -> &UserInfo {
        &self.user
    }

    /// Room outgoing messages are sent to. Always a member of
    /// [`rooms`](Self::rooms).
    pub fn current_room(&self) -> &Room {
        &self.current_room
    }

    /// All rooms of this connection.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Stop both pumps and close the transport.
    ///
    /// 1. Cancel and join both pumps, taking back the transport halves.
    /// 2. Send a normal-closure frame within [`CLOSE_DEADLINE`]; if that
    ///    fails, drop the transport.
    /// 3. Drain inbound frames until the peer acknowledges, errors, or the
    ///    deadline passes.
    pub async fn close(self) -> Result<CloseOutcome, ConnectionError> {
        let Self { shutdown, reader, writer, .. } = self;
        drop(shutdown);

        let sink = writer.await?;
        let stream = reader.await?;

        let outcome = close_transport(sink, stream).await;
        tracing::info!(?outcome, "connection closed");
        Ok(outcome)
    }
}

/// Perform the WebSocket handshake and start a connection manager.
///
/// The handshake carries the session's auth headers. The connection starts in
/// a fresh default room.
pub async fn connect(
    server: &ServerConfig,
    session: &Session,
) -> Result<ConnectionManager<WsTransport>, ConnectionError> {
    let url = server.websocket_url();
    let handshake_error =
        |reason: String| ConnectionError::Handshake { url: url.to_string(), reason };

    let mut request = url.into_client_request().map_err(|e| handshake_error(e.to_string()))?;
    for (name, value) in session.auth_headers() {
        let value = HeaderValue::from_str(&value).map_err(|e| handshake_error(e.to_string()))?;
        request.headers_mut().insert(name, value);
    }

    let (transport, response) = tokio_tungstenite::connect_async(request).await.map_err(|e| {
        tracing::warn!(url, error = %e, "handshake failed");
        handshake_error(e.to_string())
    })?;

    tracing::info!(url, status = %response.status(), "connected");
    Ok(ConnectionManager::new(transport, UserInfo::from(session), Room::default()))
}

/// Fields stamped on every outgoing event.
struct Outbound {
    room: Uuid,
    sender: String,
}

/// What the inbound pump does with one read result.
#[derive(Debug, PartialEq, Eq)]
enum Inbound {
    /// Push a message to the caller.
    Deliver(Message),
    /// Nothing to deliver; keep reading.
    Skip,
    /// Stop reading, optionally telling the caller why.
    Stop(Option<ConnectionEvent>),
}

/// Inbound pump.
///
/// Returns the read half when it stops so `close` can drain it.
async fn read_messages<T: Transport>(
    mut stream: SplitStream<T>,
    events: mpsc::Sender<ConnectionEvent>,
    shutdown: CancellationToken,
) -> SplitStream<T> {
    loop {
        let next = tokio::select! {
            () = shutdown.cancelled() => break,
            next = stream.next() => next,
        };

        match classify(next) {
            Inbound::Deliver(message) => {
                if !deliver(&events, &shutdown, ConnectionEvent::Message(message)).await {
                    break;
                }
            },
            Inbound::Skip => {},
            Inbound::Stop(event) => {
                if let Some(event) = event {
                    deliver(&events, &shutdown, event).await;
                }
                break;
            },
        }
    }

    tracing::debug!("inbound pump stopped");
    stream
}

/// Outbound pump.
///
/// Returns the write half when it stops so `close` can send the close frame.
/// On failure the intent channel is closed before reporting, so a caller
/// blocked in `send_message` fails instead of waiting on a stopped pump.
async fn send_messages<T: Transport>(
    mut sink: SplitSink<T, WsMessage>,
    outbound: Outbound,
    mut egress: mpsc::Receiver<String>,
    events: mpsc::Sender<ConnectionEvent>,
    shutdown: CancellationToken,
) -> SplitSink<T, WsMessage> {
    loop {
        let text = tokio::select! {
            () = shutdown.cancelled() => break,
            intent = egress.recv() => match intent {
                Some(text) => text,
                None => break,
            },
        };

        let frame = match encode(outbound.room, &outbound.sender, &text, Utc::now()) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!(error = %e, "failed to encode outgoing event");
                egress.close();
                deliver(&events, &shutdown, ConnectionEvent::Lost { reason: e.to_string() }).await;
                break;
            },
        };

        let written = tokio::select! {
            () = shutdown.cancelled() => break,
            written = sink.send(WsMessage::Text(frame.into())) => written,
        };

        if let Err(e) = written {
            tracing::warn!(error = %e, "transport write failed");
            let reason = format!("write failed: {e}");
            egress.close();
            deliver(&events, &shutdown, ConnectionEvent::Lost { reason }).await;
            break;
        }
    }

    tracing::debug!("outbound pump stopped");
    sink
}

/// Push an event to the caller unless shutdown wins first.
///
/// Returns `false` if the event was not delivered.
async fn deliver(
    events: &mpsc::Sender<ConnectionEvent>,
    shutdown: &CancellationToken,
    event: ConnectionEvent,
) -> bool {
    tokio::select! {
        () = shutdown.cancelled() => false,
        sent = events.send(event) => sent.is_ok(),
    }
}

/// Decide what one read result means for the inbound pump.
fn classify(next: Option<Result<WsMessage, WsError>>) -> Inbound {
    match next {
        Some(Ok(WsMessage::Text(text))) => decode_frame(text.as_bytes()),
        Some(Ok(WsMessage::Binary(data))) => decode_frame(&data),
        Some(Ok(WsMessage::Close(frame))) => closed_by_peer(frame.as_ref()),
        Some(Ok(WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_))) => Inbound::Skip,
        Some(Err(WsError::ConnectionClosed)) => {
            tracing::info!("normal closure of the connection");
            Inbound::Stop(Some(ConnectionEvent::Closed))
        },
        Some(Err(e)) => {
            tracing::warn!(error = %e, "transport read failed");
            Inbound::Stop(Some(ConnectionEvent::Lost { reason: format!("read failed: {e}") }))
        },
        None => {
            tracing::warn!("transport ended without a close frame");
            Inbound::Stop(Some(ConnectionEvent::Lost { reason: "connection ended".to_string() }))
        },
    }
}

/// Decode a data frame.
///
/// A malformed frame stops the pump without reporting anything to the caller.
fn decode_frame(payload: &[u8]) -> Inbound {
    match decode(payload) {
        Ok(event) if event.is_send_message() => Inbound::Deliver(event.message),
        Ok(event) => {
            tracing::debug!(kind = %event.kind, "ignoring event");
            Inbound::Skip
        },
        Err(e) => {
            tracing::warn!(error = %e, "malformed event, no longer reading");
            Inbound::Stop(None)
        },
    }
}

/// Interpret a close frame sent by the peer.
fn closed_by_peer(frame: Option<&CloseFrame>) -> Inbound {
    match frame {
        Some(frame) if frame.code != CloseCode::Normal => {
            let code = u16::from(frame.code);
            tracing::warn!(code, reason = %frame.reason.as_str(), "peer closed abnormally");
            let reason = format!("closed by peer with code {code}");
            Inbound::Stop(Some(ConnectionEvent::Lost { reason }))
        },
        _ => {
            tracing::info!("normal closure of the connection");
            Inbound::Stop(Some(ConnectionEvent::Closed))
        },
    }
}

/// Close handshake on the halves returned by the pumps.
///
/// Both halves are dropped on return, which releases the socket.
async fn close_transport<T: Transport>(
    mut sink: SplitSink<T, WsMessage>,
    mut stream: SplitStream<T>,
) -> CloseOutcome {
    let frame = CloseFrame { code: CloseCode::Normal, reason: "".into() };

    match tokio::time::timeout(CLOSE_DEADLINE, sink.send(WsMessage::Close(Some(frame)))).await {
        Ok(Ok(())) => {},
        Ok(Err(e)) => {
            tracing::debug!(error = %e, "close frame not sent, dropping transport");
            return CloseOutcome::Forced;
        },
        Err(_) => {
            tracing::debug!("close frame timed out, dropping transport");
            return CloseOutcome::Forced;
        },
    }

    tokio::time::timeout(CLOSE_DEADLINE, drain(&mut stream))
        .await
        .unwrap_or(CloseOutcome::TimedOut)
}

/// Discard inbound frames until the peer's close acknowledgement.
async fn drain<T: Transport>(stream: &mut SplitStream<T>) -> CloseOutcome {
    while let Some(next) = stream.next().await {
        match next {
            Ok(WsMessage::Close(frame)) => {
                return match frame {
                    Some(frame) if frame.code != CloseCode::Normal => CloseOutcome::PeerGone,
                    _ => CloseOutcome::Acknowledged,
                };
            },
            Err(WsError::ConnectionClosed) => return CloseOutcome::Acknowledged,
            Err(e) => {
                tracing::debug!(error = %e, "read failed while closing");
                return CloseOutcome::PeerGone;
            },
            Ok(_) => {},
        }
    }
    CloseOutcome::PeerGone
}
