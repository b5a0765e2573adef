use std::sync::Mutex;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use url::Url;

use crate::domain::notification::NotificationEvent;
use crate::error::{AppError, AppResult};
use crate::services::NotificationService;

const OUTBOUND_CAPACITY: usize = 64;
const DISCONNECT_GRACE: Duration = Duration::from_secs(2);

type Socket = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

enum Outbound {
    Packet(String),
    Disconnect,
}

/// Socket.IO connection used to fan out events to other viewers.
///
/// The socket lives on a background task. Events are queued without waiting
/// and are dropped when the queue is full or the connection is gone.
pub struct RealtimeChannel {
    sender: mpsc::Sender<Outbound>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl RealtimeChannel {
    pub fn connect(server_url: &str) -> AppResult<Self> {
        let socket_url = socket_url(server_url)?;
        let (sender, receiver) = mpsc::channel(OUTBOUND_CAPACITY);
        let task = tokio::spawn(run_socket(socket_url, receiver));
        Ok(Self {
            sender,
            task: Mutex::new(Some(task)),
        })
    }

    /// Flushes queued events, leaves the namespace and closes the socket.
    pub async fn disconnect(&self) {
        // The task may already be gone if the connection failed.
        let _ = self.sender.send(Outbound::Disconnect).await;
        let task = self.task.lock().ok().and_then(|mut guard| guard.take());
        if let Some(task) = task {
            if let Err(err) = task.await {
                tracing::warn!("realtime task ended abnormally: {err}");
            }
        }
    }
}

impl NotificationService for RealtimeChannel {
    fn emit(&self, event: NotificationEvent) {
        let packet = match encode_event(event.name, &event) {
            Ok(packet) => packet,
            Err(err) => {
                tracing::warn!("failed to encode {} event: {err}", event.name);
                return;
            }
        };
        if let Err(err) = self.sender.try_send(Outbound::Packet(packet)) {
            tracing::debug!("dropping {} event: {err}", event.name);
        }
    }
}

async fn run_socket(url: Url, mut outbound: mpsc::Receiver<Outbound>) {
    let connecting = open_socket(&url);
    tokio::pin!(connecting);
    let grace = tokio::time::sleep(DISCONNECT_GRACE);
    tokio::pin!(grace);
    let mut pending = Vec::new();
    let mut closing = false;

    // Events emitted before the handshake finishes are held back. A
    // disconnect during the handshake waits at most DISCONNECT_GRACE.
    let mut ws = loop {
        tokio::select! {
            connected = &mut connecting => match connected {
                Ok(ws) => break ws,
                Err(err) => {
                    tracing::warn!("realtime connect failed: {err}");
                    return;
                }
            },
            command = outbound.recv(), if !closing => match command {
                Some(Outbound::Packet(packet)) if pending.len() < OUTBOUND_CAPACITY => {
                    pending.push(packet);
                }
                Some(Outbound::Packet(_)) => {
                    tracing::debug!("realtime handshake pending, dropping event");
                }
                Some(Outbound::Disconnect) | None => {
                    closing = true;
                    grace.as_mut().reset(Instant::now() + DISCONNECT_GRACE);
                }
            },
            _ = &mut grace, if closing => {
                tracing::debug!(
                    "realtime handshake unfinished at disconnect, dropping {} event(s)",
                    pending.len()
                );
                return;
            }
        }
    };
    tracing::debug!(%url, "realtime channel connected");

    for packet in pending {
        if ws.send(Message::Text(packet)).await.is_err() {
            tracing::debug!("realtime send failed, connection lost");
            let _ = ws.close(None).await;
            return;
        }
    }

    while !closing {
        tokio::select! {
            command = outbound.recv() => match command {
                Some(Outbound::Packet(packet)) => {
                    if ws.send(Message::Text(packet)).await.is_err() {
                        tracing::debug!("realtime send failed, connection lost");
                        break;
                    }
                }
                Some(Outbound::Disconnect) | None => closing = true,
            },
            incoming = ws.next() => match incoming {
                Some(Ok(Message::Text(text))) => match EnginePacket::parse(&text) {
                    EnginePacket::Ping => {
                        if ws.send(Message::Text("3".to_string())).await.is_err() {
                            break;
                        }
                    }
                    EnginePacket::Close => break,
                    EnginePacket::Message(payload) => {
                        tracing::trace!("ignoring inbound realtime message: {payload}");
                    }
                    _ => {}
                },
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    tracing::debug!("realtime receive failed: {err}");
                    break;
                }
            },
        }
    }

    if closing {
        let _ = ws.send(Message::Text("41".to_string())).await;
    }
    let _ = ws.close(None).await;
    tracing::debug!("realtime channel closed");
}

async fn open_socket(url: &Url) -> AppResult<Socket> {
    let (mut ws, _) = connect_async(url.as_str())
        .await
        .map_err(|err| AppError::Realtime(err.to_string()))?;
    if let Err(err) = join_namespace(&mut ws).await {
        let _ = ws.close(None).await;
        return Err(err);
    }
    Ok(ws)
}

/// Waits for the Engine.IO open packet, then joins the default namespace.
async fn join_namespace(ws: &mut Socket) -> AppResult<()> {
    while let Some(message) = ws.next().await {
        let message = message.map_err(|err| AppError::Realtime(err.to_string()))?;
        if let Message::Text(text) = message {
            match EnginePacket::parse(&text) {
                EnginePacket::Open => {
                    return ws
                        .send(Message::Text("40".to_string()))
                        .await
                        .map_err(|err| AppError::Realtime(err.to_string()));
                }
                EnginePacket::Close => break,
                _ => {}
            }
        }
    }
    Err(AppError::Realtime(
        "connection closed before handshake".to_string(),
    ))
}

fn socket_url(server_url: &str) -> AppResult<Url> {
    let mut url = Url::parse(server_url.trim()).map_err(|err| {
        AppError::Configuration(format!("invalid realtime URL '{server_url}': {err}"))
    })?;
    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => {
            return Err(AppError::Configuration(format!(
                "unsupported realtime URL scheme '{other}'"
            )));
        }
    };
    url.set_scheme(scheme).map_err(|_| {
        AppError::Configuration(format!("cannot use '{scheme}' for '{server_url}'"))
    })?;
    url.set_path("/socket.io/");
    url.set_query(Some("EIO=4&transport=websocket"));
    Ok(url)
}

fn encode_event<T: serde::Serialize>(name: &str, payload: &T) -> serde_json::Result<String> {
    Ok(format!("42{}", serde_json::to_string(&(name, payload))?))
}

#[derive(Debug, PartialEq, Eq)]
enum EnginePacket<'a> {
    Open,
    Close,
    Ping,
    Pong,
    Message(&'a str),
    Unknown,
}

impl<'a> EnginePacket<'a> {
    fn parse(text: &'a str) -> Self {
        match text.as_bytes().first() {
            Some(b'0') => EnginePacket::Open,
            Some(b'1') => EnginePacket::Close,
            Some(b'2') => EnginePacket::Ping,
            Some(b'3') => EnginePacket::Pong,
            Some(b'4') => EnginePacket::Message(&text[1..]),
            _ => EnginePacket::Unknown,
        }
    }
}
