use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::{self, HeaderValue};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use pong::{ClientCommand, GameEvent, ProtocolError, ServerMessage};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("websocket connect failed: {0}")]
    Connect(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("session cookie is not a valid header value")]
    BadCookie,
}

/// Handle to the transport task. Commands are queued and written by the task
/// in order; sending is a no-op once the session has closed.
pub struct ServerHandle {
    cmd_tx: mpsc::UnboundedSender<ClientCommand>,
    closed: Arc<AtomicBool>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ServerHandle {
    pub fn send(&self, command: ClientCommand) {
        if self.closed.load(Ordering::Acquire) {
            return;
        }
        if self.cmd_tx.send(command).is_err() {
            log::debug!("command dropped, transport task already gone");
        }
    }

    /// Ask the transport task to close the socket. The `Closed` event still
    /// arrives through the event channel. Idempotent.
    pub fn close(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Open the socket, attaching the session cookie to the handshake, and spawn
/// the transport task.
///
/// The returned event stream yields server events in send order, starting
/// with a synthetic [`GameEvent::Connected`] and terminating with exactly one
/// [`GameEvent::Closed`], whether the server closed, the network dropped, or
/// [`ServerHandle::close`] was called.
pub async fn connect(
    ws_url: &str,
    cookie: &str,
    event_capacity: usize,
) -> Result<(ServerHandle, mpsc::Receiver<GameEvent>), TransportError> {
    let mut request = ws_url.into_client_request()?;
    request.headers_mut().insert(
        header::COOKIE,
        HeaderValue::from_str(cookie).map_err(|_| TransportError::BadCookie)?,
    );

    log::info!("connecting to {ws_url}");
    let (socket, _response) = tokio_tungstenite::connect_async(request).await?;

    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::channel(event_capacity.max(1));
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let closed = Arc::new(AtomicBool::new(false));

    tokio::spawn(transport_loop(
        socket,
        cmd_rx,
        event_tx,
        shutdown_rx,
        Arc::clone(&closed),
    ));

    Ok((
        ServerHandle {
            cmd_tx,
            closed,
            shutdown_tx: Some(shutdown_tx),
        },
        event_rx,
    ))
}

/// Owns the socket: multiplexes queued outbound commands and inbound frames,
/// and emits the single terminal `Closed` on the way out.
async fn transport_loop(
    mut socket: WsStream,
    mut cmd_rx: mpsc::UnboundedReceiver<ClientCommand>,
    event_tx: mpsc::Sender<GameEvent>,
    mut shutdown_rx: oneshot::Receiver<()>,
    closed: Arc<AtomicBool>,
) {
    if event_tx.send(GameEvent::Connected).await.is_err() {
        return;
    }

    let close_reason = loop {
        tokio::select! {
            command = cmd_rx.recv() => match command {
                Some(command) => {
                    let text = match command.encode() {
                        Ok(text) => text,
                        Err(err) => {
                            log::error!("{err}");
                            continue;
                        }
                    };
                    if let Err(err) = socket.send(Message::text(text)).await {
                        log::warn!("websocket send failed: {err}");
                        break Some(err.to_string());
                    }
                }
                None => {
                    // Handle dropped; close out gracefully.
                    let _ = socket.close(None).await;
                    break None;
                }
            },

            _ = &mut shutdown_rx => {
                let _ = socket.close(None).await;
                break None;
            }

            frame = socket.next() => match frame {
                Some(Ok(Message::Text(text))) => match ServerMessage::decode(&text) {
                    Ok(msg) => {
                        if event_tx.send(GameEvent::from(msg)).await.is_err() {
                            break None;
                        }
                    }
                    Err(ProtocolError::UnknownType(tag)) => {
                        log::warn!("ignoring unknown server message type `{tag}`");
                    }
                    Err(err) => {
                        log::warn!("ignoring undecodable server message: {err}");
                    }
                },
                Some(Ok(Message::Close(frame))) => {
                    break frame
                        .map(|f| f.reason.to_string())
                        .filter(|reason| !reason.is_empty());
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    log::warn!("websocket receive failed: {err}");
                    break Some(err.to_string());
                }
                None => break None,
            },
        }
    };

    closed.store(true, Ordering::Release);
    // `Closed` is the sole termination signal; it must never be dropped.
    if event_tx
        .send(GameEvent::Closed {
            reason: close_reason,
        })
        .await
        .is_err()
    {
        log::debug!("event receiver dropped before Closed");
    }
}
