use {
    courier_common::time::now_rfc3339,
    courier_config::MessagingConfig,
    courier_protocol::{RequestFrame, ResponseFrame, types},
    futures::{SinkExt, StreamExt},
    secrecy::{ExposeSecret, Secret},
    std::{
        collections::HashMap,
        sync::{
            Arc,
            atomic::{AtomicU64, Ordering},
        },
        time::Duration,
    },
    tokio::{
        net::TcpStream,
        sync::{Mutex, mpsc, oneshot, watch},
        task::JoinHandle,
    },
    tokio_tungstenite::{
        MaybeTlsStream, WebSocketStream, connect_async,
        tungstenite::{
            Message,
            client::IntoClientRequest,
            http::{HeaderValue, header::AUTHORIZATION},
        },
    },
    tracing::{debug, info, warn},
    url::Url,
};

use crate::{Error, Result, state::ChannelState};

type PendingMap = Arc<Mutex<HashMap<String, Pending>>>;
type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Timeouts for one session.
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub connect_timeout: Duration,
    pub response_timeout: Duration,
}

impl From<&MessagingConfig> for SessionOptions {
    fn from(config: &MessagingConfig) -> Self {
        Self {
            connect_timeout: config.connect_timeout(),
            response_timeout: config.response_timeout(),
        }
    }
}

/// A request waiting for its response.
struct Pending {
    frame_type: String,
    tx: oneshot::Sender<ResponseFrame>,
}

enum Outbound {
    Frame {
        text: String,
        sent: oneshot::Sender<Result<()>>,
    },
    Close,
}

/// One authenticated consumer socket.
///
/// A background task owns the socket: it writes queued frames, answers pings
/// and hands each response to the request waiting on its `reqId`. A frame
/// without `reqId` that carries a `body.conversationId` goes to the one
/// outstanding conversation request, if exactly one exists. Anything else is
/// logged and dropped.
pub struct MessagingSession {
    write_tx: mpsc::UnboundedSender<Outbound>,
    pending: PendingMap,
    next_id: AtomicU64,
    state: watch::Receiver<ChannelState>,
    options: SessionOptions,
    io_task: JoinHandle<()>,
}

impl MessagingSession {
    /// Open the socket with `Authorization: JWT <token>`.
    pub async fn connect(url: &Url, token: &Secret<String>, options: SessionOptions) -> Result<Self> {
        // Ignore the error: a provider may already be installed.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let mut request = url.as_str().into_client_request()?;
        let auth = HeaderValue::from_str(&format!("JWT {}", token.expose_secret()))
            .map_err(|_| Error::protocol("JWT contains characters not allowed in a header"))?;
        request.headers_mut().insert(AUTHORIZATION, auth);

        let (state_tx, state) = watch::channel(ChannelState::Connecting);
        info!(host = url.host_str().unwrap_or_default(), "opening messaging channel");

        let (socket, _response) = tokio::time::timeout(options.connect_timeout, connect_async(request))
            .await
            .map_err(|_| Error::timeout("messaging channel to open"))??;

        let _ = state_tx.send(ChannelState::Open);
        info!(opened_at = %now_rfc3339(), "messaging channel open");

        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let io_task = tokio::spawn(run_socket(socket, write_rx, Arc::clone(&pending), state_tx));

        Ok(Self {
            write_tx,
            pending,
            next_id: AtomicU64::new(1),
            state,
            options,
            io_task,
        })
    }

    pub fn state(&self) -> ChannelState {
        *self.state.borrow()
    }

    /// Next request id. Ids start at 1 and are unique within the session.
    pub fn next_request_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Send a request and wait for the response carrying its id.
    pub async fn request(&self, frame: RequestFrame) -> Result<ResponseFrame> {
        let key = frame.correlation_key();
        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(key.clone(), Pending {
            frame_type: frame.r#type.clone(),
            tx,
        });

        if let Err(e) = self.send(&frame).await {
            self.pending.lock().await.remove(&key);
            return Err(e);
        }

        match tokio::time::timeout(self.options.response_timeout, rx).await {
            Ok(Ok(resp)) => Ok(resp),
            Ok(Err(_)) => Err(Error::ChannelClosed),
            Err(_) => {
                self.pending.lock().await.remove(&key);
                Err(Error::timeout(format!("{} response", frame.r#type)))
            },
        }
    }

    /// Send a request without waiting for its response.
    pub async fn send(&self, frame: &RequestFrame) -> Result<()> {
        if self.state() == ChannelState::Closed {
            return Err(Error::ChannelClosed);
        }
        let text = serde_json::to_string(frame)?;
        debug!(id = frame.id, frame_type = %frame.r#type, "sending frame");

        let (sent, sent_rx) = oneshot::channel();
        self.write_tx
            .send(Outbound::Frame { text, sent })
            .map_err(|_| Error::ChannelClosed)?;
        let result = sent_rx.await.map_err(|_| Error::ChannelClosed)?;
        if let Err(e) = &result {
            warn!(id = frame.id, frame_type = %frame.r#type, error = %e, "failed to send frame");
        }
        result
    }

    /// Ask the service for a new conversation and return its id.
    pub async fn request_conversation(&self) -> Result<String> {
        let frame = RequestFrame::request_conversation(self.next_request_id());
        info!(id = frame.id, "requesting conversation");

        let resp = self.request(frame).await?;
        if !resp.is_success() {
            return Err(Error::protocol(resp.failure_message()));
        }
        let conversation_id = resp
            .conversation_id()
            .ok_or_else(|| Error::protocol("conversation response has no conversationId"))?
            .to_string();
        info!(conversation_id = %conversation_id, "conversation created");
        Ok(conversation_id)
    }

    /// Publish `text` into the conversation and return the publish request
    /// id. With `await_ack` the service's response must report success.
    pub async fn publish_text(&self, conversation_id: &str, text: &str, await_ack: bool) -> Result<u64> {
        let frame = RequestFrame::publish_text(self.next_request_id(), conversation_id, text);
        let id = frame.id;
        info!(id, conversation_id, "publishing message");

        if await_ack {
            let resp = self.request(frame).await?;
            if !resp.is_success() {
                return Err(Error::protocol(resp.failure_message()));
            }
            debug!(id, "publish acknowledged");
        } else {
            self.send(&frame).await?;
        }
        Ok(id)
    }

    /// Close the socket and wait for the background task to finish.
    pub async fn close(self) {
        let _ = self.write_tx.send(Outbound::Close);
        if let Err(e) = self.io_task.await {
            warn!(error = %e, "messaging socket task failed");
        }
    }
}

async fn run_socket(
    socket: Socket,
    mut write_rx: mpsc::UnboundedReceiver<Outbound>,
    pending: PendingMap,
    state_tx: watch::Sender<ChannelState>,
) {
    let (mut sink, mut reader) = socket.split();

    loop {
        tokio::select! {
            msg = reader.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => route_frame(&pending, &text).await,
                    Some(Ok(Message::Ping(data))) => {
                        if let Err(e) = sink.send(Message::Pong(data)).await {
                            warn!(error = %e, "failed to answer ping");
                            break;
                        }
                    },
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("messaging socket closed by service");
                        break;
                    },
                    Some(Ok(_)) => {},
                    Some(Err(e)) => {
                        warn!(error = %e, "messaging socket read error");
                        break;
                    },
                }
            },
            cmd = write_rx.recv() => {
                match cmd {
                    Some(Outbound::Frame { text, sent }) => {
                        let result = sink.send(Message::Text(text.into())).await.map_err(Error::from);
                        let _ = sent.send(result);
                    },
                    Some(Outbound::Close) | None => {
                        if let Err(e) = sink.send(Message::Close(None)).await {
                            debug!(error = %e, "close frame not delivered");
                        }
                        break;
                    },
                }
            },
        }
    }

    let _ = state_tx.send(ChannelState::Closed);
    // Dropping the senders wakes every waiter with `ChannelClosed`.
    let abandoned = {
        let mut map = pending.lock().await;
        let n = map.len();
        map.clear();
        n
    };
    info!(closed_at = %now_rfc3339(), abandoned, "messaging channel closed");
}

async fn route_frame(pending: &PendingMap, text: &str) {
    let frame = match ResponseFrame::parse(text) {
        Ok(frame) => frame,
        Err(e) => {
            warn!(error = %e, "ignoring unparseable frame");
            return;
        },
    };

    let waiter = match frame.correlation_key() {
        Some(key) => {
            let waiter = pending.lock().await.remove(&key);
            if waiter.is_none() {
                warn!(req_id = %key, "response for unknown request id");
            }
            waiter
        },
        None if frame.conversation_id().is_some() => {
            let waiter = take_conversation_waiter(&mut *pending.lock().await);
            if waiter.is_some() {
                debug!("matched conversationId frame without reqId to conversation request");
            } else {
                debug!("ignoring conversationId frame with no single conversation request pending");
            }
            waiter
        },
        None => {
            debug!(frame_type = frame.r#type.as_deref().unwrap_or("-"), "ignoring uncorrelated frame");
            None
        },
    };

    if let Some(waiter) = waiter {
        let _ = waiter.tx.send(frame);
    }
}

/// Remove the conversation request waiter, provided it is the only one.
fn take_conversation_waiter(pending: &mut HashMap<String, Pending>) -> Option<Pending> {
    let mut keys = pending
        .iter()
        .filter(|(_, p)| p.frame_type == types::REQUEST_CONVERSATION)
        .map(|(k, _)| k.clone());
    let key = keys.next()?;
    if keys.next().is_some() {
        return None;
    }
    pending.remove(&key)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn waiter(frame_type: &str) -> (Pending, oneshot::Receiver<ResponseFrame>) {
        let (tx, rx) = oneshot::channel();
        let pending = Pending {
            frame_type: frame_type.into(),
            tx,
        };
        (pending, rx)
    }

    #[tokio::test]
    async fn routes_response_to_waiter() {
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let (entry, rx) = waiter(types::REQUEST_CONVERSATION);
        pending.lock().await.insert("1".into(), entry);

        route_frame(&pending, r#"{"kind":"resp","reqId":"1","body":{"conversationId":"xyz"}}"#).await;

        let frame = rx.await.unwrap();
        assert_eq!(frame.conversation_id(), Some("xyz"));
        assert!(pending.lock().await.is_empty());
    }

    #[tokio::test]
    async fn uncorrelated_and_unknown_frames_leave_waiters_alone() {
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let (entry, mut rx) = waiter(types::REQUEST_CONVERSATION);
        pending.lock().await.insert("1".into(), entry);

        route_frame(&pending, r#"{"type":"cm.ExConversationChangeNotification","body":{}}"#).await;
        route_frame(&pending, r#"{"body":{"conversationId":""}}"#).await;
        route_frame(&pending, r#"{"kind":"resp","reqId":"99","body":{"conversationId":"x"}}"#).await;
        route_frame(&pending, "not json").await;

        assert!(rx.try_recv().is_err());
        assert_eq!(pending.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn bare_conversation_frame_answers_conversation_request() {
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let (conversation, rx) = waiter(types::REQUEST_CONVERSATION);
        let (publish, mut publish_rx) = waiter(types::PUBLISH_EVENT);
        pending.lock().await.insert("1".into(), conversation);
        pending.lock().await.insert("2".into(), publish);

        route_frame(&pending, r#"{"body":{"conversationId":"xyz"}}"#).await;

        assert_eq!(rx.await.unwrap().conversation_id(), Some("xyz"));
        assert!(publish_rx.try_recv().is_err());
        assert_eq!(pending.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn bare_conversation_frame_is_dropped_when_ambiguous() {
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let (first, mut first_rx) = waiter(types::REQUEST_CONVERSATION);
        let (second, mut second_rx) = waiter(types::REQUEST_CONVERSATION);
        pending.lock().await.insert("1".into(), first);
        pending.lock().await.insert("3".into(), second);

        route_frame(&pending, r#"{"body":{"conversationId":"xyz"}}"#).await;

        assert!(first_rx.try_recv().is_err());
        assert!(second_rx.try_recv().is_err());
        assert_eq!(pending.lock().await.len(), 2);
    }

    #[test]
    fn options_from_config() {
        let config = MessagingConfig {
            connect_timeout_secs: 3,
            response_timeout_secs: 7,
            ..Default::default()
        };
        let options = SessionOptions::from(&config);
        assert_eq!(options.connect_timeout, Duration::from_secs(3));
        assert_eq!(options.response_timeout, Duration::from_secs(7));
    }
}
