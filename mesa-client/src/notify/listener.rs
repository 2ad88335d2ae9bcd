use shared::message::{
    BusMessage, DeskEvent, EventType, HandshakePayload, PROTOCOL_VERSION, ResponsePayload,
};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use super::NotifyError;
use super::transport::{TcpTransport, Transport};
use crate::config::{ClientConfig, ReconnectPolicy};

const EVENT_CHANNEL_CAPACITY: usize = 256;
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

/// Background notification listener
///
/// Subscribers receive [`DeskEvent`]s. When the listener gives up or is
/// stopped, the channel closes and receivers see `RecvError::Closed`.
#[derive(Debug)]
pub struct NotificationListener {
    handle: Option<JoinHandle<()>>,
    shutdown: CancellationToken,
    events: broadcast::Receiver<DeskEvent>,
}

impl NotificationListener {
    /// Start listening on `config.notify_addr`
    pub fn start(config: &ClientConfig, token: Option<String>) -> Result<Self, NotifyError> {
        let addr = config
            .notify_addr
            .clone()
            .ok_or_else(|| NotifyError::Connection("notification address not configured".into()))?;
        let handshake = HandshakePayload {
            version: PROTOCOL_VERSION,
            client_name: Some(config.client_name.clone()),
            client_version: Some(env!("CARGO_PKG_VERSION").to_string()),
            token,
        };
        Ok(Self::spawn(addr, handshake, config.reconnect))
    }

    pub fn spawn(addr: String, handshake: HandshakePayload, policy: ReconnectPolicy) -> Self {
        let (tx, events) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(run_listener(addr, handshake, policy, tx, shutdown.clone()));
        Self {
            handle: Some(handle),
            shutdown,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DeskEvent> {
        self.events.resubscribe()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Stop listening and wait for the task to exit
    pub async fn stop(mut self) {
        self.shutdown.cancel();
        if let Some(handle) = self.handle.take()
            && let Err(e) = handle.await
        {
            tracing::debug!(error = %e, "Notification listener task ended abnormally");
        }
    }
}

impl Drop for NotificationListener {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn connect(addr: &str, handshake: &HandshakePayload) -> Result<TcpTransport, NotifyError> {
    let transport = TcpTransport::connect(addr).await?;
    transport
        .write_message(&BusMessage::handshake(handshake)?)
        .await?;

    let reply = tokio::time::timeout(HANDSHAKE_TIMEOUT, transport.read_message())
        .await
        .map_err(|_| NotifyError::HandshakeTimeout)??;
    if reply.event_type != EventType::Response {
        return Err(NotifyError::InvalidMessage(format!(
            "expected handshake response, got {}",
            reply.event_type
        )));
    }
    let payload: ResponsePayload = reply.parse_payload()?;
    if !payload.success {
        return Err(NotifyError::HandshakeRejected(payload.message));
    }
    Ok(transport)
}

fn dispatch(tx: &broadcast::Sender<DeskEvent>, msg: BusMessage) {
    if msg.event_type != EventType::Notification {
        tracing::trace!(event_type = %msg.event_type, "Ignoring non-notification frame");
        return;
    }
    match msg.parse_payload::<DeskEvent>() {
        Ok(event) => {
            tracing::debug!(order_id = %event.order_id(), "Notification: {}", event);
            if tx.send(event).is_err() {
                tracing::trace!("No subscribers for notification");
            }
        }
        Err(e) => tracing::warn!(error = %e, "Malformed notification payload"),
    }
}

async fn run_listener(
    addr: String,
    handshake: HandshakePayload,
    policy: ReconnectPolicy,
    tx: broadcast::Sender<DeskEvent>,
    shutdown: CancellationToken,
) {
    let mut failures = 0u32;

    loop {
        let connected = tokio::select! {
            _ = shutdown.cancelled() => return,
            result = connect(&addr, &handshake) => result,
        };

        match connected {
            Ok(transport) => {
                failures = 0;
                tracing::info!(addr = %addr, "Notification stream connected");
                loop {
                    tokio::select! {
                        _ = shutdown.cancelled() => {
                            if let Err(e) = transport.close().await {
                                tracing::debug!(error = %e, "Error closing notification stream");
                            }
                            return;
                        }
                        result = transport.read_message() => match result {
                            Ok(msg) => dispatch(&tx, msg),
                            Err(e) => {
                                tracing::warn!(addr = %addr, error = %e, "Notification stream lost");
                                break;
                            }
                        }
                    }
                }
            }
            Err(e) => {
                tracing::debug!(addr = %addr, error = %e, "Notification connect failed");
            }
        }

        failures += 1;
        if failures >= policy.max_attempts {
            tracing::warn!(
                addr = %addr,
                attempts = failures,
                "Notification listener giving up after repeated failures"
            );
            return;
        }

        let delay = policy.delay_for(failures);
        tracing::info!(
            attempt = failures,
            delay_ms = delay.as_millis() as u64,
            "Reconnecting to notification stream"
        );
        tokio::select! {
            _ = shutdown.cancelled() => return,
            _ = tokio::time::sleep(delay) => {}
        }
    }
}
