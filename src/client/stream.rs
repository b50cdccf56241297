//! Stream subscription: the producer side of the event loop.
//!
//! The producer runs on the task that called `connect`. It owns the SSE
//! subscription, decodes frames into queued event records, and pushes them
//! in arrival order; it never touches session state or the engine.

use futures::StreamExt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::error::ClientError;
use crate::protocol::sse::SseParser;

/// Which stream event a queued record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EventKind {
    /// `latest_state_update`: authoritative, drives dispatch.
    Latest,
    /// `state_update`: informational, pre-start only.
    Informational,
}

impl EventKind {
    /// Event name for error messages.
    pub fn label(self) -> &'static str {
        match self {
            EventKind::Latest => "latest_state_update event",
            EventKind::Informational => "state_update event",
        }
    }
}

/// A record handed from the producer to the consumer, in arrival order.
#[derive(Debug)]
pub(crate) enum QueuedEvent {
    /// The subscription opened.
    Connected,
    /// A named stream event with its raw data payload.
    Update {
        /// Stream event name.
        kind: EventKind,
        /// Raw JSON payload, decoded by the consumer.
        data: String,
    },
}

/// Shared captured-error slot; the first writer wins.
#[derive(Clone, Default)]
pub(crate) struct ErrorSlot(Arc<Mutex<Option<ClientError>>>);

impl ErrorSlot {
    /// Records an error unless one is already captured.
    pub fn record(&self, err: ClientError) {
        let mut slot = self.0.lock().expect("error slot poisoned");
        if slot.is_none() {
            *slot = Some(err);
        }
    }

    /// Takes the captured error, if any.
    pub fn take(&self) -> Option<ClientError> {
        self.0.lock().expect("error slot poisoned").take()
    }
}

/// Retry policy of the stream subscription.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StreamSettings {
    /// Reconnect attempts before giving up.
    pub max_retry_count: u32,
    /// Fixed wait between reconnect attempts.
    pub retry_interval: Duration,
}

enum ReadOutcome {
    /// The consumer asked the subscription to close.
    Stopped,
    /// The connection dropped; reconnect may follow.
    Disconnected(Option<ClientError>),
}

/// The producer: subscribes, reads, decodes, enqueues.
pub(crate) struct Streamer {
    http: reqwest::Client,
    url: String,
    auth: (String, String),
    settings: StreamSettings,
    tx: mpsc::UnboundedSender<QueuedEvent>,
    stop: watch::Receiver<bool>,
    errors: ErrorSlot,
}

impl Streamer {
    pub fn new(
        http: reqwest::Client,
        url: String,
        auth: (String, String),
        settings: StreamSettings,
        tx: mpsc::UnboundedSender<QueuedEvent>,
        stop: watch::Receiver<bool>,
        errors: ErrorSlot,
    ) -> Self {
        Self {
            http,
            url,
            auth,
            settings,
            tx,
            stop,
            errors,
        }
    }

    /// Runs the subscription until stopped or retries are exhausted.
    ///
    /// Dropping `self` (and with it the queue sender) is the consumer's
    /// signal to finish draining.
    pub async fn run(mut self) {
        let mut attempts: u32 = 0;
        let mut last_err: Option<ClientError> = None;

        loop {
            if *self.stop.borrow() {
                return;
            }

            match self.open().await {
                Ok(response) => {
                    // A successful open clears any pending transport error.
                    attempts = 0;
                    last_err = None;
                    info!(url = %self.url, "event stream opened");
                    let _ = self.tx.send(QueuedEvent::Connected);

                    match self.read_stream(response).await {
                        ReadOutcome::Stopped => return,
                        ReadOutcome::Disconnected(err) => {
                            warn!("event stream disconnected");
                            last_err = err.or(last_err);
                        }
                    }
                }
                Err(err @ ClientError::Authentication) => {
                    // Never retried.
                    self.errors.record(err);
                    return;
                }
                Err(err) => {
                    warn!(error = %err, "failed to open event stream");
                    last_err = Some(err);
                }
            }

            attempts += 1;
            if attempts > self.settings.max_retry_count {
                self.errors.record(last_err.unwrap_or_else(|| ClientError::Transport {
                    message: "event stream closed by the server".to_string(),
                }));
                return;
            }

            debug!(
                attempt = attempts,
                max = self.settings.max_retry_count,
                "waiting before reconnect"
            );
            tokio::select! {
                _ = tokio::time::sleep(self.settings.retry_interval) => {}
                changed = self.stop.changed() => {
                    if changed.is_err() || *self.stop.borrow() {
                        return;
                    }
                }
            }
        }
    }

    async fn open(&self) -> Result<reqwest::Response, ClientError> {
        let response = self
            .http
            .get(&self.url)
            .basic_auth(&self.auth.0, Some(&self.auth.1))
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 401 {
            return Err(ClientError::Authentication);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::unexpected(status.as_u16(), body));
        }
        Ok(response)
    }

    async fn read_stream(&mut self, response: reqwest::Response) -> ReadOutcome {
        let mut stream = response.bytes_stream();
        let mut parser = SseParser::new();

        loop {
            tokio::select! {
                changed = self.stop.changed() => {
                    if changed.is_err() || *self.stop.borrow() {
                        return ReadOutcome::Stopped;
                    }
                }
                chunk = stream.next() => match chunk {
                    Some(Ok(bytes)) => {
                        for message in parser.push(&bytes) {
                            let kind = match message.event.as_str() {
                                "latest_state_update" => EventKind::Latest,
                                "state_update" => EventKind::Informational,
                                other => {
                                    debug!(event = other, "ignoring unrecognized stream event");
                                    continue;
                                }
                            };
                            let _ = self.tx.send(QueuedEvent::Update {
                                kind,
                                data: message.data,
                            });
                        }
                    }
                    Some(Err(err)) => return ReadOutcome::Disconnected(Some(err.into())),
                    None => return ReadOutcome::Disconnected(None),
                },
            }
        }
    }
}
