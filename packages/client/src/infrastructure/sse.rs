//! Server-sent events transport for push mode.
//!
//! [`SseParser`] turns raw stream bytes into events; [`EventStreamSubscription`]
//! keeps one long-lived `GET /events` connection open and reconnects after
//! connection loss, like a browser `EventSource`. Reconnects are logged,
//! never surfaced as errors.

use std::time::Duration;

use futures_util::StreamExt;
use reqwest::{Client, Response, StatusCode, Url, header};
use tokio::{sync::mpsc, task::JoinHandle};

/// Event type that signals new messages
pub const MESSAGE_EVENT: &str = "message";

/// Delay before reconnecting unless the server sends `retry:`
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(3000);

const EVENT_STREAM_MIME: &str = "text/event-stream";
const LAST_EVENT_ID_HEADER: &str = "Last-Event-ID";

/// One dispatched server-sent event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    pub event_type: String,
    pub data: String,
    pub last_event_id: Option<String>,
}

impl SseEvent {
    pub fn is_message(&self) -> bool {
        self.event_type == MESSAGE_EVENT
    }
}

/// Incremental parser for the `text/event-stream` format.
///
/// Accepts arbitrary chunk boundaries, including ones that split a line,
/// a `\r\n` pair or a UTF-8 sequence.
#[derive(Debug, Default)]
pub struct SseParser {
    line: Vec<u8>,
    pending_cr: bool,
    event_type: String,
    data: String,
    last_event_id: Option<String>,
    retry: Option<Duration>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return the events completed by it
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        let mut events = Vec::new();
        for &byte in chunk {
            if self.pending_cr {
                self.pending_cr = false;
                if byte == b'\n' {
                    continue;
                }
            }
            match byte {
                b'\n' => self.end_line(&mut events),
                b'\r' => {
                    self.pending_cr = true;
                    self.end_line(&mut events);
                }
                _ => self.line.push(byte),
            }
        }
        events
    }

    /// Reconnection delay requested by the server since the last call
    pub fn take_retry(&mut self) -> Option<Duration> {
        self.retry.take()
    }

    pub fn last_event_id(&self) -> Option<&str> {
        self.last_event_id.as_deref()
    }

    /// Drop any half-received event; the last event ID survives reconnects
    pub fn reset(&mut self) {
        self.line.clear();
        self.pending_cr = false;
        self.event_type.clear();
        self.data.clear();
    }

    fn end_line(&mut self, events: &mut Vec<SseEvent>) {
        let raw = std::mem::take(&mut self.line);
        let line = String::from_utf8_lossy(&raw);

        if line.is_empty() {
            if let Some(event) = self.dispatch() {
                events.push(event);
            }
            return;
        }
        if line.starts_with(':') {
            return;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (&*line, ""),
        };

        match field {
            "event" => self.event_type = value.to_string(),
            "data" => {
                self.data.push_str(value);
                self.data.push('\n');
            }
            // An empty id clears the last event ID
            "id" if !value.contains('\0') => {
                self.last_event_id = (!value.is_empty()).then(|| value.to_string());
            }
            "retry" if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) => {
                if let Ok(millis) = value.parse::<u64>() {
                    self.retry = Some(Duration::from_millis(millis));
                }
            }
            _ => {}
        }
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        let event_type = std::mem::take(&mut self.event_type);
        if self.data.is_empty() {
            return None;
        }
        let mut data = std::mem::take(&mut self.data);
        data.pop(); // trailing '\n'

        Some(SseEvent {
            event_type: if event_type.is_empty() {
                MESSAGE_EVENT.to_string()
            } else {
                event_type
            },
            data,
            last_event_id: self.last_event_id.clone(),
        })
    }
}

/// A subscribed `GET /events` stream.
///
/// Dropping the subscription stops the background connection task.
#[derive(Debug)]
pub struct EventStreamSubscription {
    events: mpsc::UnboundedReceiver<SseEvent>,
    task: JoinHandle<()>,
}

impl EventStreamSubscription {
    /// Open the event stream once to find out whether the server pushes.
    ///
    /// Returns the live response when the server answered with an event
    /// stream so it can become the subscription's first connection.
    pub async fn probe(client: &Client, url: &Url) -> Option<Response> {
        match open(client, url, None).await {
            Ok(response) if is_event_stream(&response) => Some(response),
            Ok(response) => {
                tracing::info!(
                    "{} is not an event stream (status {}), push unavailable",
                    url,
                    response.status()
                );
                None
            }
            Err(e) => {
                tracing::info!("Could not open {}: {}, push unavailable", url, e);
                None
            }
        }
    }

    /// Start the connection task. `initial` is used as the first connection
    /// instead of opening a new one.
    pub fn spawn(client: Client, url: Url, initial: Option<Response>) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_stream(client, url, initial, tx));
        Self { events, task }
    }

    /// Subscription fed directly from a channel, with no connection task
    #[cfg(test)]
    pub(crate) fn from_receiver(events: mpsc::UnboundedReceiver<SseEvent>) -> Self {
        Self {
            events,
            task: tokio::spawn(async {}),
        }
    }

    /// Wait for the next event; `None` once the server ended the stream
    pub async fn next_event(&mut self) -> Option<SseEvent> {
        self.events.recv().await
    }
}

impl Drop for EventStreamSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn open(
    client: &Client,
    url: &Url,
    last_event_id: Option<&str>,
) -> Result<Response, reqwest::Error> {
    let mut request = client
        .get(url.clone())
        .header(header::ACCEPT, EVENT_STREAM_MIME)
        .header(header::CACHE_CONTROL, "no-cache");
    if let Some(id) = last_event_id {
        request = request.header(LAST_EVENT_ID_HEADER, id);
    }
    request.send().await
}

fn is_event_stream(response: &Response) -> bool {
    response.status().is_success()
        && response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with(EVENT_STREAM_MIME))
}

async fn run_stream(
    client: Client,
    url: Url,
    mut initial: Option<Response>,
    tx: mpsc::UnboundedSender<SseEvent>,
) {
    let mut parser = SseParser::new();
    let mut reconnect_delay = DEFAULT_RECONNECT_DELAY;
    let mut reconnect_count: u32 = 0;

    loop {
        let response = match initial.take() {
            Some(response) => Ok(response),
            None => open(&client, &url, parser.last_event_id()).await,
        };

        match response {
            Ok(response) if response.status() == StatusCode::NO_CONTENT => {
                tracing::info!("Server closed the event stream at {} (204)", url);
                return;
            }
            Ok(response) if is_event_stream(&response) => {
                tracing::info!("Subscribed to {}", url);
                reconnect_count = 0;

                let mut stream = response.bytes_stream();
                while let Some(chunk) = stream.next().await {
                    match chunk {
                        Ok(bytes) => {
                            for event in parser.feed(&bytes) {
                                if tx.send(event).is_err() {
                                    // Subscriber gone
                                    return;
                                }
                            }
                            if let Some(retry) = parser.take_retry() {
                                reconnect_delay = retry;
                            }
                        }
                        Err(e) => {
                            tracing::debug!("Event stream read error: {}", e);
                            break;
                        }
                    }
                }
                parser.reset();
                tracing::debug!("Event stream at {} ended", url);
            }
            Ok(response) => {
                tracing::warn!(
                    "Unexpected event stream response from {}: {}",
                    url,
                    response.status()
                );
            }
            Err(e) => {
                tracing::debug!("Event stream connection failed: {}", e);
            }
        }

        if tx.is_closed() {
            return;
        }

        reconnect_count += 1;
        tracing::info!(
            "Reconnecting to {} in {} ms... (attempt {})",
            url,
            reconnect_delay.as_millis(),
            reconnect_count
        );
        tokio::time::sleep(reconnect_delay).await;
    }
}
