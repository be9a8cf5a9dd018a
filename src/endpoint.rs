//! Bridge endpoint lifecycle and inbound pipeline.
//!
//! Wires the transport's catch-all handler through address matching and
//! decoding into the event queue, and owns the single init/close cycle.

use crate::address;
use crate::config::BridgeOscConfig;
use crate::decoder;
use crate::error::{BridgeOscError, Result};
use crate::queue::{event_queue, EventConsumer, EventProducer};
use crate::reporter::{ControlChannel, StatusReporter};
use crate::transport::{Handled, MessageHandler, OscTransport, OscUrl};
use rosc::OscMessage;
use std::sync::Arc;

/// Endpoint lifecycle. Exactly one init/close cycle is permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    Uninitialized,
    Listening,
    Closed,
}

/// The bridge-side OSC endpoint.
///
/// Inbound messages addressed `/<name>/<method>` are decoded on the
/// transport's listener thread and enqueued for the audio thread;
/// everything else is reported back to the transport as not handled.
pub struct BridgeOsc<T: OscTransport> {
    transport: Arc<T>,
    name: String,
    state: BridgeState,
    server_path: Option<String>,
    channel: Option<Arc<ControlChannel<T::Target>>>,
    producer: Option<EventProducer>,
    consumer: Option<EventConsumer>,
}

impl<T: OscTransport> BridgeOsc<T> {
    /// Create an endpoint named `name`; the namespace of every accepted
    /// inbound path is `/<name>/`.
    ///
    /// Panics if `name` is empty.
    pub fn new(transport: T, name: impl Into<String>, config: &BridgeOscConfig) -> Self {
        let name = name.into();
        assert!(!name.is_empty(), "endpoint name must not be empty");

        let (producer, consumer) = event_queue(config.queue_capacity);
        Self {
            transport: Arc::new(transport),
            name,
            state: BridgeState::Uninitialized,
            server_path: None,
            channel: None,
            producer: Some(producer),
            consumer: Some(consumer),
        }
    }

    /// Take the audio-thread half of the event queue. May be called once,
    /// before or after `init`.
    pub fn take_consumer(&mut self) -> EventConsumer {
        self.consumer
            .take()
            .expect("BUG: event consumer already taken")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> BridgeState {
        self.state
    }

    /// This endpoint's own reachable URL, populated by `init`.
    pub fn server_path(&self) -> Option<&str> {
        self.server_path.as_deref()
    }

    /// Parse the host URL, open the control channel, register the inbound
    /// pipeline and start listening.
    ///
    /// On [`BridgeOscError::InvalidTargetUrl`] the endpoint stays
    /// `Uninitialized`; the caller must not proceed.
    ///
    /// Panics if called more than once.
    pub fn init(&mut self, url: &str) -> Result<StatusReporter<T>> {
        assert_eq!(
            self.state,
            BridgeState::Uninitialized,
            "init() called more than once"
        );
        tracing::debug!("initializing OSC endpoint '{}' -> {}", self.name, url);

        let parsed = OscUrl::parse(url)?;
        let target = self.transport.resolve(&parsed.host, parsed.port)?;
        let channel = Arc::new(ControlChannel::new(parsed.path, Some(target)));

        let producer = self
            .producer
            .take()
            .expect("BUG: producer gone before init");
        let name = self.name.clone();
        let handler: MessageHandler = Arc::new(move |msg| handle_message(&name, &producer, msg));

        let listen_url = self.transport.start(handler)?;
        self.server_path = Some(format!("{}{}", listen_url, self.name));
        self.channel = Some(Arc::clone(&channel));
        self.state = BridgeState::Listening;
        tracing::debug!("OSC endpoint listening at {:?}", self.server_path);

        Ok(StatusReporter::new(Arc::clone(&self.transport), channel))
    }

    /// Stop the listener, then release the control channel target.
    ///
    /// That ordering is load-bearing: no report may go out through a
    /// channel that is being torn down.
    ///
    /// Panics unless the endpoint is `Listening`.
    pub fn close(&mut self) {
        assert_eq!(
            self.state,
            BridgeState::Listening,
            "close() called while not listening"
        );
        tracing::debug!("closing OSC endpoint '{}'", self.name);

        self.transport.stop();
        if let Some(channel) = self.channel.take() {
            channel.clear_target();
        }
        self.state = BridgeState::Closed;
    }
}

/// Inbound pipeline: address match -> decode -> enqueue.
///
/// Runs on the transport's listener thread. Never panics, never
/// escalates; every rejection becomes `Handled::No` plus a log line.
fn handle_message(name: &str, producer: &EventProducer, msg: &OscMessage) -> Handled {
    let method = match address::extract_method(&msg.addr, name) {
        Ok(method) => method,
        // Foreign traffic; already logged at debug level by the matcher.
        Err(BridgeOscError::AddressMismatch) => return Handled::No,
        Err(e) => {
            tracing::warn!("rejected '{}': {}", msg.addr, e);
            return Handled::No;
        }
    };

    match decoder::decode(method, &msg.args) {
        Ok(Some(event)) => {
            // Overflow is counted and logged by the queue itself.
            producer.push(event);
            Handled::Yes
        }
        Ok(None) => Handled::Yes,
        Err(e) => {
            tracing::warn!("rejected '{}': {}", msg.addr, e);
            Handled::No
        }
    }
}
