//! Bridge-side OSC protocol engine for out-of-process plugin hosting.
//!
//! A bridge process loads one audio plugin and is remote-controlled by its
//! host over OSC. This crate owns the protocol boundary of that bridge:
//!
//! - **inbound**: the transport's listener thread hands every message to
//!   [`BridgeOsc`], which validates the `/<name>/<method>` address, decodes
//!   the typed arguments into an [`Event`] and pushes it onto a bounded
//!   lock-free queue;
//! - **audio thread**: drains the [`EventConsumer`] once per processing
//!   cycle, without blocking, locking or allocating;
//! - **outbound**: the [`StatusReporter`] formats the `/bridge_*` reports
//!   (peaks, counts, plugin metadata, chunk and custom data) and sends
//!   them through the control channel opened by [`BridgeOsc::init`].
//!
//! Protocol violations never take the endpoint down: foreign traffic,
//! unknown methods and bad argument shapes are reported to the transport
//! as not handled and logged, nothing more.
//!
//! ## Usage
//!
//! ```no_run
//! use bridge_osc::{BridgeOsc, BridgeOscConfig, UdpTransport};
//!
//! # fn main() -> bridge_osc::Result<()> {
//! let config = BridgeOscConfig::default();
//! let transport = UdpTransport::bind(&config)?;
//! let mut endpoint = BridgeOsc::new(transport, "carla-bridge", &config);
//! let consumer = endpoint.take_consumer(); // goes to the audio thread
//!
//! let reporter = endpoint.init("osc.udp://127.0.0.1:22752/Carla")?;
//! reporter.update();
//!
//! // audio thread, once per cycle:
//! //     for event in consumer.drain() { apply(event); }
//!
//! endpoint.close();
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{BridgeOscError, Result};

mod event;
pub use event::Event;

pub mod address;

pub mod decoder;
pub use decoder::{CUSTOM_DATA_DELIMITER, MSG_SAVE_NOW, MSG_SET_CHUNK, MSG_SET_CUSTOM};

mod queue;
pub use queue::{event_queue, Drain, EventConsumer, EventProducer};

mod config;
pub use config::BridgeOscConfig;

pub mod transport;
pub use transport::{Handled, MessageHandler, OscTransport, OscUrl, UdpTransport};

mod reporter;
pub use reporter::{ControlChannel, ParamData, ParamRanges, PluginInfo, StatusReporter};

mod endpoint;
pub use endpoint::{BridgeOsc, BridgeState};

// Wire-level message types, for custom `OscTransport` implementations.
pub use rosc::{OscMessage, OscType};
