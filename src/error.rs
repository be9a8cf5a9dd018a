//! Error types for the OSC bridge engine.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeOscError {
    /// Inbound path is outside this endpoint's `/<name>/` namespace.
    ///
    /// The expected outcome for foreign traffic on a shared socket; the
    /// handler reports "not handled" to the transport and moves on.
    #[error("message not for this endpoint")]
    AddressMismatch,

    #[error("method token too long: {len} bytes (max {max})", max = crate::address::MAX_METHOD_LEN)]
    MethodTooLong { len: usize },

    #[error("unsupported method '{method}'")]
    UnsupportedMethod { method: String },

    #[error("type signature mismatch for '{method}': expected \"{expected}\", got \"{got}\"")]
    TypeSignatureMismatch {
        method: &'static str,
        expected: &'static str,
        got: String,
    },

    /// Init-time failure: the host URL could not be parsed into a target.
    /// The only condition in this crate that escalates to the caller.
    #[error("invalid target URL '{url}': {reason}")]
    InvalidTargetUrl { url: String, reason: &'static str },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("OSC encode error: {0}")]
    Encode(String),
}

pub type Result<T> = std::result::Result<T, BridgeOscError>;
