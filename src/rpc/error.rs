use thiserror::Error;

use crate::elements::ElementsError;

use super::session::SessionState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The request never got an answer: connect, timeout, reset, ...
#[derive(Debug, Error)]
#[error("transport to {endpoint} failed: {source}")]
pub struct TransportError {
    pub endpoint: String,
    #[source]
    source: BoxError,
}

impl TransportError {
    pub fn new(endpoint: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            endpoint: endpoint.into(),
            source: source.into(),
        }
    }
}

/// An answer arrived but cannot be accepted as an acknowledgement.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("simulator answered with HTTP status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("acknowledgement is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("acknowledgement id {received} does not match request id {expected}")]
    IdMismatch {
        expected: u64,
        received: serde_json::Value,
    },
    #[error("simulator rejected request {id}: {message} (code {code})")]
    Remote { id: u64, code: i64, message: String },
}

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("session is not active (state: {0})")]
    SessionNotActive(SessionState),
    #[error("session cannot be opened from state {0}")]
    CannotOpen(SessionState),
    #[error("invalid orbit: {0}")]
    InvalidOrbit(#[from] ElementsError),
    #[error("duplicate satellite id in batch: {0}")]
    DuplicateId(String),
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
