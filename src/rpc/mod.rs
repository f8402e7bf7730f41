mod envelope;
mod error;
mod id;
mod session;
mod transport;

pub use envelope::{AddSatellitesParams, Method, RpcRequest, SatellitePayload, JSONRPC_VERSION};
pub use error::{ProtocolError, RpcError, TransportError};
pub use id::RequestIdGenerator;
pub use session::{DuplicateIdPolicy, RpcSession, SessionOptions, SessionState};
pub use transport::{HttpTransport, Transport, TransportResponse};
