use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::elements::Satellite;

use super::envelope::{AddSatellitesParams, Method, RpcRequest, SatellitePayload};
use super::error::{ProtocolError, RpcError};
use super::id::RequestIdGenerator;
use super::transport::{Transport, TransportResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SessionState {
    Unopened,
    Open,
    Closed,
}

/// What to do when a batch carries the same satellite id twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateIdPolicy {
    Allow,
    #[default]
    Warn,
    Reject,
}

#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub duplicate_ids: DuplicateIdPolicy,
    /// Prepended to every method name, e.g. `bevy/`.
    pub method_prefix: String,
}

/// One connection's worth of requests to the simulator.
///
/// Unopened -> Open -> Closed. Dispatch is only allowed while open, and a
/// closed session cannot be reopened. Dropping an open session closes it.
pub struct RpcSession<T: Transport> {
    transport: T,
    options: SessionOptions,
    ids: RequestIdGenerator,
    state: SessionState,
}

impl<T: Transport> RpcSession<T> {
    pub fn new(transport: T, options: SessionOptions) -> Self {
        Self {
            transport,
            options,
            ids: RequestIdGenerator::new(),
            state: SessionState::Unopened,
        }
    }

    /// Open a session, run `f` against it and close it on every exit path.
    pub fn scoped<R>(
        transport: T,
        options: SessionOptions,
        f: impl FnOnce(&mut Self) -> Result<R, RpcError>,
    ) -> Result<R, RpcError> {
        let mut session = Self::new(transport, options);
        session.open()?;
        let result = f(&mut session);
        session.close();
        result
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Id of the last request sent in this session.
    pub fn last_request_id(&self) -> Option<u64> {
        self.ids.last_issued()
    }

    pub fn open(&mut self) -> Result<(), RpcError> {
        if self.state != SessionState::Unopened {
            return Err(RpcError::CannotOpen(self.state));
        }
        self.transport.connect()?;
        self.ids.reset();
        self.state = SessionState::Open;
        log::info!("Session opened to {}", self.transport.endpoint());
        Ok(())
    }

    pub fn close(&mut self) {
        if self.state == SessionState::Open {
            self.transport.release();
            log::info!(
                "Session to {} closed after {} request(s)",
                self.transport.endpoint(),
                self.ids.last_issued().unwrap_or(0)
            );
        }
        self.state = SessionState::Closed;
    }

    pub fn add_satellite(&mut self, satellite: &Satellite) -> Result<Value, RpcError> {
        self.ensure_open()?;
        satellite.elements.validate()?;

        self.dispatch(Method::AddSatellite, SatellitePayload::from(satellite), 1)
    }

    /// Send every satellite in one request under a single correlation id.
    pub fn add_satellites(&mut self, satellites: &[Satellite]) -> Result<Value, RpcError> {
        self.ensure_open()?;
        self.check_duplicates(satellites)?;
        for satellite in satellites {
            satellite.elements.validate()?;
        }

        let params = AddSatellitesParams {
            satellites: satellites.iter().map(SatellitePayload::from).collect(),
        };
        self.dispatch(Method::AddSatellites, params, satellites.len())
    }

    fn ensure_open(&self) -> Result<(), RpcError> {
        match self.state {
            SessionState::Open => Ok(()),
            state => Err(RpcError::SessionNotActive(state)),
        }
    }

    fn check_duplicates(&self, satellites: &[Satellite]) -> Result<(), RpcError> {
        if self.options.duplicate_ids == DuplicateIdPolicy::Allow {
            return Ok(());
        }

        let mut seen = HashSet::with_capacity(satellites.len());
        for satellite in satellites {
            if seen.insert(satellite.id.as_str()) {
                continue;
            }
            match self.options.duplicate_ids {
                DuplicateIdPolicy::Reject => {
                    return Err(RpcError::DuplicateId(satellite.id.clone()));
                }
                _ => {
                    log::warn!("Duplicate satellite id in batch: {}", satellite.id);
                }
            }
        }
        Ok(())
    }

    fn dispatch<P: Serialize>(
        &mut self,
        method: Method,
        params: P,
        count: usize,
    ) -> Result<Value, RpcError> {
        let id = self.ids.next_id();
        let method = format!("{}{}", self.options.method_prefix, method);
        let request = RpcRequest::new(method, id, params);
        let body = serde_json::to_vec(&request).map_err(RpcError::Encode)?;

        log::debug!(
            "Sending {} (id {}, {} satellite(s), {} bytes)",
            request.method,
            id,
            count,
            body.len()
        );

        let response = self.transport.send(body)?;
        Ok(parse_acknowledgement(id, response)?)
    }
}

impl<T: Transport> Drop for RpcSession<T> {
    fn drop(&mut self) {
        if self.state == SessionState::Open {
            self.close();
        }
    }
}

fn parse_acknowledgement(id: u64, response: TransportResponse) -> Result<Value, ProtocolError> {
    if !(200..300).contains(&response.status) {
        return Err(ProtocolError::Status {
            status: response.status,
            body: String::from_utf8_lossy(&response.body).into_owned(),
        });
    }

    let ack: Value = serde_json::from_slice(&response.body)?;

    // Only answers that claim to be JSON-RPC are checked further
    if let Some(envelope) = ack.as_object().filter(|o| o.contains_key("jsonrpc")) {
        if let Some(received) = envelope.get("id") {
            if !received.is_null() && received.as_u64() != Some(id) {
                return Err(ProtocolError::IdMismatch {
                    expected: id,
                    received: received.clone(),
                });
            }
        }
        if let Some(error) = envelope.get("error") {
            return Err(ProtocolError::Remote {
                id,
                code: error.get("code").and_then(Value::as_i64).unwrap_or_default(),
                message: error
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            });
        }
    }

    Ok(ack)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::OrbitalElementBuilder;
    use crate::rpc::TransportError;
    use serde_json::json;

    /// Records every request and answers with a canned body.
    struct Recorder {
        sent: Vec<Value>,
        reply: Option<TransportResponse>,
        connected: bool,
        releases: usize,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                sent: Vec::new(),
                reply: None,
                connected: false,
                releases: 0,
            }
        }

        fn replying(status: u16, body: &str) -> Self {
            Self {
                reply: Some(TransportResponse {
                    status,
                    body: body.as_bytes().to_vec(),
                }),
                ..Self::new()
            }
        }
    }

    impl Transport for Recorder {
        fn connect(&mut self) -> Result<(), TransportError> {
            self.connected = true;
            Ok(())
        }

        fn send(&mut self, body: Vec<u8>) -> Result<TransportResponse, TransportError> {
            let request: Value = serde_json::from_slice(&body).unwrap();
            let id = request["id"].clone();
            self.sent.push(request);
            Ok(self.reply.clone().unwrap_or(TransportResponse {
                status: 200,
                body: serde_json::to_vec(&json!({"jsonrpc": "2.0", "id": id, "result": null}))
                    .unwrap(),
            }))
        }

        fn release(&mut self) {
            self.connected = false;
            self.releases += 1;
        }

        fn endpoint(&self) -> String {
            "recorder".to_string()
        }
    }

    fn satellite(id: &str, mean_anomaly: f64) -> Satellite {
        let mut builder = OrbitalElementBuilder::new();
        builder
            .set_apogee_perigee(6921.0, 6921.0)
            .unwrap()
            .set_mean_anomaly(mean_anomaly)
            .unwrap()
            .set_id(id);
        builder.build().unwrap()
    }

    #[test]
    fn dispatch_requires_open_session() {
        let mut recorder = Recorder::new();
        {
            let mut session = RpcSession::new(&mut recorder, SessionOptions::default());
            assert!(matches!(
                session.add_satellite(&satellite("a", 0.0)),
                Err(RpcError::SessionNotActive(SessionState::Unopened))
            ));

            session.open().unwrap();
            session.close();
            assert!(matches!(
                session.add_satellite(&satellite("a", 0.0)),
                Err(RpcError::SessionNotActive(SessionState::Closed))
            ));
            assert!(matches!(
                session.open(),
                Err(RpcError::CannotOpen(SessionState::Closed))
            ));
        }
        assert!(recorder.sent.is_empty());
    }

    #[test]
    fn ids_increase_across_single_and_batch_calls() {
        let mut recorder = Recorder::new();
        {
            let mut session = RpcSession::new(&mut recorder, SessionOptions::default());
            session.open().unwrap();
            session.add_satellite(&satellite("a", 0.0)).unwrap();
            session
                .add_satellites(&[satellite("b", 1.0), satellite("c", 2.0)])
                .unwrap();
            session.add_satellite(&satellite("d", 3.0)).unwrap();
            assert_eq!(session.last_request_id(), Some(3));
        }
        let ids: Vec<u64> = recorder.sent.iter().map(|r| r["id"].as_u64().unwrap()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(recorder.sent[1]["method"], "add_satellites");
        assert_eq!(recorder.sent[1]["params"]["satellites"][1]["id"], "c");
    }

    #[test]
    fn drop_releases_open_session() {
        let mut recorder = Recorder::new();
        {
            let mut session = RpcSession::new(&mut recorder, SessionOptions::default());
            session.open().unwrap();
        }
        assert!(!recorder.connected);
        assert_eq!(recorder.releases, 1);
    }

    #[test]
    fn scoped_closes_on_error() {
        let mut recorder = Recorder::replying(500, "boom");
        let result = RpcSession::scoped(&mut recorder, SessionOptions::default(), |session| {
            session.add_satellite(&satellite("a", 0.0))
        });
        assert!(matches!(
            result,
            Err(RpcError::Protocol(ProtocolError::Status { status: 500, .. }))
        ));
        assert_eq!(recorder.releases, 1);
        assert_eq!(recorder.sent.len(), 1);
    }

    #[test]
    fn duplicate_ids_follow_policy() {
        let batch = [satellite("same", 0.0), satellite("same", 1.0)];

        let mut recorder = Recorder::new();
        let options = SessionOptions {
            duplicate_ids: DuplicateIdPolicy::Reject,
            ..SessionOptions::default()
        };
        let result = RpcSession::scoped(&mut recorder, options, |s| s.add_satellites(&batch));
        assert!(matches!(result, Err(RpcError::DuplicateId(id)) if id == "same"));
        assert!(recorder.sent.is_empty());

        for policy in [DuplicateIdPolicy::Allow, DuplicateIdPolicy::Warn] {
            let mut recorder = Recorder::new();
            let options = SessionOptions {
                duplicate_ids: policy,
                ..SessionOptions::default()
            };
            RpcSession::scoped(&mut recorder, options, |s| s.add_satellites(&batch)).unwrap();
            assert_eq!(recorder.sent.len(), 1);
        }
    }

    #[test]
    fn method_prefix_is_prepended() {
        let mut recorder = Recorder::new();
        let options = SessionOptions {
            method_prefix: "bevy/".to_string(),
            ..SessionOptions::default()
        };
        RpcSession::scoped(&mut recorder, options, |s| s.add_satellite(&satellite("a", 0.0)))
            .unwrap();
        assert_eq!(recorder.sent[0]["method"], "bevy/add_satellite");
    }

    #[test]
    fn invalid_satellite_is_not_sent() {
        let mut bad = satellite("a", 0.0);
        bad.elements.eccentricity = 1.5;
        let mut recorder = Recorder::new();
        let result = RpcSession::scoped(&mut recorder, SessionOptions::default(), |s| {
            s.add_satellite(&bad)
        });
        assert!(matches!(result, Err(RpcError::InvalidOrbit(_))));
        assert!(recorder.sent.is_empty());
    }

    #[test]
    fn acknowledgement_parsing() {
        let ok = |body: &str| TransportResponse {
            status: 200,
            body: body.as_bytes().to_vec(),
        };

        assert_eq!(parse_acknowledgement(1, ok("{\"ok\":true}")).unwrap(), json!({"ok": true}));
        assert!(matches!(
            parse_acknowledgement(1, ok("not json")),
            Err(ProtocolError::InvalidJson(_))
        ));
        assert!(matches!(
            parse_acknowledgement(4, ok(r#"{"jsonrpc":"2.0","id":3,"result":null}"#)),
            Err(ProtocolError::IdMismatch { expected: 4, .. })
        ));
        let remote = parse_acknowledgement(
            2,
            ok(r#"{"jsonrpc":"2.0","id":2,"error":{"code":-32602,"message":"Invalid eccentricity"}}"#),
        );
        assert!(matches!(
            remote,
            Err(ProtocolError::Remote { code: -32602, ref message, .. }) if message == "Invalid eccentricity"
        ));
    }
}
