use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;

use super::error::TransportError;

/// Raw answer from the simulator, before any JSON-RPC interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Blocking request/response channel to the simulator.
pub trait Transport {
    /// Acquire whatever the transport keeps across calls.
    fn connect(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    fn send(&mut self, body: Vec<u8>) -> Result<TransportResponse, TransportError>;

    /// Drop anything acquired in [`connect`](Self::connect).
    fn release(&mut self) {}

    fn endpoint(&self) -> String;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn connect(&mut self) -> Result<(), TransportError> {
        (**self).connect()
    }

    fn send(&mut self, body: Vec<u8>) -> Result<TransportResponse, TransportError> {
        (**self).send(body)
    }

    fn release(&mut self) {
        (**self).release()
    }

    fn endpoint(&self) -> String {
        (**self).endpoint()
    }
}

/// JSON-RPC over HTTP POST to `http://{host}:{port}/`.
#[derive(Debug)]
pub struct HttpTransport {
    url: String,
    timeout: Option<Duration>,
    client: Option<Client>,
}

impl HttpTransport {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            url: format!("http://{}:{}/", host, port),
            timeout: None,
            client: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }
}

impl Transport for HttpTransport {
    fn connect(&mut self) -> Result<(), TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::new(&self.url, e))?;
        self.client = Some(client);
        Ok(())
    }

    /// Fails unless [`connect`](Transport::connect) ran since the last release.
    fn send(&mut self, body: Vec<u8>) -> Result<TransportResponse, TransportError> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| TransportError::new(&self.url, "not connected"))?;

        let response = client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(|e| TransportError::new(&self.url, e))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .map_err(|e| TransportError::new(&self.url, e))?
            .to_vec();

        Ok(TransportResponse { status, body })
    }

    fn release(&mut self) {
        self.client = None;
    }

    fn endpoint(&self) -> String {
        self.url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_targets_simulator_root() {
        assert_eq!(
            HttpTransport::new("localhost", 15702).url(),
            "http://localhost:15702/"
        );
    }

    #[test]
    fn release_drops_client() {
        let mut transport = HttpTransport::new("127.0.0.1", 1).with_timeout(Duration::from_secs(1));
        transport.connect().unwrap();
        assert!(transport.is_connected());
        transport.release();
        assert!(!transport.is_connected());
    }

    #[test]
    fn send_after_release_is_refused() {
        let mut transport = HttpTransport::new("127.0.0.1", 1);
        let err = transport.send(b"{}".to_vec()).unwrap_err();
        assert!(err.to_string().contains("not connected"));

        transport.connect().unwrap();
        transport.release();
        assert!(transport.send(b"{}".to_vec()).is_err());
    }
}
