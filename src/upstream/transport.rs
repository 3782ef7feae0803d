//! Upstream Transport
//!
//! The raw request/response seam between the fetcher and the network.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use thiserror::Error;

/// Status and body of an upstream response, undecoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// What went wrong below the HTTP status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    Request,
    Body,
    /// The request could never succeed as built (bad URL, bad header)
    InvalidRequest,
}

/// A failed upstream call that produced no HTTP status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    kind: TransportErrorKind,
    message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    /// Whether another attempt could plausibly succeed.
    ///
    /// Only errors that prove the request itself is broken are permanent.
    pub fn is_transient(&self) -> bool {
        self.kind != TransportErrorKind::InvalidRequest
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_builder() {
            TransportErrorKind::InvalidRequest
        } else if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if err.is_connect() {
            TransportErrorKind::Connect
        } else if err.is_body() || err.is_decode() {
            TransportErrorKind::Body
        } else {
            TransportErrorKind::Request
        };
        Self::new(kind, format!("failed to call upstream: {}", err))
    }
}

// == Transport Trait ==
/// Performs one upstream lookup for `key`.
///
/// Implementations report any HTTP status as `Ok`; `Err` is reserved for
/// calls that never produced a status line.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, key: &str) -> Result<RawResponse, TransportError>;
}

// == HTTP Transport ==
/// `GET {base}/pokemon/{key}` over reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    /// Builds a transport whose every call is bounded by `timeout`, if any.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let base_url = Url::parse(base_url).map_err(|e| {
            TransportError::new(
                TransportErrorKind::InvalidRequest,
                format!("invalid upstream base url {:?}: {}", base_url, e),
            )
        })?;
        if base_url.cannot_be_a_base() {
            return Err(TransportError::new(
                TransportErrorKind::InvalidRequest,
                format!("upstream base url {} cannot carry a path", base_url),
            ));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self { client, base_url })
    }

    /// The resource URL for `key`; the key is percent-encoded as a single path segment.
    pub fn url_for(&self, key: &str) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                TransportError::new(
                    TransportErrorKind::InvalidRequest,
                    format!("upstream base url {} cannot carry a path", self.base_url),
                )
            })?
            .pop_if_empty()
            .push("pokemon")
            .push(key);
        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, key: &str) -> Result<RawResponse, TransportError> {
        let url = self.url_for(key)?;
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        Ok(RawResponse::new(status, body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(base: &str) -> HttpTransport {
        HttpTransport::new(base, Some(Duration::from_secs(5))).unwrap()
    }

    #[test]
    fn test_url_for_appends_resource_path() {
        let url = transport("https://pokeapi.co/api/v2").url_for("pikachu").unwrap();
        assert_eq!(url.as_str(), "https://pokeapi.co/api/v2/pokemon/pikachu");
    }

    #[test]
    fn test_url_for_tolerates_trailing_slash() {
        let url = transport("http://localhost:8080/").url_for("mew").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/pokemon/mew");
    }

    #[test]
    fn test_url_for_encodes_key_as_single_segment() {
        let url = transport("http://localhost:8080").url_for("mr mime/../x").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/pokemon/mr%20mime%2F..%2Fx");
    }

    #[test]
    fn test_new_rejects_invalid_base_url() {
        let err = HttpTransport::new("not a url", Some(Duration::from_secs(1))).unwrap_err();
        assert_eq!(err.kind(), TransportErrorKind::InvalidRequest);
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_request_without_timeout_reaches_upstream() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon/pikachu"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(3)
            .mount(&server)
            .await;

        for _ in 0..3 {
            let transport = HttpTransport::new(&server.uri(), None).unwrap();
            let raw = transport.request("pikachu").await.unwrap();
            assert_eq!(raw.status, 200);
            assert_eq!(raw.body, b"{}");
        }
    }

    #[test]
    fn test_transient_kinds() {
        for kind in [
            TransportErrorKind::Timeout,
            TransportErrorKind::Connect,
            TransportErrorKind::Request,
            TransportErrorKind::Body,
        ] {
            assert!(TransportError::new(kind, "x").is_transient(), "{:?}", kind);
        }
    }
}
