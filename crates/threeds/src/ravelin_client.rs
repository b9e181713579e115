//! HTTP client for the Ravelin 3DS server API.

use std::fmt;
use std::time::{Duration, Instant};

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::constants::{
    AUTHENTICATE_ENDPOINT, RESULT_ENDPOINT, TEST_CARDS_ENDPOINT, VERSION_ENDPOINT,
};
use crate::error::ThreeDsError;
use crate::service::AuthenticationService;
use crate::wire::{
    AuthenticateRequest, AuthenticateResponseData, Envelope, ResultRequest, ResultResponseData,
    TestCard, VersionRequest, VersionResponseData,
};

pub const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

/// Default per-request deadline for calls to the 3DS server.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the remote 3DS server. Cheap to clone.
#[derive(Clone)]
pub struct RavelinClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl fmt::Debug for RavelinClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RavelinClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RavelinClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-request deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), endpoint)
    }

    async fn send<B, R>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<R, ThreeDsError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut request = self
            .http
            .request(method, self.url(endpoint))
            .header(AUTHORIZATION, format!("token {}", self.api_key))
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .timeout(self.timeout);

        if let Some(body) = body {
            let bytes = serde_json::to_vec(body).map_err(|e| {
                ThreeDsError::Upstream(format!("failed to serialize {endpoint} request: {e}"))
            })?;
            request = request.body(bytes);
        }

        let start = Instant::now();
        let resp = request
            .send()
            .await
            .map_err(|e| ThreeDsError::Upstream(format!("{endpoint} request failed: {e}")))?;
        let status = resp.status();

        if let Err(e) = check_status(endpoint, status) {
            if matches!(e, ThreeDsError::Upstream(_)) {
                match resp.text().await {
                    Ok(text) => tracing::warn!(
                        endpoint,
                        status = %status,
                        body = %text,
                        "3DS server returned an error status"
                    ),
                    Err(read_err) => tracing::warn!(
                        endpoint,
                        status = %status,
                        error = %read_err,
                        "3DS server returned an error status (body unreadable)"
                    ),
                }
            }
            return Err(e);
        }

        let envelope: Envelope<R> = resp.json().await.map_err(|e| {
            ThreeDsError::Upstream(format!("failed to decode {endpoint} response: {e}"))
        })?;

        tracing::debug!(
            endpoint,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "3DS server responded"
        );

        envelope
            .data
            .ok_or_else(|| ThreeDsError::Upstream(format!("no data in {endpoint} response")))
    }
}

/// Map the HTTP status of a 3DS server response onto the error taxonomy.
///
/// Only `200 OK` is success. A 404 is "card range not found" on the version
/// endpoint only; elsewhere it is an ordinary upstream failure.
pub fn check_status(endpoint: &str, status: StatusCode) -> Result<(), ThreeDsError> {
    match status {
        StatusCode::OK => Ok(()),
        StatusCode::NOT_FOUND if endpoint == VERSION_ENDPOINT => {
            Err(ThreeDsError::CardRangeNotFound)
        }
        StatusCode::UNAUTHORIZED => Err(ThreeDsError::Unauthorized),
        other => Err(ThreeDsError::Upstream(format!(
            "received bad status code {other} from {endpoint}"
        ))),
    }
}

impl AuthenticationService for RavelinClient {
    async fn version(&self, request: &VersionRequest) -> Result<VersionResponseData, ThreeDsError> {
        self.send(Method::POST, VERSION_ENDPOINT, Some(request))
            .await
    }

    async fn authenticate(
        &self,
        request: &AuthenticateRequest,
    ) -> Result<AuthenticateResponseData, ThreeDsError> {
        self.send(Method::POST, AUTHENTICATE_ENDPOINT, Some(request))
            .await
    }

    async fn result(&self, request: &ResultRequest) -> Result<ResultResponseData, ThreeDsError> {
        self.send(Method::POST, RESULT_ENDPOINT, Some(request))
            .await
    }

    async fn test_cards(&self) -> Result<Vec<TestCard>, ThreeDsError> {
        self.send::<(), _>(Method::GET, TEST_CARDS_ENDPOINT, None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_is_success() {
        assert!(check_status(VERSION_ENDPOINT, StatusCode::OK).is_ok());
        assert!(check_status(RESULT_ENDPOINT, StatusCode::OK).is_ok());
    }

    #[test]
    fn not_found_on_version_is_card_range_not_found() {
        assert!(matches!(
            check_status(VERSION_ENDPOINT, StatusCode::NOT_FOUND),
            Err(ThreeDsError::CardRangeNotFound)
        ));
    }

    #[test]
    fn not_found_elsewhere_is_upstream() {
        assert!(matches!(
            check_status(AUTHENTICATE_ENDPOINT, StatusCode::NOT_FOUND),
            Err(ThreeDsError::Upstream(_))
        ));
    }

    #[test]
    fn unauthorized_on_any_endpoint() {
        for endpoint in [
            VERSION_ENDPOINT,
            AUTHENTICATE_ENDPOINT,
            RESULT_ENDPOINT,
            TEST_CARDS_ENDPOINT,
        ] {
            assert!(matches!(
                check_status(endpoint, StatusCode::UNAUTHORIZED),
                Err(ThreeDsError::Unauthorized)
            ));
        }
    }

    #[test]
    fn other_statuses_are_upstream() {
        for status in [
            StatusCode::CREATED,
            StatusCode::BAD_REQUEST,
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::BAD_GATEWAY,
        ] {
            assert!(matches!(
                check_status(VERSION_ENDPOINT, status),
                Err(ThreeDsError::Upstream(_))
            ));
        }
    }

    #[test]
    fn url_joins_without_double_slash() {
        let client = RavelinClient::new("https://pci.example.com/", "key");
        assert_eq!(
            client.url(VERSION_ENDPOINT),
            "https://pci.example.com/3ds/version"
        );
    }

    #[test]
    fn debug_redacts_api_key() {
        let client = RavelinClient::new("https://pci.example.com", "super-secret");
        let debug = format!("{client:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn unreachable_server_is_upstream_error() {
        let client = RavelinClient::new("http://127.0.0.1:1", "key")
            .with_timeout(Duration::from_secs(2));
        let err = client.test_cards().await.unwrap_err();
        assert!(matches!(err, ThreeDsError::Upstream(_)));
    }

    /// Serve exactly one HTTP response on a local port and hand back the raw
    /// request. Returns the base URL and a receiver for the request text.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::sync::oneshot::Receiver<String>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            // Read headers, then as much body as content-length announces.
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request).to_lowercase();
                if let Some(end) = text.find("\r\n\r\n") {
                    let body_len = text[..end]
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= end + 4 + body_len {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            let _ = tx.send(String::from_utf8_lossy(&request).into_owned());
        });

        (format!("http://{addr}"), rx)
    }

    fn version_request() -> VersionRequest {
        VersionRequest {
            transaction_id: "merchant-tx-1".to_string(),
            pan: "4000000000001000".to_string(),
        }
    }

    #[tokio::test]
    async fn version_ok_decodes_envelope_and_sends_credentials() {
        let (url, request) = serve_once(
            "200 OK",
            r#"{"status":200,"timestamp":1650000000,"data":{"transactionId":"merchant-tx-1","threeDSServerTransID":"T1","threeDSMethodURL":"https://acs.example/method","versionRecommendation":"2.1.0"}}"#,
        )
        .await;
        let client = RavelinClient::new(url, "api-key-1");

        let data = client.version(&version_request()).await.unwrap();
        assert_eq!(data.three_ds_server_trans_id, "T1");
        assert_eq!(data.version_recommendation, "2.1.0");
        assert_eq!(data.method_url(), Some("https://acs.example/method"));

        let sent = request.await.unwrap();
        assert!(sent.starts_with("POST /3ds/version HTTP/1.1"));
        let lower = sent.to_lowercase();
        assert!(lower.contains("authorization: token api-key-1"));
        assert!(lower.contains("content-type: application/json;charset=utf-8"));
        assert!(sent.contains(r#""pan":"4000000000001000""#));
    }

    #[tokio::test]
    async fn version_not_found_is_card_range_not_found() {
        let (url, _request) = serve_once("404 Not Found", r#"{"status":404}"#).await;
        let client = RavelinClient::new(url, "key");
        let err = client.version(&version_request()).await.unwrap_err();
        assert!(matches!(err, ThreeDsError::CardRangeNotFound));
    }

    #[tokio::test]
    async fn unauthorized_status_is_unauthorized() {
        let (url, _request) = serve_once("401 Unauthorized", r#"{"status":401}"#).await;
        let client = RavelinClient::new(url, "bad-key");
        let err = client.version(&version_request()).await.unwrap_err();
        assert!(matches!(err, ThreeDsError::Unauthorized));
    }

    #[tokio::test]
    async fn server_error_is_upstream() {
        let (url, _request) =
            serve_once("500 Internal Server Error", r#"{"message":"boom"}"#).await;
        let client = RavelinClient::new(url, "key");
        let err = client
            .result(&ResultRequest {
                three_ds_server_trans_id: "T1".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ThreeDsError::Upstream(_)));
    }

    #[tokio::test]
    async fn envelope_without_data_is_upstream() {
        let (url, _request) = serve_once("200 OK", r#"{"status":200}"#).await;
        let client = RavelinClient::new(url, "key");
        let err = client.version(&version_request()).await.unwrap_err();
        assert!(matches!(err, ThreeDsError::Upstream(ref msg) if msg.contains("no data")));
    }

    #[tokio::test]
    async fn malformed_body_is_upstream() {
        let (url, _request) = serve_once("200 OK", "<html>not json</html>").await;
        let client = RavelinClient::new(url, "key");
        let err = client.version(&version_request()).await.unwrap_err();
        assert!(matches!(err, ThreeDsError::Upstream(ref msg) if msg.contains("failed to decode")));
    }

    #[tokio::test]
    async fn test_cards_decodes_array_data() {
        let (url, request) = serve_once(
            "200 OK",
            r#"{"status":200,"data":[{"testPan":"4000000000001000","description":"frictionless"},{"testPan":"4000000000001091"}]}"#,
        )
        .await;
        let client = RavelinClient::new(url, "key");

        let cards = client.test_cards().await.unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].test_pan, "4000000000001000");
        assert_eq!(cards[0].description, "frictionless");
        assert_eq!(cards[1].description, "");

        assert!(request.await.unwrap().starts_with("GET /3ds/testcards HTTP/1.1"));
    }
}
