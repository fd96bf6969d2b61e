//! Bounded-retry HTTP client with bearer injection and 401 short-circuit.
//!
//! The HTTP stack and the timer are abstracted behind [`Transport`] and
//! [`Sleeper`] so the same loop runs over `gloo-net` in the browser and over
//! in-memory fakes in tests.

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::FetchError;
use crate::session::{CredentialStore, SessionGuard};

pub const MAX_ATTEMPTS: u32 = 3;
pub const RETRY_DELAY: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            delay: RETRY_DELAY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post_json<B: Serialize + ?Sized>(
        url: impl Into<String>,
        body: &B,
    ) -> Result<Self, FetchError> {
        let body = serde_json::to_string(body).map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(Self {
            method: Method::Post,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body),
        })
    }

    /// Set a header, replacing any existing value with the same
    /// (case-insensitive) name.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.into()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_str(&self.body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

/// One HTTP exchange. `Err` means a transport-level failure (no response).
pub trait Transport {
    fn send(&self, request: &ApiRequest) -> impl Future<Output = Result<ApiResponse, String>>;
}

/// Non-blocking timed delay.
pub trait Sleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}

/// Invoked after a 401 has purged the credential; navigates to the login view.
pub trait UnauthorizedHandler {
    fn on_unauthorized(&self);
}

pub struct RetryClient<T, Sl, St, U> {
    transport: T,
    sleeper: Sl,
    session: SessionGuard<St>,
    unauthorized: U,
    policy: RetryPolicy,
}

impl<T, Sl, St, U> RetryClient<T, Sl, St, U>
where
    T: Transport,
    Sl: Sleeper,
    St: CredentialStore,
    U: UnauthorizedHandler,
{
    pub fn new(transport: T, sleeper: Sl, session: SessionGuard<St>, unauthorized: U) -> Self {
        Self {
            transport,
            sleeper,
            session,
            unauthorized,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn sleeper(&self) -> &Sl {
        &self.sleeper
    }

    pub fn session(&self) -> &SessionGuard<St> {
        &self.session
    }

    pub fn unauthorized_handler(&self) -> &U {
        &self.unauthorized
    }

    /// Send `request`, retrying non-success statuses and transport failures up
    /// to the policy's attempt count with a fixed delay in between.
    ///
    /// A 401 is never retried: the credential is purged, the unauthorized
    /// handler runs, and [`FetchError::Unauthorized`] is returned. A transport
    /// failure on the final attempt is returned as [`FetchError::Network`].
    pub async fn request(&self, request: ApiRequest) -> Result<ApiResponse, FetchError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_status = 0;

        for attempt in 1..=max_attempts {
            // The credential is re-read on every attempt.
            let prepared = self.prepare(&request);

            match self.transport.send(&prepared).await {
                Ok(response) if response.status == 401 => {
                    self.session.logout();
                    self.unauthorized.on_unauthorized();
                    return Err(FetchError::Unauthorized);
                }
                Ok(response) if response.is_success() => return Ok(response),
                Ok(response) => last_status = response.status,
                Err(e) if attempt == max_attempts => return Err(FetchError::Network(e)),
                Err(_) => {}
            }

            if attempt < max_attempts {
                self.sleeper.sleep(self.policy.delay).await;
            }
        }

        Err(FetchError::ServerUnavailable {
            attempts: max_attempts,
            last_status,
        })
    }

    pub async fn get_json<R: DeserializeOwned>(&self, url: &str) -> Result<R, FetchError> {
        self.request(ApiRequest::get(url)).await?.json()
    }

    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<ApiResponse, FetchError> {
        self.request(ApiRequest::post_json(url, body)?).await
    }

    fn prepare(&self, request: &ApiRequest) -> ApiRequest {
        let mut prepared = request
            .clone()
            .with_header("Content-Type", "application/json");
        if let Some(token) = self.session.bearer() {
            prepared = prepared.with_header("Authorization", format!("Bearer {token}"));
        }
        prepared
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    use chrono::Utc;
    use futures::executor::block_on;

    use super::*;
    use crate::session::{EXPIRY_KEY, MemoryCredentialStore, TOKEN_KEY};

    #[derive(Default)]
    struct ScriptedTransport {
        replies: RefCell<VecDeque<Result<ApiResponse, String>>>,
        sent: RefCell<Vec<ApiRequest>>,
    }

    impl ScriptedTransport {
        fn new(replies: Vec<Result<u16, &str>>) -> Self {
            let replies = replies
                .into_iter()
                .map(|reply| {
                    reply
                        .map(|status| ApiResponse {
                            status,
                            body: r#"{"ok":true}"#.into(),
                        })
                        .map_err(String::from)
                })
                .collect();
            Self {
                replies: RefCell::new(replies),
                sent: RefCell::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.sent.borrow().len()
        }
    }

    impl Transport for ScriptedTransport {
        fn send(&self, request: &ApiRequest) -> impl Future<Output = Result<ApiResponse, String>> {
            self.sent.borrow_mut().push(request.clone());
            let reply = self
                .replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err("script exhausted".into()));
            std::future::ready(reply)
        }
    }

    #[derive(Default)]
    struct RecordingSleeper {
        delays: RefCell<Vec<Duration>>,
    }

    impl Sleeper for RecordingSleeper {
        fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
            self.delays.borrow_mut().push(duration);
            std::future::ready(())
        }
    }

    #[derive(Default)]
    struct CountingRedirect {
        calls: Cell<u32>,
    }

    impl UnauthorizedHandler for CountingRedirect {
        fn on_unauthorized(&self) {
            self.calls.set(self.calls.get() + 1);
        }
    }

    type TestClient =
        RetryClient<ScriptedTransport, RecordingSleeper, MemoryCredentialStore, CountingRedirect>;

    fn client_with(replies: Vec<Result<u16, &str>>) -> TestClient {
        let session = SessionGuard::new(MemoryCredentialStore::new());
        session
            .login_success("secret-token", Utc::now())
            .expect("store token");
        RetryClient::new(
            ScriptedTransport::new(replies),
            RecordingSleeper::default(),
            session,
            CountingRedirect::default(),
        )
    }

    #[test]
    fn succeeds_after_two_server_errors_with_two_delays() {
        let client = client_with(vec![Ok(500), Ok(500), Ok(200)]);
        let response = block_on(client.request(ApiRequest::get("/api/states/statesDetail")))
            .expect("third attempt succeeds");

        assert_eq!(response.status, 200);
        assert_eq!(client.transport().calls(), 3);
        assert_eq!(
            *client.sleeper().delays.borrow(),
            vec![Duration::from_millis(2000); 2]
        );
    }

    #[test]
    fn unauthorized_short_circuits_and_purges() {
        let client = client_with(vec![Ok(401), Ok(200)]);
        let result = block_on(client.request(ApiRequest::get("/api/states/statesDetail")));

        assert_eq!(result, Err(FetchError::Unauthorized));
        assert_eq!(client.transport().calls(), 1);
        assert!(client.sleeper().delays.borrow().is_empty());
        assert_eq!(client.unauthorized_handler().calls.get(), 1);
        assert_eq!(client.session().store().get(TOKEN_KEY), None);
        assert_eq!(client.session().store().get(EXPIRY_KEY), None);
    }

    #[test]
    fn exhausting_attempts_reports_server_unavailable() {
        let client = client_with(vec![Ok(503), Ok(502), Ok(500)]);
        let result = block_on(client.request(ApiRequest::get("/x")));

        assert_eq!(
            result,
            Err(FetchError::ServerUnavailable {
                attempts: 3,
                last_status: 500
            })
        );
        assert_eq!(client.sleeper().delays.borrow().len(), 2);
    }

    #[test]
    fn transport_failure_on_final_attempt_is_rethrown() {
        let client = client_with(vec![Err("offline"), Ok(500), Err("connection reset")]);
        let result = block_on(client.request(ApiRequest::get("/x")));

        assert_eq!(result, Err(FetchError::Network("connection reset".into())));
        assert_eq!(client.transport().calls(), 3);
    }

    #[test]
    fn transport_failure_then_success_recovers() {
        let client = client_with(vec![Err("offline"), Ok(204)]);
        let result = block_on(client.request(ApiRequest::get("/x")));

        assert_eq!(result.map(|r| r.status), Ok(204));
        assert_eq!(client.sleeper().delays.borrow().len(), 1);
    }

    #[test]
    fn every_attempt_carries_bearer_and_json_headers() {
        let client = client_with(vec![Ok(500), Ok(200)]);
        let request = ApiRequest::post_json("/api/auth/change-password", &serde_json::json!({
            "newPassword": "hunter2"
        }))
        .expect("serialize body")
        .with_header("content-type", "text/plain");
        block_on(client.request(request)).expect("second attempt succeeds");

        for sent in client.transport().sent.borrow().iter() {
            assert_eq!(sent.header("Authorization"), Some("Bearer secret-token"));
            assert_eq!(sent.header("Content-Type"), Some("application/json"));
            assert_eq!(
                sent.headers
                    .iter()
                    .filter(|(n, _)| n.eq_ignore_ascii_case("content-type"))
                    .count(),
                1
            );
            assert_eq!(sent.body.as_deref(), Some(r#"{"newPassword":"hunter2"}"#));
        }
    }

    #[test]
    fn no_authorization_header_without_session() {
        let client = RetryClient::new(
            ScriptedTransport::new(vec![Ok(200)]),
            RecordingSleeper::default(),
            SessionGuard::new(MemoryCredentialStore::new()),
            CountingRedirect::default(),
        );
        block_on(client.request(ApiRequest::get("/data/states.json"))).expect("success");
        let sent = client.transport().sent.borrow();
        assert_eq!(sent[0].header("Authorization"), None);
    }

    #[test]
    fn custom_policy_is_honoured() {
        let client = client_with(vec![Ok(500), Ok(500)]).with_policy(RetryPolicy {
            max_attempts: 2,
            delay: Duration::from_millis(10),
        });
        let result = block_on(client.request(ApiRequest::get("/x")));
        assert!(matches!(result, Err(FetchError::ServerUnavailable { attempts: 2, .. })));
        assert_eq!(
            *client.sleeper().delays.borrow(),
            vec![Duration::from_millis(10)]
        );
    }

    #[test]
    fn get_json_decodes_and_reports_bad_payloads() {
        let client = client_with(vec![Ok(200)]);
        let value: serde_json::Value = block_on(client.get_json("/x")).expect("decode");
        assert_eq!(value["ok"], true);

        let client = client_with(vec![Ok(200)]);
        let result: Result<Vec<u32>, _> = block_on(client.get_json("/x"));
        assert!(matches!(result, Err(FetchError::Decode(_))));
    }
}
