use std::time::Duration;

use bellwether_shared::geo::FeatureCollection;
use bellwether_shared::retry::{ApiRequest, ApiResponse, Method, RetryClient, Sleeper, Transport, UnauthorizedHandler};
use bellwether_shared::{
    ApiMessage, ChangePasswordRequest, FetchError, LoginRequest, LoginResponse, StatesDetailDocument,
    StatesSummary,
};

use crate::storage::{LocalCredentialStore, session_guard};

pub const BOUNDARIES_URL: &str = "/data/us-states.json";
pub const SUMMARY_URL: &str = "/data/states.json";
pub const DETAIL_URL: &str = "/api/states/statesDetail";
pub const UPDATE_DETAIL_URL: &str = "/api/states/updateDetail";
pub const LOGIN_URL: &str = "/api/auth/login";
pub const CHANGE_PASSWORD_URL: &str = "/api/auth/change-password";

/// Browser `fetch` via gloo-net.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

impl Transport for GlooTransport {
    fn send(&self, request: &ApiRequest) -> impl Future<Output = Result<ApiResponse, String>> {
        let request = request.clone();
        async move {
            let builder = match request.method {
                Method::Get => gloo_net::http::Request::get(&request.url),
                Method::Post => gloo_net::http::Request::post(&request.url),
            };
            let builder = request
                .headers
                .iter()
                .fold(builder, |builder, (name, value)| builder.header(name, value));

            let response = match request.body {
                Some(body) => builder
                    .body(body)
                    .map_err(|e| format!("request error: {e}"))?
                    .send()
                    .await,
                None => builder.send().await,
            }
            .map_err(|e| format!("fetch error: {e}"))?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| format!("read error: {e}"))?;
            Ok(ApiResponse { status, body })
        }
    }
}

/// Yields to the event loop for the retry delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimerSleeper;

impl Sleeper for TimerSleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        gloo_timers::future::sleep(duration)
    }
}

/// Full navigation to the login view once the credential has been purged.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedirectToLogin;

impl UnauthorizedHandler for RedirectToLogin {
    fn on_unauthorized(&self) {
        crate::app::redirect("/login");
    }
}

pub type ApiClient = RetryClient<GlooTransport, TimerSleeper, LocalCredentialStore, RedirectToLogin>;

pub fn api_client() -> ApiClient {
    RetryClient::new(GlooTransport, TimerSleeper, session_guard(), RedirectToLogin)
}

/// State boundaries. Public static asset, fetched once per map mount.
pub async fn fetch_features() -> Result<FeatureCollection, String> {
    let resp = gloo_net::http::Request::get(BOUNDARIES_URL)
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;

    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }

    resp.json::<FeatureCollection>()
        .await
        .map_err(|e| format!("parse error: {e}"))
}

pub async fn fetch_states_summary() -> Result<StatesSummary, FetchError> {
    api_client().get_json(SUMMARY_URL).await
}

pub async fn fetch_states_detail() -> Result<StatesDetailDocument, FetchError> {
    api_client().get_json(DETAIL_URL).await
}

/// Replace the whole detail document on the backend.
pub async fn save_states_detail(document: &StatesDetailDocument) -> Result<(), FetchError> {
    api_client().post_json(UPDATE_DETAIL_URL, document).await?;
    Ok(())
}

pub async fn change_password(new_password: &str) -> Result<ApiMessage, FetchError> {
    let request = ChangePasswordRequest {
        new_password: new_password.to_string(),
    };
    api_client()
        .post_json(CHANGE_PASSWORD_URL, &request)
        .await?
        .json()
}

/// Login goes around the retry client: a 401 here is a wrong password, shown
/// inline, not an expired session. The error is the text to display.
pub async fn login(password: &str) -> Result<LoginResponse, String> {
    let request = LoginRequest {
        password: password.to_string(),
    };
    let resp = gloo_net::http::Request::post(LOGIN_URL)
        .json(&request)
        .map_err(|e| format!("request error: {e}"))?
        .send()
        .await
        .map_err(|_| "Unable to reach the server. Please try again.".to_string())?;

    if !resp.ok() {
        let message = resp
            .json::<ApiMessage>()
            .await
            .map(|m| m.message)
            .unwrap_or_else(|_| "Login failed".to_string());
        return Err(message);
    }

    resp.json::<LoginResponse>()
        .await
        .map_err(|e| format!("parse error: {e}"))
}
