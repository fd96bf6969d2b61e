use axum::Json;
use axum::extract::State;
use bellwether_shared::{ApiMessage, ChangePasswordRequest, LoginRequest, LoginResponse};
use chrono::{SecondsFormat, Utc};
use tracing::{info, warn};

use crate::auth::{Authenticated, credential_for};
use crate::config::MIN_PASSWORD_LEN;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if request.password.is_empty() || !state.auth.verify_password(&request.password).await {
        warn!("rejected login attempt");
        return Err(ApiError::Unauthorized("Invalid password"));
    }

    let (token, expires_at) = state.auth.issue_token(Utc::now());
    info!(%expires_at, active_sessions = state.auth.active_tokens(), "session issued");
    Ok(Json(LoginResponse {
        token,
        expires_at: Some(expires_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
    }))
}

pub async fn change_password(
    _session: Authenticated,
    State(state): State<AppState>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<ApiMessage>, ApiError> {
    let password = request.new_password.trim();
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let credential = credential_for(password, Utc::now());
    state
        .auth
        .rotate_credential(credential, &state.store)
        .await?;
    info!("admin password changed");

    Ok(Json(ApiMessage {
        message: "Password changed".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use bellwether_shared::{ApiMessage, LoginResponse};

    use crate::routes::api::tests::{TEST_PASSWORD, login, spawn_test_server, test_state};

    #[tokio::test]
    async fn login_rejects_wrong_and_empty_passwords() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (addr, server_handle) = spawn_test_server(test_state(&dir).await).await;
        let base_url = format!("http://{addr}");
        let client = reqwest::Client::new();

        for password in ["wrong", ""] {
            let response = login(&client, &base_url, password).await;
            assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);
            let body = response.json::<ApiMessage>().await.expect("message body");
            assert_eq!(body.message, "Invalid password");
        }

        let session = login(&client, &base_url, TEST_PASSWORD)
            .await
            .error_for_status()
            .expect("login status")
            .json::<LoginResponse>()
            .await
            .expect("login body");
        assert!(!session.token.is_empty());
        assert!(session.expires_at.is_some_and(|at| at.ends_with('Z')));

        server_handle.abort();
        let _ = server_handle.await;
    }

    #[tokio::test]
    async fn change_password_rotates_the_credential() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (addr, server_handle) = spawn_test_server(test_state(&dir).await).await;
        let base_url = format!("http://{addr}");
        let client = reqwest::Client::new();
        let change_url = format!("{base_url}/api/auth/change-password");

        let anonymous = client
            .post(&change_url)
            .json(&serde_json::json!({ "newPassword": "hunter22" }))
            .send()
            .await
            .expect("anonymous change");
        assert_eq!(anonymous.status(), reqwest::StatusCode::UNAUTHORIZED);

        let token = login(&client, &base_url, TEST_PASSWORD)
            .await
            .json::<LoginResponse>()
            .await
            .expect("login body")
            .token;

        let too_short = client
            .post(&change_url)
            .bearer_auth(&token)
            .json(&serde_json::json!({ "newPassword": "  ab  " }))
            .send()
            .await
            .expect("short change");
        assert_eq!(too_short.status(), reqwest::StatusCode::BAD_REQUEST);

        client
            .post(&change_url)
            .bearer_auth(&token)
            .json(&serde_json::json!({ "newPassword": "hunter22" }))
            .send()
            .await
            .expect("change request")
            .error_for_status()
            .expect("change status");

        assert_eq!(
            login(&client, &base_url, TEST_PASSWORD).await.status(),
            reqwest::StatusCode::UNAUTHORIZED
        );
        assert!(login(&client, &base_url, "hunter22").await.status().is_success());

        // The session that changed the password is still usable.
        let detail = client
            .post(format!("{base_url}/api/states/updateDetail"))
            .bearer_auth(&token)
            .json(&serde_json::json!({ "lastUpdated": "", "states": {} }))
            .send()
            .await
            .expect("update request");
        assert!(detail.status().is_success());

        server_handle.abort();
        let _ = server_handle.await;

        let reloaded = test_state(&dir).await;
        assert!(reloaded.auth.verify_password("hunter22").await);
    }
}
