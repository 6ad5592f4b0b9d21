// src/services/supabase.rs
//! Supabase GoTrue client
//!
//! Talks to the hosted auth REST API directly:
//! - `POST /auth/v1/token?grant_type=password` (sign in)
//! - `POST /auth/v1/signup` (sign up)
//! - `POST /auth/v1/logout` (sign out, bearer access token)

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use super::identity::{AuthSession, Credentials, IdentityProvider, ProviderError};
use crate::common::safe_email_log;

pub struct SupabaseAuthClient {
    http: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseAuthClient {
    pub fn new(http: Client, base_url: &Url, anon_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    /// POST to the auth API, returning the status and the parsed body
    /// (`Value::Null` when the body is empty or not JSON)
    async fn post(
        &self,
        path: &str,
        bearer: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value), ProviderError> {
        let url = self.endpoint(path);
        let mut request = self.http.post(&url).header("apikey", &self.anon_key);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| {
            error!(error = %e, endpoint = %url, "HTTP error contacting identity provider");
            ProviderError::Unavailable(e.to_string())
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            error!(error = %e, endpoint = %url, "Failed to read identity provider response");
            ProviderError::Unavailable(e.to_string())
        })?;
        let parsed = serde_json::from_str(&text).unwrap_or(Value::Null);

        debug!(http_status = %status, endpoint = %url, "Received identity provider response");
        Ok((status, parsed))
    }

    async fn password_grant(
        &self,
        path: &str,
        credentials: &Credentials,
    ) -> Result<Value, ProviderError> {
        let body = json!({
            "email": credentials.email,
            "password": credentials.password,
        });
        let (status, body) = self.post(path, None, Some(body)).await?;

        if !status.is_success() {
            let message = error_message(status, &body);
            warn!(
                http_status = %status,
                email = %safe_email_log(&credentials.email),
                reason = %message,
                "Identity provider rejected credentials"
            );
            return Err(ProviderError::Rejected(message));
        }

        if !body.is_object() {
            error!(http_status = %status, "Identity provider returned a non-object body");
            return Err(ProviderError::Unavailable(
                "malformed identity provider response".to_string(),
            ));
        }

        Ok(body)
    }
}

#[async_trait]
impl IdentityProvider for SupabaseAuthClient {
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, ProviderError> {
        let body = self
            .password_grant("token?grant_type=password", credentials)
            .await?;

        if body.get("access_token").is_none() {
            error!("Identity provider token response carried no access_token");
            return Err(ProviderError::Unavailable(
                "token response without access_token".to_string(),
            ));
        }

        Ok(session_from_token_response(body))
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<AuthSession, ProviderError> {
        let body = self.password_grant("signup", credentials).await?;

        // With auto-confirm the provider answers with a full token response;
        // otherwise it returns the bare user and no session.
        if body.get("access_token").is_some() {
            Ok(session_from_token_response(body))
        } else {
            Ok(AuthSession {
                user: body,
                session: None,
            })
        }
    }

    async fn sign_out(&self, access_token: Option<&str>) -> Result<(), ProviderError> {
        let Some(token) = access_token else {
            debug!("Sign-out without an access token; nothing to revoke");
            return Ok(());
        };

        let (status, body) = self.post("logout", Some(token), None).await?;

        match status {
            s if s.is_success() => Ok(()),
            // The session is already gone on the provider side
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                debug!(http_status = %status, "Session already invalid at identity provider");
                Ok(())
            }
            _ => {
                let message = error_message(status, &body);
                warn!(http_status = %status, reason = %message, "Identity provider rejected sign-out");
                Err(ProviderError::Rejected(message))
            }
        }
    }
}

fn session_from_token_response(body: Value) -> AuthSession {
    let user = body.get("user").cloned().unwrap_or(Value::Null);
    AuthSession {
        user,
        session: Some(body),
    }
}

/// Pick the human-readable message out of a GoTrue error body
fn error_message(status: StatusCode, body: &Value) -> String {
    ["msg", "message", "error_description", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .filter(|msg| !msg.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Query,
        http::{HeaderMap, StatusCode as AxumStatus},
        routing::post,
        Json, Router,
    };
    use std::collections::HashMap;
    use tokio::net::TcpListener;

    const ANON_KEY: &str = "anon-test-key";

    fn require_apikey(headers: &HeaderMap) -> Result<(), (AxumStatus, Json<Value>)> {
        match headers.get("apikey").and_then(|v| v.to_str().ok()) {
            Some(ANON_KEY) => Ok(()),
            _ => Err((
                AxumStatus::UNAUTHORIZED,
                Json(json!({"message": "No API key found in request"})),
            )),
        }
    }

    async fn token(
        headers: HeaderMap,
        Query(params): Query<HashMap<String, String>>,
        Json(body): Json<Value>,
    ) -> Result<Json<Value>, (AxumStatus, Json<Value>)> {
        require_apikey(&headers)?;
        assert_eq!(params.get("grant_type").map(String::as_str), Some("password"));
        if body["password"] == "correct-horse" {
            Ok(Json(json!({
                "access_token": "access-123",
                "refresh_token": "refresh-456",
                "token_type": "bearer",
                "expires_in": 3600,
                "user": {"id": "user-1", "email": body["email"]}
            })))
        } else {
            Err((
                AxumStatus::BAD_REQUEST,
                Json(json!({
                    "error": "invalid_grant",
                    "error_description": "Invalid login credentials"
                })),
            ))
        }
    }

    async fn signup(
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Result<Json<Value>, (AxumStatus, Json<Value>)> {
        require_apikey(&headers)?;
        if body["email"] == "taken@example.com" {
            return Err((
                AxumStatus::UNPROCESSABLE_ENTITY,
                Json(json!({"code": 422, "msg": "User already registered"})),
            ));
        }
        Ok(Json(json!({"id": "user-2", "email": body["email"], "confirmation_sent_at": "now"})))
    }

    async fn logout(headers: HeaderMap) -> AxumStatus {
        match headers.get("authorization").and_then(|v| v.to_str().ok()) {
            Some("Bearer live-token") => AxumStatus::NO_CONTENT,
            Some("Bearer broken-token") => AxumStatus::INTERNAL_SERVER_ERROR,
            _ => AxumStatus::UNAUTHORIZED,
        }
    }

    async fn spawn_gotrue() -> Url {
        let app = Router::new()
            .route("/auth/v1/token", post(token))
            .route("/auth/v1/signup", post(signup))
            .route("/auth/v1/logout", post(logout));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Url::parse(&format!("http://{}/", addr)).unwrap()
    }

    fn creds(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    async fn client() -> SupabaseAuthClient {
        SupabaseAuthClient::new(Client::new(), &spawn_gotrue().await, ANON_KEY)
    }

    #[tokio::test]
    async fn test_sign_in_returns_user_and_whole_token_response() {
        let client = client().await;
        let session = client
            .sign_in(&creds("a@example.com", "correct-horse"))
            .await
            .unwrap();

        assert_eq!(session.user["id"], "user-1");
        assert_eq!(session.access_token(), Some("access-123"));
        assert_eq!(session.refresh_token(), Some("refresh-456"));
    }

    #[tokio::test]
    async fn test_sign_in_rejection_forwards_error_description() {
        let client = client().await;
        let err = client
            .sign_in(&creds("a@example.com", "wrong"))
            .await
            .unwrap_err();

        match err {
            ProviderError::Rejected(msg) => assert_eq!(msg, "Invalid login credentials"),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_sign_up_without_confirmation_has_no_session() {
        let client = client().await;
        let session = client
            .sign_up(&creds("new@example.com", "pw"))
            .await
            .unwrap();

        assert_eq!(session.user["id"], "user-2");
        assert!(session.session.is_none());
    }

    #[tokio::test]
    async fn test_sign_up_rejection_prefers_msg_field() {
        let client = client().await;
        let err = client
            .sign_up(&creds("taken@example.com", "pw"))
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::Rejected(msg) if msg == "User already registered"));
    }

    #[tokio::test]
    async fn test_sign_out_treats_missing_and_expired_sessions_as_success() {
        let client = client().await;
        assert!(client.sign_out(None).await.is_ok());
        assert!(client.sign_out(Some("live-token")).await.is_ok());
        assert!(client.sign_out(Some("expired-token")).await.is_ok());
    }

    #[tokio::test]
    async fn test_sign_out_server_failure_is_rejected_with_status_message() {
        let client = client().await;
        let err = client.sign_out(Some("broken-token")).await.unwrap_err();
        assert!(
            matches!(err, ProviderError::Rejected(msg) if msg == "Request failed with status 500")
        );
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_unavailable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let base = Url::parse(&format!("http://{}", addr)).unwrap();
        let client = SupabaseAuthClient::new(Client::new(), &base, ANON_KEY);
        let err = client
            .sign_in(&creds("a@example.com", "correct-horse"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable(_)));
    }

    #[test]
    fn test_error_message_falls_back_to_status() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, &Value::Null),
            "Request failed with status 502"
        );
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, &json!({"message": "m", "error": "e"})),
            "m"
        );
    }
}
