// src/services/identity.rs
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider answered and refused the request; the message is its own
    #[error("{0}")]
    Rejected(String),

    #[error("identity provider unavailable: {0}")]
    Unavailable(String),

    #[error("identity provider is not configured")]
    NotConfigured,
}

/// Email/password pair submitted for a single request
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// User and session objects exactly as the provider returned them
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub user: Value,
    /// `None` when the provider created the account but issued no session yet
    /// (e.g. email confirmation pending)
    pub session: Option<Value>,
}

impl AuthSession {
    pub fn access_token(&self) -> Option<&str> {
        self.session_str("access_token")
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.session_str("refresh_token")
    }

    fn session_str(&self, key: &str) -> Option<&str> {
        self.session.as_ref()?.get(key)?.as_str()
    }
}

/// Session-scoped authentication operations delegated to a hosted provider
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, ProviderError>;

    async fn sign_up(&self, credentials: &Credentials) -> Result<AuthSession, ProviderError>;

    /// End the session identified by `access_token`. Without a token there is
    /// nothing to revoke and the call succeeds.
    async fn sign_out(&self, access_token: Option<&str>) -> Result<(), ProviderError>;
}

/// Installed when no provider URL/key is configured; every call fails
#[derive(Debug, Default)]
pub struct UnconfiguredProvider;

#[async_trait]
impl IdentityProvider for UnconfiguredProvider {
    async fn sign_in(&self, _credentials: &Credentials) -> Result<AuthSession, ProviderError> {
        Err(ProviderError::NotConfigured)
    }

    async fn sign_up(&self, _credentials: &Credentials) -> Result<AuthSession, ProviderError> {
        Err(ProviderError::NotConfigured)
    }

    async fn sign_out(&self, _access_token: Option<&str>) -> Result<(), ProviderError> {
        Err(ProviderError::NotConfigured)
    }
}
