// Application state shared across all modules

use std::sync::Arc;

use super::config::Config;
use crate::services::IdentityProvider;
use crate::users::UserStore;

/// Immutable state built once at startup and handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub identity: Arc<dyn IdentityProvider>,
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    pub fn new(
        config: Config,
        identity: Arc<dyn IdentityProvider>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            identity,
            users,
        }
    }
}
