/**
 * Application State
 *
 * Shared state handed to every handler. Handlers extract only the part they
 * need through the `FromRef` impls below, e.g. `State<ConnectionHub>`.
 *
 * Everything here is cheap to clone: the config is behind an `Arc`, and the
 * authenticator and hub are handles onto shared interiors.
 */

use std::sync::Arc;

use axum::extract::FromRef;

use crate::backend::auth::authenticator::SessionAuthenticator;
use crate::backend::auth::sessions::TokenKeys;
use crate::backend::auth::users::UserStore;
use crate::backend::realtime::hub::ConnectionHub;
use crate::shared::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,

    pub authenticator: SessionAuthenticator,

    pub hub: ConnectionHub,
}

impl AppState {
    /// Assemble state from configuration and a user store
    pub fn new(config: AppConfig, users: Arc<dyn UserStore>) -> Self {
        let keys = TokenKeys::from_config(&config);
        Self {
            config: Arc::new(config),
            authenticator: SessionAuthenticator::new(keys, users),
            hub: ConnectionHub::new(),
        }
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}

impl FromRef<AppState> for SessionAuthenticator {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.authenticator.clone()
    }
}

impl FromRef<AppState> for ConnectionHub {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.hub.clone()
    }
}
