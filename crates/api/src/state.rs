use std::sync::Arc;

use payhere_db::health::StoreHealth;
use payhere_db::repositories::{AuthTokenStore, ProductStore, UserStore};

use crate::config::ServerConfig;
use crate::services::{ProductService, SessionService};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (everything is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (CORS, timeout, JWT).
    pub config: Arc<ServerConfig>,
    /// Signup, login, logout and the authentication guard.
    pub sessions: Arc<SessionService>,
    /// Owner-scoped product operations.
    pub products: Arc<ProductService>,
    /// Reachability of the backing store, reported by `/health`.
    pub store_health: Arc<dyn StoreHealth>,
}

impl AppState {
    /// Wire the services to their stores.
    pub fn new(
        config: ServerConfig,
        users: Arc<dyn UserStore>,
        auth_tokens: Arc<dyn AuthTokenStore>,
        products: Arc<dyn ProductStore>,
        store_health: Arc<dyn StoreHealth>,
    ) -> Self {
        let sessions = SessionService::new(users, auth_tokens, config.jwt.clone());
        Self {
            config: Arc::new(config),
            sessions: Arc::new(sessions),
            products: Arc::new(ProductService::new(products)),
            store_health,
        }
    }
}
