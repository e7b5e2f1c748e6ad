use std::sync::Arc;

use collabspace_events::EmailDelivery;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool is reference-counted internally and the rest
/// sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: collabspace_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// SMTP delivery, present only when `SMTP_HOST` is configured.
    pub mailer: Option<Arc<EmailDelivery>>,
}
