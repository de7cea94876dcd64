use crate::config::Config;
use crate::session::handle::SessionHandle;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The one campaign session this service holds.
    pub session: SessionHandle,
    pub config: Config,
}
