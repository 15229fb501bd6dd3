//! Application state shared across handlers.

use orders::Services;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// User, order item and order history services.
    pub services: Services,
}

impl AppState {
    /// Create new application state.
    pub fn new(services: Services) -> Self {
        Self { services }
    }
}
