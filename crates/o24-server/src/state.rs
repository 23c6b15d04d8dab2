//! Application state.
//!
//! Shared state for all request handlers.

use o24_site::Site;

use crate::middleware::auth::AccessGate;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Static pages, document store and navigation settings.
    pub(crate) site: Site,
    /// Password gate (`None` when no password is configured).
    pub(crate) gate: Option<AccessGate>,
    /// Site title shown in the header.
    pub(crate) site_title: String,
    /// Site description for the meta tag.
    pub(crate) site_description: String,
    /// Log every page resolution.
    pub(crate) verbose: bool,
    /// Application version for cache invalidation.
    pub(crate) version: String,
}
