//! HTTP server configuration object.

use std::net::SocketAddr;

use landmark_api::inbound::http::state::HttpState;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) http_state: HttpState,
}

impl ServerConfig {
    /// Construct a server configuration from the bind address and the wired
    /// handler state.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, http_state: HttpState) -> Self {
        Self {
            bind_addr,
            http_state,
        }
    }
}
