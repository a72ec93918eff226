//! HTTP server configuration object.

use std::net::SocketAddr;

use wellness::inbound::http::state::HttpState;

/// Everything [`super::create_server`] needs besides the health flags.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) http_state: HttpState,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, http_state: HttpState) -> Self {
        Self {
            bind_addr,
            http_state,
        }
    }
}
