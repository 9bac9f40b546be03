use std::net::SocketAddr;

use url::Url;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    /// Origin customers see; payment-link URLs are built from it.
    pub public_base_url: Url,
}
