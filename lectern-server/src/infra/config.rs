use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use anyhow::{Context, Result};

/// Server configuration, resolved once at startup from the environment
/// (after `dotenvy` has loaded any `.env` file).
#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub database_url: String,
    /// HMAC secret for access-token verification.
    pub jwt_secret: String,
    /// Base URL the playback resolver signs storage ids under.
    pub media_base_url: String,
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let host = env::var("SERVER_HOST")
            .ok()
            .map(|s| s.parse::<IpAddr>())
            .transpose()
            .context("SERVER_HOST is not a valid IP address")?
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

        let port = env::var("SERVER_PORT")
            .ok()
            .map(|s| s.parse::<u16>())
            .transpose()
            .context("SERVER_PORT is not a valid port")?
            .unwrap_or(3500);

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;

        let media_base_url = env::var("MEDIA_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3500/media".to_string());

        Ok(Self {
            host,
            port,
            database_url,
            jwt_secret,
            media_base_url,
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN").ok(),
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
