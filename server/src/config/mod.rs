use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::apply_security_headers;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/linkedevents";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3001";
const DEFAULT_PUBLIC_URL: &str = "http://localhost:3001";
const DEFAULT_SYSTEM_DATA_SOURCE: &str = "system";
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub listen_addr: SocketAddr,
    /// Scheme and authority prepended to every `@id` the API renders.
    pub public_url: String,
    /// Data source that user (non API key) submissions are attributed to.
    pub system_data_source_id: String,
    pub allowed_origins: Vec<String>,
    pub production: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let public_url = lookup("PUBLIC_URL")
            .unwrap_or_else(|| DEFAULT_PUBLIC_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Self {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            database_max_connections: parse_or(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            ),
            listen_addr: parse_or(&lookup, "LISTEN_ADDR", default_listen_addr()),
            public_url,
            system_data_source_id: lookup("SYSTEM_DATA_SOURCE_ID")
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SYSTEM_DATA_SOURCE.to_string()),
            allowed_origins,
            production: lookup("RUST_ENV")
                .map(|v| v.to_lowercase() == "production")
                .unwrap_or(false),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3001))
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Config: unparseable value, using default");
            default
        }),
        None => default,
    }
}
