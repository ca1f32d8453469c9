use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    Router,
};
use log::{info, warn};
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::web::api::create_router;

/// Configuration for the web server
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub bind_address: IpAddr,
    pub enable_cors: bool,
    /// Largest accepted request body, in bytes
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3005,
            bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            enable_cors: true,
            max_body_bytes: 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Reads `PATH_ENGINE_PORT`, `PATH_ENGINE_BIND`, `PATH_ENGINE_CORS` and
    /// `PATH_ENGINE_MAX_BODY`, keeping the default for anything unset or invalid.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            port: parse_setting(&lookup, "PATH_ENGINE_PORT").unwrap_or(defaults.port),
            bind_address: parse_setting(&lookup, "PATH_ENGINE_BIND").unwrap_or(defaults.bind_address),
            enable_cors: parse_setting(&lookup, "PATH_ENGINE_CORS").unwrap_or(defaults.enable_cors),
            max_body_bytes: parse_setting(&lookup, "PATH_ENGINE_MAX_BODY").unwrap_or(defaults.max_body_bytes),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }
}

fn parse_setting<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("ignoring invalid value {:?} for {}", raw, key);
            None
        }
    }
}

/// Build the application with its middleware
pub fn build_app(config: &ServerConfig) -> Router {
    let mut app = create_router().layer(DefaultBodyLimit::max(config.max_body_bytes));

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]);

        app = app.layer(ServiceBuilder::new().layer(cors).into_inner());
    }

    app
}

/// Start the web server with the given configuration
pub async fn start_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_app(&config);

    let addr = config.socket_addr();
    info!("path engine web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
