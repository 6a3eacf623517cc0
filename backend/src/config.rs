use tracing::warn;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:8080";

/// Image proxy server settings.
///
/// | Env Var        | Default                 |
/// |----------------|-------------------------|
/// | `PROXY_HOST`   | `127.0.0.1`             |
/// | `PROXY_PORT`   | `3001`                  |
/// | `CORS_ORIGINS` | `http://localhost:8080` |
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    /// Parsed from a comma separated list
    pub cors_origins: Vec<String>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors_origins: vec![DEFAULT_CORS_ORIGINS.to_string()],
        }
    }
}

impl ProxyConfig {
    /// Call after `dotenvy::dotenv()` so a `.env` file is honoured
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Unusable values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("PROXY_HOST")
            .map(|host| host.trim().to_string())
            .filter(|host| !host.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("PROXY_PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!("PROXY_PORT '{}' is not a valid port, using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let mut cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();
        if cors_origins.is_empty() {
            warn!("CORS_ORIGINS is empty, using {}", DEFAULT_CORS_ORIGINS);
            cors_origins.push(DEFAULT_CORS_ORIGINS.to_string());
        }

        Self {
            host,
            port,
            cors_origins,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
