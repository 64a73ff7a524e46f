use std::env;

pub const DEFAULT_GEMINI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-image:generateContent";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub endpoint: String,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub gemini: GeminiConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8000,
            workers: None,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        let host = env::var("HOST").ok().unwrap_or(defaults.host);
        let port = env::var("PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(defaults.port);
        let workers = env::var("WORKERS")
            .ok()
            .and_then(|workers| workers.parse().ok())
            .filter(|workers: &usize| *workers > 0);

        ServerConfig {
            host,
            port,
            workers,
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let endpoint = env::var("GEMINI_ENDPOINT")
            .ok()
            .filter(|endpoint| !endpoint.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GEMINI_ENDPOINT.to_string());

        GeminiConfig { endpoint }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Config {
            server: ServerConfig::from_env(),
            gemini: GeminiConfig::from_env(),
        }
    }

    pub fn with_server(mut self, config: ServerConfig) -> Self {
        self.server = config;
        self
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.workers, None);
        assert_eq!(config.gemini.endpoint, DEFAULT_GEMINI_ENDPOINT);
    }

    #[test]
    fn test_builders() {
        let config = Config::new()
            .with_server(ServerConfig::new().with_host("127.0.0.1").with_port(9090).with_workers(2))
            .with_gemini(GeminiConfig::new().with_endpoint("http://localhost:1234/generate"));

        assert_eq!(config.server.bind_address(), ("127.0.0.1".to_string(), 9090));
        assert_eq!(config.server.workers, Some(2));
        assert_eq!(config.gemini.endpoint, "http://localhost:1234/generate");
    }
}
