use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub mentions_path: PathBuf,
    /// Base URL of the text-generation service. `None` disables generation
    /// and every narrative falls back to its deterministic template.
    pub generator_url: Option<String>,
    pub generator_api_key: Option<String>,
    pub generator_model: String,
    pub generator_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("mentions_path", &self.mentions_path)
            .field("generator_url", &self.generator_url)
            .field(
                "generator_api_key",
                &self.generator_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("generator_model", &self.generator_model)
            .field("generator_timeout_secs", &self.generator_timeout_secs)
            .finish()
    }
}
