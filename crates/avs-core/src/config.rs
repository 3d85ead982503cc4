use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can pass a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("AVS_ENV", "development"));
    let bind_addr = parse_addr("AVS_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("AVS_LOG_LEVEL", "info");
    let mentions_path = PathBuf::from(or_default("AVS_MENTIONS_PATH", "./config/mentions.yaml"));

    let generator_url = optional("AVS_GENERATOR_URL");
    let generator_api_key = optional("AVS_GENERATOR_API_KEY");
    let generator_model = or_default("AVS_GENERATOR_MODEL", "gemini-2.0-flash");
    let generator_timeout_secs = parse_u64("AVS_GENERATOR_TIMEOUT_SECS", "15")?;

    if generator_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "AVS_GENERATOR_TIMEOUT_SECS".to_string(),
            reason: "timeout must be at least 1 second".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        mentions_path,
        generator_url,
        generator_api_key,
        generator_model,
        generator_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn parse_environment_known_values() {
        assert_eq!(parse_environment("development"), Environment::Development);
        assert_eq!(parse_environment("test"), Environment::Test);
        assert_eq!(parse_environment("production"), Environment::Production);
    }

    #[test]
    fn parse_environment_unknown_defaults_to_development() {
        assert_eq!(parse_environment("staging"), Environment::Development);
    }

    #[test]
    fn build_app_config_defaults_from_empty_env() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.env, Environment::Development);
        assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.mentions_path.to_str(), Some("./config/mentions.yaml"));
        assert!(cfg.generator_url.is_none());
        assert!(cfg.generator_api_key.is_none());
        assert_eq!(cfg.generator_model, "gemini-2.0-flash");
        assert_eq!(cfg.generator_timeout_secs, 15);
    }

    #[test]
    fn build_app_config_fails_with_invalid_bind_addr() {
        let mut map = HashMap::new();
        map.insert("AVS_BIND_ADDR", "not-a-socket-addr");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(
                result,
                Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "AVS_BIND_ADDR"
            ),
            "expected InvalidEnvVar(AVS_BIND_ADDR), got: {result:?}"
        );
    }

    #[test]
    fn generator_timeout_override() {
        let mut map = HashMap::new();
        map.insert("AVS_GENERATOR_TIMEOUT_SECS", "40");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.generator_timeout_secs, 40);
    }

    #[test]
    fn generator_timeout_invalid() {
        let mut map = HashMap::new();
        map.insert("AVS_GENERATOR_TIMEOUT_SECS", "soon");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(
                result,
                Err(ConfigError::InvalidEnvVar { ref var, .. })
                    if var == "AVS_GENERATOR_TIMEOUT_SECS"
            ),
            "expected InvalidEnvVar(AVS_GENERATOR_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn generator_timeout_zero_is_rejected() {
        let mut map = HashMap::new();
        map.insert("AVS_GENERATOR_TIMEOUT_SECS", "0");
        assert!(build_app_config(lookup_from_map(&map)).is_err());
    }

    #[test]
    fn blank_generator_url_counts_as_unset() {
        let mut map = HashMap::new();
        map.insert("AVS_GENERATOR_URL", "   ");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert!(cfg.generator_url.is_none());
    }

    #[test]
    fn generator_settings_override() {
        let mut map = HashMap::new();
        map.insert("AVS_GENERATOR_URL", "http://localhost:8081");
        map.insert("AVS_GENERATOR_API_KEY", "secret");
        map.insert("AVS_GENERATOR_MODEL", "local-small");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.generator_url.as_deref(), Some("http://localhost:8081"));
        assert_eq!(cfg.generator_api_key.as_deref(), Some("secret"));
        assert_eq!(cfg.generator_model, "local-small");
    }

    #[test]
    fn debug_redacts_api_key() {
        let mut map = HashMap::new();
        map.insert("AVS_GENERATOR_API_KEY", "super-secret-key");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("super-secret-key"));
        assert!(rendered.contains("[redacted]"));
    }
}
