//! Server Configuration
//!
//! Read once at startup from the environment (after `.env` is loaded) and
//! passed down by value. Nothing below `main` looks at env vars.

use std::fmt;

use thiserror::Error;

pub const DEFAULT_APP_URL: &str = "http://127.0.0.1:5002";
pub const DEFAULT_PORT: u16 = 5002;
/// Assets shipped with this crate, independent of the working directory
pub const DEFAULT_STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Which payment processor backs checkout
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessorKind {
    Stripe,
    /// In-memory processor for local demos, never charges anything
    Mock,
}

#[derive(Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// HMAC key for the session cookie
    pub session_secret: String,
    pub stripe_secret_key: String,
    pub stripe_publishable_key: String,
    /// Public base URL used for Stripe redirects
    pub app_url: String,
    pub port: u16,
    /// Production mode: quieter logs, `Secure` cookies
    pub production: bool,
    pub processor: ProcessorKind,
    /// Directory served under `/static`
    pub static_dir: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                reason: format!("'{raw}' is not a port number"),
            })?,
            None => DEFAULT_PORT,
        };

        let processor = match lookup("GIVING_PROCESSOR").as_deref() {
            None | Some("stripe") => ProcessorKind::Stripe,
            Some("mock") => ProcessorKind::Mock,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "GIVING_PROCESSOR",
                    reason: format!("unknown processor '{other}'"),
                });
            }
        };

        let app_url = lookup("APP_URL").unwrap_or_else(|| DEFAULT_APP_URL.to_string());

        Ok(Self {
            session_secret: required("SESSION_SECRET_KEY")?,
            stripe_secret_key: required("STRIPE_SECRET_KEY")?,
            stripe_publishable_key: required("STRIPE_PUBLISHABLE_KEY")?,
            app_url: app_url.trim_end_matches('/').to_string(),
            port,
            production: lookup("PRODUCTION").is_some(),
            processor,
            static_dir: lookup("STATIC_DIR").unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
        })
    }

    /// Default `RUST_LOG` filter when none is set
    pub const fn default_log_filter(&self) -> &'static str {
        if self.production {
            "info,tower_http=info"
        } else {
            "debug,tower_http=debug,hyper=info"
        }
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("session_secret", &"[REDACTED]")
            .field("stripe_secret_key", &"[REDACTED]")
            .field("stripe_publishable_key", &self.stripe_publishable_key)
            .field("app_url", &self.app_url)
            .field("port", &self.port)
            .field("production", &self.production)
            .field("processor", &self.processor)
            .field("static_dir", &self.static_dir)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("SESSION_SECRET_KEY", "session-secret"),
        ("STRIPE_SECRET_KEY", "sk_test_123"),
        ("STRIPE_PUBLISHABLE_KEY", "pk_test_123"),
    ];

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&REQUIRED)).unwrap();

        assert_eq!(config.app_url, "http://127.0.0.1:5002");
        assert_eq!(config.port, 5002);
        assert!(!config.production);
        assert_eq!(config.processor, ProcessorKind::Stripe);
        assert_eq!(config.static_dir, DEFAULT_STATIC_DIR);
        assert!(std::path::Path::new(&config.static_dir).join("giving.js").is_file());
    }

    #[test]
    fn test_overrides() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("APP_URL", "https://give.bgpnc.org/"),
            ("PORT", "8080"),
            ("PRODUCTION", "1"),
            ("GIVING_PROCESSOR", "mock"),
        ]);
        let config = ServerConfig::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(config.app_url, "https://give.bgpnc.org");
        assert_eq!(config.port, 8080);
        assert!(config.production);
        assert_eq!(config.processor, ProcessorKind::Mock);
        assert_eq!(config.default_log_filter(), "info,tower_http=info");
    }

    #[test]
    fn test_missing_secret() {
        let err = ServerConfig::from_lookup(lookup(&REQUIRED[1..])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("SESSION_SECRET_KEY"));
    }

    #[test]
    fn test_bad_port() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("PORT", "http"));
        let err = ServerConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = ServerConfig::from_lookup(lookup(&REQUIRED)).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk_test_123"));
        assert!(!debug.contains("session-secret"));
    }
}
