// ABOUTME: Environment-driven runtime configuration for the film log server
// ABOUTME: Covers bind address, database URL, upload directory, and cookie policy

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub upload_dir: PathBuf,
    /// Set the Secure attribute on session cookies. Off by default so the
    /// app works over plain HTTP in development.
    pub secure_cookies: bool,
}

fn env_str(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_u16(name: &str, default: u16) -> u16 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(default)
}

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env_str("FILMLOG_HOST", "0.0.0.0"),
            port: env_u16("FILMLOG_PORT", 5001),
            database_url: env_str("FILMLOG_DATABASE_URL", "sqlite:filmlog.db?mode=rwc"),
            upload_dir: PathBuf::from(env_str("FILMLOG_UPLOAD_DIR", "uploads")),
            secure_cookies: env_bool("FILMLOG_SECURE_COOKIES", false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_env() {
        let config = Config::from_env();
        assert_eq!(config.port, 5001);
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert!(!config.secure_cookies);
    }

    #[test]
    fn env_bool_parses_common_forms() {
        assert!(env_bool("FILMLOG_TEST_MISSING", true));
        assert!(!env_bool("FILMLOG_TEST_MISSING", false));
    }
}
