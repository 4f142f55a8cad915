//! Runtime configuration loaded from environment variables

use std::fmt;
use std::path::PathBuf;

/// Default media directory, relative to the working directory
pub const DEFAULT_MEDIA_DIR: &str = "media";
/// Default bind address
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8081;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the media files (`MEDIA_DIR`)
    pub media_dir: PathBuf,
    /// Bind address (`FILE_SERVER_HOST`)
    pub host: String,
    /// Bind port (`FILE_SERVER_PORT`)
    pub port: u16,
    /// Look up cover art for files with a catalog identifier (`COVER_LOOKUP`)
    pub cover_lookup: bool,
    /// `LOG_FORMAT`, either `text` or `json`
    pub log_format: LogFormat,
}

/// Configuration error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid value {:?} for {}: expected {}",
            self.value, self.key, self.expected
        )
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load configuration from the process environment
    ///
    /// Call `dotenv::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let media_dir = get("MEDIA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MEDIA_DIR));

        let host = get("FILE_SERVER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match get("FILE_SERVER_PORT") {
            Some(value) => value.parse::<u16>().map_err(|_| ConfigError {
                key: "FILE_SERVER_PORT",
                value,
                expected: "a port number",
            })?,
            None => DEFAULT_PORT,
        };

        let cover_lookup = match get("COVER_LOOKUP") {
            Some(value) => parse_bool(&value).ok_or(ConfigError {
                key: "COVER_LOOKUP",
                value,
                expected: "true or false",
            })?,
            None => true,
        };

        let log_format = match get("LOG_FORMAT").as_deref().map(str::to_ascii_lowercase) {
            None => LogFormat::Text,
            Some(value) => match value.as_str() {
                "text" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => {
                    return Err(ConfigError {
                        key: "LOG_FORMAT",
                        value,
                        expected: "text or json",
                    })
                }
            },
        };

        Ok(Self {
            media_dir,
            host,
            port,
            cover_lookup,
            log_format,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.media_dir, PathBuf::from("media"));
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8081);
        assert!(config.cover_lookup);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("MEDIA_DIR", "/srv/media"),
            ("FILE_SERVER_HOST", "127.0.0.1"),
            ("FILE_SERVER_PORT", "9000"),
            ("COVER_LOOKUP", "false"),
            ("LOG_FORMAT", "JSON"),
        ])
        .unwrap();
        assert_eq!(config.media_dir, PathBuf::from("/srv/media"));
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert!(!config.cover_lookup);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = config_from(&[("MEDIA_DIR", "  "), ("FILE_SERVER_PORT", "")]).unwrap();
        assert_eq!(config.media_dir, PathBuf::from("media"));
        assert_eq!(config.port, 8081);
    }

    #[test]
    fn test_invalid_port() {
        let err = config_from(&[("FILE_SERVER_PORT", "http")]).unwrap_err();
        assert_eq!(err.key, "FILE_SERVER_PORT");
        assert!(config_from(&[("FILE_SERVER_PORT", "70000")]).is_err());
    }

    #[test]
    fn test_invalid_flags() {
        assert_eq!(config_from(&[("COVER_LOOKUP", "maybe")]).unwrap_err().key, "COVER_LOOKUP");
        assert_eq!(config_from(&[("LOG_FORMAT", "xml")]).unwrap_err().key, "LOG_FORMAT");
    }
}
