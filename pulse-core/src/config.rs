use serde::Deserialize;

use crate::Schema;

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Static output settings, as read from the agent's configuration.
///
/// ```toml
/// host = "https://pulse.example.com"   # required
/// stashid = "{guid}"                   # required
/// secret = ""
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub stashid: String,
    pub secret: String,
    pub source: Option<String>,
    pub schema: Schema,
    /// Overall request timeout in seconds.
    pub timeout: u64,
    /// Upper bound on in-flight requests when one write produces several.
    pub max_concurrent_requests: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: String::new(),
            stashid: String::new(),
            secret: String::new(),
            source: None,
            schema: Schema::default(),
            timeout: DEFAULT_TIMEOUT_SECS,
            max_concurrent_requests: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let config: Config = serde_json::from_str(r#"{"host":"http://pulse","stashid":"abc"}"#).unwrap();
        assert_eq!(config.secret, "");
        assert_eq!(config.source, None);
        assert_eq!(config.schema, Schema::Marks);
        assert_eq!(config.timeout, 60);
        assert_eq!(config.max_concurrent_requests, 1);
    }

    #[test]
    fn schema_is_read_by_name() {
        let config: Config = serde_json::from_str(r#"{"schema":"events","timeout":5}"#).unwrap();
        assert_eq!(config.schema, Schema::Events);
        assert_eq!(config.timeout, 5);
        assert!(config.host.is_empty());
    }
}
