pub use std::time::Duration;

use reqwest::ClientBuilder as ReqwestClientBuilder;
use url::Url;

use crate::config::DEFAULT_TIMEOUT_SECS;
use crate::transport::HttpTransport;
use crate::{Client, Config, PulseError, Schema};

const USER_AGENT: &str = "pulse-rs/0.1";

pub struct ClientBuilder {
    host: String,
    stashid: String,
    secret: String,
    source: Option<String>,
    schema: Schema,
    timeout: Duration,
    idle_timeout: Option<Duration>,
    max_idle_connections: usize,
    max_concurrent_requests: usize,
    default_headers: http::HeaderMap,
    ssl_root_certificates: Option<String>,
    proxy: Option<Url>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            host: String::new(),
            stashid: String::new(),
            secret: String::new(),
            source: None,
            schema: Schema::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            idle_timeout: Some(Duration::from_secs(90)),
            max_idle_connections: 100,
            max_concurrent_requests: 1,
            default_headers: http::HeaderMap::new(),
            ssl_root_certificates: None,
            proxy: None,
        }
    }
}

impl ClientBuilder {
    /// Parses `http(s)://host[:port][/base]?stashid=..&secret=..&source=..&schema=..&timeout=..`.
    pub fn from_connection_string(s: &str) -> Result<Self, PulseError> {
        let mut uri: Url = s.parse()?;

        if !matches!(uri.scheme(), "http" | "https") {
            return Err(PulseError::InvalidScheme(uri.scheme().to_string()));
        }

        let mut client = ClientBuilder::default();
        for (k, v) in uri.query_pairs() {
            match k.as_ref() {
                "stashid" => client.stashid = v.to_string(),
                "secret" => client.secret = v.to_string(),
                "source" => client.source = Some(v.to_string()),
                "schema" => client.schema = Schema::try_from(&*v)?,
                "timeout" => {
                    let secs: u64 = v.parse()
                        .map_err(|_| PulseError::InvalidParameter("timeout".to_string(), v.to_string()))?;
                    client.timeout = Duration::from_secs(secs);
                },
                "maxConcurrentRequests" => {
                    client.max_concurrent_requests = v.parse()
                        .map_err(|_| PulseError::InvalidParameter("maxConcurrentRequests".to_string(), v.to_string()))?;
                },
                _ => {}
            }
        }

        uri.set_query(None);
        uri.set_fragment(None);
        client.host = uri.to_string();

        Ok(client)
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            host: config.host.clone(),
            stashid: config.stashid.clone(),
            secret: config.secret.clone(),
            source: config.source.clone(),
            schema: config.schema,
            timeout: Duration::from_secs(config.timeout),
            max_concurrent_requests: config.max_concurrent_requests,
            ..Self::default()
        }
    }

    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    pub fn stashid(mut self, stashid: &str) -> Self {
        self.stashid = stashid.to_string();
        self
    }

    pub fn secret(mut self, secret: &str) -> Self {
        self.secret = secret.to_string();
        self
    }

    pub fn source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }

    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = Some(idle_timeout);
        self
    }

    pub fn max_idle_connections(mut self, max_idle_connections: usize) -> Self {
        self.max_idle_connections = max_idle_connections;
        self
    }

    pub fn max_concurrent_requests(mut self, max_concurrent_requests: usize) -> Self {
        self.max_concurrent_requests = max_concurrent_requests;
        self
    }

    pub fn proxy(mut self, proxy: &str) -> Result<Self, PulseError> {
        let url: Url = proxy.parse()?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(PulseError::InvalidScheme(url.scheme().to_string()));
        }
        self.proxy = Some(url);
        Ok(self)
    }

    pub fn ssl_root_certificates(mut self, path: &str) -> Self {
        self.ssl_root_certificates = Some(path.to_string());
        self
    }

    pub fn default_header(mut self, key: http::HeaderName, value: &str) -> Result<Self, PulseError> {
        let header_value = value.parse::<http::HeaderValue>()
            .map_err(|_| PulseError::InvalidParameter(key.to_string(), value.to_string()))?;
        self.default_headers.insert(key, header_value);
        Ok(self)
    }

    /// Validates the settings and creates the shared HTTP client.
    pub fn build(self) -> Result<Client, PulseError> {
        if self.host.is_empty() || self.stashid.is_empty() {
            return Err(PulseError::Config("pulse host and stashid are required fields".to_string()));
        }

        if self.timeout.is_zero() {
            return Err(PulseError::InvalidParameter("timeout".to_string(), "0".to_string()));
        }

        let url = endpoint_url(&self.host, &self.stashid, self.schema)?;

        let mut http_builder = ReqwestClientBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .pool_idle_timeout(self.idle_timeout)
            .pool_max_idle_per_host(self.max_idle_connections)
            .default_headers(self.default_headers)
            .gzip(true);

        if let Some(proxy_url) = self.proxy {
            let proxy = reqwest::Proxy::all(proxy_url.as_str())
                .map_err(|e| PulseError::InvalidParameter("proxy".to_string(), e.to_string()))?;
            http_builder = http_builder.proxy(proxy);
        }

        if let Some(cert_path) = self.ssl_root_certificates {
            let cert_data = std::fs::read(cert_path)
                .map_err(|e| PulseError::SSLCertificateError(e.to_string()))?;
            let cert = reqwest::Certificate::from_pem(&cert_data)
                .map_err(|e| PulseError::SSLCertificateError(e.to_string()))?;
            http_builder = http_builder.add_root_certificate(cert);
        }

        let http_client = http_builder
            .build()
            .map_err(|e| PulseError::Config(format!("unable to create HTTP client: {e}")))?;
        let transport = HttpTransport::new(http_client, url, self.schema.expected_status());
        tracing::debug!(url = %transport.url(), schema = %self.schema, "pulse client ready");

        Ok(Client {
            transport,
            stashid: self.stashid,
            secret: self.secret,
            source: self.source,
            schema: self.schema,
            max_concurrent_requests: self.max_concurrent_requests.max(1),
        })
    }
}

/// `<host>/stash/<stashid>/<marks|events>?format=json`
pub(crate) fn endpoint_url(host: &str, stashid: &str, schema: Schema) -> Result<Url, PulseError> {
    let mut url: Url = host.parse()?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(PulseError::InvalidScheme(url.scheme().to_string()));
    }

    url.path_segments_mut()
        .map_err(|_| PulseError::Config(format!("host {host} cannot be used as a base URL")))?
        .pop_if_empty()
        .extend(["stash", stashid, schema.as_str()]);
    url.set_query(Some("format=json"));

    Ok(url)
}
