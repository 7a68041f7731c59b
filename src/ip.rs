use std::net::Ipv4Addr;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::Value;
use serde_json_path::JsonPath;

use crate::error::{Error, Result};

/// Where the current public address comes from.
#[async_trait]
pub trait IpSource: Send + Sync {
    async fn external_ip(&self) -> Result<String>;
}

/// Asks an HTTP JSON echo service (ip-api.com and friends) for our address.
pub struct HttpIpResolver {
    client: Client,
    service_url: String,
    query: String,
    path: JsonPath,
}

impl HttpIpResolver {
    /// Fails with [`Error::InvalidQuery`] when `query` is not a usable path.
    pub fn new(service_url: impl Into<String>, query: impl Into<String>) -> Result<Self> {
        let query: String = query.into();
        let path = parse_query(&query)?;

        Ok(Self {
            client: Client::new(),
            service_url: service_url.into(),
            query,
            path,
        })
    }
}

#[async_trait]
impl IpSource for HttpIpResolver {
    async fn external_ip(&self) -> Result<String> {
        let url = self.service_url.as_str();

        let body = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| Error::http(url, e))?
            .text()
            .await
            .map_err(|e| Error::http(url, e))?;

        let document: Value = serde_json::from_str(&body)
            .map_err(|e| Error::parse(url, format!("body is not JSON: {}", e)))?;

        debug!("IP service replied: {}", document);

        let value = query_json(&document, &self.path)
            .ok_or_else(|| Error::parse(url, format!("no value at {:?}", self.query)))?;

        match value.as_str() {
            Some(ip) if is_valid_ipv4(ip) => Ok(ip.to_string()),
            Some(ip) => Err(Error::InvalidIp(ip.to_string())),
            None => Err(Error::InvalidIp(value.to_string())),
        }
    }
}

/// Compiles a JSONPath query. Shorthand without the leading `$` (`query`,
/// `data.ip`) is taken relative to the root.
pub fn parse_query(query: &str) -> Result<JsonPath> {
    let expr = if query.starts_with('$') {
        query.to_string()
    } else {
        format!("$.{}", query)
    };

    JsonPath::parse(&expr).map_err(|e| Error::InvalidQuery {
        query: query.to_string(),
        reason: e.to_string(),
    })
}

/// First node `path` selects in `document`.
pub fn query_json<'a>(document: &'a Value, path: &JsonPath) -> Option<&'a Value> {
    path.query(document).first()
}

/// Dotted quad, four octets in 0..=255.
pub fn is_valid_ipv4(ip: &str) -> bool {
    ip.parse::<Ipv4Addr>().is_ok()
}
