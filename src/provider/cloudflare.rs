use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use serde_json::Value;

use super::DnsProvider;
use crate::error::{Error, Result};

/// Cloudflare API v4 client holding the bearer token.
pub struct Cloudflare {
    client: Client,
    api_base: String,
    api_token: String,
}

impl Cloudflare {
    /// `api_base` is the API root, normally [`crate::config::CLOUDFLARE_API_BASE`].
    pub fn with_api_base(api_token: impl Into<String>, api_base: impl Into<String>) -> Self {
        let api_base: String = api_base.into();
        Self {
            client: Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            api_token: api_token.into(),
        }
    }

    fn zones_url(&self) -> String {
        format!("{}/zones", self.api_base)
    }

    fn records_url(&self, zone_id: &str) -> String {
        format!("{}/zones/{}/dns_records", self.api_base, zone_id)
    }

    fn record_url(&self, zone_id: &str, record_id: &str) -> String {
        format!("{}/zones/{}/dns_records/{}", self.api_base, zone_id, record_id)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("Authorization", format!("Bearer {}", self.api_token))
    }

    async fn first_id(&self, url: &str, query: &[(&str, &str)]) -> Result<Option<String>> {
        let request = self.authorized(self.client.get(url)).query(query);
        let records: Vec<CloudflareObject> = self.call(request, url).await?.unwrap_or_default();

        Ok(records
            .into_iter()
            .next()
            .map(|record| record.id)
            .filter(|id| !id.is_empty()))
    }

    async fn write_record(
        &self,
        request: RequestBuilder,
        url: &str,
        body: &RecordRequest<'_>,
    ) -> Result<String> {
        let request = self
            .authorized(request)
            .header("Content-Type", "application/json")
            .json(body);

        let record: Option<CloudflareObject> = self.call(request, url).await?;
        if record.is_none() {
            warn!("No result in Cloudflare response from {}", url);
        }

        Ok(record.map(|record| record.id).unwrap_or_default())
    }

    async fn call<T>(&self, request: RequestBuilder, url: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Default,
    {
        let body = request
            .send()
            .await
            .map_err(|e| Error::http(url, e))?
            .text()
            .await
            .map_err(|e| Error::http(url, e))?;

        debug!("Cloudflare replied: {}", body);
        decode_envelope(&body)
    }
}

#[async_trait]
impl DnsProvider for Cloudflare {
    async fn list_zones(&self, domain: &str) -> Result<Option<String>> {
        self.first_id(&self.zones_url(), &[("name", domain)]).await
    }

    async fn list_dns_records(
        &self,
        zone_id: &str,
        record_name: &str,
        record_type: &str,
    ) -> Result<Option<String>> {
        self.first_id(
            &self.records_url(zone_id),
            &[("name", record_name), ("type", record_type)],
        )
        .await
    }

    async fn create_dns_record(
        &self,
        zone_id: &str,
        record_name: &str,
        record_type: &str,
        content: &str,
    ) -> Result<String> {
        let url = self.records_url(zone_id);
        let body = RecordRequest {
            record_type,
            name: record_name,
            content,
        };

        self.write_record(self.client.post(&url), &url, &body).await
    }

    async fn update_dns_record(
        &self,
        zone_id: &str,
        record_id: &str,
        record_name: &str,
        record_type: &str,
        content: &str,
    ) -> Result<String> {
        let url = self.record_url(zone_id, record_id);
        let body = RecordRequest {
            record_type,
            name: record_name,
            content,
        };

        self.write_record(self.client.put(&url), &url, &body).await
    }
}

/// Unwraps a `{success, errors, result}` envelope.
///
/// A body that does not decode counts as `success: false` with no messages,
/// so it surfaces as a provider error instead of a parse failure.
fn decode_envelope<T>(body: &str) -> Result<Option<T>>
where
    T: DeserializeOwned + Default,
{
    let response: CloudflareResponse<T> = serde_json::from_str(body).unwrap_or_else(|e| {
        warn!("Could not decode Cloudflare response: {}", e);
        CloudflareResponse::default()
    });

    if !response.success {
        let errors = response.errors.unwrap_or_default();
        return Err(Error::Provider(join_errors(&errors)));
    }

    Ok(response.result)
}

fn join_errors(errors: &[CloudflareError]) -> String {
    errors
        .iter()
        .filter_map(|e| e.message.as_ref().and_then(Value::as_str))
        .filter(|message| !message.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

// Cloudflare API types

#[derive(Debug, Serialize)]
struct RecordRequest<'a> {
    #[serde(rename = "type")]
    record_type: &'a str,
    name: &'a str,
    content: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct CloudflareResponse<T> {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    errors: Option<Vec<CloudflareError>>,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct CloudflareError {
    /// Only string messages are reported.
    #[serde(default)]
    message: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct CloudflareObject {
    #[serde(default)]
    id: String,
}
