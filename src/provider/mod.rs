pub mod cloudflare;

use async_trait::async_trait;

use crate::error::Result;

/// The four record operations the updater needs from a DNS host.
///
/// Lookups return `Ok(None)` when nothing matches; that is a normal answer,
/// not an error.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Id of the first zone named `domain`.
    async fn list_zones(&self, domain: &str) -> Result<Option<String>>;

    /// Id of the first record in `zone_id` with this name and type.
    async fn list_dns_records(
        &self,
        zone_id: &str,
        record_name: &str,
        record_type: &str,
    ) -> Result<Option<String>>;

    /// Creates a record and returns its id.
    async fn create_dns_record(
        &self,
        zone_id: &str,
        record_name: &str,
        record_type: &str,
        content: &str,
    ) -> Result<String>;

    /// Overwrites a record and returns its id.
    async fn update_dns_record(
        &self,
        zone_id: &str,
        record_id: &str,
        record_name: &str,
        record_type: &str,
        content: &str,
    ) -> Result<String>;
}
