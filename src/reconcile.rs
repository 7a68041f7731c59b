use log::{info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::ip::IpSource;
use crate::provider::DnsProvider;

/// What a reconciliation pass ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub ip: String,
    pub zone_id: String,
    pub record_id: String,
    /// The record did not exist and was created during this pass.
    pub created: bool,
}

/// Points `config.record_name` at the current public IP.
///
/// One pass, no retries: resolve the IP, find (or take from config) the zone
/// and record ids, create the record when it is missing, then write the IP
/// to it. The final update also runs right after a create.
pub struct Reconciler<'a, I, P> {
    config: &'a Config,
    ip_source: &'a I,
    provider: &'a P,
}

impl<'a, I, P> Reconciler<'a, I, P>
where
    I: IpSource,
    P: DnsProvider,
{
    pub fn new(config: &'a Config, ip_source: &'a I, provider: &'a P) -> Self {
        Self {
            config,
            ip_source,
            provider,
        }
    }

    pub async fn run(&self) -> Result<Reconciliation> {
        let config = self.config;

        info!("Calling {}", config.json_ip_service);
        let ip = self.ip_source.external_ip().await?;
        info!("Got ip: {}", ip);

        let zone_id = match &config.zone_id {
            Some(zone_id) => zone_id.clone(),
            None => {
                info!("Calling ListZones {{domain: {}}}", config.domain);
                self.provider
                    .list_zones(&config.domain)
                    .await?
                    .unwrap_or_else(|| {
                        // Carried on with an empty id; the record lookup below
                        // then fails at the provider.
                        warn!("No zone found for domain {}", config.domain);
                        String::new()
                    })
            }
        };

        let mut created = false;
        let record_id = match &config.dns_id {
            Some(dns_id) => Some(dns_id.clone()),
            None => {
                info!(
                    "Calling ListDNSRecords {{zoneID: {}, recordName: {}, recordType: {}}}",
                    zone_id, config.record_name, config.record_type
                );
                let found = self
                    .provider
                    .list_dns_records(&zone_id, &config.record_name, &config.record_type)
                    .await?;

                match found {
                    Some(record_id) => Some(record_id),
                    None => {
                        info!(
                            "Calling CreateDNSRecord {{zoneID: {}, recordName: {}, recordType: {}, ip: {}}}",
                            zone_id, config.record_name, config.record_type, ip
                        );
                        let record_id = self
                            .provider
                            .create_dns_record(
                                &zone_id,
                                &config.record_name,
                                &config.record_type,
                                &ip,
                            )
                            .await?;
                        created = true;
                        Some(record_id).filter(|id| !id.is_empty())
                    }
                }
            }
        };

        let record_id = match record_id {
            Some(record_id) => {
                info!(
                    "Calling UpdateDNSRecord {{zoneID: {}, dnsID: {}, recordName: {}, recordType: {}, ip: {}}}",
                    zone_id, record_id, config.record_name, config.record_type, ip
                );
                self.provider
                    .update_dns_record(
                        &zone_id,
                        &record_id,
                        &config.record_name,
                        &config.record_type,
                        &ip,
                    )
                    .await?
            }
            None => String::new(),
        };

        Ok(Reconciliation {
            ip,
            zone_id,
            record_id,
            created,
        })
    }
}
