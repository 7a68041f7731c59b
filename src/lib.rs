//! Keep one Cloudflare DNS record pointed at this host's public IPv4 address.
//!
//! A run looks up the address through an HTTP JSON echo service, finds the
//! zone and record (unless their ids are configured), creates the record
//! when it does not exist and then writes the address to it.

pub mod config;
pub mod error;
pub mod ip;
pub mod logging;
pub mod provider;
pub mod reconcile;

pub use config::Config;
pub use error::{Error, Result};
pub use ip::{HttpIpResolver, IpSource};
pub use provider::cloudflare::Cloudflare;
pub use provider::DnsProvider;
pub use reconcile::{Reconciler, Reconciliation};
