use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(rename = "jsonIPService", default = "default_ip_service")]
    pub json_ip_service: String,
    #[serde(rename = "jsonQuery", default = "default_json_query")]
    pub json_query: String,
    #[serde(rename = "accessToken", default)]
    pub access_token: String,
    #[serde(default)]
    pub domain: String,
    #[serde(rename = "recordName", default)]
    pub record_name: String,
    #[serde(rename = "recordType", default)]
    pub record_type: String,
    /// 已知的 zone id，可跳过 ListZones
    #[serde(rename = "zoneId", default)]
    pub zone_id: Option<String>,
    /// 已知的记录 id，可跳过 ListDNSRecords
    #[serde(rename = "dnsId", default)]
    pub dns_id: Option<String>,
    #[serde(rename = "apiBase", default = "default_api_base")]
    pub api_base: String,
    #[serde(rename = "logFile", default)]
    pub log_file: Option<PathBuf>,
    #[serde(rename = "logLevel", default = "default_log_level")]
    pub log_level: String,
}

fn default_ip_service() -> String {
    "http://ip-api.com/json/".to_string()
}

fn default_json_query() -> String {
    "query".to_string()
}

fn default_api_base() -> String {
    CLOUDFLARE_API_BASE.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml(&content, path)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Self::from_yaml(content, Path::new("<inline>"))
    }

    fn from_yaml(content: &str, path: &Path) -> Result<Self> {
        let mut config: Config =
            serde_yaml::from_str(content).map_err(|source| Error::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;

        config.zone_id = config.zone_id.filter(|id| !id.is_empty());
        config.dns_id = config.dns_id.filter(|id| !id.is_empty());
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let required = [
            ("accessToken", &self.access_token),
            ("domain", &self.domain),
            ("recordName", &self.record_name),
            ("recordType", &self.record_type),
        ];

        match required.iter().find(|(_, value)| value.is_empty()) {
            Some((key, _)) => Err(Error::MissingField(*key)),
            None => Ok(()),
        }
    }
}
