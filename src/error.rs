use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the updater can hit. All of them are fatal to a run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read config file {}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("could not read {0} from config file")]
    MissingField(&'static str),

    /// Transport failure, unreadable body or a non-2xx status.
    #[error("request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected response from {url}: {reason}")]
    Parse { url: String, reason: String },

    #[error("invalid jsonQuery {query:?}: {reason}")]
    InvalidQuery { query: String, reason: String },

    #[error("invalid IPv4 address: {0}")]
    InvalidIp(String),

    /// The provider answered with `success: false` (or an unreadable envelope).
    /// Carries the provider's messages joined with ", ".
    #[error("Cloudflare returned an error: {0}")]
    Provider(String),
}

impl Error {
    pub(crate) fn http(url: &str, source: reqwest::Error) -> Self {
        Self::Http {
            url: url.to_string(),
            source,
        }
    }

    pub(crate) fn parse(url: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}
