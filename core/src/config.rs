//! Client configuration.

use serde::Deserialize;

use crate::client::CustomerClient;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Where the customer service lives.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl ClientConfig {
    /// Read `CUSTOMER_API_URL`, falling back to the local default.
    pub fn from_env() -> Self {
        match std::env::var("CUSTOMER_API_URL") {
            Ok(url) if !url.trim().is_empty() => Self { base_url: url },
            _ => Self::default(),
        }
    }

    pub fn client(&self) -> CustomerClient {
        CustomerClient::new(&self.base_url)
    }
}
