//! # Settings
//!
//! Where the compliance suite lives and what the auth dialog starts with.
//! Credentials are never part of the settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::auth::AuthType;

/// Overrides `suite_url` when set and non-empty.
pub const SUITE_URL_ENV: &str = "SCIM2_SUITE_URL";

const DEFAULT_SUITE_URL: &str =
    "http://127.0.0.1:8080/org.wso2.scim2.testsuite.endpoint/ComplianceTestSuite";
const DEFAULT_ENDPOINT: &str = "https://localhost:9443/scim2";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_suite_url")]
    pub suite_url: String,
    #[serde(default = "default_endpoint")]
    pub default_endpoint: String,
    #[serde(default)]
    pub default_auth_type: AuthType,
    /// No timeout when absent; a full run can take minutes.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_suite_url() -> String {
    DEFAULT_SUITE_URL.to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            suite_url: default_suite_url(),
            default_endpoint: default_endpoint(),
            default_auth_type: AuthType::default(),
            request_timeout_secs: None,
        }
    }
}

impl Settings {
    pub fn with_env_overrides(self) -> Self {
        self.with_suite_url_override(std::env::var(SUITE_URL_ENV).ok())
    }

    fn with_suite_url_override(mut self, value: Option<String>) -> Self {
        if let Some(url) = value.filter(|url| !url.trim().is_empty()) {
            log::info!("suite url overridden by {SUITE_URL_ENV}");
            self.suite_url = url;
        }
        self
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}
