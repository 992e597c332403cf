//! Inbound request bodies, one per workflow.
//!
//! Each request is also the run's settings snapshot: it is serialized back
//! out as `_settings.json` next to the run's payloads.

use dataforseo_client::{BacklinksMode, BacklinksStatusType, SerpTaskOptions, MAX_TASKS_PER_POST};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerpRequest {
    pub callback_uri: String,
    #[serde(default)]
    pub location_code: Option<u32>,
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub depth: Option<u32>,
}

impl SerpRequest {
    pub fn new(callback_uri: impl Into<String>) -> Self {
        Self {
            callback_uri: callback_uri.into(),
            location_code: None,
            language_code: None,
            depth: None,
        }
    }

    /// Task options with request overrides applied over the defaults.
    pub fn task_options(&self) -> SerpTaskOptions {
        let defaults = SerpTaskOptions::default();
        SerpTaskOptions {
            location_code: self.location_code.unwrap_or(defaults.location_code),
            language_code: self
                .language_code
                .clone()
                .unwrap_or(defaults.language_code),
            depth: self.depth.unwrap_or(defaults.depth),
            priority: defaults.priority,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacklinksRequest {
    pub callback_uri: String,
    #[serde(default)]
    pub mode: BacklinksMode,
    #[serde(default)]
    pub include_subdomains: bool,
    #[serde(default)]
    pub status_type: BacklinksStatusType,
}

impl BacklinksRequest {
    pub fn new(callback_uri: impl Into<String>) -> Self {
        Self {
            callback_uri: callback_uri.into(),
            mode: BacklinksMode::default(),
            include_subdomains: false,
            status_type: BacklinksStatusType::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkRanksRequest {
    pub callback_uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkReferringRequest {
    pub callback_uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkNewLostRequest {
    pub callback_uri: String,
    /// `YYYY-MM` or `YYYY-MM-DD`
    pub from_month: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnPageRequest {
    /// Reporting is skipped entirely when absent or empty
    #[serde(default)]
    pub callback_uri: Option<String>,
    /// Falls back to the default domain list when absent or empty
    #[serde(default)]
    pub domains: Option<Vec<String>>,
    #[serde(default = "default_on_page_batch_size")]
    pub batch_size: usize,
}

fn default_on_page_batch_size() -> usize {
    MAX_TASKS_PER_POST
}

impl Default for OnPageRequest {
    fn default() -> Self {
        Self {
            callback_uri: None,
            domains: None,
            batch_size: default_on_page_batch_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serp_overrides_apply_over_defaults() {
        let request: SerpRequest = serde_json::from_value(serde_json::json!({
            "callbackUri": "https://hooks.example/serp",
            "languageCode": "en"
        }))
        .unwrap();

        let options = request.task_options();
        assert_eq!(options.language_code, "en");
        assert_eq!(options.location_code, SerpTaskOptions::default().location_code);
        assert_eq!(options.depth, 100);
    }

    #[test]
    fn backlinks_request_uses_api_enum_names() {
        let request: BacklinksRequest = serde_json::from_value(serde_json::json!({
            "callbackUri": "https://hooks.example/bl",
            "mode": "one_per_domain",
            "includeSubdomains": true,
            "statusType": "all"
        }))
        .unwrap();

        assert_eq!(request.mode, BacklinksMode::OnePerDomain);
        assert!(request.include_subdomains);
        assert_eq!(request.status_type, BacklinksStatusType::All);
    }

    #[test]
    fn on_page_request_defaults() {
        let request: OnPageRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(request.callback_uri.is_none());
        assert!(request.domains.is_none());
        assert_eq!(request.batch_size, MAX_TASKS_PER_POST);
    }

    #[test]
    fn bulk_request_requires_callback() {
        let result = serde_json::from_value::<BulkRanksRequest>(serde_json::json!({}));
        assert!(result.is_err());
    }
}
