//! Terminal outcome of a run: the messages each workflow reports and the
//! single webhook delivery at the end.

use std::sync::Arc;

use anyhow::{Context, Result};

use super::models::CallType;
use crate::common::WebhookPayload;
use crate::kernel::BaseWebhook;

/// Whether a workflow reports when no callback target was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPolicy {
    /// Callback is required by the request; always attempt delivery
    Always,
    /// Skip delivery silently when the callback is absent or empty
    WhenCallbackPresent,
}

impl CallType {
    pub fn success_message(&self, processed: usize) -> String {
        match self {
            CallType::SerpTaskPost => {
                format!("Successfully queued {} keywords to DataForSeo", processed)
            }
            CallType::BacklinksLive | CallType::BulkRanks | CallType::BulkReferringDomains => {
                format!("Successfully live called {} domains to DataForSeo", processed)
            }
            CallType::BulkNewLost => format!(
                "Successfully live called {} domains to DataForSeo new lost",
                processed
            ),
            CallType::OnPage => {
                format!("Successfully queued {} domains to DataForSeo", processed)
            }
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            CallType::SerpTaskPost => {
                "Failed to queue the keywords to DataForSeo, see exception for more details"
            }
            CallType::BacklinksLive | CallType::BulkRanks | CallType::BulkReferringDomains => {
                "Failed to call the domains to DataForSeo, see exception for more details"
            }
            CallType::BulkNewLost => {
                "Failed to call the domains to DataForSeo new lost, see exception for more details"
            }
            CallType::OnPage => {
                "Failed to queue the domains to DataForSeo, see exception for more details"
            }
        }
    }

    pub fn report_policy(&self) -> ReportPolicy {
        match self {
            CallType::OnPage => ReportPolicy::WhenCallbackPresent,
            _ => ReportPolicy::Always,
        }
    }
}

pub struct OutcomeReporter {
    webhook: Arc<dyn BaseWebhook>,
    policy: ReportPolicy,
}

impl OutcomeReporter {
    pub fn new(webhook: Arc<dyn BaseWebhook>, policy: ReportPolicy) -> Self {
        Self { webhook, policy }
    }

    /// Deliver `payload` once. Returns whether a delivery was attempted.
    pub async fn report(&self, payload: &WebhookPayload, callback_uri: Option<&str>) -> Result<bool> {
        let target = callback_uri.map(str::trim).filter(|uri| !uri.is_empty());

        let target = match (target, self.policy) {
            (Some(uri), _) => uri,
            (None, ReportPolicy::WhenCallbackPresent) => {
                tracing::debug!("No callback target, skipping outcome report");
                return Ok(false);
            }
            (None, ReportPolicy::Always) => {
                anyhow::bail!("Callback target is required but was empty")
            }
        };

        self.webhook
            .call_webhook(payload, target)
            .await
            .with_context(|| format!("Failed to report outcome to {}", target))?;
        Ok(true)
    }
}
