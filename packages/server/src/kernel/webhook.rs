use anyhow::{Context, Result};
use async_trait::async_trait;

use super::BaseWebhook;
use crate::common::WebhookPayload;

/// reqwest implementation of BaseWebhook
pub struct HttpWebhookClient {
    client: reqwest::Client,
}

impl HttpWebhookClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpWebhookClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseWebhook for HttpWebhookClient {
    async fn call_webhook(&self, payload: &WebhookPayload, callback_uri: &str) -> Result<()> {
        let resp = self
            .client
            .post(callback_uri)
            .json(payload)
            .send()
            .await
            .with_context(|| format!("Failed to reach webhook {}", callback_uri))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Webhook {} answered {}: {}", callback_uri, status, body);
        }

        tracing::debug!(callback_uri, status = %status, "Webhook delivered");
        Ok(())
    }
}
