use crate::config::WebhookConfig;
use crate::domain::model::OrderPayload;
use crate::domain::ports::OrderSink;
use crate::utils::error::{CartError, Result};
use reqwest::Client;
use std::time::Duration;

/// Mattermost 風格 incoming-webhook 出口：單次 JSON POST,不重試。
pub struct MattermostSink {
    client: Client,
    webhook: WebhookConfig,
}

impl MattermostSink {
    pub fn new(webhook: WebhookConfig) -> Self {
        Self {
            client: Client::new(),
            webhook,
        }
    }
}

#[async_trait::async_trait]
impl OrderSink for MattermostSink {
    fn is_configured(&self) -> bool {
        self.webhook.is_configured()
    }

    async fn deliver(&self, payload: &OrderPayload) -> Result<u16> {
        let url = self
            .webhook
            .url
            .as_deref()
            .ok_or(CartError::WebhookNotConfigured)?;

        let mut request = self.client.post(url).json(payload);
        if let Some(timeout) = self.webhook.timeout_seconds {
            request = request.timeout(Duration::from_secs(timeout));
        }

        tracing::debug!("POST {} ({} bytes of text)", url, payload.text.len());
        let response = request.send().await?;
        let status = response.status().as_u16();
        tracing::debug!("Webhook response status: {}", status);

        Ok(status)
    }
}
