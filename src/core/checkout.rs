use crate::core::cart::CartEngine;
use crate::domain::model::{OrderPayload, PopupRequest};
use crate::domain::ports::{HostPlatform, OrderSink};
use crate::utils::error::{CartError, Result};
use std::sync::Arc;

/// Statuses the webhook counts as accepted.
const ACCEPTED_STATUSES: [u16; 2] = [200, 201];

/// 結帳派送器：組訊息、送一次、依結果結算引擎狀態。
///
/// Single fire-and-forget attempt, no retry. While the delivery is in
/// flight the engine sits in `Dispatching` and rejects further mutations.
pub struct CheckoutDispatcher<S: OrderSink> {
    sink: S,
    sender_name: String,
    icon_url: String,
    host: Arc<dyn HostPlatform>,
}

impl<S: OrderSink> CheckoutDispatcher<S> {
    pub fn new(
        sink: S,
        sender_name: impl Into<String>,
        icon_url: impl Into<String>,
        host: Arc<dyn HostPlatform>,
    ) -> Self {
        Self {
            sink,
            sender_name: sender_name.into(),
            icon_url: icon_url.into(),
            host,
        }
    }

    /// 結帳。前置條件按順序短路：未配置 webhook → 空購物車 → 已在派送中。
    pub async fn checkout(&self, engine: &mut CartEngine) -> Result<()> {
        if !self.sink.is_configured() {
            return Err(self.reject(CartError::WebhookNotConfigured));
        }
        if engine.cart_is_empty() {
            return Err(self.reject(CartError::EmptyCart));
        }
        engine.begin_dispatch()?;

        // Host user is carried, not interpreted.
        if let Some(user) = self.host.current_user() {
            tracing::debug!("Checkout initiated by host user {}", user.id);
        }

        let payload = OrderPayload {
            text: engine.order_lines(),
            username: self.sender_name.clone(),
            icon_url: self.icon_url.clone(),
        };
        tracing::info!("📡 Dispatching plan with {} items", engine.cart().len());

        match self.sink.deliver(&payload).await {
            Ok(status) if ACCEPTED_STATUSES.contains(&status) => {
                engine.settle_dispatch(true);
                tracing::info!("✅ Plan delivered (status {})", status);
                self.host
                    .show_popup(&PopupRequest::new("Success", "Plan sent successfully!"));
                Ok(())
            }
            Ok(status) => {
                engine.settle_dispatch(false);
                tracing::error!("❌ Webhook rejected the plan: status {}", status);
                Err(self.reject(CartError::DeliveryFailure {
                    status: Some(status),
                }))
            }
            Err(e) => {
                engine.settle_dispatch(false);
                // The transport cause stays in the log; the popup is generic.
                tracing::error!("❌ Webhook delivery failed: {}", e);
                Err(self.reject(e))
            }
        }
    }

    /// Checkout-stage failures always pop up; the per-kind policy only
    /// covers engine-side rejections.
    fn reject(&self, err: CartError) -> CartError {
        let (title, message) = err.user_message();
        self.host.show_popup(&PopupRequest::new(title, message));
        err
    }
}
