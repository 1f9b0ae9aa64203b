use crate::domain::model::ProductId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CartError {
    #[error("Unknown product id: {0}")]
    UnknownProduct(ProductId),

    #[error("Product {0} is already in the cart")]
    DuplicateProduct(ProductId),

    #[error("Insufficient resources for product '{name}'")]
    InsufficientResources { name: String },

    #[error("A checkout is already in flight")]
    CheckoutInProgress,

    #[error("Webhook URL is not configured")]
    WebhookNotConfigured,

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Order delivery failed (status: {status:?})")]
    DeliveryFailure { status: Option<u16> },

    #[error("Webhook request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },
}

impl CartError {
    /// Popup text shown to the user for this error. Technical detail
    /// (status codes, transport causes) is logged, never surfaced.
    pub fn user_message(&self) -> (&'static str, String) {
        match self {
            CartError::UnknownProduct(id) => ("Error", format!("Product {} does not exist", id)),
            CartError::DuplicateProduct(_) => ("Error", "Already in the cart".to_string()),
            CartError::InsufficientResources { .. } => {
                ("Error", "Insufficient resources".to_string())
            }
            CartError::CheckoutInProgress => {
                ("Error", "Checkout already in progress".to_string())
            }
            CartError::WebhookNotConfigured => {
                ("Error", "Webhook URL is not configured".to_string())
            }
            CartError::EmptyCart => ("Error", "Cart is empty".to_string()),
            CartError::DeliveryFailure { .. } | CartError::HttpError(_) => (
                "Send failed",
                "Could not send the plan. Check the webhook URL.".to_string(),
            ),
            _ => ("Error", self.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, CartError>;
