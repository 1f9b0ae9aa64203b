use serde::{Deserialize, Serialize};

/// Catalog product identity. Stable across the session, assigned in config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub String);

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// 目錄產品：載入後不可變。兩個成本欄位對應 frontend/backend 預算單位。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub category: CategoryId,
    pub frontend: u32,
    pub backend: u32,
    pub effect: Option<String>,
}

/// The two resource counters. Non-negative by construction (u32); every
/// mutation goes through `reserve`/`refund` in lock-step with the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balances {
    pub frontend: u32,
    pub backend: u32,
}

impl Balances {
    pub fn new(frontend: u32, backend: u32) -> Self {
        Self { frontend, backend }
    }

    /// Equality is affordable: `balance == cost` passes.
    pub fn covers(&self, product: &Product) -> bool {
        self.frontend >= product.frontend && self.backend >= product.backend
    }

    /// Crate-internal: only the cart engine mutates balances. Checks and
    /// subtracts in one step; returns false (state unchanged) when either
    /// counter is short, so the counters can never wrap.
    #[must_use]
    pub(crate) fn reserve(&mut self, product: &Product) -> bool {
        if !self.covers(product) {
            return false;
        }
        self.frontend -= product.frontend;
        self.backend -= product.backend;
        true
    }

    pub(crate) fn refund(&mut self, product: &Product) {
        self.frontend += product.frontend;
        self.backend += product.backend;
    }
}

/// One cart line. No quantities: at most one item per product id.
#[derive(Debug, Clone)]
pub struct CartItem {
    pub product: Product,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(CategoryId),
}

impl CategoryFilter {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(id) => &product.category == id,
        }
    }
}

/// Checkout state machine: `Idle → Dispatching → Idle`. Mutations and a
/// second checkout are rejected while `Dispatching`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutPhase {
    Idle,
    Dispatching,
}

/// Whether a rejected operation surfaces a popup or stays silent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeMode {
    Silent,
    Popup,
}

/// Per-error-kind notification policy. The defaults replicate the historic
/// asymmetry of the mini-app: bad/duplicate product ids fail silently,
/// everything else pops up.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct NoticePolicy {
    pub unknown_product: NoticeMode,
    pub duplicate_product: NoticeMode,
    pub insufficient_resources: NoticeMode,
    pub checkout_in_progress: NoticeMode,
}

impl Default for NoticePolicy {
    fn default() -> Self {
        Self {
            unknown_product: NoticeMode::Silent,
            duplicate_product: NoticeMode::Silent,
            insufficient_resources: NoticeMode::Popup,
            checkout_in_progress: NoticeMode::Popup,
        }
    }
}

/// Notification contract of the host platform (`showPopup` equivalent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupRequest {
    pub title: String,
    pub message: String,
}

impl PopupRequest {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Host-provided user descriptor. Carried for personalization, never
/// interpreted by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostUser {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

/// Webhook body. Field names follow the Mattermost incoming-webhook schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPayload {
    pub text: String,
    pub username: String,
    pub icon_url: String,
}

/// One product as the rendering collaborator should present it: a product
/// already in the cart stays available (for removal) even when unaffordable.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub product: Product,
    pub in_cart: bool,
    pub affordable: bool,
}

/// Cost totals of the current cart. UI-only; never transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartTotals {
    pub frontend: u32,
    pub backend: u32,
}

/// Read-only view handed to observers after every state change.
#[derive(Debug, Clone)]
pub struct StateSnapshot {
    pub balances: Balances,
    pub filter: CategoryFilter,
    pub categories: Vec<Category>,
    /// Products matching the current filter, in catalog order.
    pub products: Vec<ProductView>,
    /// Cart contents in insertion order.
    pub cart: Vec<CartItem>,
    pub totals: CartTotals,
    pub phase: CheckoutPhase,
}
