use crate::core::catalog::Catalog;
use crate::domain::model::{
    Balances, CartItem, CartTotals, CategoryFilter, CheckoutPhase, NoticeMode, NoticePolicy,
    PopupRequest, Product, ProductId, ProductView, StateSnapshot,
};
use crate::domain::ports::{HostPlatform, StateObserver};
use crate::utils::error::{CartError, Result};
use std::sync::Arc;

/// 購物車/餘額引擎。所有變更都經過這四個操作；沒有全域狀態。
///
/// Invariant: after every operation, `balances + Σ cart costs == initial`
/// on both axes. Operations are synchronous and atomic; the only suspend
/// point of the system (webhook delivery) is fenced off by `CheckoutPhase`.
pub struct CartEngine {
    catalog: Catalog,
    initial: Balances,
    balances: Balances,
    cart: Vec<CartItem>,
    filter: CategoryFilter,
    phase: CheckoutPhase,
    policy: NoticePolicy,
    host: Arc<dyn HostPlatform>,
    observers: Vec<Box<dyn StateObserver>>,
}

impl CartEngine {
    pub fn new(catalog: Catalog, initial: Balances, host: Arc<dyn HostPlatform>) -> Self {
        Self {
            catalog,
            initial,
            balances: initial,
            cart: Vec::new(),
            filter: CategoryFilter::All,
            phase: CheckoutPhase::Idle,
            policy: NoticePolicy::default(),
            host,
            observers: Vec::new(),
        }
    }

    pub fn with_policy(mut self, policy: NoticePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn subscribe(&mut self, observer: Box<dyn StateObserver>) {
        self.observers.push(observer);
    }

    // ===== 操作 =====

    /// 加入購物車：預留兩種資源並追加項目。
    pub fn add_to_cart(&mut self, id: ProductId) -> Result<()> {
        self.ensure_idle()?;

        let product = match self.catalog.product(id) {
            Some(p) => p.clone(),
            None => return Err(self.reject(CartError::UnknownProduct(id))),
        };
        if self.in_cart(id) {
            return Err(self.reject(CartError::DuplicateProduct(id)));
        }
        if !self.balances.reserve(&product) {
            return Err(self.reject(CartError::InsufficientResources {
                name: product.name.clone(),
            }));
        }

        tracing::info!("🛒 Added '{}' to the cart", product.name);
        self.host.show_popup(&PopupRequest::new(
            "Added",
            format!("{} added to the plan", product.name),
        ));
        self.cart.push(CartItem { product });
        self.emit_state_changed();
        Ok(())
    }

    /// 移除購物車項目並退還資源。Id 不在購物車時為冪等 no-op。
    pub fn remove_from_cart(&mut self, id: ProductId) -> Result<()> {
        self.ensure_idle()?;

        let Some(index) = self.cart.iter().position(|i| i.product.id == id) else {
            return Ok(());
        };

        let item = self.cart.remove(index);
        self.balances.refund(&item.product);
        tracing::info!("🛒 Removed '{}' from the cart", item.product.name);
        self.host.show_popup(&PopupRequest::new(
            "Removed",
            format!("{} removed from the plan", item.product.name),
        ));
        self.emit_state_changed();
        Ok(())
    }

    /// Pure filter change. Never touches balances, cart, or affordability.
    pub fn filter_by_category(&mut self, filter: CategoryFilter) {
        self.filter = filter;
        self.emit_state_changed();
    }

    // ===== 結帳狀態機 =====

    /// `Idle → Dispatching`. A second checkout while one is in flight is
    /// rejected rather than interleaved.
    pub fn begin_dispatch(&mut self) -> Result<()> {
        if self.phase == CheckoutPhase::Dispatching {
            return Err(self.reject(CartError::CheckoutInProgress));
        }
        self.phase = CheckoutPhase::Dispatching;
        self.emit_state_changed();
        Ok(())
    }

    /// `Dispatching → Idle`. On delivered orders the cart is cleared and the
    /// balances are reset to the configured initial values verbatim (the
    /// literal contract, not an item-by-item refund).
    pub fn settle_dispatch(&mut self, delivered: bool) {
        self.phase = CheckoutPhase::Idle;
        if delivered {
            self.cart.clear();
            self.balances = self.initial;
            for observer in self.observers.iter_mut() {
                observer.checkout_succeeded();
            }
        }
        self.emit_state_changed();
    }

    // ===== 查詢 =====

    pub fn balances(&self) -> Balances {
        self.balances
    }

    pub fn initial_balances(&self) -> Balances {
        self.initial
    }

    pub fn cart(&self) -> &[CartItem] {
        &self.cart
    }

    pub fn cart_is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    pub fn in_cart(&self, id: ProductId) -> bool {
        self.cart.iter().any(|i| i.product.id == id)
    }

    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    pub fn phase(&self) -> CheckoutPhase {
        self.phase
    }

    /// Always evaluated against the full product, independent of the
    /// current category filter.
    pub fn can_afford(&self, product: &Product) -> bool {
        self.balances.covers(product)
    }

    /// 1-indexed, newline-joined order summary: `"<i>. <name>"` per cart
    /// line. Costs and totals are UI-only and never transmitted.
    pub fn order_lines(&self) -> String {
        self.cart
            .iter()
            .enumerate()
            .map(|(i, item)| format!("{}. {}", i + 1, item.product.name))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn snapshot(&self) -> StateSnapshot {
        let products = self
            .catalog
            .filtered(&self.filter)
            .map(|p| ProductView {
                in_cart: self.in_cart(p.id),
                affordable: self.balances.covers(p),
                product: p.clone(),
            })
            .collect();

        let totals = self.cart.iter().fold(CartTotals::default(), |acc, item| {
            CartTotals {
                frontend: acc.frontend + item.product.frontend,
                backend: acc.backend + item.product.backend,
            }
        });

        StateSnapshot {
            balances: self.balances,
            filter: self.filter.clone(),
            categories: self.catalog.categories().to_vec(),
            products,
            cart: self.cart.clone(),
            totals,
            phase: self.phase,
        }
    }

    // ===== 內部 =====

    fn ensure_idle(&self) -> Result<()> {
        if self.phase == CheckoutPhase::Dispatching {
            return Err(self.reject(CartError::CheckoutInProgress));
        }
        Ok(())
    }

    /// Routes a rejected operation through the notification policy before
    /// handing the error back. State is untouched at this point.
    fn reject(&self, err: CartError) -> CartError {
        let mode = match &err {
            CartError::UnknownProduct(_) => self.policy.unknown_product,
            CartError::DuplicateProduct(_) => self.policy.duplicate_product,
            CartError::InsufficientResources { .. } => self.policy.insufficient_resources,
            CartError::CheckoutInProgress => self.policy.checkout_in_progress,
            _ => NoticeMode::Popup,
        };
        match mode {
            NoticeMode::Popup => {
                let (title, message) = err.user_message();
                self.host.show_popup(&PopupRequest::new(title, message));
            }
            NoticeMode::Silent => {
                tracing::debug!("Silently rejected operation: {}", err);
            }
        }
        err
    }

    fn emit_state_changed(&mut self) {
        let snapshot = self.snapshot();
        for observer in self.observers.iter_mut() {
            observer.state_changed(&snapshot);
        }
    }
}
