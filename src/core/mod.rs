pub mod cart;
pub mod catalog;
pub mod checkout;

pub use crate::domain::model::{
    Balances, CartItem, Category, CategoryFilter, CheckoutPhase, NoticeMode, NoticePolicy,
    OrderPayload, Product, ProductId, StateSnapshot,
};
pub use crate::domain::ports::{HostPlatform, OrderSink, StateObserver};
pub use crate::utils::error::Result;
pub use self::cart::CartEngine;
pub use self::catalog::Catalog;
pub use self::checkout::CheckoutDispatcher;
