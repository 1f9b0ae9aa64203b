use crate::domain::model::{HostUser, OrderPayload, PopupRequest, StateSnapshot};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Host platform surface (popup primitive + optional current user).
/// `show_popup` is fire-and-forget: the engine never inspects a result.
pub trait HostPlatform: Send + Sync {
    fn show_popup(&self, popup: &PopupRequest);

    fn current_user(&self) -> Option<HostUser> {
        None
    }
}

/// Outbound order delivery. One attempt, no retry; the dispatcher judges
/// the returned HTTP status, transport failures come back as `Err`.
#[async_trait]
pub trait OrderSink: Send + Sync {
    /// False when no real endpoint is configured (missing or placeholder).
    fn is_configured(&self) -> bool;

    async fn deliver(&self, payload: &OrderPayload) -> Result<u16>;
}

/// Rendering collaborator hook. The engine pushes a fresh snapshot after
/// every mutation; `checkout_succeeded` tells the UI to close any open
/// cart view.
pub trait StateObserver: Send {
    fn state_changed(&mut self, snapshot: &StateSnapshot);

    fn checkout_succeeded(&mut self) {}
}
