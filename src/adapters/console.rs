use crate::domain::model::{HostUser, PopupRequest};
use crate::domain::ports::HostPlatform;

/// Console stand-in for the host platform, mirroring the `alert` fallback
/// the mini-app uses when it runs outside its chat host.
#[derive(Debug, Default)]
pub struct ConsoleHost {
    user: Option<HostUser>,
}

impl ConsoleHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(user: HostUser) -> Self {
        Self { user: Some(user) }
    }
}

impl HostPlatform for ConsoleHost {
    fn show_popup(&self, popup: &PopupRequest) {
        println!("[{}] {}", popup.title, popup.message);
    }

    fn current_user(&self) -> Option<HostUser> {
        self.user.clone()
    }
}
