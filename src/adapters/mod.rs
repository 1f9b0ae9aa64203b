// Adapters layer: concrete implementations for external systems (webhook
// delivery, host platform).

pub mod console;
pub mod mattermost;

pub use self::console::ConsoleHost;
pub use self::mattermost::MattermostSink;
