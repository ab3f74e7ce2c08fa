//! Service layer
//!
//! Side effects the default callbacks need from their host: moving the
//! user to a follow-up page and showing a blocking notification.
//!
//! Both are traits so the polling logic runs without a browser or a
//! terminal attached.

mod navigation;
mod notification;

// Re-export traits
pub use navigation::Navigator;
pub use notification::Notifier;

// Re-export implementations
pub use navigation::LogNavigator;
pub use notification::LogNotifier;
