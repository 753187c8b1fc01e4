//! Notification sinks.

pub mod memory;
pub mod tracing_notifier;

pub use memory::{InMemoryNotifier, NotificationEvent};
pub use tracing_notifier::TracingNotifier;
