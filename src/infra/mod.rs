//! Infrastructure adapters: notification sinks and slot sources.

pub mod notify;
pub mod source;

pub use notify::{InMemoryNotifier, NotificationEvent, TracingNotifier};
pub use source::{ScriptStats, ScriptedFactory, ScriptedSource};
