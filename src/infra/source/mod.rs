//! Slot-source adapters.

pub mod scripted;

pub use scripted::{ScriptStats, ScriptedFactory, ScriptedSource};
