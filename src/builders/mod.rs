//! Builders to construct booking managers from configuration.

pub mod manager_builder;

pub use manager_builder::ManagerBuilder;
