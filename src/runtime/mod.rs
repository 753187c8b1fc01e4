//! Runtime adapters and the reporting surface.

pub mod api;
pub mod tokio_sleeper;

pub use api::{exit_code, RunOutcome, RunReport};
pub use tokio_sleeper::TokioSleeper;
