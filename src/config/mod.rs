//! Configuration models for booking runs and credentials.

pub mod booking;
pub mod credentials;

pub use booking::BookingConfig;
pub use credentials::{Credentials, PASSWORD_ENV, USERNAME_ENV};
