//! # Slot Booker
//!
//! Unattended polling and reservation of scarce, slowly refreshed time slots.
//!
//! Some resources (delivery windows, appointment calendars, class places) are
//! released in small batches at unpredictable times. This crate polls such a
//! resource for hours, reserves the first slot that appears, and survives the
//! browsing session dying underneath it.
//!
//! ## How a run works
//!
//! - **Check first**: if the account already holds a reservation the run ends
//!   immediately without polling.
//! - **Poll with jitter**: each attempt refreshes the listing; waits between
//!   attempts are drawn uniformly from a configured range so the polling
//!   cadence is not predictable.
//! - **Prefer the latest slot**: when several candidates are listed the last
//!   one is reserved.
//! - **Recover, don't retry blindly**: a stale or timed-out session is replaced
//!   and re-authenticated; anything else, and any failed submission, ends the
//!   run with a diagnostic snapshot.
//! - **Leave a trail**: snapshots every fifth attempt, on every failure and on
//!   success; one audit record per attempt.
//!
//! ## Plugging in a site
//!
//! Site-specific scraping lives behind [`core::SlotSource`] and
//! [`core::SessionFactory`]. Everything else is provided.
//!
//! ```rust,ignore
//! use slot_booker::builders::ManagerBuilder;
//! use slot_booker::config::{BookingConfig, Credentials};
//! use slot_booker::infra::TracingNotifier;
//!
//! slot_booker::util::init_tracing();
//! let config = BookingConfig::from_path("booking.json")?;
//! let credentials = Credentials::from_env()?;
//!
//! let builder = ManagerBuilder::new(config);
//! let policy = builder.retry_policy();
//! let manager = builder.build(MySiteFactory::new(), TracingNotifier)?;
//!
//! match manager.run(&policy, &credentials).await? {
//!     Some(reservation) => println!("booked {}", reservation.label),
//!     None => println!("nothing available"),
//! }
//! ```
//!
//! For complete scenarios, see `tests/booking_manager_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Booking state machine, recovery, backoff and the collaborator contracts.
pub mod core;
/// Configuration models for runs and credentials.
pub mod config;
/// Builders to construct booking managers from configuration.
pub mod builders;
/// Infrastructure adapters for notifications and slot sources.
pub mod infra;
/// Runtime adapters and run reporting.
pub mod runtime;
/// Shared utilities.
pub mod util;
