//! Core library for the Kalsa court-availability bot.
//!
//! This crate defines:
//! - The facility/team configuration table
//! - Weekday resolution ("next Wednesday, today included")
//! - Abstraction over the booking API plus the avoinna24 client
//! - The availability decision and its user-facing messages
//!
//! It is used by `kalsa-bot`, but can also be reused by other binaries or services.

pub mod checker;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod weekday;

pub use checker::{check, decide};
pub use config::{TeamConfig, TeamTable};
pub use error::SlotError;
pub use model::{Availability, FacilityQuery, SlotRecord, LOCAL_TZ};
pub use provider::{SlotApi, avoinna24::Avoinna24Client};
pub use weekday::next_occurrence;
