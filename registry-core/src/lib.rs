//! Conference Registry Core
//!
//! State-keeping registry for a single conference: a catalog of talks with
//! speakers, talk cancellation, and paid attendee registration with fund
//! custody and change-giving.
//!
//! # Architecture
//!
//! - **One state machine**: [`state::RegistryState`] owns every talk record,
//!   both index maps, the attendee roster and the custody balance
//! - **Single writer**: one actor task serializes all operations, so each
//!   commits entirely before the next begins
//! - **Atomic transitions**: every operation validates all preconditions
//!   before mutating; an error never leaves a partial commit
//! - **Structured notifications**: each mutation appends exactly one event
//!   to an append-only log
//!
//! # Invariants
//!
//! - Talk ids are 1, 2, 3, ... in add order; never reused, never removed
//! - Cancellation flips a flag; the speaker index is never compacted
//! - Custody grows by exactly the registration price per registration;
//!   overpayment is refunded within the same operation
//! - At most one registration per identity handle

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod actor;
pub mod config;
pub mod error;
pub mod metrics;
pub mod registry;
pub mod state;
pub mod types;

// Re-exports
pub use config::Config;
pub use error::{Error, Result};
pub use registry::Conference;
pub use state::RegistryState;
pub use types::{
    Address, EventRecord, RegistrationReceipt, RegistryEvent, Speaker, Talk, TalkId,
};
