//! Core types for the conference registry
//!
//! All types are designed for:
//! - Deterministic state transitions (no hidden clocks in the core model)
//! - Memory safety (no unsafe code)
//! - Exact arithmetic (Decimal for money)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Talk identifier, assigned sequentially starting at 1 and never reused.
pub type TalkId = u64;

/// Identity handle for the owner, speakers and attendees.
///
/// Compared by plain equality; the registry attaches no further meaning
/// to its contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Create new address
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A speaker slot on a talk: identity handle plus display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speaker {
    /// Identity handle
    pub address: Address,
    /// Display name
    pub name: String,
}

/// A scheduled session.
///
/// `start_time`/`end_time` are caller-supplied timestamps; the registry does
/// not enforce any ordering between them. Cancellation flips `canceled` and
/// nothing else: the record is never removed and its id is never reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Talk {
    /// Sequential id, starting at 1
    pub id: TalkId,

    /// Talk title
    pub title: String,

    /// Room or venue
    pub location: String,

    /// Start timestamp (caller-supplied)
    pub start_time: i64,

    /// End timestamp (caller-supplied)
    pub end_time: i64,

    /// Speakers in insertion order; duplicates permitted
    pub speakers: Vec<Speaker>,

    /// Cancellation flag
    pub canceled: bool,
}

impl Talk {
    /// Speaker identity handles in insertion order
    pub fn speaker_addresses(&self) -> Vec<Address> {
        self.speakers.iter().map(|s| s.address.clone()).collect()
    }

    /// Speaker display names, parallel to [`Talk::speaker_addresses`]
    pub fn speaker_names(&self) -> Vec<String> {
        self.speakers.iter().map(|s| s.name.clone()).collect()
    }
}

/// Structured notification emitted by every mutating operation.
///
/// Events are appended to an in-memory log and returned to the caller so
/// off-system observers can confirm a transition without re-querying state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RegistryEvent {
    /// A talk was added to the catalog
    TalkAdded {
        /// Assigned talk id
        id: TalkId,
        /// Talk title
        title: String,
        /// Start timestamp
        start_time: i64,
        /// End timestamp
        end_time: i64,
    },

    /// A talk was canceled
    TalkCanceled {
        /// Talk id
        id: TalkId,
        /// Talk title
        title: String,
        /// Start timestamp
        start_time: i64,
        /// End timestamp
        end_time: i64,
    },

    /// An attendee registered and paid
    AttendeeRegistered {
        /// Attendee full name
        name: String,
    },

    /// The owner withdrew custodied funds
    FundsWithdrawn {
        /// Amount released to the owner
        amount: Decimal,
    },
}

/// An event with its position and wall-clock time of recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Sequence number, starting at 0
    pub seq: u64,

    /// Wall-clock time the event was recorded
    pub recorded_at: DateTime<Utc>,

    /// The notification itself
    pub event: RegistryEvent,
}

/// Outcome of a successful registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationReceipt {
    /// Amount returned to the caller (zero on exact payment)
    pub refund: Decimal,

    /// Amount retained in custody (always the registration price)
    pub paid: Decimal,
}
