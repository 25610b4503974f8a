//! # Ticket
//!
//! The parking ticket entity and its tiered fee schedule.
//!
//! ## Ticket Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Ticket Lifecycle                                │
//! │                                                                         │
//! │  1. ISSUE (store assigns id, sets time_in)                              │
//! │     └── Ticket { paid: 0, card: "" }            ← OPEN                  │
//! │                                                                         │
//! │  2. LOOK UP (any number of times, no mutation)                          │
//! │     └── show_owing() → "$6.75"                                          │
//! │                                                                         │
//! │  3. SETTLE (exactly once)                                               │
//! │     └── settle(card) → Ticket { paid: 675, card, time_paid }  ← PAID    │
//! │                                                                         │
//! │  Tickets are never deleted.                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Fee Schedule
//! ```text
//! elapsed hours          increases   owing
//! ─────────────────────  ─────────   ─────
//! h <= 1.0                   0        300
//! 1.0 < h < 3.0              1        450
//! 3.0 <= h <= 6.0            2        675
//! h > 6.0                    3       1012
//! ```
//! The boundaries are not symmetric: exactly one hour is still the base rate,
//! while exactly three and exactly six hours both fall in the two-increase tier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::BASE_RATE_CENTS;

/// Ticket identifier assigned by the store's sequence.
pub type TicketId = i64;

const MICROS_PER_HOUR: f64 = 3_600_000_000.0;

/// Parses a ticket id from text, such as a URL path segment.
///
/// ## Errors
/// `CoreError::InvalidTicketId` for anything that is not a positive integer.
pub fn parse_ticket_id(raw: &str) -> CoreResult<TicketId> {
    match raw.trim().parse::<TicketId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(CoreError::InvalidTicketId(raw.to_string())),
    }
}

// =============================================================================
// Fee Tier
// =============================================================================

/// One of the four elapsed-time buckets of the fee schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeTier {
    /// Up to and including one hour.
    Base,
    /// More than one hour, less than three.
    Short,
    /// Three to six hours, both ends inclusive.
    Medium,
    /// More than six hours.
    Long,
}

impl FeeTier {
    /// Picks the tier for a number of elapsed hours.
    ///
    /// Anything that is not strictly above one hour (including negative
    /// values from clock skew) is charged the base rate.
    pub fn for_elapsed_hours(hours: f64) -> Self {
        if hours > 1.0 && hours < 3.0 {
            FeeTier::Short
        } else if (3.0..=6.0).contains(&hours) {
            FeeTier::Medium
        } else if hours > 6.0 {
            FeeTier::Long
        } else {
            FeeTier::Base
        }
    }

    /// How many times the base rate is increased for this tier.
    pub const fn increases(self) -> u32 {
        match self {
            FeeTier::Base => 0,
            FeeTier::Short => 1,
            FeeTier::Medium => 2,
            FeeTier::Long => 3,
        }
    }

    /// The amount owed for a ticket in this tier.
    pub fn owing(self) -> Money {
        Money::from_cents(BASE_RATE_CENTS).compound_increase(self.increases())
    }
}

// =============================================================================
// Ticket
// =============================================================================

/// One issued parking session.
///
/// Values handed out by the store are copies; changing one has no effect on
/// the stored record until it is passed back to `save` or `pay`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique, never reused, never changed after creation.
    pub id: TicketId,

    /// When the parking session started. Set once at creation.
    pub time_in: DateTime<Utc>,

    /// When the ticket was settled. `None` while open.
    #[serde(default)]
    pub time_paid: Option<DateTime<Utc>>,

    /// Amount recorded at settlement. Zero while open.
    #[serde(default)]
    pub paid: Money,

    /// Opaque payment token. Empty while open; never validated.
    #[serde(default)]
    pub card: String,
}

impl Ticket {
    /// Creates an open ticket.
    pub fn issue(id: TicketId, time_in: DateTime<Utc>) -> Self {
        Ticket {
            id,
            time_in,
            time_paid: None,
            paid: Money::zero(),
            card: String::new(),
        }
    }

    /// A ticket is paid iff a positive amount has been recorded.
    #[inline]
    pub fn is_paid(&self) -> bool {
        self.paid.is_positive()
    }

    /// Hours between `time_in` and `now`, as a float.
    pub fn elapsed_hours(&self, now: DateTime<Utc>) -> f64 {
        let elapsed = now.signed_duration_since(self.time_in);
        match elapsed.num_microseconds() {
            Some(micros) => micros as f64 / MICROS_PER_HOUR,
            None => elapsed.num_seconds() as f64 / 3600.0,
        }
    }

    /// The fee tier this ticket falls in at `now`.
    pub fn tier_at(&self, now: DateTime<Utc>) -> FeeTier {
        FeeTier::for_elapsed_hours(self.elapsed_hours(now))
    }

    /// What the ticket owes at `now`.
    pub fn owing_at(&self, now: DateTime<Utc>) -> Money {
        self.tier_at(now).owing()
    }

    /// What the ticket owes right now, by the wall clock.
    pub fn calculate_owing(&self) -> Money {
        self.owing_at(Utc::now())
    }

    /// Formats the current owing as `$D.CC`.
    ///
    /// The amount is also emitted as a tracing event; a missing or failing
    /// subscriber never changes the returned string.
    pub fn show_owing(&self) -> String {
        let owing = self.calculate_owing();
        info!(ticket_id = self.id, owing_cents = owing.cents(), "Owing calculated");
        owing.to_string()
    }

    /// Records payment at `now`: freezes the owed amount and stores the token.
    ///
    /// ## Errors
    /// `CoreError::AlreadyPaid` if a payment was recorded before. The ticket
    /// is left untouched in that case.
    pub fn settle(&mut self, card: impl Into<String>, now: DateTime<Utc>) -> CoreResult<Money> {
        if self.is_paid() {
            return Err(CoreError::AlreadyPaid(self.id));
        }

        let owing = self.owing_at(now);
        self.paid = owing;
        self.card = card.into();
        self.time_paid = Some(now);
        Ok(owing)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
