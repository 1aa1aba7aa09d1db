//! Domain core of the carbonboard admin console.
//!
//! Everything here is pure: no I/O, no clock other than [`DayKey::today`].
//! The crate provides:
//!
//! - [`DayKey`]: calendar-day keys used to group activity records.
//! - [`aggregate`]: per-day CO₂e breakdown over the four [`Category`] values.
//! - [`apply_status`]: the one-way `Pending -> terminal` status rule for
//!   [`Transaction`] records.
//! - [`rank`]: leaderboard ordering.
//! - [`Generation`]: tickets used to discard responses of superseded requests.
pub use activity::{
    ActivityBreakdown, ActivityRecord, Category, CategoryTotal, MIN_LABEL_PERCENT,
    VISIBLE_EPSILON, aggregate, daily_totals,
};
pub use day_key::{DayKey, is_null_date};
pub use error::EngineError;
pub use generation::{Generation, Ticket};
pub use leaderboard::{Medal, Ranked, TOP_CONTRIBUTORS, rank};
pub use transactions::{
    Transaction, TransactionId, TransactionStatus, apply_status, can_transition,
};

mod activity;
mod day_key;
mod error;
mod generation;
mod leaderboard;
mod transactions;
