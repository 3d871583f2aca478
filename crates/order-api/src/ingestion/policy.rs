//! The order-ingestion policy as a pure function.
//!
//! Rules are checked in order and the first match wins:
//!
//! 1. `order_id` divisible by 10 (Euclidean remainder) fails.
//! 2. `order_id` in `20..=40` is delayed by a random duration in `[500ms, 1900ms)`.
//! 3. Anything else is accepted immediately.
//!
//! So 20, 30 and 40 fail; 25 and 35 are delayed.

use rand::Rng;
use std::ops::RangeInclusive;
use std::time::Duration;

pub const FAILURE_MODULUS: i64 = 10;
pub const DELAY_RANGE: RangeInclusive<i64> = 20..=40;
pub const MIN_DELAY_MS: u64 = 500;
pub const MAX_DELAY_MS: u64 = 1900;

/// What ingestion does with an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    Fail { reason: String },
    Delay(Duration),
    Accept,
}

pub fn classify<R: Rng + ?Sized>(order_id: i64, rng: &mut R) -> Disposition {
    if order_id.rem_euclid(FAILURE_MODULUS) == 0 {
        return Disposition::Fail {
            reason: format!("Simulated failure for order {order_id}"),
        };
    }
    if DELAY_RANGE.contains(&order_id) {
        return Disposition::Delay(Duration::from_millis(
            rng.random_range(MIN_DELAY_MS..MAX_DELAY_MS),
        ));
    }
    Disposition::Accept
}
