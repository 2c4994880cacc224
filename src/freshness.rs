//! Staleness filtering for observation fields
//!
//! A reading older than the staleness window is withheld rather than
//! published, so a dead station never keeps reporting its last numbers.

use crate::client::{Observation, ObservationField};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Extract a field value, withholding it when the record is stale
///
/// Returns the raw field value while the record's age is below
/// `stale_after`, `None` otherwise. A missing field is `None` without being
/// an error. Negative age (capture time ahead of `now`, i.e. clock skew
/// between station and host) is treated as fresh.
pub fn fresh_field(
    record: &Observation,
    field: ObservationField,
    now: DateTime<Utc>,
    stale_after: Duration,
) -> Option<f64> {
    if is_fresh(record, now, stale_after) {
        record.field(field)
    } else {
        None
    }
}

/// Whether the record's age is within the staleness window
pub fn is_fresh(record: &Observation, now: DateTime<Utc>, stale_after: Duration) -> bool {
    let age = now - record.captured_at();
    match age.to_std() {
        Ok(age) => age < stale_after,
        // Negative age: capture timestamp is in the future, treat as fresh
        Err(_) => true,
    }
}
