//! Persistence for submissions and rate-limit counters (Redis).
//!
//! Submissions and rate-limit counters are independent entity types and
//! live behind separate traits with their own keyspaces - there is no
//! prefix-sniffing of a shared table. All records carry a TTL and expire
//! without cleanup jobs.
//!
//! ## Redis key patterns
//!
//! ```text
//! submission:{uuid}                 → Submission JSON (retention TTL)
//! slot:{YYYY-MM-DD-HH:MM}           → owning submission id (SET NX guard)
//! ratelimit:{client}:{window_idx}   → request count (2x window TTL)
//! ```
//!
//! The slot key doubles as the double-booking guard: claiming a slot is a
//! conditional insert on the slot key itself, so two concurrent bookings
//! for the same slot cannot both succeed.

mod rate_limit;
mod submissions;

pub use rate_limit::{RateLimitResult, RateLimiter, RedisRateLimiter};
pub use submissions::{RedisSubmissionStore, SubmissionStore};

#[cfg(test)]
pub use rate_limit::MockRateLimiter;
#[cfg(test)]
pub use submissions::MockSubmissionStore;

use std::sync::Arc;

/// Collection of all stores.
#[derive(Clone)]
pub struct Stores {
    pub submissions: Arc<dyn SubmissionStore>,
    pub rate_limiter: Arc<dyn RateLimiter>,
}
