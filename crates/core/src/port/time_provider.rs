// Clock Port
// Stamps cleanup reports and times PlatformIO steps.

use chrono::Utc;

/// Wall clock in Unix milliseconds
pub trait TimeProvider: Send + Sync {
    fn now_millis(&self) -> i64;

    /// Milliseconds since `start`; clamped at zero if the clock went backwards
    fn elapsed_since(&self, start: i64) -> i64 {
        self.now_millis().saturating_sub(start).max(0)
    }
}

/// Backed by `chrono::Utc`
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Always reports the same instant
pub struct FixedTimeProvider(pub i64);

impl TimeProvider for FixedTimeProvider {
    fn now_millis(&self) -> i64 {
        self.0
    }
}
