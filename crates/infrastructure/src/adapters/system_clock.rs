//! System clock adapter

use chrono::{DateTime, Utc};
use smoke_application::ports::Clock;

/// Wall clock; run identities are derived from it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Creates a new system clock.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use smoke_domain::TestIdentity;

    #[test]
    fn test_identity_carries_current_unix_seconds() {
        let before = Utc::now().timestamp();
        let identity = TestIdentity::at(SystemClock::new().now());
        let after = Utc::now().timestamp();

        let stamp: i64 = identity
            .username
            .strip_prefix("testuser_")
            .unwrap()
            .parse()
            .unwrap();
        assert!((before..=after).contains(&stamp), "{stamp} not in {before}..={after}");
        assert_eq!(identity.email, format!("testuser_{stamp}@example.com"));
    }
}
