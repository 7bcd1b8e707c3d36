//! Per-user cooldown gate

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::domain::traits::Clock;

/// Rejection carrying how long the user still has to wait
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CooldownActive {
    pub remaining: Duration,
}

impl CooldownActive {
    pub fn remaining_secs(&self) -> f64 {
        self.remaining.as_secs_f64()
    }
}

/// Tracks the last successful use of a command per user.
///
/// Records are never evicted. `check` does not write; callers `record` only
/// after the guarded work has completed.
pub struct CooldownGate {
    window: Duration,
    clock: Arc<dyn Clock>,
    last_used: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl CooldownGate {
    pub fn new(window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            window,
            clock,
            last_used: Mutex::new(HashMap::new()),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn check(&self, user_id: &str) -> Result<(), CooldownActive> {
        let now = self.clock.now();
        let last_used = self.last_used.lock().unwrap_or_else(|e| e.into_inner());

        let Some(last) = last_used.get(user_id) else {
            return Ok(());
        };

        // A clock that went backwards counts as "just used"
        let elapsed = (now - *last).to_std().unwrap_or_default();
        if elapsed < self.window {
            return Err(CooldownActive {
                remaining: self.window - elapsed,
            });
        }
        Ok(())
    }

    pub fn record(&self, user_id: &str) {
        let now = self.clock.now();
        self.last_used
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(user_id.to_string(), now);
    }

    /// Number of users with a record
    pub fn len(&self) -> usize {
        self.last_used.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traits::ManualClock;

    fn new_gate(window_secs: u64) -> (CooldownGate, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        (CooldownGate::new(Duration::from_secs(window_secs), clock.clone()), clock)
    }

    #[test]
    fn test_first_use_is_allowed() {
        let (gate, _) = new_gate(10);
        assert!(gate.check("u1").is_ok());
        assert!(gate.is_empty());
    }

    #[test]
    fn test_reports_remaining_time() {
        let (gate, clock) = new_gate(10);
        gate.record("u1");
        clock.advance(chrono::Duration::seconds(3));

        let active = gate.check("u1").unwrap_err();
        assert!((active.remaining_secs() - 7.0).abs() < 1e-6);
        assert_eq!(format!("{:.1}", active.remaining_secs()), "7.0");
    }

    #[test]
    fn test_rejection_does_not_update_record() {
        let (gate, clock) = new_gate(10);
        gate.record("u1");
        clock.advance(chrono::Duration::seconds(6));
        assert!(gate.check("u1").is_err());

        // Had the rejected check refreshed the record, this would still fail
        clock.advance(chrono::Duration::seconds(4));
        assert!(gate.check("u1").is_ok());
    }

    #[test]
    fn test_users_are_independent() {
        let (gate, _) = new_gate(10);
        gate.record("u1");
        assert!(gate.check("u1").is_err());
        assert!(gate.check("u2").is_ok());
        assert_eq!(gate.len(), 1);
    }

    #[test]
    fn test_clock_going_backwards_keeps_full_window() {
        let (gate, clock) = new_gate(10);
        gate.record("u1");
        clock.advance(chrono::Duration::seconds(-5));

        let active = gate.check("u1").unwrap_err();
        assert_eq!(active.remaining, Duration::from_secs(10));
    }
}
