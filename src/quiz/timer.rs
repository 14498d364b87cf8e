//! Countdown model for timed questions. Pure: the controller feeds it one
//! `tick()` per host interval and renders what comes back.

use crate::config::CONFIG;
use crate::progress::first_int;

/// `M:SS`, minutes unpadded.
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Visual urgency of the remaining time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeWarning {
    None,
    /// Color change.
    Low,
    /// Color change plus pulsing.
    Critical,
}

impl TimeWarning {
    pub fn for_remaining(seconds: u32) -> Self {
        if seconds <= CONFIG.quiz.critical_threshold_secs {
            TimeWarning::Critical
        } else if seconds <= CONFIG.quiz.warning_threshold_secs {
            TimeWarning::Low
        } else {
            TimeWarning::None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    Running { remaining: u32, warning: TimeWarning },
    /// Reached zero on this tick. Reported exactly once.
    Expired,
    /// Already stopped or expired; nothing to do.
    Idle,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    running: bool,
}

impl Countdown {
    /// A countdown of `seconds`. Zero starts already expired.
    pub fn new(seconds: u32) -> Self {
        Self {
            remaining: seconds,
            running: seconds > 0,
        }
    }

    /// Reads the first integer of the time display (`"Temps : 45s"` → 45).
    /// No integer means the page has no timer.
    pub fn from_display(text: &str) -> Option<Self> {
        first_int(text).map(Countdown::new)
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    pub fn tick(&mut self) -> Tick {
        if !self.running {
            return Tick::Idle;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            return Tick::Expired;
        }
        Tick::Running {
            remaining: self.remaining,
            warning: TimeWarning::for_remaining(self.remaining),
        }
    }

    /// Stops ticking. Returns whether it was running; safe to repeat.
    pub fn stop(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_padded_seconds() {
        assert_eq!(format_time(65), "1:05");
        assert_eq!(format_time(5), "0:05");
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(600), "10:00");
    }

    #[test]
    fn expires_after_exactly_initial_ticks() {
        for initial in 1..=40u32 {
            let mut c = Countdown::new(initial);
            let mut ticks = 0;
            loop {
                ticks += 1;
                match c.tick() {
                    Tick::Running { remaining, .. } => assert_eq!(remaining, initial - ticks),
                    Tick::Expired => break,
                    Tick::Idle => panic!("idle before expiry"),
                }
            }
            assert_eq!(ticks, initial);
            assert_eq!(c.tick(), Tick::Idle);
        }
    }

    #[test]
    fn zero_is_expired_without_ticking() {
        let mut c = Countdown::new(0);
        assert!(c.is_expired());
        assert!(!c.is_running());
        assert_eq!(c.tick(), Tick::Idle);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut c = Countdown::new(30);
        assert!(c.stop());
        assert!(!c.stop());
        assert_eq!(c.tick(), Tick::Idle);
        assert_eq!(c.remaining(), 30);
    }

    #[test]
    fn warning_thresholds() {
        assert_eq!(TimeWarning::for_remaining(31), TimeWarning::None);
        assert_eq!(TimeWarning::for_remaining(30), TimeWarning::Low);
        assert_eq!(TimeWarning::for_remaining(11), TimeWarning::Low);
        assert_eq!(TimeWarning::for_remaining(10), TimeWarning::Critical);
    }

    #[test]
    fn display_parsing() {
        assert_eq!(Countdown::from_display("Temps restant : 45 s").map(|c| c.remaining()), Some(45));
        assert_eq!(Countdown::from_display("1:30").map(|c| c.remaining()), Some(1));
        assert_eq!(Countdown::from_display("illimité"), None);
        let huge = Countdown::from_display("99999999999").map(|c| c.is_running());
        assert_eq!(huge, Some(true));
    }
}
