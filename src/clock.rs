use chrono::{Duration, NaiveDateTime, NaiveTime, Utc};
use crate::constants::LOCAL_TZ;
use crate::time::parse_clock_time;

/// Current wall-clock time in Dhaka
#[must_use]
pub fn system_now() -> NaiveDateTime {
    Utc::now().with_timezone(&LOCAL_TZ).naive_local()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ClockMode {
    #[default]
    System,
    /// Runs at real-time rate, shifted from the system clock
    Override { offset: Duration },
    Paused { frozen: NaiveDateTime },
}

/// Source of "now" for every schedule query
///
/// The clock never reads the system time itself; callers pass the current
/// system time in so behaviour is a pure function of its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Clock {
    mode: ClockMode,
}

impl Clock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn now(&self, system_now: NaiveDateTime) -> NaiveDateTime {
        match self.mode {
            ClockMode::System => system_now,
            ClockMode::Override { offset } => system_now + offset,
            ClockMode::Paused { frozen } => frozen,
        }
    }

    /// Override the time of day from admin input (`HH:MM` or `HH:MM:SS`)
    ///
    /// The date stays today's. A paused clock stays paused at the new time.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the clock unchanged, if the input is not a valid time
    pub fn set_override(&mut self, input: &str, system_now: NaiveDateTime) -> Result<(), String> {
        let time = parse_clock_time(input)
            .map_err(|_| format!("Please enter time in HH:MM or HH:MM:SS format (got \"{}\")", input.trim()))?;
        self.set_override_time(time, system_now);
        Ok(())
    }

    pub fn set_override_time(&mut self, time: NaiveTime, system_now: NaiveDateTime) {
        let target = system_now.date().and_time(time);
        self.mode = match self.mode {
            ClockMode::Paused { .. } => ClockMode::Paused { frozen: target },
            ClockMode::System | ClockMode::Override { .. } => ClockMode::Override {
                offset: target - system_now,
            },
        };
    }

    /// Freeze the clock at its current value
    pub fn pause(&mut self, system_now: NaiveDateTime) {
        if !self.is_paused() {
            self.mode = ClockMode::Paused {
                frozen: self.now(system_now),
            };
        }
    }

    /// Continue from the frozen value at real-time rate
    pub fn resume(&mut self, system_now: NaiveDateTime) {
        if let ClockMode::Paused { frozen } = self.mode {
            self.mode = ClockMode::Override {
                offset: frozen - system_now,
            };
        }
    }

    pub fn toggle_pause(&mut self, system_now: NaiveDateTime) {
        if self.is_paused() {
            self.resume(system_now);
        } else {
            self.pause(system_now);
        }
    }

    /// Drop any override and pause, returning to the system clock
    pub fn reset(&mut self) {
        self.mode = ClockMode::System;
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        matches!(self.mode, ClockMode::Paused { .. })
    }

    #[must_use]
    pub fn is_overridden(&self) -> bool {
        !matches!(self.mode, ClockMode::System)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .and_then(|d| d.and_hms_opt(h, m, s))
            .expect("valid datetime")
    }

    #[test]
    fn test_system_clock_passes_through() {
        let clock = Clock::new();
        assert_eq!(clock.now(at(10, 0, 0)), at(10, 0, 0));
        assert!(!clock.is_overridden());
    }

    #[test]
    fn test_override_drifts_with_real_time() {
        let mut clock = Clock::new();
        clock.set_override("06:09:45", at(14, 0, 0)).expect("valid input");

        assert_eq!(clock.now(at(14, 0, 0)), at(6, 9, 45));
        assert_eq!(clock.now(at(14, 0, 20)), at(6, 10, 5));
        assert!(clock.is_overridden());
    }

    #[test]
    fn test_override_accepts_hh_mm() {
        let mut clock = Clock::new();
        clock.set_override("21:30", at(9, 15, 0)).expect("valid input");
        assert_eq!(clock.now(at(9, 15, 0)), at(21, 30, 0));
    }

    #[test]
    fn test_malformed_override_leaves_state_unchanged() {
        let mut clock = Clock::new();
        clock.set_override("07:00", at(12, 0, 0)).expect("valid input");
        let before = clock;

        assert!(clock.set_override("7 o'clock", at(12, 0, 0)).is_err());
        assert!(clock.set_override("24:10", at(12, 0, 0)).is_err());
        assert_eq!(clock, before);
    }

    #[test]
    fn test_pause_freezes_and_resume_continues() {
        let mut clock = Clock::new();
        clock.set_override("08:00:00", at(12, 0, 0)).expect("valid input");

        clock.pause(at(12, 0, 10));
        assert!(clock.is_paused());
        assert_eq!(clock.now(at(12, 5, 0)), at(8, 0, 10));

        clock.resume(at(12, 5, 0));
        assert!(!clock.is_paused());
        assert_eq!(clock.now(at(12, 5, 0)), at(8, 0, 10));
        assert_eq!(clock.now(at(12, 5, 30)), at(8, 0, 40));
    }

    #[test]
    fn test_pause_system_clock() {
        let mut clock = Clock::new();
        clock.toggle_pause(at(9, 0, 0));
        assert_eq!(clock.now(at(9, 30, 0)), at(9, 0, 0));
        clock.toggle_pause(at(9, 30, 0));
        assert_eq!(clock.now(at(9, 30, 1)), at(9, 0, 1));
    }

    #[test]
    fn test_set_override_while_paused_stays_paused() {
        let mut clock = Clock::new();
        clock.pause(at(9, 0, 0));
        clock.set_override("17:45", at(9, 0, 0)).expect("valid input");
        assert!(clock.is_paused());
        assert_eq!(clock.now(at(11, 0, 0)), at(17, 45, 0));
    }

    #[test]
    fn test_reset_returns_to_system_time() {
        let mut clock = Clock::new();
        clock.set_override("05:00", at(12, 0, 0)).expect("valid input");
        clock.pause(at(12, 0, 0));
        clock.reset();
        assert!(!clock.is_paused());
        assert_eq!(clock.now(at(13, 0, 0)), at(13, 0, 0));
    }
}
