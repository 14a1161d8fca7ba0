//! Day/night cycle
//!
//! Drives actor sleep schedules, town daylight visibility and the
//! night bonus of the pursuit gates.

use serde::{Deserialize, Serialize};

use crate::core::types::Tick;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeOfDay {
    Day,
    Night,
}

/// Turn-based day/night cycle with an optional forced override (testing, scripted events)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayNightCycle {
    cycle_length: Tick,
    day_duration: Tick,
    override_time: Option<TimeOfDay>,
}

impl DayNightCycle {
    pub fn new(cycle_length: Tick, day_duration: Tick) -> Self {
        Self {
            cycle_length,
            day_duration,
            override_time: None,
        }
    }

    /// Daytime covers the first `day_duration` turns of each cycle.
    /// A zero-length cycle is permanent day.
    pub fn time_of_day(&self, turn: Tick) -> TimeOfDay {
        if let Some(forced) = self.override_time {
            return forced;
        }
        if self.cycle_length == 0 {
            return TimeOfDay::Day;
        }
        if turn % self.cycle_length < self.day_duration {
            TimeOfDay::Day
        } else {
            TimeOfDay::Night
        }
    }

    pub fn is_daytime(&self, turn: Tick) -> bool {
        self.time_of_day(turn) == TimeOfDay::Day
    }

    pub fn force_day(&mut self) {
        self.override_time = Some(TimeOfDay::Day);
    }

    pub fn force_night(&mut self) {
        self.override_time = Some(TimeOfDay::Night);
    }

    pub fn clear_override(&mut self) {
        self.override_time = None;
    }

    pub fn cycle_length(&self) -> Tick {
        self.cycle_length
    }
}

impl Default for DayNightCycle {
    fn default() -> Self {
        Self::new(1000, 500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_boundaries() {
        let cycle = DayNightCycle::new(100, 60);
        assert_eq!(cycle.time_of_day(0), TimeOfDay::Day);
        assert_eq!(cycle.time_of_day(59), TimeOfDay::Day);
        assert_eq!(cycle.time_of_day(60), TimeOfDay::Night);
        assert_eq!(cycle.time_of_day(99), TimeOfDay::Night);
        assert_eq!(cycle.time_of_day(100), TimeOfDay::Day);
    }

    #[test]
    fn test_zero_cycle_is_always_day() {
        let cycle = DayNightCycle::new(0, 0);
        assert!(cycle.is_daytime(12345));
    }

    #[test]
    fn test_override() {
        let mut cycle = DayNightCycle::new(100, 60);
        cycle.force_night();
        assert_eq!(cycle.time_of_day(0), TimeOfDay::Night);
        cycle.force_day();
        assert_eq!(cycle.time_of_day(80), TimeOfDay::Day);
        cycle.clear_override();
        assert_eq!(cycle.time_of_day(80), TimeOfDay::Night);
    }
}
