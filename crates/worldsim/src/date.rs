//! In-game calendar and time-of-day helpers.
//! This module exists so schedule lookup, lighting and spawn odds share one notion of time.
//! It does not own turn pacing; callers decide how many minutes a turn consumes.

use serde::{Deserialize, Serialize};

pub const MINUTES_PER_HOUR: u32 = 60;
pub const HOURS_PER_DAY: u32 = 24;
pub const DAYS_PER_MONTH: u32 = 28;
pub const MONTHS_PER_YEAR: u32 = 13;

const DAYLIGHT_START_HOUR: u8 = 5;
const NIGHT_START_HOUR: u8 = 20;

/// Minute within a day, ordered so it can key schedule thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
}

impl TimeOfDay {
    pub const fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }

    pub fn minute_of_day(self) -> u32 {
        u32::from(self.hour) * MINUTES_PER_HOUR + u32::from(self.minute)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
}

impl Default for GameDate {
    fn default() -> Self {
        Self { year: 139, month: 4, day: 5, hour: 9, minute: 0 }
    }
}

impl GameDate {
    pub fn at(hour: u8, minute: u8) -> Self {
        Self { hour, minute, ..Self::default() }
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::new(self.hour, self.minute)
    }

    pub fn is_daylight(&self) -> bool {
        (DAYLIGHT_START_HOUR..NIGHT_START_HOUR).contains(&self.hour)
    }

    pub fn is_night(&self) -> bool {
        !self.is_daylight()
    }

    /// Ambient light level in `[0.0, 1.0]`; full during the day, ramping at dawn and dusk.
    pub fn visibility_factor(&self) -> f32 {
        match self.hour {
            6..=18 => 1.0,
            5 | 19 => 0.6,
            4 | 20 => 0.3,
            _ => 0.0,
        }
    }

    pub fn advance_minutes(&mut self, minutes: u32) {
        let total = u32::from(self.minute) + minutes;
        self.minute = (total % MINUTES_PER_HOUR) as u8;
        let hours = u32::from(self.hour) + total / MINUTES_PER_HOUR;
        self.hour = (hours % HOURS_PER_DAY) as u8;
        let mut days_left = hours / HOURS_PER_DAY;
        while days_left > 0 {
            days_left -= 1;
            self.day += 1;
            if u32::from(self.day) > DAYS_PER_MONTH {
                self.day = 1;
                self.month += 1;
                if u32::from(self.month) > MONTHS_PER_YEAR {
                    self.month = 1;
                    self.year += 1;
                }
            }
        }
    }
}
