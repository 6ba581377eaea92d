//! Daily NPC schedules: time-of-day thresholds mapped to where an NPC should be.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::actor::AiType;
use crate::date::{GameDate, TimeOfDay};
use crate::types::{Floor, Pos};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub time: TimeOfDay,
    pub pos: Pos,
    pub floor: Floor,
    pub ai_type: AiType,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScheduleError {
    Empty,
    Unsorted { index: usize },
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "schedule has no entries"),
            Self::Unsorted { index } => {
                write!(f, "schedule entry {index} is earlier than the entry before it")
            }
        }
    }
}

impl std::error::Error for ScheduleError {}

/// Non-empty list of entries sorted by time of day.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ScheduleEntry>", into = "Vec<ScheduleEntry>")]
pub struct Schedule {
    entries: Vec<ScheduleEntry>,
}

impl Schedule {
    pub fn new(entries: Vec<ScheduleEntry>) -> Result<Self, ScheduleError> {
        if entries.is_empty() {
            return Err(ScheduleError::Empty);
        }
        if let Some(index) = entries.windows(2).position(|pair| pair[1].time < pair[0].time) {
            return Err(ScheduleError::Unsorted { index: index + 1 });
        }
        Ok(Self { entries })
    }

    /// Single all-day entry.
    pub fn stationary(pos: Pos, floor: Floor, ai_type: AiType) -> Self {
        Self {
            entries: vec![ScheduleEntry { time: TimeOfDay::new(0, 0), pos, floor, ai_type }],
        }
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    /// The entry whose threshold most recently passed. Before the first threshold
    /// of the day, the last entry of the previous day still applies.
    pub fn current(&self, date: &GameDate) -> &ScheduleEntry {
        let now = date.time_of_day();
        let passed = self.entries.partition_point(|entry| entry.time <= now);
        let index = if passed == 0 { self.entries.len() - 1 } else { passed - 1 };
        &self.entries[index]
    }
}

impl TryFrom<Vec<ScheduleEntry>> for Schedule {
    type Error = ScheduleError;

    fn try_from(entries: Vec<ScheduleEntry>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<Schedule> for Vec<ScheduleEntry> {
    fn from(schedule: Schedule) -> Self {
        schedule.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(hour: u8, x: i32, ai_type: AiType) -> ScheduleEntry {
        ScheduleEntry { time: TimeOfDay::new(hour, 0), pos: Pos::new(x, 1), floor: 0, ai_type }
    }

    fn day_schedule() -> Schedule {
        Schedule::new(vec![
            entry(6, 1, AiType::Wander),
            entry(12, 2, AiType::MerchantFixed),
            entry(21, 3, AiType::Fixed),
        ])
        .expect("sorted schedule")
    }

    #[test]
    fn current_entry_is_latest_passed_threshold() {
        let schedule = day_schedule();
        assert_eq!(schedule.current(&GameDate::at(6, 0)).pos.x, 1);
        assert_eq!(schedule.current(&GameDate::at(11, 59)).pos.x, 1);
        assert_eq!(schedule.current(&GameDate::at(12, 0)).pos.x, 2);
        assert_eq!(schedule.current(&GameDate::at(23, 0)).pos.x, 3);
    }

    #[test]
    fn early_morning_wraps_to_previous_evening() {
        let schedule = day_schedule();
        assert_eq!(schedule.current(&GameDate::at(2, 30)).ai_type, AiType::Fixed);
    }

    #[test]
    fn lookup_is_pure() {
        let schedule = day_schedule();
        let date = GameDate::at(13, 15);
        let first = *schedule.current(&date);
        for _ in 0..5 {
            assert_eq!(*schedule.current(&date), first);
        }
    }

    #[test]
    fn rejects_empty_and_unsorted_tables() {
        assert_eq!(Schedule::new(vec![]), Err(ScheduleError::Empty));
        let unsorted = vec![entry(12, 1, AiType::Fixed), entry(8, 2, AiType::Fixed)];
        assert_eq!(Schedule::new(unsorted), Err(ScheduleError::Unsorted { index: 1 }));
    }

    #[test]
    fn deserialization_validates_order() {
        let json = r#"[
            { "time": { "hour": 9, "minute": 0 }, "pos": { "x": 1, "y": 1 }, "floor": 0, "ai_type": "Fixed" },
            { "time": { "hour": 8, "minute": 0 }, "pos": { "x": 2, "y": 1 }, "floor": 0, "ai_type": "Fixed" }
        ]"#;
        assert!(serde_json::from_str::<Schedule>(json).is_err());
    }
}
