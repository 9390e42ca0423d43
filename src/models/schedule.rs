//! Schedule (output) model.
//!
//! A schedule maps each of the seven days to exactly 96 slots, each empty
//! or holding a display label. It is the only value handed back to callers;
//! serialization, persistence and display are their concern.
//!
//! # Serialized Form
//! A JSON object keyed by day name in canonical order, each value a
//! 96-element array of `null | string`:
//!
//! ```json
//! { "Monday": [null, null, "Sleep", ...], "Tuesday": [...], ... }
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::de::{self, Deserializer, Error as _, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use super::category::Weekday;
use super::grid::{Grid, BLOCKS_PER_DAY, DAYS, WEEK_BLOCKS};
use super::task::Task;

/// A 7-day, 15-minute-resolution weekly schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    slots: Vec<Option<String>>,
}

impl Default for Schedule {
    fn default() -> Self {
        Self::empty()
    }
}

impl Schedule {
    /// Creates a schedule with all 672 slots empty.
    pub fn empty() -> Self {
        Self {
            slots: vec![None; WEEK_BLOCKS],
        }
    }

    /// Renders a working grid into display labels.
    pub fn from_grid(grid: &Grid, tasks: &[Task]) -> Self {
        let slots = grid
            .cells()
            .iter()
            .map(|cell| cell.and_then(|c| tasks.get(c.task).map(|t| t.label(c.kind))))
            .collect();
        Self { slots }
    }

    /// Slots of one day (always 96 long).
    pub fn day(&self, day: Weekday) -> &[Option<String>] {
        let start = day.index() * BLOCKS_PER_DAY;
        &self.slots[start..start + BLOCKS_PER_DAY]
    }

    /// Label at `(day, block)`, if any.
    pub fn get(&self, day: Weekday, block: usize) -> Option<&str> {
        self.day(day).get(block).and_then(|s| s.as_deref())
    }

    /// Iterates days in canonical order.
    pub fn days(&self) -> impl Iterator<Item = (Weekday, &[Option<String>])> {
        Weekday::ALL.iter().map(move |&d| (d, self.day(d)))
    }

    /// Number of occupied slots.
    pub fn occupied_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Number of slots carrying exactly `label`.
    pub fn count_label(&self, label: &str) -> usize {
        self.slots
            .iter()
            .filter(|s| s.as_deref() == Some(label))
            .count()
    }

    /// Occupied slot count per label.
    pub fn label_totals(&self) -> HashMap<String, usize> {
        let mut totals = HashMap::new();
        for label in self.slots.iter().flatten() {
            *totals.entry(label.clone()).or_insert(0) += 1;
        }
        totals
    }
}

impl Serialize for Schedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(DAYS))?;
        for (day, slots) in self.days() {
            map.serialize_entry(day.name(), slots)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Schedule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ScheduleVisitor)
    }
}

struct ScheduleVisitor;

impl<'de> Visitor<'de> for ScheduleVisitor {
    type Value = Schedule;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a map of 7 day names to {BLOCKS_PER_DAY}-slot arrays")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Schedule, A::Error> {
        let mut schedule = Schedule::empty();
        let mut seen = [false; DAYS];

        while let Some(name) = access.next_key::<String>()? {
            let day = Weekday::ALL
                .iter()
                .copied()
                .find(|d| d.name() == name)
                .ok_or_else(|| A::Error::custom(format!("unknown day '{name}'")))?;
            let slots: Vec<Option<String>> = access.next_value()?;
            if slots.len() != BLOCKS_PER_DAY {
                return Err(de::Error::invalid_length(slots.len(), &"96 slots"));
            }
            let start = day.index() * BLOCKS_PER_DAY;
            schedule.slots[start..start + BLOCKS_PER_DAY].clone_from_slice(&slots);
            seen[day.index()] = true;
        }

        if let Some(missing) = seen.iter().position(|s| !s) {
            return Err(de::Error::missing_field(Weekday::from_index(missing).name()));
        }
        Ok(schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cell, LabelKind, TimeBucket};

    fn task(name: &str) -> Task {
        Task {
            id: name.to_lowercase(),
            name: name.into(),
            category: "Test".into(),
            target_blocks: 0,
            blocks_required: 0,
            max_stretch_blocks: 4,
            preferred: vec![TimeBucket::Morning],
            meetings: Vec::new(),
            anchors: Vec::new(),
            is_sleep: false,
        }
    }

    #[test]
    fn test_empty_schedule_shape() {
        let s = Schedule::empty();
        for (_, slots) in s.days() {
            assert_eq!(slots.len(), 96);
            assert!(slots.iter().all(|x| x.is_none()));
        }
        assert_eq!(s.occupied_slots(), 0);
    }

    #[test]
    fn test_from_grid_labels() {
        let tasks = vec![task("Math"), task("Gym")];
        let mut g = Grid::new();
        g.fill(1, 36..40, Cell::new(0, LabelKind::Meeting));
        g.fill(1, 41..43, Cell::new(1, LabelKind::Plain));
        let s = Schedule::from_grid(&g, &tasks);
        assert_eq!(s.get(Weekday::Tuesday, 36), Some("Math (class)"));
        assert_eq!(s.get(Weekday::Tuesday, 41), Some("Gym"));
        assert_eq!(s.get(Weekday::Tuesday, 40), None);
        assert_eq!(s.count_label("Math (class)"), 4);
        assert_eq!(s.label_totals()["Gym"], 2);
    }

    #[test]
    fn test_serialized_form() {
        let tasks = vec![task("Gym")];
        let mut g = Grid::new();
        g.fill(6, 0..1, Cell::new(0, LabelKind::Plain));
        let s = Schedule::from_grid(&g, &tasks);

        let value = serde_json::to_value(&s).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 7);
        assert_eq!(obj["Sunday"][0], "Gym");
        assert!(obj["Monday"][0].is_null());
        assert_eq!(obj["Friday"].as_array().unwrap().len(), 96);

        let back: Schedule = serde_json::from_value(value).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_deserialize_rejects_short_day() {
        let mut value = serde_json::to_value(Schedule::empty()).unwrap();
        value["Monday"] = serde_json::json!([null, null]);
        assert!(serde_json::from_value::<Schedule>(value).is_err());
    }
}
