//! Category input model.
//!
//! Categories are produced by an external preferences layer (profile editor,
//! questionnaire, calendar import). Each category owns a share of the week
//! and a list of obligation children that split that share between them.
//!
//! # Time Model
//! Clock times are wall-clock hours and minutes within a day. They are
//! converted to 15-minute block indices (`hour * 4 + minute / 15`) during
//! apportionment.

use serde::{Deserialize, Serialize};

use super::grid::BLOCKS_PER_DAY;

/// Day of the week, in canonical scan order (Monday first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All days in canonical order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Zero-based index (Monday = 0).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Day for a zero-based index, wrapping modulo 7.
    #[inline]
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 7]
    }

    /// The following day (Sunday wraps to Monday).
    #[inline]
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// English day name.
    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

/// A named segment of the day used for placement preferences.
///
/// | Bucket | Range |
/// |--------|-------|
/// | Morning | 06:00-12:00 |
/// | Afternoon | 12:00-17:00 |
/// | Evening | 17:00-22:00 |
/// | Night | 22:00-24:00 |
///
/// Blocks before 06:00 belong to no bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeBucket {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeBucket {
    /// Bucket containing a block index, if any.
    pub fn of_block(block: usize) -> Option<Self> {
        match block {
            24..=47 => Some(TimeBucket::Morning),
            48..=67 => Some(TimeBucket::Afternoon),
            68..=87 => Some(TimeBucket::Evening),
            88..=95 => Some(TimeBucket::Night),
            _ => None,
        }
    }
}

/// Wall-clock time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockTime {
    /// Hour (0-24; 24 is only meaningful as `24:00`, the end of the day).
    pub hour: u8,
    /// Minute (0-59).
    pub minute: u8,
}

impl ClockTime {
    /// Creates a clock time.
    pub fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }

    /// Creates a clock time from `HHMM` notation (e.g. `930` = 09:30).
    pub fn from_hhmm(hhmm: u16) -> Self {
        Self {
            hour: (hhmm / 100).min(u8::MAX as u16) as u8,
            minute: (hhmm % 100) as u8,
        }
    }

    /// Whether this is a representable time of day (`00:00`..=`24:00`).
    pub fn is_valid(&self) -> bool {
        (self.hour < 24 && self.minute < 60) || (self.hour == 24 && self.minute == 0)
    }

    /// Block index for this time, clamped to the day (`0..=96`).
    #[inline]
    pub fn to_block(self) -> usize {
        let block = self.hour as usize * 4 + self.minute as usize / 15;
        block.min(BLOCKS_PER_DAY)
    }
}

/// A fixed weekly meeting (e.g. a class session).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub day: Weekday,
    pub start: ClockTime,
    pub end: ClockTime,
}

impl Meeting {
    /// Creates a meeting.
    pub fn new(day: Weekday, start: ClockTime, end: ClockTime) -> Self {
        Self { day, start, end }
    }
}

/// An obligation within a category (a course, a job, a hobby).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObligationChild {
    /// Unique identifier.
    pub id: String,
    /// Display name; also the base of every generated label.
    pub name: String,
    /// Share of the parent category (0.0..=1.0).
    pub relative_priority: f64,
    /// Longest comfortable stretch in hours. `None` = engine default.
    #[serde(default)]
    pub max_stretch: Option<f64>,
    /// Preferred day segments. Empty = no preference.
    #[serde(default)]
    pub preferred_time_blocks: Vec<TimeBucket>,
    /// Fixed weekly meetings.
    #[serde(default)]
    pub meeting_times: Vec<Meeting>,
}

impl ObligationChild {
    /// Creates a child with the given ID and name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            relative_priority: 0.0,
            max_stretch: None,
            preferred_time_blocks: Vec::new(),
            meeting_times: Vec::new(),
        }
    }

    /// Sets the share within the parent category.
    pub fn with_relative_priority(mut self, relative_priority: f64) -> Self {
        self.relative_priority = relative_priority;
        self
    }

    /// Sets the maximum stretch in hours.
    pub fn with_max_stretch(mut self, hours: f64) -> Self {
        self.max_stretch = Some(hours);
        self
    }

    /// Adds a preferred time bucket.
    pub fn with_preferred(mut self, bucket: TimeBucket) -> Self {
        self.preferred_time_blocks.push(bucket);
        self
    }

    /// Adds a fixed meeting.
    pub fn with_meeting(mut self, meeting: Meeting) -> Self {
        self.meeting_times.push(meeting);
        self
    }
}

/// A weighted life area (school, sleep, work, social, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Share of the 672-block week (0.0..=1.0).
    pub priority: f64,
    /// Obligation children, in declaration order.
    #[serde(default)]
    pub children: Vec<ObligationChild>,
}

impl Category {
    /// Creates a category with the given ID and name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            priority: 0.0,
            children: Vec::new(),
        }
    }

    /// Sets the share of the week.
    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = priority;
        self
    }

    /// Adds a child.
    pub fn with_child(mut self, child: ObligationChild) -> Self {
        self.children.push(child);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_wraps() {
        assert_eq!(Weekday::Sunday.next(), Weekday::Monday);
        assert_eq!(Weekday::from_index(9), Weekday::Wednesday);
        assert_eq!(Weekday::Friday.name(), "Friday");
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(TimeBucket::of_block(0), None);
        assert_eq!(TimeBucket::of_block(23), None);
        assert_eq!(TimeBucket::of_block(24), Some(TimeBucket::Morning));
        assert_eq!(TimeBucket::of_block(48), Some(TimeBucket::Afternoon));
        assert_eq!(TimeBucket::of_block(68), Some(TimeBucket::Evening));
        assert_eq!(TimeBucket::of_block(87), Some(TimeBucket::Evening));
        assert_eq!(TimeBucket::of_block(88), Some(TimeBucket::Night));
        assert_eq!(TimeBucket::of_block(95), Some(TimeBucket::Night));
    }

    #[test]
    fn test_clock_to_block() {
        assert_eq!(ClockTime::from_hhmm(930).to_block(), 38);
        assert_eq!(ClockTime::new(0, 0).to_block(), 0);
        assert_eq!(ClockTime::new(21, 0).to_block(), 84);
        assert_eq!(ClockTime::new(10, 14).to_block(), 40);
        assert_eq!(ClockTime::new(24, 0).to_block(), 96);
    }

    #[test]
    fn test_clock_validity() {
        assert!(ClockTime::new(23, 59).is_valid());
        assert!(ClockTime::new(24, 0).is_valid());
        assert!(!ClockTime::new(24, 15).is_valid());
        assert!(!ClockTime::new(12, 60).is_valid());
    }

    #[test]
    fn test_category_serde() {
        let cat = Category::new("c1", "School").with_priority(0.3).with_child(
            ObligationChild::new("m1", "Math")
                .with_relative_priority(1.0)
                .with_preferred(TimeBucket::Morning),
        );
        let json = serde_json::to_string(&cat).unwrap();
        assert!(json.contains("\"morning\""));
        let back: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cat);
    }

    #[test]
    fn test_child_defaults_from_json() {
        let json = r#"{"id":"x","name":"Gym","relative_priority":0.5}"#;
        let child: ObligationChild = serde_json::from_str(json).unwrap();
        assert!(child.max_stretch.is_none());
        assert!(child.preferred_time_blocks.is_empty());
        assert!(child.meeting_times.is_empty());
    }
}
