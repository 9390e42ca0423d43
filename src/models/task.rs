//! Task model.
//!
//! A task is the runtime scheduling unit derived from one obligation child
//! after apportionment. It carries the remaining block demand, which every
//! placement pass decrements, plus the resolved meetings and anchors used by
//! seeding and scoring.

use super::category::TimeBucket;
use super::grid::{Cell, LabelKind};

/// A resolved meeting: `[start, end)` block range on a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeetingRange {
    pub day: usize,
    pub start: usize,
    pub end: usize,
}

impl MeetingRange {
    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Position of an anchor relative to its meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorKind {
    /// Shortly before a meeting (preparation).
    Pre,
    /// Shortly after a meeting (review).
    Post,
}

impl AnchorKind {
    /// Bonus for a block sitting exactly on the anchor.
    pub fn peak_bonus(self) -> f64 {
        match self {
            AnchorKind::Pre => 0.35,
            AnchorKind::Post => 0.40,
        }
    }
}

/// A point in the week that attracts flexible time for its task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub day: usize,
    pub block: usize,
    pub kind: AnchorKind,
}

/// A runtime scheduling unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    /// Child identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Owning category name.
    pub category: String,
    /// Blocks apportioned to this task for the week.
    pub target_blocks: usize,
    /// Blocks still owed.
    pub blocks_required: usize,
    /// Longest run a single placement should produce.
    pub max_stretch_blocks: usize,
    /// Preferred buckets. Empty = no preference.
    pub preferred: Vec<TimeBucket>,
    /// Fixed meetings, resolved to block ranges.
    pub meetings: Vec<MeetingRange>,
    /// Anchors registered while seeding meetings.
    pub anchors: Vec<Anchor>,
    /// Whether this task is seeded as nightly sleep.
    pub is_sleep: bool,
}

impl Task {
    /// Display label for one of the task's label forms.
    pub fn label(&self, kind: LabelKind) -> String {
        match kind {
            LabelKind::Meeting => format!("{} (class)", self.name),
            LabelKind::Study => format!("{} (study)", self.name),
            LabelKind::Plain => self.name.clone(),
        }
    }

    /// Label form used for flexible placements.
    #[inline]
    pub fn flex_kind(&self) -> LabelKind {
        if self.meetings.is_empty() {
            LabelKind::Plain
        } else {
            LabelKind::Study
        }
    }

    /// Cell written by flexible placements of task `index`.
    #[inline]
    pub fn flex_cell(&self, index: usize) -> Cell {
        Cell::new(index, self.flex_kind())
    }

    /// Whether a block's bucket suits this task.
    pub fn prefers(&self, block: usize) -> bool {
        if self.preferred.is_empty() {
            return true;
        }
        TimeBucket::of_block(block).is_some_and(|b| self.preferred.contains(&b))
    }

    /// Whether the task still owes blocks.
    #[inline]
    pub fn has_demand(&self) -> bool {
        self.blocks_required > 0
    }
}
