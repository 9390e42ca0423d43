//! Fixed-event seeding.
//!
//! Places class meetings and nightly sleep into an empty week. Everything
//! seeded here is marked in the fixed mask and never changes afterwards.
//!
//! # Meetings
//! First writer wins: a meeting whose range is not entirely free is
//! dropped without error. Each seeded meeting registers a `Pre` anchor
//! 45 minutes before its start and a `Post` anchor 15 minutes after its end.
//!
//! # Sleep
//! One canonical start block (21:00, the middle of the 20:00-22:00 window)
//! is used every night. The night runs from the start block to midnight and
//! continues on the following day (Sunday wraps to Monday) until wake-up.

use log::debug;
use serde::Serialize;

use crate::models::{Anchor, AnchorKind, Cell, LabelKind, BLOCKS_PER_DAY, DAYS};

use super::context::WeekContext;

/// Pre anchor offset before a meeting start (45 minutes).
pub const PRE_ANCHOR_OFFSET: usize = 3;
/// Post anchor offset after a meeting end (15 minutes).
pub const POST_ANCHOR_OFFSET: usize = 1;
/// Canonical bedtime block (21:00).
pub const SLEEP_START: usize = 84;
/// Shortest night (6 h) and earliest wake-up (06:00).
pub const MIN_NIGHT_BLOCKS: usize = 24;
/// Longest night (9 h) and latest wake-up (09:00).
pub const MAX_NIGHT_BLOCKS: usize = 36;

/// Outcome of meeting seeding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MeetingSeedStats {
    /// Meetings written to the grid.
    pub placed: usize,
    /// Meetings dropped because their range was not free.
    pub dropped: usize,
}

/// A nightly sleep plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NightPlan {
    /// Bedtime block on the evening day.
    pub start: usize,
    /// Wake-up block after clamping to 06:00-09:00.
    pub wake: usize,
    /// Total night length in blocks.
    pub len: usize,
}

impl NightPlan {
    /// Blocks on the evening day: `[start, 96)`.
    #[inline]
    pub fn head(&self) -> usize {
        BLOCKS_PER_DAY - self.start
    }

    /// Blocks on the following morning: `[0, tail)`.
    #[inline]
    pub fn tail(&self) -> usize {
        self.len.saturating_sub(self.head())
    }
}

/// Computes the nightly plan for a weekly sleep quota.
pub fn night_plan(total_blocks: usize) -> NightPlan {
    let per_night = ((total_blocks as f64 / DAYS as f64).round() as usize)
        .clamp(MIN_NIGHT_BLOCKS, MAX_NIGHT_BLOCKS);
    let start = SLEEP_START;
    let head = BLOCKS_PER_DAY - start;
    let wake = per_night
        .saturating_sub(head)
        .clamp(MIN_NIGHT_BLOCKS, MAX_NIGHT_BLOCKS);
    let len = (head + wake).clamp(MIN_NIGHT_BLOCKS, MAX_NIGHT_BLOCKS);
    NightPlan { start, wake, len }
}

/// Seeds every task's meetings in task order.
pub fn seed_meetings(ctx: &mut WeekContext) -> MeetingSeedStats {
    let mut stats = MeetingSeedStats::default();

    for index in 0..ctx.tasks.len() {
        let meetings = ctx.tasks[index].meetings.clone();
        for m in meetings {
            let end = m.end.min(BLOCKS_PER_DAY);
            if m.start >= end || !ctx.grid.range_free(m.day, m.start..end) {
                debug!(
                    "dropping meeting of '{}' on day {} [{}, {})",
                    ctx.tasks[index].name, m.day, m.start, m.end
                );
                stats.dropped += 1;
                continue;
            }

            ctx.grid
                .fill(m.day, m.start..end, Cell::new(index, LabelKind::Meeting));
            for b in m.start..end {
                ctx.mask.mark(m.day, b);
            }

            let task = &mut ctx.tasks[index];
            task.blocks_required = task.blocks_required.saturating_sub(end - m.start);
            task.anchors.push(Anchor {
                day: m.day,
                block: m.start.saturating_sub(PRE_ANCHOR_OFFSET),
                kind: AnchorKind::Pre,
            });
            task.anchors.push(Anchor {
                day: m.day,
                block: (end + POST_ANCHOR_OFFSET).min(BLOCKS_PER_DAY - 1),
                kind: AnchorKind::Post,
            });
            stats.placed += 1;
        }
    }

    stats
}

/// Seeds nightly sleep for every sleep task and zeroes their demand.
///
/// Returns the number of blocks written.
pub fn seed_sleep(ctx: &mut WeekContext) -> usize {
    let mut written = 0;

    for index in 0..ctx.tasks.len() {
        if !ctx.tasks[index].is_sleep {
            continue;
        }
        let total = ctx.tasks[index].blocks_required;
        ctx.tasks[index].blocks_required = 0;
        if total == 0 {
            continue;
        }

        let plan = night_plan(total);
        let cell = ctx.tasks[index].flex_cell(index);
        for day in 0..DAYS {
            let morning = (day + 1) % DAYS;
            let evening = (plan.start..BLOCKS_PER_DAY).map(|b| (day, b));
            let next = (0..plan.tail()).map(|b| (morning, b));
            for (d, b) in evening.chain(next) {
                if ctx.grid.is_free(d, b) {
                    ctx.grid.set(d, b, Some(cell));
                    ctx.mask.mark(d, b);
                    written += 1;
                }
            }
        }

        debug!(
            "seeded sleep '{}': start {}, wake {}, {} blocks/night",
            ctx.tasks[index].name, plan.start, plan.wake, plan.len
        );
    }

    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MeetingRange, Task};

    fn task(name: &str, required: usize, meetings: Vec<MeetingRange>, sleep: bool) -> Task {
        Task {
            id: name.into(),
            name: name.into(),
            category: "C".into(),
            target_blocks: required,
            blocks_required: required,
            max_stretch_blocks: 8,
            preferred: Vec::new(),
            meetings,
            anchors: Vec::new(),
            is_sleep: sleep,
        }
    }

    fn range(day: usize, start: usize, end: usize) -> MeetingRange {
        MeetingRange { day, start, end }
    }

    #[test]
    fn test_night_plan_eight_hours() {
        let plan = night_plan(224);
        assert_eq!(plan.start, 84);
        assert!((24..=36).contains(&plan.wake));
        assert_eq!(plan.head(), 12);
        assert_eq!(plan.tail(), plan.len - 12);
        assert!((24..=36).contains(&plan.len));
    }

    #[test]
    fn test_night_plan_clamps() {
        assert_eq!(night_plan(0).len, 36);
        assert_eq!(night_plan(10_000).len, 36);
        assert_eq!(night_plan(10_000).wake, 24);
    }

    #[test]
    fn test_meeting_seeding_marks_and_anchors() {
        let mut ctx = WeekContext::new(vec![task("Math", 20, vec![range(0, 36, 42)], false)]);
        let stats = seed_meetings(&mut ctx);
        assert_eq!(stats, MeetingSeedStats { placed: 1, dropped: 0 });
        assert!((36..42).all(|b| ctx.mask.is_fixed(0, b)));
        assert!(!ctx.mask.is_fixed(0, 42));
        assert_eq!(ctx.grid.get(0, 36), Some(Cell::new(0, LabelKind::Meeting)));
        assert_eq!(ctx.tasks[0].blocks_required, 14);

        let anchors = &ctx.tasks[0].anchors;
        assert_eq!(anchors.len(), 2);
        assert_eq!((anchors[0].block, anchors[0].kind), (33, AnchorKind::Pre));
        assert_eq!((anchors[1].block, anchors[1].kind), (43, AnchorKind::Post));
    }

    #[test]
    fn test_anchor_clamping() {
        let mut ctx = WeekContext::new(vec![task(
            "Early",
            8,
            vec![range(3, 1, 2), range(3, 94, 96)],
            false,
        )]);
        seed_meetings(&mut ctx);
        let blocks: Vec<usize> = ctx.tasks[0].anchors.iter().map(|a| a.block).collect();
        assert_eq!(blocks, vec![0, 3, 91, 95]);
    }

    #[test]
    fn test_conflicting_meeting_is_dropped() {
        let mut ctx = WeekContext::new(vec![
            task("Math", 20, vec![range(1, 36, 42)], false),
            task("Bio", 20, vec![range(1, 40, 44)], false),
        ]);
        let stats = seed_meetings(&mut ctx);
        assert_eq!(stats.dropped, 1);
        // Bio's non-overlapping tail stays free and unmasked.
        assert!(ctx.grid.is_free(1, 42));
        assert!(!ctx.mask.is_fixed(1, 42));
        assert!(!ctx.mask.is_fixed(1, 43));
        assert_eq!(ctx.mask.count(), 6);
        assert_eq!(ctx.grid.get(1, 40).map(|c| c.task), Some(0));
        assert!(ctx.tasks[1].anchors.is_empty());
        assert_eq!(ctx.tasks[1].blocks_required, 20);
    }

    #[test]
    fn test_sleep_wraps_sunday_to_monday() {
        let mut ctx = WeekContext::new(vec![task("Sleep", 224, Vec::new(), true)]);
        let written = seed_sleep(&mut ctx);
        let plan = night_plan(224);
        assert_eq!(written, 7 * plan.len);
        assert_eq!(ctx.tasks[0].blocks_required, 0);

        // Monday morning holds Sunday night's tail.
        assert!((0..plan.tail()).all(|b| ctx.mask.is_fixed(0, b)));
        assert!(ctx.grid.is_free(0, plan.tail()));
        assert!((84..96).all(|b| ctx.grid.get(6, b).is_some()));
        assert!(ctx.grid.is_free(3, 83));
    }

    #[test]
    fn test_sleep_skips_occupied_blocks() {
        let mut ctx = WeekContext::new(vec![
            task("Late lab", 4, vec![range(2, 86, 90)], false),
            task("Sleep", 224, Vec::new(), true),
        ]);
        seed_meetings(&mut ctx);
        seed_sleep(&mut ctx);
        assert_eq!(ctx.grid.get(2, 87).map(|c| c.task), Some(0));
        assert_eq!(ctx.grid.get(2, 90).map(|c| c.task), Some(1));
        assert_eq!(ctx.grid.get(2, 85).map(|c| c.task), Some(1));
    }

    #[test]
    fn test_zero_quota_sleep_is_not_seeded() {
        let mut ctx = WeekContext::new(vec![task("Sleep", 0, Vec::new(), true)]);
        assert_eq!(seed_sleep(&mut ctx), 0);
        assert_eq!(ctx.grid.occupied(), 0);
    }
}
