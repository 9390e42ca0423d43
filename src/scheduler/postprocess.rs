//! Deterministic clean-up passes run after annealing.
//!
//! Fixed order, each pass exactly once:
//!
//! 1. **Deficit gap-fill**: tasks still owing blocks, largest deficit first,
//!    get chunks of `min(stretch, 4)` blocks in free 08:00-22:00 space,
//!    round-robin over days, for a bounded number of sweeps.
//! 2. **Break enforcement**: a same-label run longer than its task's stretch
//!    loses one block near its midpoint.
//! 3. **Minimum-run cleanup**: same-label runs shorter than 2 blocks are
//!    cleared.
//!
//! Fixed blocks are never touched by any pass.

use log::debug;
use serde::Serialize;

use crate::models::{DAYS, FLEX_END, FLEX_START};

use super::context::WeekContext;
use super::greedy::{MIN_CHUNK, PREFERRED_CHUNK};

/// What the clean-up passes changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PostProcessStats {
    /// Blocks written by the deficit gap-fill.
    pub gap_filled: usize,
    /// Blocks cleared to break up overlong runs.
    pub breaks_inserted: usize,
    /// Blocks cleared as too-short runs.
    pub short_runs_cleared: usize,
}

/// Runs all three passes in order.
pub fn post_process(ctx: &mut WeekContext, sweeps: usize) -> PostProcessStats {
    let stats = PostProcessStats {
        gap_filled: fill_deficits(ctx, sweeps),
        breaks_inserted: enforce_breaks(ctx),
        short_runs_cleared: clear_short_runs(ctx),
    };
    debug!(
        "post-processing: {} filled, {} breaks, {} short blocks cleared",
        stats.gap_filled, stats.breaks_inserted, stats.short_runs_cleared
    );
    stats
}

/// Places remaining demand into free daytime space.
///
/// Returns the number of blocks written.
pub fn fill_deficits(ctx: &mut WeekContext, sweeps: usize) -> usize {
    let mut order: Vec<usize> = ctx
        .flexible_tasks()
        .into_iter()
        .filter(|&i| ctx.tasks[i].blocks_required >= MIN_CHUNK)
        .collect();
    // Stable: equal deficits keep task order.
    order.sort_by(|&a, &b| {
        ctx.tasks[b]
            .blocks_required
            .cmp(&ctx.tasks[a].blocks_required)
    });

    let mut written = 0;
    for _ in 0..sweeps {
        let before = written;
        for day in 0..DAYS {
            for &index in &order {
                if let Some((start, len)) = find_gap(ctx, index, day) {
                    ctx.place_flexible(index, day, start..start + len);
                    written += len;
                }
            }
        }
        if written == before {
            break;
        }
    }
    written
}

/// First free daytime gap on `day` that fits a chunk for task `index`.
fn find_gap(ctx: &WeekContext, index: usize, day: usize) -> Option<(usize, usize)> {
    let task = &ctx.tasks[index];
    let need = task.blocks_required;
    if need < MIN_CHUNK {
        return None;
    }
    let size = task.max_stretch_blocks.min(PREFERRED_CHUNK).max(MIN_CHUNK);
    let cell = task.flex_cell(index);

    (FLEX_START..FLEX_END).find_map(|block| {
        let free = ctx.grid.free_run(day, block, FLEX_END);
        let len = size.min(free).min(need);
        (len >= MIN_CHUNK && ctx.grid.moat_ok(day, block, len, cell)).then_some((block, len))
    })
}

/// Clears one block near the middle of every run longer than its task's
/// stretch. Returns the number of blocks cleared.
pub fn enforce_breaks(ctx: &mut WeekContext) -> usize {
    let mut cleared = 0;
    for day in 0..DAYS {
        for run in ctx.grid.runs(day) {
            let limit = ctx.tasks[run.cell.task].max_stretch_blocks;
            if run.len <= limit || ctx.mask.any_fixed(day, run.start..run.end()) {
                continue;
            }
            if ctx.clear_block(day, run.start + run.len / 2) {
                cleared += 1;
            }
        }
    }
    cleared
}

/// Clears every unfixed run shorter than the minimum chunk.
/// Returns the number of blocks cleared.
pub fn clear_short_runs(ctx: &mut WeekContext) -> usize {
    let mut cleared = 0;
    for day in 0..DAYS {
        for run in ctx.grid.runs(day) {
            if run.len >= MIN_CHUNK || ctx.mask.any_fixed(day, run.start..run.end()) {
                continue;
            }
            for block in run.start..run.end() {
                if ctx.clear_block(day, block) {
                    cleared += 1;
                }
            }
        }
    }
    cleared
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cell, LabelKind, Task};

    fn task(name: &str, required: usize, stretch: usize) -> Task {
        Task {
            id: name.into(),
            name: name.into(),
            category: "C".into(),
            target_blocks: required,
            blocks_required: required,
            max_stretch_blocks: stretch,
            preferred: Vec::new(),
            meetings: Vec::new(),
            anchors: Vec::new(),
            is_sleep: false,
        }
    }

    fn plain(task: usize) -> Cell {
        Cell::new(task, LabelKind::Plain)
    }

    #[test]
    fn test_fill_deficits_largest_first_round_robin() {
        let mut ctx = WeekContext::new(vec![task("Small", 2, 8), task("Big", 8, 8)]);
        let written = fill_deficits(&mut ctx, 3);
        assert_eq!(written, 10);
        assert_eq!(ctx.deficits(), vec![0, 0]);

        // Big goes first on Monday, Small takes the next gap.
        let runs = ctx.grid.runs(0);
        assert_eq!((runs[0].cell.task, runs[0].start, runs[0].len), (1, 32, 4));
        assert_eq!((runs[1].cell.task, runs[1].start, runs[1].len), (0, 36, 2));
        // Big's second chunk lands on Tuesday.
        assert_eq!(ctx.grid.runs(1)[0].cell.task, 1);
    }

    #[test]
    fn test_fill_deficits_never_overwrites() {
        let mut ctx = WeekContext::new(vec![task("Other", 0, 8), task("Need", 6, 8)]);
        for day in 0..DAYS {
            ctx.grid.fill(day, FLEX_START..FLEX_END, plain(0));
        }
        assert_eq!(fill_deficits(&mut ctx, 3), 0);
        assert_eq!(ctx.tasks[1].blocks_required, 6);
    }

    #[test]
    fn test_fill_deficits_bounded_by_sweeps() {
        let mut ctx = WeekContext::new(vec![task("Huge", 600, 8)]);
        let written = fill_deficits(&mut ctx, 1);
        // One chunk per day in a single sweep.
        assert_eq!(written, 7 * 4);
    }

    #[test]
    fn test_enforce_breaks() {
        let mut ctx = WeekContext::new(vec![task("Long", 0, 4), task("Fixed", 0, 2)]);
        ctx.grid.fill(0, 40..46, plain(0));
        ctx.grid.fill(0, 50..54, plain(0));
        ctx.grid.fill(1, 40..46, Cell::new(1, LabelKind::Meeting));
        for b in 40..46 {
            ctx.mask.mark(1, b);
        }

        assert_eq!(enforce_breaks(&mut ctx), 1);
        assert!(ctx.grid.is_free(0, 43));
        assert!(ctx.grid.get(0, 42).is_some());
        assert_eq!(ctx.grid.runs(0).iter().filter(|r| r.start == 50).count(), 1);
        assert_eq!(ctx.tasks[0].blocks_required, 1);
        // Meetings are fixed and stay whole.
        assert_eq!(ctx.grid.runs(1)[0].len, 6);
    }

    #[test]
    fn test_clear_short_runs() {
        let mut ctx = WeekContext::new(vec![task("A", 0, 8), task("B", 0, 8)]);
        ctx.grid.fill(2, 40..41, plain(0));
        ctx.grid.fill(2, 41..43, plain(1));
        ctx.grid.fill(2, 60..61, Cell::new(1, LabelKind::Meeting));
        ctx.mask.mark(2, 60);

        assert_eq!(clear_short_runs(&mut ctx), 1);
        assert!(ctx.grid.is_free(2, 40));
        assert!(ctx.grid.get(2, 41).is_some());
        assert!(ctx.grid.get(2, 60).is_some());
        assert_eq!(ctx.tasks[0].blocks_required, 1);
    }

    #[test]
    fn test_post_process_order() {
        // A 3-block run with stretch 2: break leaves singles, cleanup removes them.
        let mut ctx = WeekContext::new(vec![task("Tiny", 0, 2)]);
        ctx.grid.fill(4, 70..73, plain(0));
        let stats = post_process(&mut ctx, 0);
        assert_eq!(stats.gap_filled, 0);
        assert_eq!(stats.breaks_inserted, 1);
        assert_eq!(stats.short_runs_cleared, 2);
        assert_eq!(ctx.grid.occupied(), 0);
        assert_eq!(ctx.tasks[0].blocks_required, 3);
    }
}
