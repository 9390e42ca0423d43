//! Greedy flexible filler.
//!
//! # Algorithm
//!
//! 1. Visit non-sleep tasks with remaining demand in task order.
//! 2. Scan days in canonical order and blocks from 08:00 to 22:00.
//! 3. At a block in a preferred bucket with at least 2 free blocks ahead,
//!    size a chunk from the task's stretch, its remaining demand and the
//!    free run.
//! 4. Write the chunk only if a one-block moat separates it from the same
//!    label on both sides; then skip past it.
//!
//! One sweep over the week; what is left is the task's deficit.
//!
//! # Complexity
//! O(t * 7 * 56) block visits for t tasks.

use log::debug;

use crate::models::{DAYS, FLEX_END, FLEX_START};

use super::context::WeekContext;

/// Smallest chunk any flexible pass writes.
pub const MIN_CHUNK: usize = 2;
/// Preferred chunk size before stretch limits apply.
pub const PREFERRED_CHUNK: usize = 4;
/// Largest chunk the greedy pass writes.
pub const GREEDY_CHUNK_CAP: usize = 6;

/// Chunk length for a greedy placement, or `None` if no chunk of at least
/// [`MIN_CHUNK`] blocks fits.
pub fn greedy_chunk_len(max_stretch: usize, remaining: usize, free_run: usize) -> Option<usize> {
    let upper = GREEDY_CHUNK_CAP.min(remaining).min(free_run);
    if upper < MIN_CHUNK {
        return None;
    }
    Some(max_stretch.min(PREFERRED_CHUNK).clamp(MIN_CHUNK, upper))
}

/// Runs one greedy sweep and returns the remaining demand per task.
pub fn greedy_fill(ctx: &mut WeekContext) -> Vec<usize> {
    for index in 0..ctx.tasks.len() {
        if ctx.tasks[index].is_sleep {
            continue;
        }
        let cell = ctx.tasks[index].flex_cell(index);

        for day in 0..DAYS {
            let mut block = FLEX_START;
            while block < FLEX_END && ctx.tasks[index].blocks_required >= MIN_CHUNK {
                let task = &ctx.tasks[index];
                if !task.prefers(block) {
                    block += 1;
                    continue;
                }

                let free = ctx.grid.free_run(day, block, FLEX_END);
                let len =
                    match greedy_chunk_len(task.max_stretch_blocks, task.blocks_required, free) {
                        Some(len) => len,
                        None => {
                            block += 1;
                            continue;
                        }
                    };

                if !ctx.grid.moat_ok(day, block, len, cell) {
                    block += 1;
                    continue;
                }

                ctx.place_flexible(index, day, block..block + len);
                block += len;
            }
        }
    }

    let deficits = ctx.deficits();
    debug!(
        "greedy fill done: {} blocks still owed across {} tasks",
        deficits.iter().sum::<usize>(),
        deficits.iter().filter(|d| **d > 0).count()
    );
    deficits
}
