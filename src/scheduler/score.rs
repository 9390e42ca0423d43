//! Schedule fitness.
//!
//! A pure function of a candidate grid and the run's tasks. Higher is better.
//!
//! | Term | Weight | Definition |
//! |------|--------|-----------|
//! | Target adherence | x2.0 | per task, `1 - abs(want - have) / want` (1 if `want = 0`) |
//! | Preference | +0.5 | per occupied block in one of its task's preferred buckets |
//! | Anchor | up to +0.35 / +0.40 | per occupied block within 4 blocks of its task's pre / post anchor |
//! | Transition | -0.15 | per adjacent same-day pair with different contents |
//! | Night misuse | -0.6 | per non-sleep block in 22:00-24:00 |
//!
//! `want` is fixed when the scorer is built, as the blocks a task occupies
//! plus the blocks it still owes. Moving a block from "owed" to "placed"
//! therefore leaves `want` unchanged and raises `have`.

use serde::Serialize;

use crate::models::{Grid, Task, BLOCKS_PER_DAY, DAYS, NIGHT_START};

/// Weight of the target adherence term.
pub const ADHERENCE_WEIGHT: f64 = 2.0;
/// Bonus per block placed in a preferred bucket.
pub const PREFERENCE_BONUS: f64 = 0.5;
/// Anchor influence radius, in blocks.
pub const ANCHOR_RADIUS: usize = 4;
/// Penalty per label change between adjacent blocks.
pub const TRANSITION_PENALTY: f64 = 0.15;
/// Penalty per non-sleep block after 22:00.
pub const NIGHT_MISUSE_PENALTY: f64 = 0.6;

/// Score split into its terms (already weighted).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub adherence: f64,
    pub preference: f64,
    pub anchor: f64,
    pub transition: f64,
    pub night_misuse: f64,
}

impl ScoreBreakdown {
    /// Sum of all terms.
    pub fn total(&self) -> f64 {
        self.adherence + self.preference + self.anchor + self.transition + self.night_misuse
    }
}

/// Scores grids against a fixed set of per-task targets.
#[derive(Debug, Clone)]
pub struct Scorer<'a> {
    tasks: &'a [Task],
    wants: Vec<usize>,
}

impl<'a> Scorer<'a> {
    /// Creates a scorer whose targets are `have + blocks_required` in `grid`.
    pub fn new(tasks: &'a [Task], grid: &Grid) -> Self {
        let counts = grid.counts_by_task(tasks.len());
        let wants = tasks
            .iter()
            .zip(counts)
            .map(|(t, have)| have + t.blocks_required)
            .collect();
        Self { tasks, wants }
    }

    /// Creates a scorer with explicit targets.
    pub fn with_wants(tasks: &'a [Task], wants: Vec<usize>) -> Self {
        Self { tasks, wants }
    }

    /// Per-task target block counts.
    pub fn wants(&self) -> &[usize] {
        &self.wants
    }

    /// Scalar fitness of `grid`.
    pub fn score(&self, grid: &Grid) -> f64 {
        self.breakdown(grid).total()
    }

    /// Fitness of `grid`, term by term.
    pub fn breakdown(&self, grid: &Grid) -> ScoreBreakdown {
        let mut out = ScoreBreakdown::default();

        let counts = grid.counts_by_task(self.tasks.len());
        let adherence: f64 = self
            .wants
            .iter()
            .zip(&counts)
            .map(|(&want, &have)| fit(want, have))
            .sum();
        out.adherence = ADHERENCE_WEIGHT * adherence;

        let mut transitions = 0usize;
        let mut misuse = 0usize;
        for day in 0..DAYS {
            let cells = grid.day(day);
            for (block, slot) in cells.iter().enumerate() {
                if block > 0 && cells[block - 1] != *slot {
                    transitions += 1;
                }
                let Some(cell) = slot else { continue };
                let Some(task) = self.tasks.get(cell.task) else {
                    continue;
                };

                if task.prefers(block) {
                    out.preference += PREFERENCE_BONUS;
                }
                out.anchor += anchor_bonus(task, day, block);
                if block >= NIGHT_START && !task.is_sleep {
                    misuse += 1;
                }
            }
        }
        out.transition = -TRANSITION_PENALTY * transitions as f64;
        out.night_misuse = -NIGHT_MISUSE_PENALTY * misuse as f64;

        out
    }
}

/// Target adherence of one task.
#[inline]
pub fn fit(want: usize, have: usize) -> f64 {
    if want == 0 {
        1.0
    } else {
        1.0 - want.abs_diff(have) as f64 / want as f64
    }
}

/// Strongest anchor pull on `(day, block)` for `task`.
///
/// Decays linearly from the anchor's peak at distance 0 to nothing at
/// [`ANCHOR_RADIUS`].
pub fn anchor_bonus(task: &Task, day: usize, block: usize) -> f64 {
    debug_assert!(block < BLOCKS_PER_DAY);
    task.anchors
        .iter()
        .filter(|a| a.day == day)
        .map(|a| {
            let distance = a.block.abs_diff(block);
            if distance >= ANCHOR_RADIUS {
                0.0
            } else {
                a.kind.peak_bonus() * (1.0 - distance as f64 / ANCHOR_RADIUS as f64)
            }
        })
        .fold(0.0, f64::max)
}
