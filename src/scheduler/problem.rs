//! Week grid annealing problem.
//!
//! Implements [`AnnealProblem`] for the working grid. Bridges the run's
//! tasks, fixed mask and scorer to the generic annealing runner.
//!
//! # Move
//!
//! 1. Pick a non-sleep task, a chunk length in `[2, clamp(stretch, 2, 8)]`,
//!    a day and a start block, all uniformly.
//! 2. Reject outright unless the chunk lies within 08:00-22:00, passes the
//!    moat check, and covers only empty unmasked blocks.
//! 3. Write the task's flexible label into a copy of the grid.
//! 4. With probability `removal_probability`, also clear one randomly chosen
//!    block bearing the same label on a random day.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use log::debug;
use rand::Rng;

use crate::anneal::{AnnealConfig, AnnealProblem, AnnealRunner, AnnealStats};
use crate::models::{FixedMask, Grid, Task, BLOCKS_PER_DAY, DAYS, FLEX_END, FLEX_START};

use super::context::WeekContext;
use super::greedy::MIN_CHUNK;
use super::score::Scorer;

/// Longest chunk an annealing move writes.
pub const MAX_MOVE_CHUNK: usize = 8;

/// Annealing problem over a week grid.
pub struct WeekProblem<'a> {
    tasks: &'a [Task],
    mask: &'a FixedMask,
    scorer: Scorer<'a>,
    flexible: Vec<usize>,
    removal_probability: f64,
}

impl<'a> WeekProblem<'a> {
    /// Creates a problem whose scoring targets are taken from `grid`.
    pub fn new(tasks: &'a [Task], mask: &'a FixedMask, grid: &Grid) -> Self {
        let flexible = tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_sleep)
            .map(|(i, _)| i)
            .collect();
        Self {
            tasks,
            mask,
            scorer: Scorer::new(tasks, grid),
            flexible,
            removal_probability: AnnealConfig::default().removal_probability,
        }
    }

    /// Sets the coupled removal probability. Non-finite values disable it.
    pub fn with_removal_probability(mut self, p: f64) -> Self {
        self.removal_probability = if p.is_finite() { p.clamp(0.0, 1.0) } else { 0.0 };
        self
    }

    /// Scoring targets per task.
    pub fn wants(&self) -> &[usize] {
        self.scorer.wants()
    }

    /// Whether any task can be moved at all.
    pub fn has_moves(&self) -> bool {
        !self.flexible.is_empty()
    }
}

impl AnnealProblem for WeekProblem<'_> {
    type Solution = Grid;

    fn score(&self, grid: &Grid) -> f64 {
        self.scorer.score(grid)
    }

    fn neighbor<R: Rng>(&self, grid: &Grid, rng: &mut R) -> Option<Grid> {
        if self.flexible.is_empty() {
            return None;
        }
        let index = self.flexible[rng.random_range(0..self.flexible.len())];
        let task = &self.tasks[index];
        let longest = task.max_stretch_blocks.clamp(MIN_CHUNK, MAX_MOVE_CHUNK);
        let len = rng.random_range(MIN_CHUNK..=longest);
        let day = rng.random_range(0..DAYS);
        let start = rng.random_range(0..BLOCKS_PER_DAY);

        let end = start + len;
        if start < FLEX_START || end > FLEX_END {
            return None;
        }
        let cell = task.flex_cell(index);
        if !grid.moat_ok(day, start, len, cell)
            || !grid.range_free(day, start..end)
            || self.mask.any_fixed(day, start..end)
        {
            return None;
        }

        let mut next = grid.clone();
        next.fill(day, start..end, cell);

        if rng.random_bool(self.removal_probability) {
            let other = rng.random_range(0..DAYS);
            let same: Vec<usize> = (0..BLOCKS_PER_DAY)
                .filter(|&b| next.get(other, b) == Some(cell) && !self.mask.is_fixed(other, b))
                .collect();
            if !same.is_empty() {
                let block = same[rng.random_range(0..same.len())];
                next.set(other, block, None);
            }
        }

        Some(next)
    }
}

/// Anneals the context's grid in place and re-derives remaining demand.
pub fn optimize<R: Rng>(
    ctx: &mut WeekContext,
    config: &AnnealConfig,
    rng: &mut R,
    cancel: Option<Arc<AtomicBool>>,
) -> AnnealStats {
    let (best, stats, wants) = {
        let problem = WeekProblem::new(&ctx.tasks, &ctx.mask, &ctx.grid)
            .with_removal_probability(config.removal_probability);
        if !problem.has_moves() {
            debug!("annealing skipped: no flexible tasks");
            let score = problem.score(&ctx.grid);
            let stats = AnnealStats {
                initial_score: score,
                best_score: score,
                ..Default::default()
            };
            return stats;
        }
        let result = AnnealRunner::run_with_cancel(&problem, ctx.grid.clone(), config, rng, cancel);
        (result.best, result.stats, problem.wants().to_vec())
    };

    ctx.grid = best;
    ctx.sync_demand(&wants);

    debug!(
        "annealing done: {} iterations, {} accepted, {} improving, score {:.3} -> {:.3}",
        stats.iterations,
        stats.accepted_moves,
        stats.improving_moves,
        stats.initial_score,
        stats.best_score
    );
    stats
}
