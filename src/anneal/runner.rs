//! Annealing execution loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::Rng;
use serde::Serialize;

use super::config::AnnealConfig;
use super::types::AnnealProblem;

/// Counters collected over all passes of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnnealStats {
    /// Moves drawn, including infeasible ones.
    pub iterations: usize,

    /// Feasible moves accepted (including improvements).
    pub accepted_moves: usize,

    /// Moves that strictly improved on the current solution.
    pub improving_moves: usize,

    /// Moves rejected before evaluation.
    pub infeasible_moves: usize,

    /// Passes started (main pass plus reheats).
    pub passes: usize,

    /// Temperature when the last pass stopped.
    pub final_temperature: f64,

    /// Score of the starting solution.
    pub initial_score: f64,

    /// Best score seen.
    pub best_score: f64,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Best score after each temperature step.
    pub score_history: Vec<f64>,
}

/// Result of an annealing run.
#[derive(Debug, Clone)]
pub struct AnnealResult<S: Clone> {
    /// The best solution seen across all passes.
    pub best: S,

    /// Run counters.
    pub stats: AnnealStats,
}

/// Executes simulated annealing.
pub struct AnnealRunner;

impl AnnealRunner {
    /// Runs the main pass and all reheat passes.
    pub fn run<P: AnnealProblem, R: Rng>(
        problem: &P,
        initial: P::Solution,
        config: &AnnealConfig,
        rng: &mut R,
    ) -> AnnealResult<P::Solution> {
        Self::run_with_cancel(problem, initial, config, rng, None)
    }

    /// Runs with an optional cancellation flag.
    ///
    /// The flag is polled only between temperature steps, never inside the
    /// inner loop, so a given seed yields the same accept/reject sequence up
    /// to the point of cancellation.
    pub fn run_with_cancel<P: AnnealProblem, R: Rng>(
        problem: &P,
        initial: P::Solution,
        config: &AnnealConfig,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> AnnealResult<P::Solution> {
        let mut current_score = problem.score(&initial);
        let mut current = initial;
        let mut best = current.clone();
        let mut best_score = current_score;

        let mut stats = AnnealStats {
            initial_score: current_score,
            ..Default::default()
        };

        'passes: for pass in 0..=config.reheat_passes {
            let mut temperature = if pass == 0 {
                config.initial_temperature
            } else {
                // Reheats restart from the best grid seen so far.
                current = best.clone();
                current_score = best_score;
                config.initial_temperature * config.reheat_factor
            };
            stats.passes += 1;

            for _ in 0..config.outer_steps {
                if let Some(ref flag) = cancel {
                    if flag.load(Ordering::Relaxed) {
                        stats.cancelled = true;
                        stats.final_temperature = temperature;
                        break 'passes;
                    }
                }

                for _ in 0..config.inner_iterations {
                    stats.iterations += 1;

                    let Some(candidate) = problem.neighbor(&current, rng) else {
                        stats.infeasible_moves += 1;
                        continue;
                    };
                    let candidate_score = problem.score(&candidate);
                    let delta = candidate_score - current_score;

                    // Metropolis acceptance criterion (maximization)
                    let accept = if delta >= 0.0 {
                        if delta > 0.0 {
                            stats.improving_moves += 1;
                        }
                        true
                    } else {
                        rng.random::<f64>() < (delta / temperature).exp()
                    };

                    if accept {
                        current = candidate;
                        current_score = candidate_score;
                        stats.accepted_moves += 1;

                        if current_score > best_score {
                            best = current.clone();
                            best_score = current_score;
                        }
                    }
                }

                stats.score_history.push(best_score);
                temperature *= config.cooling;
                if temperature < config.min_temperature {
                    break;
                }
            }

            stats.final_temperature = temperature;
        }

        stats.best_score = best_score;
        AnnealResult { best, stats }
    }
}
