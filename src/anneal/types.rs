//! Core trait for the annealing search.

use rand::Rng;

/// Defines a maximization problem for the annealing runner.
///
/// The implementor supplies neighbour generation and scoring; the runner
/// handles temperature, the Metropolis criterion and best-of tracking.
///
/// # Infeasible Moves
///
/// `neighbor` returns `None` when the drawn move is not allowed (for example
/// it would overwrite protected content). The runner counts the attempt and
/// moves on without an accept/reject roll.
///
/// # Examples
///
/// ```ignore
/// struct Knapsack { values: Vec<f64>, weights: Vec<f64>, cap: f64 }
///
/// impl AnnealProblem for Knapsack {
///     type Solution = Vec<bool>;
///
///     fn score(&self, pick: &Vec<bool>) -> f64 {
///         pick.iter().zip(&self.values).filter(|(p, _)| **p).map(|(_, v)| v).sum()
///     }
///
///     fn neighbor<R: Rng>(&self, pick: &Vec<bool>, rng: &mut R) -> Option<Vec<bool>> {
///         let mut next = pick.clone();
///         let i = rng.random_range(0..next.len());
///         next[i] = !next[i];
///         let load: f64 = next.iter().zip(&self.weights).filter(|(p, _)| **p).map(|(_, w)| w).sum();
///         (load <= self.cap).then_some(next)
///     }
/// }
/// ```
pub trait AnnealProblem {
    /// The solution representation type.
    type Solution: Clone;

    /// Fitness of a solution. Higher is better.
    fn score(&self, solution: &Self::Solution) -> f64;

    /// Draws a neighbour of `solution`, or `None` if the drawn move is
    /// infeasible.
    fn neighbor<R: Rng>(&self, solution: &Self::Solution, rng: &mut R) -> Option<Self::Solution>;
}
