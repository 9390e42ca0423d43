//! Simulated Annealing (SA).
//!
//! A single-solution trajectory search that accepts worsening moves with a
//! probability that shrinks as the temperature cools, so the search can
//! leave local optima early and settle later. The best solution seen is
//! tracked separately from the random walk (elitist tracking), and the run
//! ends with a number of lighter reheat passes started from that best.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Metropolis et al. (1953), "Equation of State Calculations by Fast Computing Machines"

mod config;
mod runner;
mod types;

pub use config::AnnealConfig;
pub use runner::{AnnealResult, AnnealRunner, AnnealStats};
pub use types::AnnealProblem;
