//! Planning pipeline stages and plan metrics.
//!
//! Stages run strictly forward, each over the same [`WeekContext`]:
//!
//! 1. `apportion`: categories -> tasks with integer block quotas
//! 2. `seed`: fixed meetings and nightly sleep (masked)
//! 3. `greedy`: one heuristic sweep of flexible demand
//! 4. `problem`: simulated annealing of the grid, scored by `score`
//! 5. `postprocess`: deficit gap-fill, break enforcement, short-run cleanup
//!
//! # KPI
//!
//! `ScheduleKpi` summarizes a finished plan: placed vs. target blocks per
//! task, deficits, fill rate, transitions and night misuse.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 14 (timetabling)
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"

pub mod apportion;
mod context;
pub mod greedy;
mod kpi;
pub mod postprocess;
mod problem;
pub mod score;
pub mod seed;

pub use context::WeekContext;
pub use kpi::{ScheduleKpi, TaskKpi};
pub use postprocess::PostProcessStats;
pub use problem::{optimize, WeekProblem};
pub use score::{ScoreBreakdown, Scorer};
pub use seed::{MeetingSeedStats, NightPlan};
