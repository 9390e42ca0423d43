//! Planning engine entry points.
//!
//! # Pipeline
//!
//! 1. Apportion category shares into per-task block quotas.
//! 2. Seed meetings, then nightly sleep, into an empty week (masked).
//! 3. Greedy sweep of flexible demand.
//! 4. Simulated annealing of the grid.
//! 5. Deficit gap-fill, break enforcement, short-run cleanup.
//!
//! The engine is total: every input yields a complete 672-slot schedule.
//! Unsatisfiable demand ends up as a per-task deficit in [`EngineResult`].
//!
//! # Randomness
//! All random draws come from one generator. Pass a seed in
//! [`EngineConfig`] or supply a generator through
//! [`Engine::run_with_rng`] for reproducible plans.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::anneal::{AnnealConfig, AnnealStats};
use crate::error::{ConfigError, Result};
use crate::models::{Category, Schedule};
use crate::scheduler::apportion::build_tasks;
use crate::scheduler::greedy::greedy_fill;
use crate::scheduler::postprocess::post_process;
use crate::scheduler::seed::{seed_meetings, seed_sleep};
use crate::scheduler::{
    optimize, MeetingSeedStats, PostProcessStats, ScheduleKpi, Scorer, WeekContext,
};
use crate::validation::validate_categories;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Annealing parameters.
    pub anneal: AnnealConfig,
    /// Seed for the run's generator. `None` = fresh seed per run.
    pub seed: Option<u64>,
    /// Stretch used for children that do not set one (hours).
    pub default_max_stretch_hours: f64,
    /// Round-robin sweeps of the deficit gap-fill.
    pub deficit_sweeps: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            anneal: AnnealConfig::default(),
            seed: None,
            default_max_stretch_hours: 2.0,
            deficit_sweeps: 3,
        }
    }
}

impl EngineConfig {
    pub fn with_anneal(mut self, anneal: AnnealConfig) -> Self {
        self.anneal = anneal;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_default_max_stretch_hours(mut self, hours: f64) -> Self {
        self.default_max_stretch_hours = hours;
        self
    }

    pub fn with_deficit_sweeps(mut self, sweeps: usize) -> Self {
        self.deficit_sweeps = sweeps;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        self.anneal.validate()?;
        if !(self.default_max_stretch_hours.is_finite() && self.default_max_stretch_hours > 0.0) {
            return Err(ConfigError::DefaultMaxStretch(
                self.default_max_stretch_hours,
            ));
        }
        Ok(())
    }
}

/// Blocks a task still owes after the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDeficit {
    /// Child identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Unplaced 15-minute blocks.
    pub blocks: usize,
}

/// Everything a run produces.
#[derive(Debug, Clone, Serialize)]
pub struct EngineResult {
    /// The finished week.
    pub schedule: Schedule,
    /// Tasks left with unmet demand, in task order.
    pub deficits: Vec<TaskDeficit>,
    /// Fitness of the finished grid.
    pub score: f64,
    /// Meeting seeding outcome.
    pub meetings: MeetingSeedStats,
    /// Annealing counters.
    pub anneal: AnnealStats,
    /// Clean-up pass counters.
    pub post: PostProcessStats,
    /// Plan metrics.
    pub kpi: ScheduleKpi,
}

/// Weekly planning engine.
///
/// # Example
///
/// ```
/// use u_weekplan::engine::{Engine, EngineConfig};
/// use u_weekplan::models::{Category, ObligationChild, Weekday};
///
/// let categories = vec![
///     Category::new("sleep", "Sleep")
///         .with_priority(0.33)
///         .with_child(ObligationChild::new("night", "Sleep").with_relative_priority(1.0)),
///     Category::new("fit", "Exercise")
///         .with_priority(0.05)
///         .with_child(ObligationChild::new("run", "Running").with_relative_priority(1.0)),
/// ];
///
/// let engine = Engine::new(EngineConfig::default().with_seed(7)).unwrap();
/// let schedule = engine.generate(&categories);
/// assert_eq!(schedule.day(Weekday::Monday).len(), 96);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Creates an engine after validating `config`.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The engine's configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Plans a week and returns only the schedule.
    pub fn generate(&self, categories: &[Category]) -> Schedule {
        self.run(categories).schedule
    }

    /// Plans a week with a generator seeded from the configuration.
    pub fn run(&self, categories: &[Category]) -> EngineResult {
        let seed = self.config.seed.unwrap_or_else(rand::random);
        debug!("planning run seeded with {seed}");
        let mut rng = StdRng::seed_from_u64(seed);
        self.run_with_rng(categories, &mut rng)
    }

    /// Plans a week drawing all randomness from `rng`.
    pub fn run_with_rng<R: Rng>(&self, categories: &[Category], rng: &mut R) -> EngineResult {
        self.run_with_cancel(categories, rng, None)
    }

    /// Plans a week; `cancel` is polled between annealing temperature steps.
    ///
    /// A cancelled run still completes the clean-up passes and returns the
    /// best grid found so far.
    pub fn run_with_cancel<R: Rng>(
        &self,
        categories: &[Category],
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> EngineResult {
        if let Err(errors) = validate_categories(categories) {
            for e in &errors {
                warn!("{:?}: {}", e.kind, e.message);
            }
        }

        let tasks = build_tasks(categories, self.config.default_max_stretch_hours);
        debug!(
            "apportioned {} categories into {} tasks",
            categories.len(),
            tasks.len()
        );
        let mut ctx = WeekContext::new(tasks);

        let meetings = seed_meetings(&mut ctx);
        let sleep_blocks = seed_sleep(&mut ctx);
        debug!(
            "seeded {} meetings ({} dropped) and {} sleep blocks",
            meetings.placed, meetings.dropped, sleep_blocks
        );

        greedy_fill(&mut ctx);
        let anneal = optimize(&mut ctx, &self.config.anneal, rng, cancel);
        let post = post_process(&mut ctx, self.config.deficit_sweeps);

        let score = Scorer::new(&ctx.tasks, &ctx.grid).score(&ctx.grid);
        let kpi = ScheduleKpi::calculate(&ctx.grid, &ctx.tasks);
        let deficits: Vec<TaskDeficit> = ctx
            .tasks
            .iter()
            .filter(|t| t.has_demand())
            .map(|t| TaskDeficit {
                id: t.id.clone(),
                name: t.name.clone(),
                blocks: t.blocks_required,
            })
            .collect();

        info!(
            "planned {} tasks: {} blocks occupied, {} blocks short, score {:.3}",
            ctx.tasks.len(),
            kpi.occupied_blocks,
            kpi.total_deficit,
            score
        );

        EngineResult {
            schedule: Schedule::from_grid(&ctx.grid, &ctx.tasks),
            deficits,
            score,
            meetings,
            anneal,
            post,
            kpi,
        }
    }
}

/// Plans a week with the default configuration and a fresh seed.
pub fn generate(categories: &[Category]) -> Schedule {
    Engine::default().generate(categories)
}
