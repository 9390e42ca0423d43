//! Plan quality metrics (KPIs).
//!
//! Summarizes a finished week grid against its tasks.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Placed blocks | Blocks a task occupies (meetings included) |
//! | Deficit | Blocks a task still owes |
//! | Fill rate | Sum of placed / sum of targets (flexible tasks) |
//! | Transitions | Adjacent same-day blocks with different contents |
//! | Night misuse | Non-sleep blocks between 22:00 and 24:00 |

use serde::Serialize;

use crate::models::{Grid, Task, DAYS, NIGHT_START};

/// Per-task outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskKpi {
    pub id: String,
    pub name: String,
    pub category: String,
    /// Blocks apportioned.
    pub target_blocks: usize,
    /// Blocks occupied in the grid.
    pub placed_blocks: usize,
    /// Blocks still owed.
    pub deficit_blocks: usize,
    pub is_sleep: bool,
}

/// Plan performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleKpi {
    /// Per-task outcome, in task order.
    pub tasks: Vec<TaskKpi>,
    /// Occupied blocks in the week.
    pub occupied_blocks: usize,
    /// Sum of all task deficits.
    pub total_deficit: usize,
    /// Placed / target over non-sleep tasks (1.0 if nothing was asked).
    pub fill_rate: f64,
    /// Label changes between adjacent blocks.
    pub transitions: usize,
    /// Non-sleep blocks after 22:00.
    pub night_misuse_blocks: usize,
}

impl ScheduleKpi {
    /// Computes KPIs from a grid and its tasks.
    pub fn calculate(grid: &Grid, tasks: &[Task]) -> Self {
        let counts = grid.counts_by_task(tasks.len());

        let task_kpis: Vec<TaskKpi> = tasks
            .iter()
            .zip(&counts)
            .map(|(t, &placed)| TaskKpi {
                id: t.id.clone(),
                name: t.name.clone(),
                category: t.category.clone(),
                target_blocks: t.target_blocks,
                placed_blocks: placed,
                deficit_blocks: t.blocks_required,
                is_sleep: t.is_sleep,
            })
            .collect();

        let (placed, target) = task_kpis
            .iter()
            .filter(|k| !k.is_sleep)
            .fold((0usize, 0usize), |(p, t), k| {
                (p + k.placed_blocks.min(k.target_blocks), t + k.target_blocks)
            });
        let fill_rate = if target == 0 {
            1.0
        } else {
            placed as f64 / target as f64
        };

        let mut transitions = 0;
        let mut night_misuse_blocks = 0;
        for day in 0..DAYS {
            let cells = grid.day(day);
            transitions += cells.windows(2).filter(|w| w[0] != w[1]).count();
            night_misuse_blocks += cells[NIGHT_START..]
                .iter()
                .flatten()
                .filter(|c| tasks.get(c.task).is_some_and(|t| !t.is_sleep))
                .count();
        }

        Self {
            occupied_blocks: grid.occupied(),
            total_deficit: task_kpis.iter().map(|k| k.deficit_blocks).sum(),
            tasks: task_kpis,
            fill_rate,
            transitions,
            night_misuse_blocks,
        }
    }

    /// Whether the plan meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_deficit: usize, min_fill_rate: f64) -> bool {
        self.total_deficit <= max_deficit && self.fill_rate >= min_fill_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cell, LabelKind};

    fn task(name: &str, target: usize, required: usize, sleep: bool) -> Task {
        Task {
            id: name.into(),
            name: name.into(),
            category: "C".into(),
            target_blocks: target,
            blocks_required: required,
            max_stretch_blocks: 8,
            preferred: Vec::new(),
            meetings: Vec::new(),
            anchors: Vec::new(),
            is_sleep: sleep,
        }
    }

    #[test]
    fn test_kpi_basic() {
        let tasks = vec![task("Read", 8, 4, false), task("Sleep", 36, 0, true)];
        let mut grid = Grid::new();
        grid.fill(0, 40..44, Cell::new(0, LabelKind::Plain));
        grid.fill(0, 84..96, Cell::new(1, LabelKind::Plain));
        grid.fill(1, 90..92, Cell::new(0, LabelKind::Plain));

        let kpi = ScheduleKpi::calculate(&grid, &tasks);
        assert_eq!(kpi.tasks[0].placed_blocks, 6);
        assert_eq!(kpi.tasks[1].placed_blocks, 12);
        assert_eq!(kpi.total_deficit, 4);
        assert!((kpi.fill_rate - 0.75).abs() < 1e-12);
        assert_eq!(kpi.night_misuse_blocks, 2);
        // day 0: 39|40, 43|44, 83|84 ; day 1: 89|90, 91|92
        assert_eq!(kpi.transitions, 5);
        assert_eq!(kpi.occupied_blocks, 18);
    }

    #[test]
    fn test_kpi_empty() {
        let kpi = ScheduleKpi::calculate(&Grid::new(), &[]);
        assert_eq!(kpi.total_deficit, 0);
        assert!((kpi.fill_rate - 1.0).abs() < 1e-12);
        assert!(kpi.meets_thresholds(0, 1.0));
    }

    #[test]
    fn test_thresholds() {
        let tasks = vec![task("Read", 10, 10, false)];
        let kpi = ScheduleKpi::calculate(&Grid::new(), &tasks);
        assert!(!kpi.meets_thresholds(5, 0.0));
        assert!(kpi.meets_thresholds(10, 0.0));
        assert!(!kpi.meets_thresholds(10, 0.5));
    }
}
