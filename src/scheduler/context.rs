//! Working state for one planning run.

use std::ops::Range;

use crate::models::{FixedMask, Grid, Task};

/// Runtime planning state owned by a single `generate` call.
///
/// Holds the task list, the working grid and the fixed mask. Placement
/// helpers keep each task's `blocks_required` in step with the grid.
#[derive(Debug, Clone, Default)]
pub struct WeekContext {
    /// Tasks, indexed by the `task` field of grid cells.
    pub tasks: Vec<Task>,
    /// Working grid.
    pub grid: Grid,
    /// Blocks seeded by meetings or sleep.
    pub mask: FixedMask,
}

impl WeekContext {
    /// Creates a context with an empty grid and all-false mask.
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            grid: Grid::new(),
            mask: FixedMask::new(),
        }
    }

    /// Writes task `index`'s flexible label over `range` on `day` and
    /// decrements its remaining demand.
    pub fn place_flexible(&mut self, index: usize, day: usize, range: Range<usize>) {
        let cell = self.tasks[index].flex_cell(index);
        let len = range.len();
        self.grid.fill(day, range, cell);
        let task = &mut self.tasks[index];
        task.blocks_required = task.blocks_required.saturating_sub(len);
    }

    /// Clears an unmasked block, returning the block to its owner's demand.
    ///
    /// Returns `false` if the block is fixed or already empty.
    pub fn clear_block(&mut self, day: usize, block: usize) -> bool {
        if self.mask.is_fixed(day, block) {
            return false;
        }
        match self.grid.get(day, block) {
            Some(cell) => {
                self.grid.set(day, block, None);
                if let Some(task) = self.tasks.get_mut(cell.task) {
                    task.blocks_required += 1;
                }
                true
            }
            None => false,
        }
    }

    /// Re-derives each task's remaining demand from a target per task.
    ///
    /// `wants[i]` is the total number of blocks task `i` should occupy.
    pub fn sync_demand(&mut self, wants: &[usize]) {
        let counts = self.grid.counts_by_task(self.tasks.len());
        for ((task, &want), &have) in self.tasks.iter_mut().zip(wants).zip(&counts) {
            task.blocks_required = want.saturating_sub(have);
        }
    }

    /// Remaining demand per task, in task order.
    pub fn deficits(&self) -> Vec<usize> {
        self.tasks.iter().map(|t| t.blocks_required).collect()
    }

    /// Indices of tasks that can be placed flexibly.
    pub fn flexible_tasks(&self) -> Vec<usize> {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_sleep)
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LabelKind;

    fn task(name: &str, required: usize, sleep: bool) -> Task {
        Task {
            id: name.into(),
            name: name.into(),
            category: "C".into(),
            target_blocks: required,
            blocks_required: required,
            max_stretch_blocks: 4,
            preferred: Vec::new(),
            meetings: Vec::new(),
            anchors: Vec::new(),
            is_sleep: sleep,
        }
    }

    #[test]
    fn test_place_and_clear_track_demand() {
        let mut ctx = WeekContext::new(vec![task("Read", 6, false)]);
        ctx.place_flexible(0, 1, 40..44);
        assert_eq!(ctx.tasks[0].blocks_required, 2);
        assert_eq!(ctx.grid.get(1, 40).map(|c| c.kind), Some(LabelKind::Plain));

        assert!(ctx.clear_block(1, 41));
        assert!(!ctx.clear_block(1, 41));
        assert_eq!(ctx.tasks[0].blocks_required, 3);
    }

    #[test]
    fn test_clear_respects_mask() {
        let mut ctx = WeekContext::new(vec![task("Read", 6, false)]);
        ctx.place_flexible(0, 0, 40..42);
        ctx.mask.mark(0, 40);
        assert!(!ctx.clear_block(0, 40));
        assert!(ctx.grid.get(0, 40).is_some());
    }

    #[test]
    fn test_sync_demand() {
        let mut ctx = WeekContext::new(vec![task("A", 0, false), task("B", 0, false)]);
        ctx.place_flexible(0, 0, 40..45);
        ctx.sync_demand(&[8, 3]);
        assert_eq!(ctx.deficits(), vec![3, 3]);
        ctx.sync_demand(&[2, 3]);
        assert_eq!(ctx.deficits(), vec![0, 3]);
    }

    #[test]
    fn test_flexible_tasks_skip_sleep() {
        let ctx = WeekContext::new(vec![
            task("Sleep", 10, true),
            task("A", 1, false),
            task("B", 1, false),
        ]);
        assert_eq!(ctx.flexible_tasks(), vec![1, 2]);
    }
}
