//! Week grid and fixed mask.
//!
//! The working representation of a schedule during a run: a flat array of
//! `7 * 96` cells addressed by `day * 96 + block`. Each occupied cell records
//! the owning task index and the label kind, so ownership never depends on
//! string comparison. Display labels are produced only when the grid is
//! converted into a [`Schedule`](super::Schedule).

use std::ops::Range;

/// Days per week.
pub const DAYS: usize = 7;
/// 15-minute blocks per day.
pub const BLOCKS_PER_DAY: usize = 96;
/// 15-minute blocks per week.
pub const WEEK_BLOCKS: usize = DAYS * BLOCKS_PER_DAY;
/// First block of the flexible window (08:00).
pub const FLEX_START: usize = 32;
/// End of the flexible window, exclusive (22:00).
pub const FLEX_END: usize = 88;
/// First block of the night bucket (22:00).
pub const NIGHT_START: usize = 88;

/// Which of a task's three label forms a cell carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKind {
    /// A seeded fixed meeting.
    Meeting,
    /// Flexible time for a task that also has meetings.
    Study,
    /// Flexible time for a task without meetings (including sleep).
    Plain,
}

/// Contents of an occupied cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Index into the run's task list.
    pub task: usize,
    /// Label form.
    pub kind: LabelKind,
}

impl Cell {
    #[inline]
    pub fn new(task: usize, kind: LabelKind) -> Self {
        Self { task, kind }
    }
}

/// A maximal contiguous same-content run within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub cell: Cell,
    pub start: usize,
    pub len: usize,
}

impl Run {
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Flat 7 x 96 grid of optional cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Option<Cell>>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// Creates an all-empty grid.
    pub fn new() -> Self {
        Self {
            cells: vec![None; WEEK_BLOCKS],
        }
    }

    /// Flat index of a `(day, block)` pair.
    #[inline]
    pub fn index(day: usize, block: usize) -> usize {
        debug_assert!(day < DAYS && block < BLOCKS_PER_DAY);
        day * BLOCKS_PER_DAY + block
    }

    #[inline]
    pub fn get(&self, day: usize, block: usize) -> Option<Cell> {
        self.cells[Self::index(day, block)]
    }

    #[inline]
    pub fn set(&mut self, day: usize, block: usize, value: Option<Cell>) {
        self.cells[Self::index(day, block)] = value;
    }

    #[inline]
    pub fn is_free(&self, day: usize, block: usize) -> bool {
        self.get(day, block).is_none()
    }

    /// All cells in `day * 96 + block` order.
    #[inline]
    pub fn cells(&self) -> &[Option<Cell>] {
        &self.cells
    }

    /// One day's cells.
    #[inline]
    pub fn day(&self, day: usize) -> &[Option<Cell>] {
        let start = day * BLOCKS_PER_DAY;
        &self.cells[start..start + BLOCKS_PER_DAY]
    }

    /// Whether every block in `range` on `day` is empty.
    pub fn range_free(&self, day: usize, range: Range<usize>) -> bool {
        range.into_iter().all(|b| self.is_free(day, b))
    }

    /// Writes `cell` over `range` on `day`.
    pub fn fill(&mut self, day: usize, range: Range<usize>, cell: Cell) {
        for b in range {
            self.set(day, b, Some(cell));
        }
    }

    /// Length of the empty run starting at `start`, not extending past `limit`.
    pub fn free_run(&self, day: usize, start: usize, limit: usize) -> usize {
        (start..limit.min(BLOCKS_PER_DAY))
            .take_while(|&b| self.is_free(day, b))
            .count()
    }

    /// Whether a chunk `[start, start + len)` would be separated from any
    /// identical neighbouring content by at least one block on each side.
    pub fn moat_ok(&self, day: usize, start: usize, len: usize, cell: Cell) -> bool {
        if start > 0 && self.get(day, start - 1) == Some(cell) {
            return false;
        }
        let end = start + len;
        if end < BLOCKS_PER_DAY && self.get(day, end) == Some(cell) {
            return false;
        }
        true
    }

    /// Number of cells owned by each task (any label kind).
    pub fn counts_by_task(&self, task_count: usize) -> Vec<usize> {
        let mut counts = vec![0; task_count];
        for cell in self.cells.iter().flatten() {
            if let Some(c) = counts.get_mut(cell.task) {
                *c += 1;
            }
        }
        counts
    }

    /// Maximal same-content occupied runs on `day`, in block order.
    pub fn runs(&self, day: usize) -> Vec<Run> {
        let cells = self.day(day);
        let mut runs = Vec::new();
        let mut b = 0;
        while b < BLOCKS_PER_DAY {
            match cells[b] {
                None => b += 1,
                Some(cell) => {
                    let len = cells[b..].iter().take_while(|c| **c == Some(cell)).count();
                    runs.push(Run {
                        cell,
                        start: b,
                        len,
                    });
                    b += len;
                }
            }
        }
        runs
    }

    /// Number of occupied cells.
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

/// Parallel 7 x 96 mask of blocks that must not change after seeding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedMask {
    bits: Vec<bool>,
}

impl Default for FixedMask {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedMask {
    /// Creates an all-false mask.
    pub fn new() -> Self {
        Self {
            bits: vec![false; WEEK_BLOCKS],
        }
    }

    #[inline]
    pub fn is_fixed(&self, day: usize, block: usize) -> bool {
        self.bits[Grid::index(day, block)]
    }

    #[inline]
    pub fn mark(&mut self, day: usize, block: usize) {
        self.bits[Grid::index(day, block)] = true;
    }

    /// Whether any block in `range` on `day` is fixed.
    pub fn any_fixed(&self, day: usize, range: Range<usize>) -> bool {
        range.into_iter().any(|b| self.is_fixed(day, b))
    }

    /// Number of fixed blocks.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn study(task: usize) -> Cell {
        Cell::new(task, LabelKind::Study)
    }

    #[test]
    fn test_grid_starts_empty() {
        let g = Grid::new();
        assert_eq!(g.cells().len(), WEEK_BLOCKS);
        assert_eq!(g.occupied(), 0);
        assert_eq!(g.day(6).len(), BLOCKS_PER_DAY);
    }

    #[test]
    fn test_free_run_respects_limit_and_content() {
        let mut g = Grid::new();
        g.fill(0, 40..42, study(0));
        assert_eq!(g.free_run(0, 32, FLEX_END), 8);
        assert_eq!(g.free_run(0, 40, FLEX_END), 0);
        assert_eq!(g.free_run(0, 80, FLEX_END), 8);
        assert_eq!(g.free_run(1, 90, 200), 6);
    }

    #[test]
    fn test_moat() {
        let mut g = Grid::new();
        g.fill(2, 40..44, study(1));
        // Directly adjacent on either side.
        assert!(!g.moat_ok(2, 44, 2, study(1)));
        assert!(!g.moat_ok(2, 38, 2, study(1)));
        // One block gap.
        assert!(g.moat_ok(2, 45, 2, study(1)));
        // Different content does not count.
        assert!(g.moat_ok(2, 44, 2, study(2)));
        // Day edges.
        assert!(g.moat_ok(2, 0, 2, study(1)));
        assert!(g.moat_ok(2, 94, 2, study(1)));
    }

    #[test]
    fn test_runs() {
        let mut g = Grid::new();
        g.fill(3, 10..13, study(0));
        g.fill(3, 13..14, study(1));
        g.fill(3, 20..22, study(0));
        let runs = g.runs(3);
        assert_eq!(runs.len(), 3);
        assert_eq!((runs[0].start, runs[0].len), (10, 3));
        assert_eq!(runs[1].cell, study(1));
        assert_eq!(runs[2].end(), 22);
    }

    #[test]
    fn test_counts_by_task() {
        let mut g = Grid::new();
        g.fill(0, 0..4, study(0));
        g.fill(5, 0..2, Cell::new(1, LabelKind::Meeting));
        assert_eq!(g.counts_by_task(3), vec![4, 2, 0]);
    }

    #[test]
    fn test_mask() {
        let mut m = FixedMask::new();
        m.mark(4, 10);
        assert!(m.is_fixed(4, 10));
        assert!(m.any_fixed(4, 8..12));
        assert!(!m.any_fixed(4, 11..20));
        assert_eq!(m.count(), 1);
    }
}
