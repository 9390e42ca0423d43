//! Target apportionment.
//!
//! Turns weighted categories into integer weekly block quotas, one [`Task`]
//! per obligation child.
//!
//! # Algorithm
//!
//! 1. `category_blocks = round(priority * 672)`.
//! 2. Each child's exact share is `category_blocks * relative_priority`.
//! 3. Floors are assigned first; the leftover blocks go one at a time to the
//!    children with the largest fractional parts (ties: declaration order).
//!
//! The result is deterministic and the children's quotas always sum to the
//! category's block count.
//!
//! # Reference
//! Balinski & Young (2001), "Fair Representation", Ch. 2 (Hamilton's method)

use std::cmp::Ordering;

use crate::models::{Category, MeetingRange, ObligationChild, Task, TimeBucket, WEEK_BLOCKS};

/// Blocks per hour.
const BLOCKS_PER_HOUR: f64 = 4.0;

/// Upper bound on one category's quota (64 weeks of blocks).
pub const MAX_CATEGORY_BLOCKS: usize = WEEK_BLOCKS * 64;

/// Week blocks owed to a category with the given priority.
///
/// Out-of-range priorities are not rejected: negative and NaN values
/// yield zero, values above 1 yield more than a week, capped at
/// [`MAX_CATEGORY_BLOCKS`].
pub fn category_blocks(priority: f64) -> usize {
    (priority * WEEK_BLOCKS as f64)
        .round()
        .clamp(0.0, MAX_CATEGORY_BLOCKS as f64) as usize
}

/// Splits `total` into integer parts proportional to `weights`.
///
/// Non-finite or negative weights count as zero. If every weight is zero
/// the split is even. The parts always sum to `total`.
pub fn largest_remainder(total: usize, weights: &[f64]) -> Vec<usize> {
    let n = weights.len();
    if n == 0 {
        return Vec::new();
    }

    let clean: Vec<f64> = weights
        .iter()
        .map(|&w| if w.is_finite() && w > 0.0 { w } else { 0.0 })
        .collect();
    let sum: f64 = clean.iter().sum();
    let exact: Vec<f64> = if sum > 0.0 {
        clean.iter().map(|w| total as f64 * w / sum).collect()
    } else {
        vec![total as f64 / n as f64; n]
    };

    let mut parts: Vec<usize> = exact.iter().map(|e| e.floor() as usize).collect();
    let fractions: Vec<f64> = exact.iter().zip(&parts).map(|(e, &p)| e - p as f64).collect();

    // Stable sort keeps declaration order among equal fractions.
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        fractions[b]
            .partial_cmp(&fractions[a])
            .unwrap_or(Ordering::Equal)
    });

    let assigned: usize = parts.iter().sum();
    if assigned <= total {
        for &i in order.iter().cycle().take(total - assigned) {
            parts[i] += 1;
        }
    } else {
        // Float error pushed the floors over; take back from the smallest fractions.
        let mut excess = assigned - total;
        for &i in order.iter().rev().cycle() {
            if excess == 0 {
                break;
            }
            if parts[i] > 0 {
                parts[i] -= 1;
                excess -= 1;
            }
        }
    }

    parts
}

/// Whether a child is treated as nightly sleep.
///
/// Matches "sleep" anywhere in the child or category name
/// (case-insensitive), or a preference for the night bucket.
pub fn is_sleep_child(child: &ObligationChild, category_name: &str) -> bool {
    child.name.to_lowercase().contains("sleep")
        || child.preferred_time_blocks.contains(&TimeBucket::Night)
        || category_name.to_lowercase().contains("sleep")
}

/// Converts a stretch in hours to blocks (at least 1).
pub fn stretch_blocks(hours: Option<f64>, default_hours: f64) -> usize {
    let hours = hours.filter(|h| h.is_finite()).unwrap_or(default_hours);
    ((hours * BLOCKS_PER_HOUR).round().max(1.0)) as usize
}

/// Builds the run's task list from categories.
///
/// Categories without children contribute nothing. Meetings whose end
/// block does not follow their start block are discarded.
pub fn build_tasks(categories: &[Category], default_stretch_hours: f64) -> Vec<Task> {
    let mut tasks = Vec::new();

    for category in categories {
        if category.children.is_empty() {
            continue;
        }

        let blocks = category_blocks(category.priority);
        let weights: Vec<f64> = category
            .children
            .iter()
            .map(|c| c.relative_priority)
            .collect();
        let quotas = largest_remainder(blocks, &weights);

        for (child, quota) in category.children.iter().zip(quotas) {
            let meetings = child
                .meeting_times
                .iter()
                .map(|m| MeetingRange {
                    day: m.day.index(),
                    start: m.start.to_block(),
                    end: m.end.to_block(),
                })
                .filter(|r| !r.is_empty())
                .collect();

            tasks.push(Task {
                id: child.id.clone(),
                name: child.name.clone(),
                category: category.name.clone(),
                target_blocks: quota,
                blocks_required: quota,
                max_stretch_blocks: stretch_blocks(child.max_stretch, default_stretch_hours),
                preferred: child.preferred_time_blocks.clone(),
                meetings,
                anchors: Vec::new(),
                is_sleep: is_sleep_child(child, &category.name),
            });
        }
    }

    tasks
}
