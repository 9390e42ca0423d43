//! Weekly planning domain models.
//!
//! Provides the input types supplied by the preferences layer, the runtime
//! task and grid types owned by the engine during one run, and the output
//! schedule.
//!
//! # Domain Mappings
//!
//! | u-weekplan | Student | Shift worker | Freelancer |
//! |------------|---------|--------------|------------|
//! | Category | School | Work | Clients |
//! | ObligationChild | Course | Shift role | Project |
//! | Meeting | Lecture | Fixed shift | Standing call |
//! | Task | Study time | Prep time | Billable block |

mod category;
mod grid;
mod schedule;
mod task;

pub use category::{Category, ClockTime, Meeting, ObligationChild, TimeBucket, Weekday};
pub use grid::{
    Cell, FixedMask, Grid, LabelKind, Run, BLOCKS_PER_DAY, DAYS, FLEX_END, FLEX_START,
    NIGHT_START, WEEK_BLOCKS,
};
pub use schedule::Schedule;
pub use task::{Anchor, AnchorKind, MeetingRange, Task};
