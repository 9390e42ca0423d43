//! Structural checks for category input.
//!
//! The engine never rejects input: it skips what it cannot use. These checks
//! report what will be skipped or silently resolved so callers (and the
//! engine's own logging) can surface it. Detects:
//! - Duplicate category or child IDs
//! - Categories without children
//! - Meetings with out-of-range clock times or an empty/inverted range
//! - Meetings that overlap an earlier meeting (the later one is dropped)
//!
//! Percentage totals are the preferences layer's responsibility and are not
//! checked here.

use std::collections::HashSet;

use crate::models::{Category, ClockTime, Meeting, Weekday};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A category has no children and will be skipped.
    EmptyCategory,
    /// A meeting's clock time is outside 00:00..=24:00.
    InvalidClockTime,
    /// A meeting ends at or before its start block.
    EmptyMeeting,
    /// A meeting overlaps one declared earlier and will be dropped.
    MeetingConflict,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates category input.
///
/// Checks:
/// 1. No duplicate category IDs
/// 2. No duplicate child IDs (across all categories)
/// 3. Every category has at least one child
/// 4. Meeting clock times are representable
/// 5. Meetings span at least one block
/// 6. No meeting overlaps an earlier one in declaration order
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_categories(categories: &[Category]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut category_ids = HashSet::new();
    let mut child_ids = HashSet::new();
    // (day, start, end, child id) of meetings accepted so far
    let mut claimed: Vec<(Weekday, usize, usize, &str)> = Vec::new();

    for category in categories {
        if !category_ids.insert(category.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate category ID: {}", category.id),
            ));
        }

        if category.children.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyCategory,
                format!("Category '{}' has no children", category.id),
            ));
        }

        for child in &category.children {
            if !child_ids.insert(child.id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateId,
                    format!("Duplicate child ID: {}", child.id),
                ));
            }

            for meeting in &child.meeting_times {
                if let Some(err) = check_meeting(&child.id, meeting) {
                    errors.push(err);
                    continue;
                }

                let (start, end) = (meeting.start.to_block(), meeting.end.to_block());
                let owner = claimed
                    .iter()
                    .find(|(d, s, e, _)| *d == meeting.day && start < *e && *s < end)
                    .map(|c| c.3);
                if let Some(owner) = owner {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::MeetingConflict,
                        format!(
                            "Meeting of '{}' on {} overlaps a meeting of '{}'",
                            child.id,
                            meeting.day.name(),
                            owner
                        ),
                    ));
                } else {
                    claimed.push((meeting.day, start, end, child.id.as_str()));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_meeting(child_id: &str, meeting: &Meeting) -> Option<ValidationError> {
    let bad_time = |t: &ClockTime| !t.is_valid();
    if bad_time(&meeting.start) || bad_time(&meeting.end) {
        return Some(ValidationError::new(
            ValidationErrorKind::InvalidClockTime,
            format!(
                "Meeting of '{}' on {} has an out-of-range time",
                child_id,
                meeting.day.name()
            ),
        ));
    }
    if meeting.end.to_block() <= meeting.start.to_block() {
        return Some(ValidationError::new(
            ValidationErrorKind::EmptyMeeting,
            format!(
                "Meeting of '{}' on {} ends before it starts",
                child_id,
                meeting.day.name()
            ),
        ));
    }
    None
}
