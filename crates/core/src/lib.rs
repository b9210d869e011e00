pub mod audit;

use std::collections::HashSet;
use thiserror::Error;

pub use types::{
    Booking, CourseId, CourseSection, DayOfWeek, Grid, GroupUnit, InstructorId, Placement,
    RoomId, RoomPools, RoomTier, ScheduleEnvelope, ScheduleOutcome, SlotKey, SolveParams,
};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid envelope: {}", .0.join("; "))]
    Issues(Vec<String>),
}

impl ValidationError {
    pub fn issues(&self) -> &[String] {
        match self {
            ValidationError::Issues(v) => v,
        }
    }
}

/// Pre-flight check of an envelope. Solvers never call this; a record that
/// fails here is still accepted by `Solver::solve` and simply ends up
/// unassigned.
pub fn validate(env: &ScheduleEnvelope) -> Result<(), ValidationError> {
    let mut errors: Vec<String> = Vec::new();
    let grid = &env.grid;

    if grid.days.is_empty() {
        errors.push("grid has no days".into());
    }
    if grid.end_hour <= grid.start_hour {
        errors.push(format!(
            "grid hour range is empty: [{}, {})",
            grid.start_hour, grid.end_hour
        ));
    }

    fn chk_unique<I: ToString>(name: &str, ids: impl Iterator<Item = I>, errors: &mut Vec<String>) {
        let mut seen = HashSet::new();
        for id in ids {
            let s = id.to_string();
            if !seen.insert(s.clone()) {
                errors.push(format!("duplicate {name}: {s}"));
            }
        }
    }
    chk_unique("grid day", grid.days.iter(), &mut errors);
    chk_unique("room id", env.rooms.regular.iter(), &mut errors);
    chk_unique("course id", env.courses.iter().map(|c| &c.id), &mut errors);

    if env.rooms.regular.is_empty() && env.rooms.overflow.is_none() {
        errors.push("no rooms configured".into());
    }
    if let Some(extra) = &env.rooms.overflow {
        if env.rooms.regular.contains(extra) {
            errors.push(format!("overflow room {extra} is also a regular room"));
        }
    }

    for c in &env.courses {
        if c.required_hours == 0 {
            errors.push(format!("course {} has requiredHours=0", c.id));
        } else if c.required_hours > grid.span() {
            errors.push(format!(
                "course {} needs {}h but the grid day has {}h",
                c.id,
                c.required_hours,
                grid.span()
            ));
        }
        for d in &c.preferred_days {
            if !grid.contains_day(*d) {
                errors.push(format!("course {} prefers {d}, which is not on the grid", c.id));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Issues(errors))
    }
}

/// A timetable allocator. Implementations never fail: courses that cannot be
/// placed are reported in `ScheduleOutcome::unassigned`.
pub trait Solver {
    fn solve(&self, env: &ScheduleEnvelope) -> ScheduleOutcome;
}
