//! Greedy constraint-based timetable allocator.
//!
//! Courses are processed once, in priority order, and each is committed to
//! the first `(day, room, start)` that passes the room, instructor, group and
//! adjacency checks. Regular rooms are exhausted across every day before the
//! overflow room is considered. Earlier commits are never revisited, so the
//! result is not guaranteed to be optimal or even feasible when a feasible
//! timetable exists.

pub mod adjacency;
pub mod load;
pub mod occupancy;
pub mod order;

use load::LoadTracker;
use occupancy::Occupancy;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sched_core::Solver;
use tracing::{debug, info, warn};
use types::{
    CourseId, CourseSection, DayOfWeek, Grid, GroupUnit, Placement, RoomId, RoomPools, RoomTier,
    ScheduleEnvelope, ScheduleOutcome,
};

pub struct GreedySolver;
impl GreedySolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GreedySolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver for GreedySolver {
    fn solve(&self, env: &ScheduleEnvelope) -> ScheduleOutcome {
        ConstraintScheduler::new(env.grid.clone(), env.rooms.clone())
            .with_seed(env.params.seed)
            .schedule(&env.courses)
    }
}

#[derive(Clone, Debug)]
pub struct ConstraintScheduler {
    grid: Grid,
    rooms: RoomPools,
    seed: Option<u64>,
}

/// A candidate block that passed every check.
struct Slot<'a> {
    day: DayOfWeek,
    start: u32,
    room: &'a RoomId,
}

impl ConstraintScheduler {
    pub fn new(grid: Grid, rooms: RoomPools) -> Self {
        Self {
            grid,
            rooms,
            seed: None,
        }
    }

    /// `None` gives stable tie-breaks, `Some(seed)` seeded shuffled ones.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn schedule(&self, courses: &[CourseSection]) -> ScheduleOutcome {
        info!(
            courses = courses.len(),
            regular_rooms = self.rooms.regular.len(),
            overflow = self.rooms.overflow.is_some(),
            "scheduling run started"
        );
        let mut rng = self.seed.map(ChaCha8Rng::seed_from_u64);

        let mut groups: Vec<&GroupUnit> = courses.iter().map(|c| &c.group_unit).collect();
        groups.sort_unstable();
        groups.dedup();
        let mut load = LoadTracker::new(groups, &self.grid.days);
        let mut occ = Occupancy::new();
        let mut placements: Vec<Placement> = Vec::new();
        let mut unassigned: Vec<String> = Vec::new();
        let mut unassigned_ids: Vec<CourseId> = Vec::new();

        for course in order::processing_order(courses, rng.as_mut()) {
            if !self.grid.fits(course.required_hours) {
                warn!(
                    course = %course.id,
                    hours = course.required_hours,
                    span = self.grid.span(),
                    "course cannot fit the grid"
                );
                unassigned.push(course.label());
                unassigned_ids.push(course.id.clone());
                continue;
            }

            let days = order::day_order(&self.grid, course, &load, rng.as_mut());

            let found = self
                .find_slot(&occ, course, &days, &self.rooms.regular)
                .map(|s| (s, RoomTier::Regular))
                .or_else(|| {
                    debug!(course = %course.id, "regular rooms exhausted, trying overflow");
                    let extra = self.rooms.overflow.as_slice();
                    self.find_slot(&occ, course, &days, extra)
                        .map(|s| (s, RoomTier::Overflow))
                });

            let Some((slot, tier)) = found else {
                warn!(course = %course.id, group = %course.group_unit, "course left unassigned");
                unassigned.push(course.label());
                unassigned_ids.push(course.id.clone());
                continue;
            };

            let hours = slot.start..slot.start + course.required_hours;
            occ.commit(slot.day, hours, slot.room, course);
            load.increment(&course.group_unit, slot.day, course.required_hours);
            debug!(
                course = %course.id,
                day = %slot.day,
                start = slot.start,
                room = %slot.room,
                ?tier,
                "placed"
            );
            placements.push(Placement {
                course_id: course.id.clone(),
                day: slot.day,
                start_hour: slot.start,
                hours: course.required_hours,
                room: slot.room.clone(),
                tier,
            });
        }

        let overflow_placements = placements
            .iter()
            .filter(|p| p.tier == RoomTier::Overflow)
            .count();
        info!(
            committed = placements.len(),
            unassigned = unassigned.len(),
            overflow_placements,
            "scheduling run finished"
        );

        let stats = serde_json::json!({
            "method": "greedy",
            "courses": courses.len(),
            "committed": placements.len(),
            "unassigned": unassigned.len(),
            "overflow_placements": overflow_placements,
            "cells": occ.len(),
            "seed": self.seed,
            "load": load.to_json(),
        });

        ScheduleOutcome {
            assignment: occ.into_assignment(),
            unassigned,
            unassigned_ids,
            placements,
            stats,
        }
    }

    /// First block, in `days` order, then `rooms` order, then ascending start
    /// hour, that is free in all three indices and keeps the adjacency rule.
    fn find_slot<'a>(
        &'a self,
        occ: &Occupancy<'a>,
        course: &'a CourseSection,
        days: &[DayOfWeek],
        rooms: &'a [RoomId],
    ) -> Option<Slot<'a>> {
        let hours = course.required_hours;
        for &day in days {
            for room in rooms {
                let mut start = self.grid.start_hour;
                while start + hours <= self.grid.end_hour {
                    if occ.is_free(day, start..start + hours, room, course)
                        && !adjacency::breaks_rule(occ, &self.grid, day, start, course)
                    {
                        return Some(Slot { day, start, room });
                    }
                    start += 1;
                }
            }
        }
        None
    }
}
