use crate::load::LoadTracker;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use std::cmp::Reverse;
use types::{CourseSection, DayOfWeek, Grid};

/// Processing priority: preference score descending, then required hours
/// descending. The sort is stable, so equal keys keep input order unless an
/// rng is given, in which case they are shuffled first.
pub fn processing_order<'a>(
    courses: &'a [CourseSection],
    rng: Option<&mut ChaCha8Rng>,
) -> Vec<&'a CourseSection> {
    let mut order: Vec<&CourseSection> = courses.iter().collect();
    if let Some(rng) = rng {
        order.shuffle(rng);
    }
    order.sort_by_key(|c| (Reverse(c.preference_score), Reverse(c.required_hours)));
    order
}

/// Full permutation of the grid days: preferred days first, then the rest,
/// each part ordered by ascending load of the course's group. Equal loads
/// keep grid order unless an rng is given.
pub fn day_order(
    grid: &Grid,
    course: &CourseSection,
    load: &LoadTracker,
    rng: Option<&mut ChaCha8Rng>,
) -> Vec<DayOfWeek> {
    let mut by_load: Vec<DayOfWeek> = Vec::with_capacity(grid.days.len());
    for &d in &grid.days {
        if !by_load.contains(&d) {
            by_load.push(d);
        }
    }
    if let Some(rng) = rng {
        by_load.shuffle(rng);
    }
    by_load.sort_by_key(|&d| load.current_load(&course.group_unit, d));

    let (mut days, rest): (Vec<DayOfWeek>, Vec<DayOfWeek>) = by_load
        .into_iter()
        .partition(|d| course.preferred_days.contains(d));
    days.extend(rest);
    days
}
