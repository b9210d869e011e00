//! Group-level "no three distinct sections back to back" rule.
//!
//! Only the two hours on either side of a candidate block are inspected.
//! Every earlier commit already passed this check, so a longer run of
//! distinct sections cannot exist beyond that window.

use crate::occupancy::Occupancy;
use std::collections::BTreeSet;
use types::{CourseId, CourseSection, DayOfWeek, Grid};

/// Distinct courses found in the two-hour windows before and after
/// `[start, start + course.required_hours)` for the course's group. The
/// further hour on a side is only looked at when the touching hour is
/// occupied.
pub fn neighbours<'a>(
    occ: &Occupancy<'a>,
    grid: &Grid,
    day: DayOfWeek,
    start: u32,
    course: &'a CourseSection,
) -> BTreeSet<&'a CourseId> {
    let group = &course.group_unit;
    let mut found = BTreeSet::new();

    let before = [start.checked_sub(1), start.checked_sub(2)];
    for h in before.into_iter().map_while(|h| h.filter(|h| *h >= grid.start_hour)) {
        match occ.group_occupant(day, h, group) {
            Some(id) => found.insert(id),
            None => break,
        };
    }

    let end = start.saturating_add(course.required_hours);
    for h in (end..end.saturating_add(2)).take_while(|h| *h < grid.end_hour) {
        match occ.group_occupant(day, h, group) {
            Some(id) => found.insert(id),
            None => break,
        };
    }

    found
}

/// True when placing `course` at `start` would sit it between or beside two
/// other distinct sections of its group. Exempt courses never trip it.
pub fn breaks_rule<'a>(
    occ: &Occupancy<'a>,
    grid: &Grid,
    day: DayOfWeek,
    start: u32,
    course: &'a CourseSection,
) -> bool {
    if course.exempt_from_adjacency_rule {
        return false;
    }
    let mut around = neighbours(occ, grid, day, start, course);
    around.remove(&course.id);
    around.len() >= 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::RoomId;

    fn course(id: &str, hours: u32) -> CourseSection {
        CourseSection {
            id: id.into(),
            title: id.into(),
            instructor: id.into(),
            required_hours: hours,
            group_unit: "SW-3B".into(),
            preference_score: 0,
            preferred_days: vec![],
            exempt_from_adjacency_rule: false,
        }
    }

    const DAY: DayOfWeek = DayOfWeek::Mon;

    #[test]
    fn one_neighbour_on_each_side_is_a_run_of_three() {
        let room = RoomId::from("r");
        let grid = Grid::default();
        let (a, b, c) = (course("a", 1), course("b", 1), course("c", 1));
        let mut occ = Occupancy::new();
        occ.commit(DAY, 9..10, &room, &a);
        occ.commit(DAY, 11..12, &room, &b);

        assert_eq!(neighbours(&occ, &grid, DAY, 10, &c).len(), 2);
        assert!(breaks_rule(&occ, &grid, DAY, 10, &c));
    }

    #[test]
    fn two_neighbours_on_one_side() {
        let room = RoomId::from("r");
        let grid = Grid::default();
        let (a, b, c) = (course("a", 1), course("b", 1), course("c", 2));
        let mut occ = Occupancy::new();
        occ.commit(DAY, 9..10, &room, &a);
        occ.commit(DAY, 10..11, &room, &b);

        assert!(breaks_rule(&occ, &grid, DAY, 11, &c));
        // a gap after b clears the window
        assert!(!breaks_rule(&occ, &grid, DAY, 12, &c));
    }

    #[test]
    fn far_hour_is_ignored_behind_a_gap() {
        let room = RoomId::from("r");
        let grid = Grid::default();
        let (a, b, c) = (course("a", 1), course("b", 1), course("c", 1));
        let mut occ = Occupancy::new();
        occ.commit(DAY, 12..13, &room, &a);
        occ.commit(DAY, 9..10, &room, &b);

        // 11 is free, so 12 is never inspected: only b at 9 is adjacent
        assert_eq!(neighbours(&occ, &grid, DAY, 10, &c).len(), 1);
        assert!(!breaks_rule(&occ, &grid, DAY, 10, &c));
    }

    #[test]
    fn same_course_on_both_hours_counts_once() {
        let room = RoomId::from("r");
        let grid = Grid::default();
        let (a, b, c) = (course("a", 2), course("b", 1), course("c", 1));
        let mut occ = Occupancy::new();
        occ.commit(DAY, 9..11, &room, &a);

        assert!(!breaks_rule(&occ, &grid, DAY, 11, &c));
        occ.commit(DAY, 12..13, &room, &b);
        assert!(breaks_rule(&occ, &grid, DAY, 11, &c));
    }

    #[test]
    fn exempt_course_is_never_rejected() {
        let room = RoomId::from("r");
        let grid = Grid::default();
        let (a, b) = (course("a", 1), course("b", 1));
        let mut capstone = course("capstone", 1);
        capstone.exempt_from_adjacency_rule = true;
        let mut occ = Occupancy::new();
        occ.commit(DAY, 9..10, &room, &a);
        occ.commit(DAY, 11..12, &room, &b);

        assert!(!breaks_rule(&occ, &grid, DAY, 10, &capstone));
    }

    #[test]
    fn window_stops_at_grid_edges() {
        let room = RoomId::from("r");
        let grid = Grid {
            days: vec![DAY],
            start_hour: 9,
            end_hour: 12,
        };
        let (a, c) = (course("a", 1), course("c", 1));
        let mut occ = Occupancy::new();
        occ.commit(DAY, 10..11, &room, &a);

        assert_eq!(neighbours(&occ, &grid, DAY, 9, &c).len(), 1);
        assert_eq!(neighbours(&occ, &grid, DAY, 11, &c).len(), 1);
        assert!(neighbours(&occ, &grid, DAY, 0, &c).is_empty());
    }

    #[test]
    fn window_near_the_top_of_the_hour_range() {
        let room = RoomId::from("r");
        let grid = Grid {
            days: vec![DAY],
            start_hour: u32::MAX - 4,
            end_hour: u32::MAX,
        };
        let (a, b, c) = (course("a", 1), course("b", 1), course("c", 2));
        let mut occ = Occupancy::new();
        occ.commit(DAY, u32::MAX - 2..u32::MAX - 1, &room, &a);
        occ.commit(DAY, u32::MAX - 1..u32::MAX, &room, &b);

        // block ends at u32::MAX - 2, the after window runs to the grid end
        assert_eq!(neighbours(&occ, &grid, DAY, u32::MAX - 4, &c).len(), 2);
        assert!(breaks_rule(&occ, &grid, DAY, u32::MAX - 4, &c));
        // block ending exactly at u32::MAX has nothing after it
        assert!(neighbours(&occ, &grid, DAY, u32::MAX - 2, &c).is_empty());
        // a block running past u32::MAX only sees what lies before it
        assert_eq!(neighbours(&occ, &grid, DAY, u32::MAX - 1, &c).len(), 1);
    }
}
