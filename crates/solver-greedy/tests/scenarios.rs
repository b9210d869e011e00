use sched_core::audit::audit;
use sched_core::Solver;
use solver_greedy::{ConstraintScheduler, GreedySolver};
use types::{
    CourseId, CourseSection, DayOfWeek, Grid, RoomId, RoomPools, RoomTier, ScheduleEnvelope,
    SolveParams,
};

fn course(id: &str, group: &str, instructor: &str, hours: u32) -> CourseSection {
    CourseSection {
        id: id.into(),
        title: format!("Course {id}"),
        instructor: instructor.into(),
        required_hours: hours,
        group_unit: group.into(),
        preference_score: 0,
        preferred_days: vec![],
        exempt_from_adjacency_rule: false,
    }
}

fn single_day(start_hour: u32, end_hour: u32) -> Grid {
    Grid {
        days: vec![DayOfWeek::Mon],
        start_hour,
        end_hour,
    }
}

fn rooms(regular: &[&str]) -> RoomPools {
    RoomPools {
        regular: regular.iter().map(|r| RoomId::from(*r)).collect(),
        overflow: Some(RoomId::from("R_EXTRA")),
    }
}

fn envelope(courses: Vec<CourseSection>, grid: Grid, rooms: RoomPools) -> ScheduleEnvelope {
    ScheduleEnvelope {
        courses,
        grid,
        rooms,
        params: SolveParams::default(),
    }
}

#[test]
fn shared_instructor_never_double_booked() {
    let grid = Grid {
        days: DayOfWeek::WEEKDAYS.to_vec(),
        start_hour: 9,
        end_hour: 11,
    };
    let env = envelope(
        vec![
            course("a", "SW-1A", "kim", 2),
            course("b", "SW-2A", "kim", 2),
        ],
        grid,
        rooms(&["1215", "1216"]),
    );
    let out = GreedySolver::new().solve(&env);

    let a = out.placement_for(&"a".into()).unwrap();
    match out.placement_for(&"b".into()) {
        Some(b) => assert_ne!(a.day, b.day),
        None => assert_eq!(out.unassigned, ["Course b (SW-2A)"]),
    }
    let report = audit(&env, &out);
    assert!(report.is_clean(), "{:?}", report.violations);
}

#[test]
fn third_section_is_kept_off_the_adjacent_hour() {
    let courses = vec![
        course("a", "BD-1", "p1", 1),
        course("b", "BD-1", "p2", 1),
        course("c", "BD-1", "p3", 1),
    ];
    let env = envelope(courses, single_day(9, 18), rooms(&["1215"]));
    let out = GreedySolver::new().solve(&env);

    let starts: Vec<u32> = out.placements.iter().map(|p| p.start_hour).collect();
    assert_eq!(starts, [9, 10, 12]);
    assert!(audit(&env, &out).is_clean());
}

#[test]
fn third_section_goes_unassigned_when_no_other_hour_exists() {
    let courses = vec![
        course("a", "BD-1", "p1", 1),
        course("b", "BD-1", "p2", 1),
        course("c", "BD-1", "p3", 1),
    ];
    let env = envelope(courses, single_day(9, 12), rooms(&["1215", "1216"]));
    let out = GreedySolver::new().solve(&env);

    assert_eq!(out.placements.len(), 2);
    assert_eq!(out.unassigned, ["Course c (BD-1)"]);
    assert!(out.overflow_placements().next().is_none());
    assert!(audit(&env, &out).is_clean());
}

#[test]
fn exempt_section_may_complete_a_run_of_three() {
    let mut a = course("a", "SW-4", "p1", 1);
    a.preference_score = 3;
    let mut b = course("b", "SW-4", "p2", 1);
    b.preference_score = 2;
    let mut capstone = course("capstone", "SW-4", "p3", 1);
    capstone.preference_score = 1;
    capstone.exempt_from_adjacency_rule = true;

    let env = envelope(vec![capstone, b, a], single_day(9, 12), rooms(&["1215"]));
    let out = GreedySolver::new().solve(&env);

    assert!(out.unassigned.is_empty());
    let cap = out.placement_for(&"capstone".into()).unwrap();
    assert_eq!((cap.start_hour, cap.tier), (11, RoomTier::Regular));
    assert!(audit(&env, &out).is_clean());
}

#[test]
fn full_regular_rooms_fall_back_to_overflow_once() {
    let courses = vec![
        course("a", "SW-1A", "p1", 1),
        course("b", "SW-1B", "p2", 1),
        course("c", "SW-2A", "p3", 1),
    ];
    let env = envelope(courses, single_day(9, 10), rooms(&["1215", "1216"]));
    let out = GreedySolver::new().solve(&env);

    let c = out.placement_for(&"c".into()).unwrap();
    assert_eq!(c.room.0, "R_EXTRA");
    assert_eq!(c.tier, RoomTier::Overflow);
    assert_eq!(out.overflow_placements().count(), 1);
    assert_eq!(out.stats["overflow_placements"], 1);

    let report = audit(&env, &out);
    assert!(report.is_clean());
    assert_eq!(report.overflow_courses, 1);
    assert_eq!(report.overflow.len(), 1);
    assert_eq!(report.overflow[0].title, "Course c");
}

#[test]
fn overflow_is_not_used_while_another_day_is_free() {
    let grid = Grid {
        days: vec![DayOfWeek::Mon, DayOfWeek::Tue],
        start_hour: 9,
        end_hour: 10,
    };
    let courses = vec![course("a", "g1", "p1", 1), course("b", "g2", "p2", 1)];
    let env = envelope(courses, grid, rooms(&["1215"]));
    let out = GreedySolver::new().solve(&env);

    assert!(out.overflow_placements().next().is_none());
    assert_eq!(out.placement_for(&"b".into()).unwrap().day, DayOfWeek::Tue);
}

#[test]
fn oversized_course_is_always_unassigned() {
    let env = envelope(
        vec![course("long", "BD-3", "p1", 10), course("ok", "BD-3", "p2", 9)],
        Grid::default(),
        RoomPools::default(),
    );
    let out = GreedySolver::new().solve(&env);

    assert_eq!(out.unassigned, ["Course long (BD-3)"]);
    assert!(out.assignment.values().all(|b| b.course_id.0 != "long"));
    assert_eq!(out.placement_for(&"ok".into()).unwrap().hours, 9);
}

#[test]
fn same_title_sections_in_one_group_audit_clean() {
    let mut first = course("cap-1", "SW-4", "park", 1);
    let mut second = course("cap-2", "SW-4", "choi", 1);
    first.title = "Capstone Design".into();
    second.title = "Capstone Design".into();
    let env = envelope(
        vec![first, second],
        single_day(9, 10),
        RoomPools {
            regular: vec![RoomId::from("1215")],
            overflow: None,
        },
    );
    let out = GreedySolver::new().solve(&env);

    assert_eq!(out.placements.len(), 1);
    assert_eq!(out.unassigned, ["Capstone Design (SW-4)"]);
    assert_eq!(out.unassigned_ids, [CourseId::from("cap-2")]);
    let report = audit(&env, &out);
    assert!(report.is_clean(), "{:?}", report.violations);
}

#[test]
fn repeated_runs_are_identical() {
    let courses: Vec<CourseSection> = (0..30)
        .map(|i| {
            let mut c = course(
                &format!("c{i}"),
                &format!("g{}", i % 4),
                &format!("p{}", i % 6),
                1 + i % 3,
            );
            c.preference_score = i % 5;
            c
        })
        .collect();

    for seed in [None, Some(11)] {
        let sched = ConstraintScheduler::new(Grid::default(), RoomPools::default()).with_seed(seed);
        let first = sched.schedule(&courses);
        let second = sched.schedule(&courses);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}

#[test]
fn outcome_round_trips_through_json() {
    let env = envelope(
        vec![course("a", "g", "p", 2), course("b", "g", "p", 1)],
        Grid::default(),
        RoomPools::default(),
    );
    let out = GreedySolver::new().solve(&env);
    let text = serde_json::to_string(&out).unwrap();
    let back: types::ScheduleOutcome = serde_json::from_str(&text).unwrap();
    assert_eq!(back, out);
}
