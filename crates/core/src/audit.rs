use serde::Serialize;
use serde_json::json;
use std::collections::{BTreeMap, HashMap, HashSet};
use types::{
    CourseId, CourseSection, DayOfWeek, GroupUnit, InstructorId, RoomId, RoomTier,
    ScheduleEnvelope, ScheduleOutcome,
};

#[derive(Clone, Copy, Debug, Serialize, Eq, PartialEq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Partition,
    InstructorClash,
    GroupClash,
    Contiguity,
    Adjacency,
    UnknownCourse,
}

#[derive(Clone, Debug, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub details: serde_json::Value,
}

#[derive(Clone, Debug, Serialize)]
pub struct OverflowUse {
    pub day: DayOfWeek,
    pub hour: u32,
    pub group_unit: GroupUnit,
    pub instructor: InstructorId,
    pub title: String,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct Audit {
    pub violations: Vec<Violation>,
    pub overflow: Vec<OverflowUse>,
    pub overflow_courses: usize,
}

impl Audit {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn count(&self, kind: ViolationKind) -> usize {
        self.violations.iter().filter(|v| v.kind == kind).count()
    }

    fn push(&mut self, kind: ViolationKind, details: serde_json::Value) {
        self.violations.push(Violation { kind, details });
    }
}

/// Re-derives the schedule invariants from an outcome alone.
pub fn audit(env: &ScheduleEnvelope, out: &ScheduleOutcome) -> Audit {
    let mut report = Audit::default();
    let grid = &env.grid;

    let course_by_id: HashMap<&CourseId, &CourseSection> =
        env.courses.iter().map(|c| (&c.id, c)).collect();

    // Cells each committed course holds, read back from the room index.
    let mut cells_of: BTreeMap<&CourseId, Vec<(DayOfWeek, u32, &RoomId)>> = BTreeMap::new();
    let mut occ_instructor: HashMap<(DayOfWeek, u32, &InstructorId), &CourseId> = HashMap::new();
    let mut occ_group: HashMap<(DayOfWeek, u32, &GroupUnit), &CourseId> = HashMap::new();

    for (key, booking) in &out.assignment {
        if !course_by_id.contains_key(&booking.course_id) {
            report.push(
                ViolationKind::UnknownCourse,
                json!({"course": booking.course_id, "day": key.day, "hour": key.hour}),
            );
            continue;
        }
        cells_of
            .entry(&booking.course_id)
            .or_default()
            .push((key.day, key.hour, &key.room));

        if let Some(prev) =
            occ_instructor.insert((key.day, key.hour, &booking.instructor), &booking.course_id)
        {
            report.push(
                ViolationKind::InstructorClash,
                json!({"instructor": booking.instructor, "day": key.day, "hour": key.hour,
                       "courses": [prev, booking.course_id]}),
            );
        }
        if let Some(prev) =
            occ_group.insert((key.day, key.hour, &booking.group_unit), &booking.course_id)
        {
            report.push(
                ViolationKind::GroupClash,
                json!({"group": booking.group_unit, "day": key.day, "hour": key.hour,
                       "courses": [prev, booking.course_id]}),
            );
        }

        if env.rooms.is_overflow(&key.room) {
            report.overflow.push(OverflowUse {
                day: key.day,
                hour: key.hour,
                group_unit: booking.group_unit.clone(),
                instructor: booking.instructor.clone(),
                title: booking.title.clone(),
            });
        }
    }

    // partition, by course id; labels are only checked as a multiset
    let unassigned: HashSet<&CourseId> = out.unassigned_ids.iter().collect();
    if unassigned.len() != out.unassigned_ids.len() {
        report.push(
            ViolationKind::Partition,
            json!({"reason": "course listed unassigned twice"}),
        );
    }
    let mut placed_once: HashSet<&CourseId> = HashSet::new();
    for p in &out.placements {
        if !placed_once.insert(&p.course_id) {
            report.push(
                ViolationKind::Partition,
                json!({"course": p.course_id, "reason": "placed twice"}),
            );
        }
        if p.tier == RoomTier::Overflow {
            report.overflow_courses += 1;
        }
    }
    let mut labels: HashMap<&str, usize> = HashMap::new();
    for l in &out.unassigned {
        *labels.entry(l.as_str()).or_default() += 1;
    }
    for c in &env.courses {
        let committed = cells_of.contains_key(&c.id);
        let listed = unassigned.contains(&c.id);
        if listed {
            match labels.get_mut(c.label().as_str()) {
                Some(n) if *n > 0 => *n -= 1,
                _ => report.push(
                    ViolationKind::Partition,
                    json!({"course": c.id, "reason": "unassigned without its label"}),
                ),
            }
        }
        if committed == listed {
            report.push(
                ViolationKind::Partition,
                json!({"course": c.id, "committed": committed, "unassigned": listed}),
            );
        }
    }
    let stray: usize = labels.values().sum();
    if stray > 0 {
        report.push(
            ViolationKind::Partition,
            json!({"reason": "labels without an unassigned course", "count": stray}),
        );
    }

    // contiguity
    for (cid, cells) in &cells_of {
        let Some(course) = course_by_id.get(cid) else {
            continue;
        };
        let day = cells[0].0;
        let room = cells[0].2;
        let mut hours: Vec<u32> = cells.iter().map(|c| c.1).collect();
        hours.sort_unstable();
        let same_day = cells.iter().all(|c| c.0 == day);
        let same_room = cells.iter().all(|c| c.2 == room);
        let consecutive = hours.windows(2).all(|w| w[1] == w[0] + 1);
        let in_grid = grid.contains_day(day)
            && hours.first().map_or(false, |h| *h >= grid.start_hour)
            && hours.last().map_or(false, |h| *h < grid.end_hour);
        if !(same_day
            && same_room
            && consecutive
            && in_grid
            && hours.len() == course.required_hours as usize)
        {
            report.push(
                ViolationKind::Contiguity,
                json!({"course": cid, "hours": hours, "required": course.required_hours}),
            );
        }
    }

    // adjacency: three distinct non-exempt sections in three consecutive hours
    let mut groups: Vec<&GroupUnit> = env.courses.iter().map(|c| &c.group_unit).collect();
    groups.sort_unstable();
    groups.dedup();
    for g in groups {
        for &day in &grid.days {
            let run: Vec<Option<&CourseId>> = grid
                .hours()
                .map(|h| occ_group.get(&(day, h, g)).copied())
                .collect();
            for (i, w) in run.windows(3).enumerate() {
                let (Some(a), Some(b), Some(c)) = (w[0], w[1], w[2]) else {
                    continue;
                };
                let distinct = a != b && b != c && a != c;
                let any_exempt = [a, b, c].iter().any(|id| {
                    course_by_id
                        .get(id)
                        .map_or(false, |c| c.exempt_from_adjacency_rule)
                });
                if distinct && !any_exempt {
                    report.push(
                        ViolationKind::Adjacency,
                        json!({"group": g, "day": day, "from": grid.start_hour + i as u32,
                               "courses": [a, b, c]}),
                    );
                }
            }
        }
    }

    report
}
