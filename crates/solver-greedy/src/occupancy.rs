use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::ops::Range;
use types::{Booking, CourseId, CourseSection, DayOfWeek, GroupUnit, InstructorId, RoomId, SlotKey};

/// Composite `(day, hour, resource)` key shared by all three indices.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Cell<'a, R> {
    pub day: DayOfWeek,
    pub hour: u32,
    pub resource: &'a R,
}

impl<'a, R> Cell<'a, R> {
    fn new(day: DayOfWeek, hour: u32, resource: &'a R) -> Self {
        Self { day, hour, resource }
    }
}

/// Run-scoped room, instructor and group indices. They only ever grow, and
/// only through `commit`, which writes all three at once.
#[derive(Default)]
pub struct Occupancy<'a> {
    room: HashMap<Cell<'a, RoomId>, &'a CourseSection>,
    instructor: HashMap<Cell<'a, InstructorId>, &'a CourseId>,
    group: HashMap<Cell<'a, GroupUnit>, &'a CourseId>,
}

fn free<'a, R: Eq + Hash, V>(
    index: &HashMap<Cell<'a, R>, V>,
    day: DayOfWeek,
    mut hours: Range<u32>,
    resource: &'a R,
) -> bool {
    hours.all(|h| !index.contains_key(&Cell::new(day, h, resource)))
}

impl<'a> Occupancy<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `hours` on `day` is free for the room, the course's
    /// instructor and the course's group.
    pub fn is_free(
        &self,
        day: DayOfWeek,
        hours: Range<u32>,
        room: &'a RoomId,
        course: &'a CourseSection,
    ) -> bool {
        free(&self.room, day, hours.clone(), room)
            && free(&self.instructor, day, hours.clone(), &course.instructor)
            && free(&self.group, day, hours, &course.group_unit)
    }

    pub fn group_occupant(
        &self,
        day: DayOfWeek,
        hour: u32,
        group: &'a GroupUnit,
    ) -> Option<&'a CourseId> {
        self.group.get(&Cell::new(day, hour, group)).copied()
    }

    pub fn commit(
        &mut self,
        day: DayOfWeek,
        hours: Range<u32>,
        room: &'a RoomId,
        course: &'a CourseSection,
    ) {
        for h in hours {
            self.room.insert(Cell::new(day, h, room), course);
            self.instructor
                .insert(Cell::new(day, h, &course.instructor), &course.id);
            self.group
                .insert(Cell::new(day, h, &course.group_unit), &course.id);
        }
    }

    /// Number of committed `(day, hour, room)` cells.
    pub fn len(&self) -> usize {
        self.room.len()
    }

    pub fn is_empty(&self) -> bool {
        self.room.is_empty()
    }

    pub fn into_assignment(self) -> BTreeMap<SlotKey, Booking> {
        self.room
            .into_iter()
            .map(|(cell, c)| {
                (
                    SlotKey {
                        day: cell.day,
                        hour: cell.hour,
                        room: cell.resource.clone(),
                    },
                    Booking {
                        course_id: c.id.clone(),
                        title: c.title.clone(),
                        group_unit: c.group_unit.clone(),
                        instructor: c.instructor.clone(),
                    },
                )
            })
            .collect()
    }
}
