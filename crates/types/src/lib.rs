use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Clone, Debug, Serialize, Deserialize, JsonSchema, Eq, PartialEq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }
    };
}
id_newtype!(CourseId);
id_newtype!(InstructorId);
id_newtype!(GroupUnit);
id_newtype!(RoomId);

#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, Eq, PartialEq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl DayOfWeek {
    pub const WEEKDAYS: [DayOfWeek; 5] = [
        DayOfWeek::Mon,
        DayOfWeek::Tue,
        DayOfWeek::Wed,
        DayOfWeek::Thu,
        DayOfWeek::Fri,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DayOfWeek::Mon => "mon",
            DayOfWeek::Tue => "tue",
            DayOfWeek::Wed => "wed",
            DayOfWeek::Thu => "thu",
            DayOfWeek::Fri => "fri",
            DayOfWeek::Sat => "sat",
            DayOfWeek::Sun => "sun",
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One schedulable unit: a section that needs a single unbroken block of
/// `required_hours` on one day.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseSection {
    pub id: CourseId,
    pub title: String,
    pub instructor: InstructorId,
    pub required_hours: u32,
    pub group_unit: GroupUnit,
    #[serde(default)]
    pub preference_score: u32,
    #[serde(default)]
    pub preferred_days: Vec<DayOfWeek>,
    #[serde(default)]
    pub exempt_from_adjacency_rule: bool,
}

impl CourseSection {
    /// Human-readable label used in the unassigned list.
    pub fn label(&self) -> String {
        format!("{} ({})", self.title, self.group_unit)
    }
}

/// Weekly day/hour grid. Hours are half-open: `[start_hour, end_hour)`.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    pub days: Vec<DayOfWeek>,
    pub start_hour: u32,
    pub end_hour: u32,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            days: DayOfWeek::WEEKDAYS.to_vec(),
            start_hour: 9,
            end_hour: 18,
        }
    }
}

impl Grid {
    pub fn hours(&self) -> Range<u32> {
        self.start_hour..self.end_hour
    }

    /// Number of hour slots per day.
    pub fn span(&self) -> u32 {
        self.end_hour.saturating_sub(self.start_hour)
    }

    pub fn fits(&self, hours: u32) -> bool {
        hours > 0 && hours <= self.span()
    }

    pub fn contains_day(&self, day: DayOfWeek) -> bool {
        self.days.contains(&day)
    }
}

/// Regular rooms are always tried before the overflow room.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoomPools {
    pub regular: Vec<RoomId>,
    #[serde(default)]
    pub overflow: Option<RoomId>,
}

impl Default for RoomPools {
    fn default() -> Self {
        Self {
            regular: ["1215", "1216", "1217", "1418"]
                .into_iter()
                .map(RoomId::from)
                .collect(),
            overflow: Some(RoomId::from("R_EXTRA")),
        }
    }
}

impl RoomPools {
    pub fn is_overflow(&self, room: &RoomId) -> bool {
        self.overflow.as_ref() == Some(room)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SolveParams {
    /// `None` keeps input order for equal-priority courses and grid order
    /// for equally loaded days. `Some(seed)` breaks those ties with a
    /// seeded shuffle.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Everything one scheduling run needs.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct ScheduleEnvelope {
    pub courses: Vec<CourseSection>,
    #[serde(default)]
    pub grid: Grid,
    #[serde(default)]
    pub rooms: RoomPools,
    #[serde(default)]
    pub params: SolveParams,
}

impl ScheduleEnvelope {
    pub fn new(courses: Vec<CourseSection>) -> Self {
        Self {
            courses,
            grid: Grid::default(),
            rooms: RoomPools::default(),
            params: SolveParams::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    pub day: DayOfWeek,
    pub hour: u32,
    pub room: RoomId,
}

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub course_id: CourseId,
    pub title: String,
    pub group_unit: GroupUnit,
    pub instructor: InstructorId,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum RoomTier {
    Regular,
    Overflow,
}

/// Where one committed course ended up.
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub course_id: CourseId,
    pub day: DayOfWeek,
    pub start_hour: u32,
    pub hours: u32,
    pub room: RoomId,
    pub tier: RoomTier,
}

impl Placement {
    pub fn hours_range(&self) -> Range<u32> {
        self.start_hour..self.start_hour + self.hours
    }
}

#[serde_as]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ScheduleOutcome {
    /// Committed `(day, hour, room)` cells. A missing key is a free slot.
    #[serde_as(as = "Vec<(_, _)>")]
    pub assignment: BTreeMap<SlotKey, Booking>,
    /// `"<title> (<groupUnit>)"` labels, for display only.
    pub unassigned: Vec<String>,
    /// Same courses as `unassigned`, in the same order.
    #[serde(default)]
    pub unassigned_ids: Vec<CourseId>,
    pub placements: Vec<Placement>,
    pub stats: serde_json::Value,
}

impl ScheduleOutcome {
    pub fn placement_for(&self, course: &CourseId) -> Option<&Placement> {
        self.placements.iter().find(|p| &p.course_id == course)
    }

    pub fn overflow_placements(&self) -> impl Iterator<Item = &Placement> {
        self.placements
            .iter()
            .filter(|p| p.tier == RoomTier::Overflow)
    }
}
