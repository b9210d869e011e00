use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use types::{DayOfWeek, GroupUnit};

/// Committed hours per `(group, day)`. Only biases the day search order;
/// it never rejects a placement.
#[derive(Clone, Debug, Default)]
pub struct LoadTracker {
    hours: HashMap<GroupUnit, HashMap<DayOfWeek, u32>>,
}

impl LoadTracker {
    /// Seeds a zero counter for every group and day.
    pub fn new<'a>(groups: impl IntoIterator<Item = &'a GroupUnit>, days: &[DayOfWeek]) -> Self {
        let mut hours: HashMap<GroupUnit, HashMap<DayOfWeek, u32>> = HashMap::new();
        for g in groups {
            let per_day = hours.entry(g.clone()).or_default();
            for &d in days {
                per_day.entry(d).or_insert(0);
            }
        }
        Self { hours }
    }

    pub fn increment(&mut self, group: &GroupUnit, day: DayOfWeek, hours: u32) {
        *self
            .hours
            .entry(group.clone())
            .or_default()
            .entry(day)
            .or_insert(0) += hours;
    }

    pub fn current_load(&self, group: &GroupUnit, day: DayOfWeek) -> u32 {
        self.hours
            .get(group)
            .and_then(|per_day| per_day.get(&day))
            .copied()
            .unwrap_or(0)
    }

    /// `{group: {day: hours}}`, sorted for stable output.
    pub fn to_json(&self) -> serde_json::Value {
        let sorted: BTreeMap<&GroupUnit, BTreeMap<DayOfWeek, u32>> = self
            .hours
            .iter()
            .map(|(g, per_day)| (g, per_day.iter().map(|(d, h)| (*d, *h)).collect()))
            .collect();
        json!(sorted)
    }
}
