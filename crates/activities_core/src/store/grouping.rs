//! Calendar-day projection of activity lists.
//!
//! # Invariants
//! - Groups are ordered by the earliest activity they contain.
//! - Within a group, activities keep the global ascending date order.
//! - Two activities share a group iff their `date_key()` is equal.

use crate::model::activity::Activity;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;

/// Activities that fall on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateGroup {
    /// Day key, e.g. `2020-01-02`.
    pub date: String,
    pub activities: Vec<Activity>,
}

/// Sorts `activities` ascending by date and partitions them by day key.
///
/// Unparseable dates sort after every parseable one and are ordered among
/// themselves by raw text. Ties are broken by id so the output does not
/// depend on input order.
pub fn group_by_date(mut activities: Vec<Activity>) -> Vec<DateGroup> {
    activities.sort_by_cached_key(sort_key);

    let mut groups: Vec<DateGroup> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for activity in activities {
        let key = activity.date_key().to_string();
        match positions.get(&key) {
            Some(&position) => groups[position].activities.push(activity),
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push(DateGroup {
                    date: key,
                    activities: vec![activity],
                });
            }
        }
    }
    groups
}

/// `(unparseable, parsed, raw, id)`: parseable dates first, ascending.
fn sort_key(activity: &Activity) -> (bool, Option<NaiveDateTime>, String, String) {
    let parsed = activity.parsed_date();
    (
        parsed.is_none(),
        parsed,
        activity.date.clone(),
        activity.id.clone(),
    )
}
