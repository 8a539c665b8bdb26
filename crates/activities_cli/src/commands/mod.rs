//! Subcommand implementations and shared output helpers.

pub mod read;
pub mod write;

use activities_core::Activity;
use anyhow::Result;
use serde::Serialize;

/// Output mode selected by global flags.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
}

impl Output {
    /// Prints `value` as pretty JSON when `--json` is set, otherwise runs `text`.
    pub fn emit<T: Serialize + ?Sized>(&self, value: &T, text: impl FnOnce()) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            text();
        }
        Ok(())
    }
}

pub fn print_activity(activity: &Activity) {
    println!("{}  [{}]", activity.title, activity.id);
    println!("  date:     {}", activity.date);
    println!("  category: {}", display_or_dash(&activity.category));
    println!(
        "  where:    {} @ {}",
        display_or_dash(&activity.city),
        display_or_dash(&activity.venue)
    );
    if !activity.description.is_empty() {
        println!("  {}", activity.description);
    }
}

fn display_or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

/// Records served by `--offline` sessions.
pub fn sample_activities() -> Vec<Activity> {
    let samples = [
        ("past-1", "Past Activity 1", "2020-01-01T14:00:00", "drinks", "London", "Pub"),
        ("future-1", "Future Activity 1", "2020-03-01T10:00:00", "culture", "Paris", "Louvre"),
        ("future-2", "Future Activity 2", "2020-03-01T19:30:00", "music", "London", "O2 Arena"),
        ("future-3", "Future Activity 3", "2020-04-12T11:00:00", "food", "London", "Borough Market"),
    ];

    samples
        .iter()
        .filter_map(|(id, title, date, category, city, venue)| {
            let mut activity = Activity::with_id(*id, *title, *date).ok()?;
            activity.category = category.to_string();
            activity.city = city.to_string();
            activity.venue = venue.to_string();
            activity.description = format!("{title} in {city}");
            Some(activity)
        })
        .collect()
}
