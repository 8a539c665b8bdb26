//! `activities list` and `activities show <id>`

use activities_core::{ActivitiesApi, ActivityStore};
use anyhow::{Context, Result};

use super::{print_activity, Output};

pub async fn list<A: ActivitiesApi>(store: &ActivityStore<A>, output: Output) -> Result<()> {
    store
        .list_activities()
        .await
        .context("failed to load activities")?;

    let groups = store.grouped_by_date();
    output.emit(groups.as_slice(), || {
        if groups.is_empty() {
            println!("No activities.");
            return;
        }
        for group in groups.iter() {
            println!("{}", group.date);
            for activity in &group.activities {
                let time = activity
                    .parsed_date()
                    .map(|date| date.format("%H:%M").to_string())
                    .unwrap_or_else(|| "--:--".to_string());
                println!("  {time}  {}  [{}]", activity.title, activity.id);
            }
        }
    })
}

pub async fn show<A: ActivitiesApi>(
    store: &ActivityStore<A>,
    id: &str,
    output: Output,
) -> Result<()> {
    let activity = store
        .get_activity_detail(id)
        .await
        .with_context(|| format!("failed to load activity {id}"))?;

    output.emit(&activity, || print_activity(&activity))
}
