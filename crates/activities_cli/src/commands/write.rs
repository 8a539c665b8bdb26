//! `activities create`, `activities edit <id>` and `activities delete <id>`

use activities_core::{ActivitiesApi, Activity, ActivityStore};
use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;

use super::{print_activity, Output};

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Activity title.
    #[arg(long)]
    pub title: String,

    /// Local date/time, e.g. 2020-03-01T19:30.
    #[arg(long)]
    pub date: String,

    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(long, default_value = "")]
    pub category: String,

    #[arg(long, default_value = "")]
    pub city: String,

    #[arg(long, default_value = "")]
    pub venue: String,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Activity id.
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub date: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub venue: Option<String>,
}

impl EditArgs {
    fn apply(self, activity: &mut Activity) {
        let fields = [
            (self.title, &mut activity.title),
            (self.date, &mut activity.date),
            (self.description, &mut activity.description),
            (self.category, &mut activity.category),
            (self.city, &mut activity.city),
            (self.venue, &mut activity.venue),
        ];
        for (value, field) in fields {
            if let Some(value) = value {
                *field = value;
            }
        }
    }
}

pub async fn create<A: ActivitiesApi>(
    store: &ActivityStore<A>,
    args: CreateArgs,
    output: Output,
) -> Result<()> {
    let mut activity = Activity::new(args.title, args.date);
    activity.description = args.description;
    activity.category = args.category;
    activity.city = args.city;
    activity.venue = args.venue;

    store.open_create_form();
    store
        .create_activity(activity.clone())
        .await
        .context("failed to create activity")?;

    output.emit(&activity, || {
        println!("Created activity {}.", activity.id);
        print_activity(&activity);
    })
}

pub async fn edit<A: ActivitiesApi>(
    store: &ActivityStore<A>,
    args: EditArgs,
    output: Output,
) -> Result<()> {
    let mut activity = store
        .get_activity_detail(&args.id)
        .await
        .with_context(|| format!("failed to load activity {}", args.id))?;

    store.open_edit_form(&activity.id);
    args.apply(&mut activity);
    store
        .edit_activity(activity)
        .await
        .context("failed to update activity")?;

    let updated = store
        .snapshot()
        .selected_activity
        .context("updated activity missing from selection")?;
    output.emit(&updated, || {
        println!("Updated activity {}.", updated.id);
        print_activity(&updated);
    })
}

pub async fn delete<A: ActivitiesApi>(
    store: &ActivityStore<A>,
    id: &str,
    output: Output,
) -> Result<()> {
    store
        .delete_activity(&format!("delete-{id}"), id)
        .await
        .with_context(|| format!("failed to delete activity {id}"))?;

    output.emit(&json!({ "deleted": id }), || println!("Deleted activity {id}."))
}
