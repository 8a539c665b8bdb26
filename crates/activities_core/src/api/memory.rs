//! In-process activities API.
//!
//! Backs offline CLI sessions and tests with the same contract the HTTP
//! client honors: item calls on unknown ids fail with `NotFound`.

use crate::api::{ActivitiesApi, ApiError, ApiResult};
use crate::model::activity::{Activity, ActivityId};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Lock-guarded map standing in for the remote resource.
#[derive(Default)]
pub struct MemoryActivitiesApi {
    inner: RwLock<BTreeMap<ActivityId, Activity>>,
}

impl MemoryActivitiesApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an API pre-populated with `activities`.
    pub fn with_activities(activities: impl IntoIterator<Item = Activity>) -> Self {
        let map = activities
            .into_iter()
            .map(|activity| (activity.id.clone(), activity))
            .collect();
        Self {
            inner: RwLock::new(map),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> ApiError {
    ApiError::Transport("in-memory activities lock poisoned".to_string())
}

#[async_trait]
impl ActivitiesApi for MemoryActivitiesApi {
    async fn list(&self) -> ApiResult<Vec<Activity>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.values().cloned().collect())
    }

    async fn details(&self, id: &str) -> ApiResult<Activity> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        map.get(id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(id.to_string()))
    }

    async fn create(&self, activity: &Activity) -> ApiResult<()> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.insert(activity.id.clone(), activity.clone());
        Ok(())
    }

    async fn update(&self, activity: &Activity) -> ApiResult<()> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        match map.get_mut(&activity.id) {
            Some(existing) => {
                *existing = activity.clone();
                Ok(())
            }
            None => Err(ApiError::NotFound(activity.id.clone())),
        }
    }

    async fn delete(&self, id: &str) -> ApiResult<()> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.remove(id)
            .map(|_| ())
            .ok_or_else(|| ApiError::NotFound(id.to_string()))
    }
}
