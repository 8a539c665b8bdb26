use activities_core::{ActivitiesApi, Activity, ApiError, ApiResult, MemoryActivitiesApi};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Memory-backed API that can fail on demand and pause calls at a gate.
pub struct ScriptedApi {
    inner: MemoryActivitiesApi,
    failing: AtomicBool,
    gate: Mutex<Option<Arc<Notify>>>,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedApi {
    pub fn new() -> Self {
        Self::with_activities(Vec::new())
    }

    pub fn with_activities(activities: Vec<Activity>) -> Self {
        Self {
            inner: MemoryActivitiesApi::with_activities(activities),
            failing: AtomicBool::new(false),
            gate: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Makes every later call wait until the returned handle is notified.
    pub fn hold(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn remote(&self) -> &MemoryActivitiesApi {
        &self.inner
    }

    async fn before_call(&self) -> ApiResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: 500,
                url: "http://test.invalid/api/activities".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ActivitiesApi for ScriptedApi {
    async fn list(&self) -> ApiResult<Vec<Activity>> {
        self.before_call().await?;
        self.inner.list().await
    }

    async fn details(&self, id: &str) -> ApiResult<Activity> {
        self.before_call().await?;
        self.inner.details(id).await
    }

    async fn create(&self, activity: &Activity) -> ApiResult<()> {
        self.before_call().await?;
        self.inner.create(activity).await
    }

    async fn update(&self, activity: &Activity) -> ApiResult<()> {
        self.before_call().await?;
        self.inner.update(activity).await
    }

    async fn delete(&self, id: &str) -> ApiResult<()> {
        self.before_call().await?;
        self.inner.delete(id).await
    }
}

#[allow(dead_code)]
pub fn activity(id: &str, date: &str) -> Activity {
    let mut activity = Activity::with_id(id, format!("title {id}"), date).unwrap();
    activity.category = "culture".to_string();
    activity.city = "London".to_string();
    activity.venue = "Museum".to_string();
    activity
}
