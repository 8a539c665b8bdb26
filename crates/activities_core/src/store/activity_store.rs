//! Activity store: cached registry, UI mode flags and derived views.
//!
//! # Responsibility
//! - Mediate between UI consumers and the activities API.
//! - Keep the id-keyed registry and the selection/edit/loading flags.
//! - Publish an immutable snapshot to subscribers after every transition.
//!
//! # Invariants
//! - At most one registry entry per id; writes overwrite in place.
//! - In-flight flags are reset before any async operation returns, whatever
//!   the outcome.
//! - Failures are logged here and returned as `StoreError`; nothing panics
//!   across the store boundary.
//! - No internal lock is held across an `.await`.
//! - An id is claimed by at most one in-flight `create_activity`.

use crate::api::{ActivitiesApi, ApiError};
use crate::model::activity::{Activity, ActivityId, ActivityValidationError};
use crate::store::grouping::{group_by_date, DateGroup};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure returned by store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The API collaborator failed.
    Api(ApiError),
    /// The record was rejected before any network call.
    Validation(ActivityValidationError),
    /// `create_activity` was given an id that is cached or being created.
    DuplicateId(ActivityId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Api(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "activity already exists: {id}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Api(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::DuplicateId(_) => None,
        }
    }
}

impl From<ApiError> for StoreError {
    fn from(value: ApiError) -> Self {
        Self::Api(value)
    }
}

impl From<ActivityValidationError> for StoreError {
    fn from(value: ActivityValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Immutable view of store state handed to subscribers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreSnapshot {
    /// Bumped on every state transition.
    pub version: u64,
    /// Bumped only when registry content changes.
    pub registry_version: u64,
    pub registry_len: usize,
    pub selected_activity: Option<Activity>,
    pub loading_initial: bool,
    pub submitting: bool,
    pub edit_mode: bool,
    /// Control that triggered the in-flight delete; empty when idle.
    pub target: String,
}

/// Receiver yielding a fresh snapshot after every transition.
pub type StoreWatcher = watch::Receiver<StoreSnapshot>;

#[derive(Default)]
struct StoreState {
    registry: HashMap<ActivityId, Activity>,
    /// Ids of creates awaiting the API.
    creating: HashSet<ActivityId>,
    selected_activity: Option<Activity>,
    loading_initial: bool,
    submitting: bool,
    edit_mode: bool,
    target: String,
    version: u64,
    registry_version: u64,
}

impl StoreState {
    fn put(&mut self, activity: Activity) {
        self.registry.insert(activity.id.clone(), activity);
        self.registry_version += 1;
    }

    fn remove(&mut self, id: &str) {
        if self.registry.remove(id).is_some() {
            self.registry_version += 1;
        }
    }

    fn cached(&self, id: &str) -> Option<Activity> {
        self.registry.get(id).cloned()
    }

    fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            version: self.version,
            registry_version: self.registry_version,
            registry_len: self.registry.len(),
            selected_activity: self.selected_activity.clone(),
            loading_initial: self.loading_initial,
            submitting: self.submitting,
            edit_mode: self.edit_mode,
            target: self.target.clone(),
        }
    }
}

/// Client-side activity store over an `ActivitiesApi` implementation.
///
/// Construct one per application session and share it by reference.
pub struct ActivityStore<A: ActivitiesApi> {
    api: A,
    state: Mutex<StoreState>,
    notifier: watch::Sender<StoreSnapshot>,
    grouped: Mutex<Option<(u64, Arc<Vec<DateGroup>>)>>,
}

impl<A: ActivitiesApi> ActivityStore<A> {
    /// Creates an empty store using the provided API implementation.
    pub fn new(api: A) -> Self {
        let (notifier, _) = watch::channel(StoreSnapshot::default());
        Self {
            api,
            state: Mutex::new(StoreState::default()),
            notifier,
            grouped: Mutex::new(None),
        }
    }

    /// Returns the API collaborator.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Current state snapshot.
    pub fn snapshot(&self) -> StoreSnapshot {
        self.lock_state().snapshot()
    }

    /// Subscribes to state transitions.
    ///
    /// The receiver starts marked as seen; `changed()` resolves on the next
    /// transition.
    pub fn subscribe(&self) -> StoreWatcher {
        self.notifier.subscribe()
    }

    /// Fetches every activity and merges it into the registry.
    ///
    /// Dates are normalized (suffix after the first `.` dropped) before
    /// insertion. Returns the number of records received.
    pub async fn list_activities(&self) -> StoreResult<usize> {
        self.update(|state| state.loading_initial = true);

        match self.api.list().await {
            Ok(activities) => {
                let count = activities.len();
                self.update(move |state| {
                    for mut activity in activities {
                        activity.normalize_date();
                        state.put(activity);
                    }
                    state.loading_initial = false;
                });
                info!("event=activities_load module=store status=ok count={count}");
                Ok(count)
            }
            Err(err) => {
                self.update(|state| state.loading_initial = false);
                error!("event=activities_load module=store status=error reason={err}");
                Err(err.into())
            }
        }
    }

    /// Selects one activity, fetching it only when it is not cached.
    ///
    /// A fetched record is selected but not added to the registry.
    pub async fn get_activity_detail(&self, id: &str) -> StoreResult<Activity> {
        let cached = self.update(|state| {
            let cached = state.cached(id);
            match &cached {
                Some(activity) => state.selected_activity = Some(activity.clone()),
                None => state.loading_initial = true,
            }
            cached
        });
        if let Some(activity) = cached {
            debug!("event=activity_detail module=store status=ok source=cache id={id}");
            return Ok(activity);
        }

        match self.api.details(id).await {
            Ok(mut activity) => {
                activity.normalize_date();
                let selected = activity.clone();
                self.update(move |state| {
                    state.selected_activity = Some(selected);
                    state.loading_initial = false;
                });
                debug!("event=activity_detail module=store status=ok source=api id={id}");
                Ok(activity)
            }
            Err(err) => {
                self.update(|state| state.loading_initial = false);
                error!("event=activity_detail module=store status=error id={id} reason={err}");
                Err(err.into())
            }
        }
    }

    /// Clears the selected activity.
    pub fn clear_selection(&self) {
        self.update(|state| state.selected_activity = None);
    }

    /// Looks up one cached activity without side effects.
    pub fn get_cached(&self, id: &str) -> Option<Activity> {
        self.lock_state().cached(id)
    }

    /// Submits a new activity and caches it on success.
    ///
    /// # Contract
    /// - `activity.id` is client-generated and must be neither cached nor
    ///   reserved by another in-flight create.
    /// - On success the edit form closes (`edit_mode = false`).
    /// - On API failure the form stays open and the registry is unchanged.
    pub async fn create_activity(&self, activity: Activity) -> StoreResult<()> {
        reject_invalid("activity_create", &activity)?;
        if !self.reserve_create(&activity.id) {
            warn!(
                "event=activity_create module=store status=rejected reason=duplicate_id id={}",
                activity.id
            );
            return Err(StoreError::DuplicateId(activity.id));
        }

        let outcome = self.api.create(&activity).await;
        match outcome {
            Ok(()) => {
                let id = activity.id.clone();
                self.update(move |state| {
                    state.creating.remove(&activity.id);
                    state.put(activity);
                    state.edit_mode = false;
                    state.submitting = false;
                });
                info!("event=activity_create module=store status=ok id={id}");
                Ok(())
            }
            Err(err) => {
                self.update(|state| {
                    state.creating.remove(&activity.id);
                    state.submitting = false;
                });
                error!(
                    "event=activity_create module=store status=error id={} reason={err}",
                    activity.id
                );
                Err(err.into())
            }
        }
    }

    /// Submits changes to an activity, then caches and selects it.
    ///
    /// The id is not required to be cached: a record opened through
    /// `get_activity_detail` can be edited before the list was loaded.
    pub async fn edit_activity(&self, activity: Activity) -> StoreResult<()> {
        reject_invalid("activity_edit", &activity)?;

        self.update(|state| state.submitting = true);
        let outcome = self.api.update(&activity).await;
        match outcome {
            Ok(()) => {
                let id = activity.id.clone();
                self.update(move |state| {
                    state.selected_activity = Some(activity.clone());
                    state.put(activity);
                    state.submitting = false;
                });
                info!("event=activity_edit module=store status=ok id={id}");
                Ok(())
            }
            Err(err) => {
                self.update(|state| state.submitting = false);
                error!(
                    "event=activity_edit module=store status=error id={} reason={err}",
                    activity.id
                );
                Err(err.into())
            }
        }
    }

    /// Deletes an activity, exposing `trigger_id` as `target` while in flight.
    pub async fn delete_activity(&self, trigger_id: &str, id: &str) -> StoreResult<()> {
        self.update(|state| {
            state.target = trigger_id.to_string();
            state.submitting = true;
        });

        let outcome = self.api.delete(id).await;
        self.update(|state| {
            if outcome.is_ok() {
                state.remove(id);
            }
            state.submitting = false;
            state.target.clear();
        });

        match outcome {
            Ok(()) => {
                info!("event=activity_delete module=store status=ok id={id}");
                Ok(())
            }
            Err(err) => {
                error!("event=activity_delete module=store status=error id={id} reason={err}");
                Err(err.into())
            }
        }
    }

    /// Opens the edit form for a cached activity.
    ///
    /// No existence check: an unknown id leaves nothing selected.
    pub fn open_edit_form(&self, id: &str) {
        self.update(|state| {
            state.selected_activity = state.cached(id);
            state.edit_mode = true;
        });
    }

    /// Opens an empty create form.
    pub fn open_create_form(&self) {
        self.update(|state| {
            state.edit_mode = true;
            state.selected_activity = None;
        });
    }

    pub fn cancel_edit(&self) {
        self.update(|state| state.edit_mode = false);
    }

    /// Selects a cached activity for viewing and closes the form.
    pub fn select_activity(&self, id: &str) {
        self.update(|state| {
            state.selected_activity = state.cached(id);
            state.edit_mode = false;
        });
    }

    /// Registry contents grouped by calendar day, ascending.
    ///
    /// The projection is cached and rebuilt only after the registry changed,
    /// so repeated calls between writes return the same `Arc`.
    pub fn grouped_by_date(&self) -> Arc<Vec<DateGroup>> {
        let state = self.lock_state();
        let mut cache = self.grouped.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((version, groups)) = cache.as_ref() {
            if *version == state.registry_version {
                return Arc::clone(groups);
            }
        }

        let groups = Arc::new(group_by_date(state.registry.values().cloned().collect()));
        *cache = Some((state.registry_version, Arc::clone(&groups)));
        groups
    }

    /// Claims `id` for a create and raises `submitting` in one transition.
    ///
    /// Returns false, without publishing, when the id is cached or claimed.
    fn reserve_create(&self, id: &str) -> bool {
        let mut state = self.lock_state();
        if state.registry.contains_key(id) || !state.creating.insert(id.to_string()) {
            return false;
        }
        state.submitting = true;
        state.version += 1;
        self.notifier.send_replace(state.snapshot());
        true
    }

    fn lock_state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies one transition and publishes the resulting snapshot.
    fn update<R>(&self, apply: impl FnOnce(&mut StoreState) -> R) -> R {
        let mut state = self.lock_state();
        let result = apply(&mut state);
        state.version += 1;
        self.notifier.send_replace(state.snapshot());
        result
    }
}

fn reject_invalid(event: &str, activity: &Activity) -> StoreResult<()> {
    activity.validate().map_err(|err| {
        warn!("event={event} module=store status=rejected reason={err}");
        StoreError::from(err)
    })
}
