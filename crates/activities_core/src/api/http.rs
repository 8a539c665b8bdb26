//! HTTP implementation of the activities API.
//!
//! # Responsibility
//! - Map the `ActivitiesApi` contract onto REST calls under `{base}/activities`.
//! - Collapse transport, status and decode failures into `ApiError`.
//!
//! # Invariants
//! - Ids are always pushed as one escaped path segment.
//! - Log lines carry method and url only, never request bodies.

use crate::api::{ActivitiesApi, ApiError, ApiResult};
use crate::config::ClientConfig;
use crate::model::activity::Activity;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use std::time::Duration;

const COLLECTION_SEGMENT: &str = "activities";

/// REST client for the `activities` resource.
pub struct HttpActivitiesApi {
    client: Client,
    base_url: Url,
    request_delay: Duration,
}

impl HttpActivitiesApi {
    /// Builds a client rooted at `base_url` (e.g. `http://localhost:5000/api`).
    ///
    /// # Errors
    /// - `ApiError::Transport` when the url is invalid or the client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|err| ApiError::Transport(format!("invalid api url `{base_url}`: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Transport(format!(
                "api url `{base_url}` cannot carry a path"
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ApiError::Transport(format!("failed to create HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url,
            request_delay: Duration::ZERO,
        })
    }

    /// Builds a client from resolved client configuration.
    pub fn from_config(config: &ClientConfig) -> ApiResult<Self> {
        Ok(Self::new(&config.base_url, config.timeout)?.with_request_delay(config.request_delay))
    }

    /// Adds an artificial pause before every request.
    ///
    /// Useful for exercising loading indicators against a fast local server.
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn collection_url(&self) -> Url {
        self.url_with(&[COLLECTION_SEGMENT])
    }

    fn item_url(&self, id: &str) -> Url {
        self.url_with(&[COLLECTION_SEGMENT, id])
    }

    fn url_with(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base urls, so segments are always available.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<&Activity>,
    ) -> ApiResult<(Response, Url)> {
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }

        debug!("event=api_request module=api method={} url={}", method, url);
        let mut request: RequestBuilder = self.client.request(method.clone(), url.clone());
        if let Some(activity) = body {
            request = request.json(activity);
        }

        let response = request.send().await.map_err(|err| {
            warn!(
                "event=api_request module=api status=error method={} url={} reason={}",
                method, url, err
            );
            map_reqwest_error(err)
        })?;
        Ok((response, url))
    }
}

#[async_trait]
impl ActivitiesApi for HttpActivitiesApi {
    async fn list(&self) -> ApiResult<Vec<Activity>> {
        let (response, url) = self
            .execute(Method::GET, self.collection_url(), None)
            .await?;
        let response = check_status(response, &url, None)?;
        response.json::<Vec<Activity>>().await.map_err(map_reqwest_error)
    }

    async fn details(&self, id: &str) -> ApiResult<Activity> {
        let (response, url) = self.execute(Method::GET, self.item_url(id), None).await?;
        let response = check_status(response, &url, Some(id))?;
        response.json::<Activity>().await.map_err(map_reqwest_error)
    }

    async fn create(&self, activity: &Activity) -> ApiResult<()> {
        let (response, url) = self
            .execute(Method::POST, self.collection_url(), Some(activity))
            .await?;
        check_status(response, &url, None)?;
        Ok(())
    }

    async fn update(&self, activity: &Activity) -> ApiResult<()> {
        let (response, url) = self
            .execute(Method::PUT, self.item_url(&activity.id), Some(activity))
            .await?;
        check_status(response, &url, Some(&activity.id))?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> ApiResult<()> {
        let (response, url) = self
            .execute(Method::DELETE, self.item_url(id), None)
            .await?;
        check_status(response, &url, Some(id))?;
        Ok(())
    }
}

fn check_status(response: Response, url: &Url, id: Option<&str>) -> ApiResult<Response> {
    classify_status(response.status(), url, id)?;
    Ok(response)
}

fn classify_status(status: StatusCode, url: &Url, id: Option<&str>) -> ApiResult<()> {
    if status.is_success() {
        return Ok(());
    }
    warn!(
        "event=api_response module=api status=error http_status={} url={}",
        status.as_u16(),
        url
    );
    match (status, id) {
        (StatusCode::NOT_FOUND, Some(id)) => Err(ApiError::NotFound(id.to_string())),
        _ => Err(ApiError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        }),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_decode() {
        ApiError::Decode(err.to_string())
    } else {
        ApiError::Transport(err.to_string())
    }
}
