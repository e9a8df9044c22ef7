// http.rs - REST backend for the console collaborators.
//
// Routes are relative to `ApiConfig::base_url` (which already carries the
// `/api/v1` prefix). Records are fetched by numeric id through the
// `/{collection}/id/{id}` route; writes go to `/{collection}/{id}`.

use std::time::Duration;

use async_trait::async_trait;
use bc_content::{EntityId, Lifecycle, Publishable};
use bc_taxonomy::{Category, CategoryId, CategoryTreeNode};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::api::{CategoryApi, ListQuery, Page, ResourceApi};
use crate::config::ApiConfig;
use crate::error::ApiError;

const CATEGORIES: &str = "blog/categories";

/// How a status write is sent to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusRoute {
    /// `POST /{collection}/{id}/{action}` with no body.
    Action(&'static str),
    /// `PUT /{collection}/{id}` with `{"status": target}`.
    Update,
}

/// Pick the route for a status write from `current` to `target`.
///
/// The server exposes dedicated actions for the three shared states.
/// Back to draft is `restore` when leaving the archive and `unpublish`
/// otherwise. Anything else (trek `seasonal`) is a plain field update.
pub fn status_route(current: &str, target: &str) -> StatusRoute {
    match (current, target) {
        (_, "published") => StatusRoute::Action("publish"),
        (_, "archived") => StatusRoute::Action("archive"),
        ("archived", "draft") => StatusRoute::Action("restore"),
        (_, "draft") => StatusRoute::Action("unpublish"),
        _ => StatusRoute::Update,
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// Client for the basecamp REST API.
pub struct HttpApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpApi {
    /// Build a client from config, reading the bearer token from the
    /// environment variable named by `token_env` (absent means anonymous).
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let token = std::env::var(&config.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty());
        if token.is_none() {
            tracing::debug!(env = %config.token_env, "no API token set, sending anonymous requests");
        }

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and map non-success statuses to `ApiError`.
    ///
    /// `record` names the record being addressed so a 404 can be reported
    /// as `NotFound`; without it a 404 is an ordinary status error.
    async fn execute(
        &self,
        request: RequestBuilder,
        record: Option<(&str, EntityId)>,
    ) -> Result<Response, ApiError> {
        let response = self
            .authorized(request)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if let (StatusCode::NOT_FOUND, Some((resource, id))) = (status, record) {
            return Err(ApiError::NotFound {
                resource: resource.to_string(),
                id,
            });
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            detail: error_detail(&body),
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        record: Option<(&str, EntityId)>,
    ) -> Result<T, ApiError> {
        let response = self.execute(request, record).await?;
        Ok(response.json().await?)
    }
}

/// The server's `detail` message, or a trimmed copy of the raw body.
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: Some(serde_json::Value::String(detail)),
        }) => detail,
        // Validation errors arrive as a structured list.
        Ok(ErrorBody {
            detail: Some(other),
        }) => other.to_string(),
        _ => body.chars().take(200).collect(),
    }
}

#[async_trait]
impl<E: Publishable> ResourceApi<E> for HttpApi {
    async fn list(&self, query: &ListQuery) -> Result<Page<E>, ApiError> {
        let collection = E::KIND.collection();
        let request = self.client.get(self.url(collection)).query(query);
        self.fetch(request, None).await
    }

    async fn get(&self, id: EntityId) -> Result<E, ApiError> {
        let request = self
            .client
            .get(self.url(&format!("{}/id/{}", E::KIND.collection(), id)));
        self.fetch(request, Some((E::KIND.label(), id))).await
    }

    async fn create(&self, entity: &E) -> Result<E, ApiError> {
        let request = self.client.post(self.url(E::KIND.collection())).json(entity);
        self.fetch(request, None).await
    }

    async fn update(&self, id: EntityId, entity: &E) -> Result<E, ApiError> {
        let request = self
            .client
            .put(self.url(&format!("{}/{}", E::KIND.collection(), id)))
            .json(entity);
        self.fetch(request, Some((E::KIND.label(), id))).await
    }

    async fn delete(&self, id: EntityId) -> Result<(), ApiError> {
        let request = self
            .client
            .delete(self.url(&format!("{}/{}", E::KIND.collection(), id)));
        self.execute(request, Some((E::KIND.label(), id))).await?;
        Ok(())
    }

    async fn set_status(&self, entity: &E, target: E::Status) -> Result<E, ApiError> {
        let id = entity.id();
        let record = format!("{}/{}", E::KIND.collection(), id);
        let request = match status_route(entity.status().as_str(), target.as_str()) {
            StatusRoute::Action(action) => self.client.post(self.url(&format!("{record}/{action}"))),
            StatusRoute::Update => self
                .client
                .put(self.url(&record))
                .json(&serde_json::json!({ "status": target })),
        };
        tracing::debug!(kind = %E::KIND, id, to = %target, "writing status");
        self.fetch(request, Some((E::KIND.label(), id))).await
    }
}

#[async_trait]
impl CategoryApi for HttpApi {
    async fn list_categories(&self, active_only: bool) -> Result<Vec<Category>, ApiError> {
        let request = self
            .client
            .get(self.url(CATEGORIES))
            .query(&[("active_only", active_only)]);
        self.fetch(request, None).await
    }

    async fn category_tree(&self, active_only: bool) -> Result<Vec<CategoryTreeNode>, ApiError> {
        let request = self
            .client
            .get(self.url(&format!("{CATEGORIES}/tree")))
            .query(&[("active_only", active_only)]);
        self.fetch(request, None).await
    }

    async fn save_category(&self, category: &Category) -> Result<Category, ApiError> {
        if category.id == 0 {
            let request = self.client.post(self.url(CATEGORIES)).json(category);
            return self.fetch(request, None).await;
        }
        let request = self
            .client
            .put(self.url(&format!("{CATEGORIES}/{}", category.id)))
            .json(category);
        self.fetch(request, Some(("category", category.id))).await
    }

    async fn delete_category(&self, id: CategoryId) -> Result<(), ApiError> {
        let request = self.client.delete(self.url(&format!("{CATEGORIES}/{id}")));
        self.execute(request, Some(("category", id))).await?;
        Ok(())
    }
}
