use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};
use tracing::debug;
use url::Url;
use uuid::Uuid;

use super::{StoreError, TaskStore};
use crate::config::SupabaseConfig;
use crate::model::{NewTask, Task, TaskUpdate};

const TODOS_PATH: &str = "rest/v1/todos";
const PREFER_REPRESENTATION: &str = "return=representation";

/// Client for the hosted database's REST surface. Rows live in the `todos`
/// table. The project key travels in both the `apikey` and `Authorization`
/// headers on every request, and mutations ask the service to echo the
/// stored row back so callers always see server-assigned fields.
pub struct SupabaseStore {
    http: Client,
    endpoint: Url,
}

impl SupabaseStore {
    pub fn new(config: &SupabaseConfig) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.key)
            .map_err(|err| StoreError::Config(format!("invalid project key: {}", err)))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.key))
            .map_err(|err| StoreError::Config(format!("invalid project key: {}", err)))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let endpoint = config
            .url
            .join(TODOS_PATH)
            .map_err(|err| StoreError::Config(format!("invalid project url: {}", err)))?;
        let http = Client::builder().default_headers(headers).build()?;

        Ok(Self { http, endpoint })
    }

    fn row_url(&self, id: Uuid) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{}", id));
        url
    }
}

#[async_trait]
impl TaskStore for SupabaseStore {
    async fn list(&self) -> Result<Vec<Task>, StoreError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "created_at.desc");

        debug!(url = %url, "listing tasks");
        let response = self.http.get(url).send().await?;
        Ok(check(response).await?.json().await?)
    }

    async fn create(&self, new_task: NewTask) -> Result<Task, StoreError> {
        debug!(title = %new_task.title, "creating task");
        let response = self
            .http
            .post(self.endpoint.clone())
            .header("Prefer", PREFER_REPRESENTATION)
            .json(&new_task)
            .send()
            .await?;

        let rows: Vec<Task> = check(response).await?.json().await?;
        rows.into_iter().next().ok_or(StoreError::MissingRecord)
    }

    async fn update(&self, id: Uuid, patch: TaskUpdate) -> Result<Task, StoreError> {
        debug!(id = %id, "updating task");
        let response = self
            .http
            .patch(self.row_url(id))
            .header("Prefer", PREFER_REPRESENTATION)
            .json(&patch)
            .send()
            .await?;

        let rows: Vec<Task> = check(response).await?.json().await?;
        rows.into_iter().next().ok_or(StoreError::MissingRecord)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        debug!(id = %id, "deleting task");
        let response = self.http.delete(self.row_url(id)).send().await?;
        check(response).await?;
        Ok(())
    }
}

async fn check(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}
