use serde::de::DeserializeOwned;
use shared::{Task, TaskDraft};
use thiserror::Error;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

/// Failure of a single API call. The UI does not distinguish between variants;
/// they exist for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("failed to build request: {0}")]
    Request(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("failed to decode response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    List,
    Create,
    Update(u64),
    Toggle(u64),
    Delete(u64),
}

impl Endpoint {
    pub fn method(&self) -> &'static str {
        match self {
            Endpoint::List => "GET",
            Endpoint::Create => "POST",
            Endpoint::Update(_) => "PUT",
            Endpoint::Toggle(_) => "PATCH",
            Endpoint::Delete(_) => "DELETE",
        }
    }

    pub fn path(&self) -> String {
        match self {
            Endpoint::List | Endpoint::Create => "/tasks".to_string(),
            Endpoint::Update(id) => format!("/task/{}", id),
            Endpoint::Toggle(id) => format!("/tasks/{}/complete", id),
            Endpoint::Delete(id) => format!("/tasks/{}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskClient {
    base_url: String,
}

impl TaskClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    pub async fn list(&self) -> Result<Vec<Task>, ApiError> {
        let response = self.send(Endpoint::List, None).await?;
        read_json(response).await
    }

    pub async fn create(&self, draft: &TaskDraft) -> Result<Task, ApiError> {
        let body = encode(draft)?;
        let response = self.send(Endpoint::Create, Some(body)).await?;
        read_json(response).await
    }

    pub async fn update(&self, id: u64, draft: &TaskDraft) -> Result<Task, ApiError> {
        let body = encode(draft)?;
        let response = self.send(Endpoint::Update(id), Some(body)).await?;
        read_json(response).await
    }

    pub async fn toggle_completion(&self, id: u64) -> Result<Task, ApiError> {
        let response = self.send(Endpoint::Toggle(id), None).await?;
        read_json(response).await
    }

    pub async fn delete(&self, id: u64) -> Result<(), ApiError> {
        self.send(Endpoint::Delete(id), None).await?;
        Ok(())
    }

    async fn send(&self, endpoint: Endpoint, body: Option<String>) -> Result<Response, ApiError> {
        let url = self.url(&endpoint);
        tracing::debug!(method = endpoint.method(), %url, "sending request");

        let opts = RequestInit::new();
        opts.set_method(endpoint.method());
        if let Some(body) = &body {
            opts.set_body(&JsValue::from_str(body));
        }

        let request = Request::new_with_str_and_init(&url, &opts)
            .map_err(|e| ApiError::Request(describe(&e)))?;
        if body.is_some() {
            request
                .headers()
                .set("Content-Type", "application/json")
                .map_err(|e| ApiError::Request(describe(&e)))?;
        }

        let window = web_sys::window().ok_or_else(|| ApiError::Request("no window".to_string()))?;
        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| ApiError::Network(describe(&e)))?
            .into();

        if !response.ok() {
            return Err(ApiError::Status(response.status()));
        }
        Ok(response)
    }
}

fn encode(draft: &TaskDraft) -> Result<String, ApiError> {
    serde_json::to_string(draft).map_err(|e| ApiError::Request(e.to_string()))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let text_promise = response.text().map_err(|e| ApiError::Decode(describe(&e)))?;
    let text = JsFuture::from(text_promise)
        .await
        .map_err(|e| ApiError::Decode(describe(&e)))?
        .as_string()
        .ok_or_else(|| ApiError::Decode("response body is not text".to_string()))?;

    serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
