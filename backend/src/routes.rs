use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, patch, put},
    Router,
};
use serde_json::{json, Value};
use shared::{Task, TaskDraft};

use crate::error::AppError;
use crate::store::TaskStore;

pub type SharedStore = Arc<dyn TaskStore>;

pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/", get(read_root))
        .route("/health", get(health_check))
        .route("/tasks", get(get_tasks).post(create_task))
        .route("/tasks/:id", get(get_task).delete(delete_task))
        .route("/task/:id", put(update_task))
        .route("/tasks/:id/complete", patch(toggle_task))
        .with_state(store)
}

async fn read_root() -> Json<Value> {
    Json(json!({ "message": "Task Manager API is running!" }))
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy", "version": env!("CARGO_PKG_VERSION") }))
}

async fn get_tasks(State(store): State<SharedStore>) -> Result<Json<Vec<Task>>, AppError> {
    Ok(Json(store.list().await?))
}

async fn get_task(
    Path(id): Path<u64>,
    State(store): State<SharedStore>,
) -> Result<Json<Task>, AppError> {
    store.get(id).await?.map(Json).ok_or(AppError::NotFound)
}

async fn create_task(
    State(store): State<SharedStore>,
    Json(draft): Json<TaskDraft>,
) -> Result<Json<Task>, AppError> {
    draft.validate()?;
    let task = store.create(draft).await?;
    tracing::info!(id = task.id, "task created");
    Ok(Json(task))
}

async fn update_task(
    Path(id): Path<u64>,
    State(store): State<SharedStore>,
    Json(draft): Json<TaskDraft>,
) -> Result<Json<Task>, AppError> {
    draft.validate()?;
    store.update(id, draft).await?.map(Json).ok_or(AppError::NotFound)
}

async fn toggle_task(
    Path(id): Path<u64>,
    State(store): State<SharedStore>,
) -> Result<Json<Task>, AppError> {
    store.toggle(id).await?.map(Json).ok_or(AppError::NotFound)
}

async fn delete_task(
    Path(id): Path<u64>,
    State(store): State<SharedStore>,
) -> Result<StatusCode, AppError> {
    if store.delete(id).await? {
        tracing::info!(id, "task deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request},
        response::Response,
    };
    use serde::de::DeserializeOwned;
    use shared::Priority;
    use tower::ServiceExt;

    fn app() -> Router {
        router(Arc::new(MemoryStore::default()))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    async fn json<T: DeserializeOwned>(response: Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create(app: &Router, title: &str) -> Task {
        let response = send(
            app,
            Method::POST,
            "/tasks",
            Some(json!({ "title": title, "priority": "high" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        json(response).await
    }

    #[tokio::test]
    async fn health_reports_version() {
        let response = send(&app(), Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = json(response).await;
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn created_tasks_are_listed_in_order() {
        let app = app();
        let first = create(&app, "first").await;
        let second = create(&app, "second").await;
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(!first.completed);
        assert_eq!(first.priority, Priority::High);
        assert_eq!(first.description, None);

        let response = send(&app, Method::GET, "/tasks", None).await;
        let tasks: Vec<Task> = json(response).await;
        assert_eq!(tasks, vec![first, second]);
    }

    #[tokio::test]
    async fn blank_title_is_unprocessable() {
        let response = send(&app(), Method::POST, "/tasks", Some(json!({ "title": "  " }))).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = json(response).await;
        assert_eq!(body["detail"], "title must not be empty");
    }

    #[tokio::test]
    async fn update_uses_singular_path_and_keeps_state() {
        let app = app();
        let task = create(&app, "draft").await;
        send(&app, Method::PATCH, &format!("/tasks/{}/complete", task.id), None).await;

        let response = send(
            &app,
            Method::PUT,
            &format!("/task/{}", task.id),
            Some(json!({ "title": "final", "description": "done right", "priority": "low" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let updated: Task = json(response).await;
        assert_eq!(updated.title, "final");
        assert_eq!(updated.description.as_deref(), Some("done right"));
        assert_eq!(updated.priority, Priority::Low);
        assert!(updated.completed);
        assert_eq!(updated.created_at, task.created_at);
    }

    #[tokio::test]
    async fn update_of_unknown_task_is_not_found() {
        let response = send(
            &app(),
            Method::PUT,
            "/task/99",
            Some(json!({ "title": "ghost", "priority": "medium" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: Value = json(response).await;
        assert_eq!(body["detail"], "Task not found");
    }

    #[tokio::test]
    async fn toggling_twice_restores_completion() {
        let app = app();
        let task = create(&app, "flip").await;
        let path = format!("/tasks/{}/complete", task.id);

        let once: Task = json(send(&app, Method::PATCH, &path, None).await).await;
        assert!(once.completed);
        let twice: Task = json(send(&app, Method::PATCH, &path, None).await).await;
        assert!(!twice.completed);
    }

    #[tokio::test]
    async fn delete_returns_no_content_then_not_found() {
        let app = app();
        let task = create(&app, "bye").await;
        let path = format!("/tasks/{}", task.id);

        let response = send(&app, Method::DELETE, &path, None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());

        assert_eq!(send(&app, Method::DELETE, &path, None).await.status(), StatusCode::NOT_FOUND);
        assert_eq!(send(&app, Method::GET, &path, None).await.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            send(&app, Method::PATCH, &format!("{}/complete", path), None).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn deleted_ids_are_not_reused() {
        let app = app();
        let first = create(&app, "one").await;
        send(&app, Method::DELETE, &format!("/tasks/{}", first.id), None).await;
        let next = create(&app, "two").await;
        assert_ne!(next.id, first.id);
    }
}
