use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use shared::{Task, TaskDraft};
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("stored task is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Persistence for tasks. Ids are assigned by the store and never reused.
///
/// `Ok(None)` / `Ok(false)` mean the id does not exist.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All tasks in creation order.
    async fn list(&self) -> Result<Vec<Task>, StoreError>;
    async fn get(&self, id: u64) -> Result<Option<Task>, StoreError>;
    async fn create(&self, draft: TaskDraft) -> Result<Task, StoreError>;
    async fn update(&self, id: u64, draft: TaskDraft) -> Result<Option<Task>, StoreError>;
    async fn toggle(&self, id: u64) -> Result<Option<Task>, StoreError>;
    async fn delete(&self, id: u64) -> Result<bool, StoreError>;
}

pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug)]
struct MemoryInner {
    tasks: Vec<Task>,
    next_id: u64,
}

#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            inner: RwLock::new(MemoryInner {
                tasks: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.inner.read().await.tasks.clone())
    }

    async fn get(&self, id: u64) -> Result<Option<Task>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn create(&self, draft: TaskDraft) -> Result<Task, StoreError> {
        let mut inner = self.inner.write().await;
        let task = Task::new(inner.next_id, draft, timestamp_now());
        inner.next_id += 1;
        inner.tasks.push(task.clone());
        Ok(task)
    }

    async fn update(&self, id: u64, draft: TaskDraft) -> Result<Option<Task>, StoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner.tasks.iter_mut().find(|t| t.id == id).map(|task| {
            *task = task.clone().with_draft(draft);
            task.clone()
        }))
    }

    async fn toggle(&self, id: u64) -> Result<Option<Task>, StoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner.tasks.iter_mut().find(|t| t.id == id).map(|task| {
            task.completed = !task.completed;
            task.clone()
        }))
    }

    async fn delete(&self, id: u64) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.tasks.len();
        inner.tasks.retain(|t| t.id != id);
        Ok(inner.tasks.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Priority;

    fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            description: Some("details".to_string()),
            priority: Priority::Low,
        }
    }

    #[tokio::test]
    async fn assigns_sequential_ids_without_reuse() {
        let store = MemoryStore::default();
        let first = store.create(draft("a")).await.unwrap();
        let second = store.create(draft("b")).await.unwrap();
        assert_eq!((first.id, second.id), (1, 2));

        assert!(store.delete(second.id).await.unwrap());
        let third = store.create(draft("c")).await.unwrap();
        assert_eq!(third.id, 3);
        assert!(!third.completed);
    }

    #[tokio::test]
    async fn list_keeps_creation_order() {
        let store = MemoryStore::default();
        for title in ["one", "two", "three"] {
            store.create(draft(title)).await.unwrap();
        }
        let titles: Vec<_> = store.list().await.unwrap().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn update_preserves_completion_and_timestamp() {
        let store = MemoryStore::default();
        let created = store.create(draft("old")).await.unwrap();
        store.toggle(created.id).await.unwrap();

        let updated = store
            .update(
                created.id,
                TaskDraft {
                    title: "new".into(),
                    description: None,
                    priority: Priority::High,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "new");
        assert_eq!(updated.description, None);
        assert!(updated.completed);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(store.get(created.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn missing_ids_report_absence() {
        let store = MemoryStore::default();
        assert_eq!(store.get(7).await.unwrap(), None);
        assert_eq!(store.update(7, draft("x")).await.unwrap(), None);
        assert_eq!(store.toggle(7).await.unwrap(), None);
        assert!(!store.delete(7).await.unwrap());
    }
}
