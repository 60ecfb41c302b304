use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client};
use shared::{Task, TaskDraft};

use crate::store::{timestamp_now, StoreError, TaskStore};

const NEXT_ID_KEY: &str = "tasks:next_id";

fn task_key(id: u64) -> String {
    format!("task:{}", id)
}

/// Tasks stored as JSON strings under `task:{id}`, ids drawn from an `INCR` counter.
///
/// Updates are read-modify-write and not atomic across clients.
pub struct RedisStore {
    client: Client,
}

impl RedisStore {
    pub fn open(url: &str) -> Result<Self, StoreError> {
        Ok(Self {
            client: Client::open(url)?,
        })
    }

    async fn connection(&self) -> Result<MultiplexedConnection, StoreError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }

    async fn read(conn: &mut MultiplexedConnection, id: u64) -> Result<Option<Task>, StoreError> {
        let json: Option<String> = conn.get(task_key(id)).await?;
        Ok(json.map(|json| serde_json::from_str::<Task>(&json)).transpose()?)
    }

    async fn write(conn: &mut MultiplexedConnection, task: &Task) -> Result<(), StoreError> {
        let json = serde_json::to_string(task)?;
        conn.set::<_, _, ()>(task_key(task.id), json).await?;
        Ok(())
    }
}

#[async_trait]
impl TaskStore for RedisStore {
    async fn list(&self) -> Result<Vec<Task>, StoreError> {
        let mut conn = self.connection().await?;
        let keys: Vec<String> = conn.keys("task:*").await?;

        let mut tasks = Vec::with_capacity(keys.len());
        for key in keys {
            let json: Option<String> = conn.get(&key).await?;
            match json.map(|json| serde_json::from_str::<Task>(&json)) {
                Some(Ok(task)) => tasks.push(task),
                Some(Err(e)) => tracing::warn!(%key, error = %e, "skipping unreadable task"),
                None => {}
            }
        }
        tasks.sort_by_key(|task| task.id);
        Ok(tasks)
    }

    async fn get(&self, id: u64) -> Result<Option<Task>, StoreError> {
        let mut conn = self.connection().await?;
        Self::read(&mut conn, id).await
    }

    async fn create(&self, draft: TaskDraft) -> Result<Task, StoreError> {
        let mut conn = self.connection().await?;
        let id: u64 = conn.incr(NEXT_ID_KEY, 1).await?;
        let task = Task::new(id, draft, timestamp_now());
        Self::write(&mut conn, &task).await?;
        Ok(task)
    }

    async fn update(&self, id: u64, draft: TaskDraft) -> Result<Option<Task>, StoreError> {
        let mut conn = self.connection().await?;
        let Some(task) = Self::read(&mut conn, id).await? else {
            return Ok(None);
        };
        let task = task.with_draft(draft);
        Self::write(&mut conn, &task).await?;
        Ok(Some(task))
    }

    async fn toggle(&self, id: u64) -> Result<Option<Task>, StoreError> {
        let mut conn = self.connection().await?;
        let Some(mut task) = Self::read(&mut conn, id).await? else {
            return Ok(None);
        };
        task.completed = !task.completed;
        Self::write(&mut conn, &task).await?;
        Ok(Some(task))
    }

    async fn delete(&self, id: u64) -> Result<bool, StoreError> {
        let mut conn = self.connection().await?;
        let deleted: usize = conn.del(task_key(id)).await?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_match_list_pattern() {
        assert_eq!(task_key(42), "task:42");
        assert!(task_key(1).starts_with("task:"));
        assert!(!NEXT_ID_KEY.starts_with("task:"));
    }

    #[test]
    fn rejects_malformed_url() {
        assert!(RedisStore::open("not a url").is_err());
    }
}
