//! Status repository
//!
//! Fetches the current status of a task from the status endpoint.

use anyhow::{Context, Result};
use async_trait::async_trait;
use taskwatch_client::StatusClient;
use taskwatch_core::dto::task::TaskStatus;

/// Repository trait for task status lookups
#[async_trait]
pub trait StatusRepository: Send + Sync {
    /// Fetches the current status of a task
    ///
    /// Any error (transport, non-2xx status, unparsable body) is treated by
    /// the scheduler as transient.
    ///
    /// # Arguments
    /// * `task_id` - The task to look up
    async fn fetch_status(&self, task_id: &str) -> Result<TaskStatus>;
}

/// HTTP implementation of StatusRepository
#[derive(Debug, Clone)]
pub struct HttpStatusRepository {
    client: StatusClient,
}

impl HttpStatusRepository {
    /// Creates a new HTTP status repository
    ///
    /// # Arguments
    /// * `client` - Client pointed at the server hosting `/tasks/`
    pub fn new(client: StatusClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StatusRepository for HttpStatusRepository {
    async fn fetch_status(&self, task_id: &str) -> Result<TaskStatus> {
        self.client
            .get_task_status(task_id)
            .await
            .with_context(|| format!("Failed to fetch status of task {}", task_id))
    }
}
