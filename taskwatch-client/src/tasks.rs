//! Task status endpoint

use reqwest::Url;
use tracing::debug;

use crate::StatusClient;
use crate::error::{ClientError, Result};
use taskwatch_core::dto::task::TaskStatus;

impl StatusClient {
    /// Fetch the current status of a task
    ///
    /// Issues `GET {base_url}/tasks/{task_id}/status/`. The task id is
    /// percent-encoded as a single path segment.
    ///
    /// # Arguments
    /// * `task_id` - Opaque task identifier
    ///
    /// # Returns
    /// The parsed status payload
    pub async fn get_task_status(&self, task_id: &str) -> Result<TaskStatus> {
        let url = self.status_url(task_id)?;
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;

        self.handle_response(response).await
    }

    /// Build the status URL for a task
    pub fn status_url(&self, task_id: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            ClientError::InvalidRequest(format!("Invalid base URL '{}': {}", self.base_url, e))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                ClientError::InvalidRequest(format!(
                    "Base URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(["tasks", task_id, "status", ""]);

        Ok(url)
    }
}
