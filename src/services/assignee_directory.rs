use async_trait::async_trait;

use crate::domain::assignee::AssigneeCandidate;
use crate::error::AppResult;

#[async_trait]
pub trait AssigneeDirectoryService: Send + Sync {
    async fn list_assignees(&self) -> AppResult<Vec<AssigneeCandidate>>;
}
