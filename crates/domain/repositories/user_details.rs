use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::value_objects::user_details::UserDetailRecord;

#[automock]
#[async_trait]
pub trait UserDetailRepository {
    /// Every active user with their billed (active or overdue) subscriptions.
    async fn list_active_user_details(&self) -> Result<Vec<UserDetailRecord>>;

    /// One user with their full subscription history.
    async fn find_user_detail(&self, user_id: i64) -> Result<Option<UserDetailRecord>>;
}
