use anyhow::Result;
use chrono::Utc;
use portal::domain::{
    repositories::user_details::UserDetailRepository,
    value_objects::user_details::UserDetailDto,
};
use std::sync::Arc;
use tracing::debug;

pub struct UserDetailUseCase<D>
where
    D: UserDetailRepository + Send + Sync + 'static,
{
    user_detail_repository: Arc<D>,
}

impl<D> UserDetailUseCase<D>
where
    D: UserDetailRepository + Send + Sync + 'static,
{
    pub fn new(user_detail_repository: Arc<D>) -> Self {
        Self {
            user_detail_repository,
        }
    }

    /// Every active user with the derived billing flags, recomputed per call.
    pub async fn list_detailed_users(&self) -> Result<Vec<UserDetailDto>> {
        let records = self.user_detail_repository.list_active_user_details().await?;
        let now = Utc::now();

        debug!(users = records.len(), "user_details: projected detailed users");

        Ok(records
            .into_iter()
            .map(|record| UserDetailDto::from_record(record, now))
            .collect())
    }

    pub async fn find(&self, user_id: i64) -> Result<Option<UserDetailDto>> {
        let record = self.user_detail_repository.find_user_detail(user_id).await?;
        Ok(record.map(|record| UserDetailDto::from_record(record, Utc::now())))
    }
}
