use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::users::{EditCsrNoteEntity, EditUserEntity, UserEntity};
use crate::domain::value_objects::users::UserSearchResultDto;

#[automock]
#[async_trait]
pub trait UserRepository {
    async fn find_by_id(&self, user_id: i64) -> Result<Option<UserEntity>>;

    async fn update(&self, user_id: i64, changes: EditUserEntity) -> Result<UserEntity>;

    /// Returns `None` when no user has this id.
    async fn update_csr_note(
        &self,
        user_id: i64,
        note: EditCsrNoteEntity,
    ) -> Result<Option<UserEntity>>;

    async fn search_by_name(&self, query: String, limit: i64) -> Result<Vec<UserSearchResultDto>>;
}
