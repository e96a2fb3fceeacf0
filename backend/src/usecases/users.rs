use anyhow::Result;
use chrono::Utc;
use portal::domain::{
    repositories::users::UserRepository,
    value_objects::users::{AddCsrNoteModel, UpdateUserModel, UserDto, UserSearchQuery, UserSearchResultDto},
};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::usecases::action_errors::{ActionError, ActionResult};

const USER_NOT_FOUND: &str = "User not found";

pub struct UserUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    user_repository: Arc<U>,
}

impl<U> UserUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(user_repository: Arc<U>) -> Self {
        Self { user_repository }
    }

    pub async fn update(&self, model: UpdateUserModel) -> ActionResult<UserDto> {
        const UPDATE_FAILED: &str = "Failed to update user. Please try again.";

        model.validate_fields()?;

        let current = self
            .user_repository
            .find_by_id(model.id)
            .await
            .map_err(|err| {
                error!(user_id = model.id, db_error = ?err, "users: lookup failed");
                ActionError::persistence(UPDATE_FAILED, err)
            })?
            .ok_or(ActionError::NotFound {
                field: "id",
                message: USER_NOT_FOUND,
            })?;

        let changes = model.to_entity(&current, Utc::now());
        let user = self
            .user_repository
            .update(model.id, changes)
            .await
            .map_err(|err| {
                error!(user_id = model.id, db_error = ?err, "users: failed to update user");
                ActionError::persistence(UPDATE_FAILED, err)
            })?;

        info!(
            user_id = user.id,
            account_status = %user.account_status,
            previous_status = %current.account_status,
            "users: updated"
        );

        Ok(user.into())
    }

    pub async fn add_csr_note(&self, user_id: i64, model: AddCsrNoteModel) -> ActionResult<UserDto> {
        model.validate_fields()?;

        let user = self
            .user_repository
            .update_csr_note(user_id, model.to_entity(Utc::now()))
            .await
            .map_err(|err| {
                error!(user_id, db_error = ?err, "users: failed to save CSR note");
                ActionError::persistence("Failed to save note. Please try again.", err)
            })?
            .ok_or(ActionError::NotFound {
                field: "userId",
                message: USER_NOT_FOUND,
            })?;

        info!(user_id, note_len = model.csr_notes.len(), "users: CSR note saved");

        Ok(user.into())
    }

    pub async fn search(&self, query: UserSearchQuery) -> Result<Vec<UserSearchResultDto>> {
        let term = query.q.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }

        let limit = query.effective_limit();
        let results = self
            .user_repository
            .search_by_name(term.to_string(), limit)
            .await?;

        debug!(results = results.len(), limit, "users: search");

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::{always, eq};
    use portal::domain::{
        entities::users::UserEntity, repositories::users::MockUserRepository,
    };

    fn stored(status: &str) -> UserEntity {
        UserEntity {
            id: 1,
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: None,
            address: None,
            account_status: status.to_string(),
            csr_notes: None,
            cancelled_at: None,
            cancelled_by: None,
            cancelled_reason: None,
            created_at: Utc::now(),
            updated_at: None,
            deleted_at: None,
        }
    }

    fn update_request(status: &str) -> UpdateUserModel {
        UpdateUserModel {
            id: 1,
            name: "Jane Doe".to_string(),
            email: "jane.doe@example.com".to_string(),
            phone: Some("5550100199".to_string()),
            address: None,
            account_status: status.to_string(),
        }
    }

    #[tokio::test]
    async fn cancelling_account_records_csr_stamp() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .with(eq(1))
            .returning(|_| Ok(Some(stored("active"))));
        user_repo
            .expect_update()
            .withf(|id, changes| {
                *id == 1
                    && changes.account_status == "cancelled"
                    && changes.cancelled_by.as_deref() == Some("csr")
                    && changes.cancelled_at.is_some()
            })
            .times(1)
            .returning(|_, changes| {
                let mut user = stored(&changes.account_status);
                user.email = changes.email;
                user.cancelled_at = changes.cancelled_at;
                user.cancelled_by = changes.cancelled_by;
                Ok(user)
            });

        let usecase = UserUseCase::new(Arc::new(user_repo));
        let user = usecase.update(update_request("cancelled")).await.unwrap();

        assert_eq!(user.account_status, "cancelled");
        assert_eq!(user.email, "jane.doe@example.com");
        assert_eq!(user.cancelled_by.as_deref(), Some("csr"));
    }

    #[tokio::test]
    async fn updating_unknown_user_is_not_found() {
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find_by_id().returning(|_| Ok(None));
        user_repo.expect_update().never();

        let usecase = UserUseCase::new(Arc::new(user_repo));
        let err = usecase.update(update_request("active")).await.unwrap_err();

        assert!(matches!(err, ActionError::NotFound { field: "id", .. }));
    }

    #[tokio::test]
    async fn note_for_unknown_user_is_not_found() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_update_csr_note()
            .with(eq(99), always())
            .returning(|_, _| Ok(None));

        let usecase = UserUseCase::new(Arc::new(user_repo));
        let err = usecase
            .add_csr_note(
                99,
                AddCsrNoteModel {
                    csr_notes: "Called to ask about the gold plan".to_string(),
                },
            )
            .await
            .unwrap_err();

        assert_eq!(
            err.field_errors().get("userId"),
            Some(&["User not found".to_string()][..])
        );
    }

    #[tokio::test]
    async fn short_note_is_rejected_without_writing() {
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_update_csr_note().never();

        let usecase = UserUseCase::new(Arc::new(user_repo));
        let err = usecase
            .add_csr_note(
                1,
                AddCsrNoteModel {
                    csr_notes: "hi".to_string(),
                },
            )
            .await
            .unwrap_err();

        assert!(err.field_errors().get("csr_notes").is_some());
    }

    #[tokio::test]
    async fn blank_search_skips_the_database() {
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_search_by_name().never();

        let usecase = UserUseCase::new(Arc::new(user_repo));
        let results = usecase
            .search(UserSearchQuery {
                q: "   ".to_string(),
                limit: None,
            })
            .await
            .unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn search_passes_trimmed_term_and_clamped_limit() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_search_by_name()
            .with(eq("jan".to_string()), eq(50))
            .times(1)
            .returning(|_, _| {
                Ok(vec![UserSearchResultDto {
                    id: 1,
                    name: "Jane Doe".to_string(),
                }])
            });

        let usecase = UserUseCase::new(Arc::new(user_repo));
        let results = usecase
            .search(UserSearchQuery {
                q: " jan ".to_string(),
                limit: Some(100),
            })
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
    }
}
