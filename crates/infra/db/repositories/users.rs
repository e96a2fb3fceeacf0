use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, prelude::*, update};
use std::sync::Arc;
use tokio::task;

use crate::{
    domain::{
        entities::users::{EditCsrNoteEntity, EditUserEntity, UserEntity},
        repositories::users::UserRepository,
        value_objects::users::UserSearchResultDto,
    },
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::users},
};

pub struct UserPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl UserPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

/// Escapes LIKE wildcards so the query matches literally.
fn like_pattern(query: &str) -> String {
    let escaped = query
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl UserRepository for UserPostgres {
    async fn find_by_id(&self, user_id: i64) -> Result<Option<UserEntity>> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<Option<UserEntity>> {
            let mut conn = db_pool.get()?;

            let user = users::table
                .filter(users::id.eq(user_id))
                .select(UserEntity::as_select())
                .first::<UserEntity>(&mut conn)
                .optional()?;

            Ok(user)
        })
        .await?
    }

    async fn update(&self, user_id: i64, changes: EditUserEntity) -> Result<UserEntity> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<UserEntity> {
            let mut conn = db_pool.get()?;

            let user = update(users::table.filter(users::id.eq(user_id)))
                .set(&changes)
                .returning(UserEntity::as_returning())
                .get_result::<UserEntity>(&mut conn)?;

            Ok(user)
        })
        .await?
    }

    async fn update_csr_note(
        &self,
        user_id: i64,
        note: EditCsrNoteEntity,
    ) -> Result<Option<UserEntity>> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<Option<UserEntity>> {
            let mut conn = db_pool.get()?;

            let user = update(users::table.filter(users::id.eq(user_id)))
                .set(&note)
                .returning(UserEntity::as_returning())
                .get_result::<UserEntity>(&mut conn)
                .optional()?;

            Ok(user)
        })
        .await?
    }

    async fn search_by_name(&self, query: String, limit: i64) -> Result<Vec<UserSearchResultDto>> {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || -> Result<Vec<UserSearchResultDto>> {
            let mut conn = db_pool.get()?;

            let rows = users::table
                .filter(users::deleted_at.is_null())
                .filter(users::name.ilike(like_pattern(&query)))
                .select((users::id, users::name))
                .order(users::name.asc())
                .limit(limit)
                .load::<(i64, String)>(&mut conn)?;

            Ok(rows
                .into_iter()
                .map(|(id, name)| UserSearchResultDto { id, name })
                .collect())
        })
        .await?
    }
}
