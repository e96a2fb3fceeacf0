use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use portal::{
    domain::{
        repositories::{user_details::UserDetailRepository, users::UserRepository},
        value_objects::users::{AddCsrNoteModel, UpdateUserModel, UserSearchQuery},
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{user_details::UserDetailPostgres, users::UserPostgres},
    },
};

use crate::{
    axum_http::{
        action_responses::{action_response, rejected_body},
        error_responses::AppError,
    },
    usecases::{user_details::UserDetailUseCase, users::UserUseCase},
};

pub struct UsersState<U, D>
where
    U: UserRepository + Send + Sync + 'static,
    D: UserDetailRepository + Send + Sync + 'static,
{
    pub user_usecase: UserUseCase<U>,
    pub user_detail_usecase: UserDetailUseCase<D>,
}

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let user_detail_repository = UserDetailPostgres::new(Arc::clone(&db_pool));

    let state = UsersState {
        user_usecase: UserUseCase::new(Arc::new(user_repository)),
        user_detail_usecase: UserDetailUseCase::new(Arc::new(user_detail_repository)),
    };

    Router::new()
        .route("/", get(list_detailed::<UserPostgres, UserDetailPostgres>))
        .route("/search", get(search::<UserPostgres, UserDetailPostgres>))
        .route(
            "/:id",
            get(find_detail::<UserPostgres, UserDetailPostgres>)
                .put(update::<UserPostgres, UserDetailPostgres>),
        )
        .route("/:id/notes", post(add_note::<UserPostgres, UserDetailPostgres>))
        .with_state(Arc::new(state))
}

pub async fn list_detailed<U, D>(State(state): State<Arc<UsersState<U, D>>>) -> Response
where
    U: UserRepository + Send + Sync + 'static,
    D: UserDetailRepository + Send + Sync + 'static,
{
    match state.user_detail_usecase.list_detailed_users().await {
        Ok(users) => (StatusCode::OK, Json(users)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn search<U, D>(
    State(state): State<Arc<UsersState<U, D>>>,
    Query(query): Query<UserSearchQuery>,
) -> Response
where
    U: UserRepository + Send + Sync + 'static,
    D: UserDetailRepository + Send + Sync + 'static,
{
    match state.user_usecase.search(query).await {
        Ok(results) => (StatusCode::OK, Json(results)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn find_detail<U, D>(
    State(state): State<Arc<UsersState<U, D>>>,
    Path(user_id): Path<i64>,
) -> Response
where
    U: UserRepository + Send + Sync + 'static,
    D: UserDetailRepository + Send + Sync + 'static,
{
    match state.user_detail_usecase.find(user_id).await {
        Ok(Some(detail)) => (StatusCode::OK, Json(detail)).into_response(),
        Ok(None) => AppError::NotFound("User not found".to_string()).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn update<U, D>(
    State(state): State<Arc<UsersState<U, D>>>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateUserModel>, JsonRejection>,
) -> Response
where
    U: UserRepository + Send + Sync + 'static,
    D: UserDetailRepository + Send + Sync + 'static,
{
    let Path(user_id) = match path {
        Ok(path) => path,
        Err(rejection) => return rejected_body(rejection),
    };
    let Json(mut model) = match body {
        Ok(body) => body,
        Err(rejection) => return rejected_body(rejection),
    };
    model.id = user_id;

    action_response(state.user_usecase.update(model).await, StatusCode::OK)
}

pub async fn add_note<U, D>(
    State(state): State<Arc<UsersState<U, D>>>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<AddCsrNoteModel>, JsonRejection>,
) -> Response
where
    U: UserRepository + Send + Sync + 'static,
    D: UserDetailRepository + Send + Sync + 'static,
{
    let Path(user_id) = match path {
        Ok(path) => path,
        Err(rejection) => return rejected_body(rejection),
    };
    let Json(model) = match body {
        Ok(body) => body,
        Err(rejection) => return rejected_body(rejection),
    };

    action_response(state.user_usecase.add_csr_note(user_id, model).await, StatusCode::OK)
}
