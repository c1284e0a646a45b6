use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use crate::{
    application::usecases::posts::PostUseCase,
    domain::{
        repositories::posts::PostRepository,
        value_objects::posts::{InsertPostModel, Pagination, UpdatePostModel},
    },
    infrastructure::{
        axum_http::{auth::AuthUser, error_responses::error_response},
        postgres::{postgres_connection::PgPoolSquad, repositories::posts::PostPostgres},
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let post_repository = PostPostgres::new(Arc::clone(&db_pool));
    let posts_usecase = PostUseCase::new(Arc::new(post_repository));

    Router::new()
        .route("/", get(list_published).post(create_post))
        .route("/free", get(list_free))
        .route("/paid", get(list_paid))
        .route("/categories", get(list_categories))
        .route("/categories/:category_id", get(list_by_category))
        .route(
            "/categories/:category_id/subcategories",
            get(list_subcategories),
        )
        .route(
            "/:post_id",
            get(view_post).put(update_post).delete(delete_post),
        )
        .route("/:post_id/publish", post(publish_post))
        .route("/:post_id/unpublish", post(unpublish_post))
        .with_state(Arc::new(posts_usecase))
}

pub async fn list_published<T>(
    State(posts_usecase): State<Arc<PostUseCase<T>>>,
    Query(pagination): Query<Pagination>,
) -> impl IntoResponse
where
    T: PostRepository + Send + Sync,
{
    match posts_usecase.list_published(pagination).await {
        Ok(posts) => (StatusCode::OK, Json(posts)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn list_free<T>(State(posts_usecase): State<Arc<PostUseCase<T>>>) -> impl IntoResponse
where
    T: PostRepository + Send + Sync,
{
    match posts_usecase.list_by_paid_flag(false).await {
        Ok(posts) => (StatusCode::OK, Json(posts)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn list_paid<T>(State(posts_usecase): State<Arc<PostUseCase<T>>>) -> impl IntoResponse
where
    T: PostRepository + Send + Sync,
{
    match posts_usecase.list_by_paid_flag(true).await {
        Ok(posts) => (StatusCode::OK, Json(posts)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn list_categories<T>(
    State(posts_usecase): State<Arc<PostUseCase<T>>>,
) -> impl IntoResponse
where
    T: PostRepository + Send + Sync,
{
    match posts_usecase.list_categories().await {
        Ok(categories) => (StatusCode::OK, Json(categories)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn list_by_category<T>(
    State(posts_usecase): State<Arc<PostUseCase<T>>>,
    Path(category_id): Path<i64>,
) -> impl IntoResponse
where
    T: PostRepository + Send + Sync,
{
    match posts_usecase.list_by_category(category_id).await {
        Ok(posts) => (StatusCode::OK, Json(posts)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn list_subcategories<T>(
    State(posts_usecase): State<Arc<PostUseCase<T>>>,
    Path(category_id): Path<i64>,
) -> impl IntoResponse
where
    T: PostRepository + Send + Sync,
{
    match posts_usecase.list_subcategories(category_id).await {
        Ok(subcategories) => (StatusCode::OK, Json(subcategories)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn view_post<T>(
    State(posts_usecase): State<Arc<PostUseCase<T>>>,
    Path(post_id): Path<i64>,
) -> impl IntoResponse
where
    T: PostRepository + Send + Sync,
{
    match posts_usecase.view_post(post_id).await {
        Ok(post) => (StatusCode::OK, Json(post)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn create_post<T>(
    State(posts_usecase): State<Arc<PostUseCase<T>>>,
    auth: AuthUser,
    Json(insert_post_model): Json<InsertPostModel>,
) -> impl IntoResponse
where
    T: PostRepository + Send + Sync,
{
    match posts_usecase
        .create_post(auth.user_id, insert_post_model)
        .await
    {
        Ok(post_id) => (StatusCode::CREATED, Json(json!({ "id": post_id }))).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn update_post<T>(
    State(posts_usecase): State<Arc<PostUseCase<T>>>,
    auth: AuthUser,
    Path(post_id): Path<i64>,
    Json(update_post_model): Json<UpdatePostModel>,
) -> impl IntoResponse
where
    T: PostRepository + Send + Sync,
{
    match posts_usecase
        .update_post(auth.user_id, auth.is_moderator(), post_id, update_post_model)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn publish_post<T>(
    State(posts_usecase): State<Arc<PostUseCase<T>>>,
    auth: AuthUser,
    Path(post_id): Path<i64>,
) -> impl IntoResponse
where
    T: PostRepository + Send + Sync,
{
    match posts_usecase
        .set_published(auth.user_id, auth.is_moderator(), post_id, true)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn unpublish_post<T>(
    State(posts_usecase): State<Arc<PostUseCase<T>>>,
    auth: AuthUser,
    Path(post_id): Path<i64>,
) -> impl IntoResponse
where
    T: PostRepository + Send + Sync,
{
    match posts_usecase
        .set_published(auth.user_id, auth.is_moderator(), post_id, false)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn delete_post<T>(
    State(posts_usecase): State<Arc<PostUseCase<T>>>,
    auth: AuthUser,
    Path(post_id): Path<i64>,
) -> impl IntoResponse
where
    T: PostRepository + Send + Sync,
{
    match posts_usecase
        .delete_post(auth.user_id, auth.is_moderator(), post_id)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}
