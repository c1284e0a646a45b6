use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    application::usecases::users::UserUseCase,
    config::{config_loader, config_model::DotEnvyConfig},
    domain::{
        repositories::users::UserRepository,
        value_objects::users::{LoginModel, RegisterUserModel},
    },
    infrastructure::{
        axum_http::{auth::AuthUser, error_responses::error_response},
        notifications::email::{MailGateway, MailNotifier, NoopMailer},
        postgres::{postgres_connection::PgPoolSquad, repositories::users::UserPostgres},
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let mailer: Arc<dyn MailNotifier> = match &config.mail_gateway_url {
        Some(url) => Arc::new(MailGateway::new(url.clone())),
        None => Arc::new(NoopMailer),
    };
    let auth_secret = config_loader::get_auth_secret().expect("JWT secret must be configured");
    let users_usecase = UserUseCase::new(Arc::new(user_repository), mailer, auth_secret);

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/", get(list_users))
        .route("/:user_id/block", post(block_user))
        .route("/:user_id/unblock", post(unblock_user))
        .with_state(Arc::new(users_usecase))
}

pub async fn register<T>(
    State(users_usecase): State<Arc<UserUseCase<T, dyn MailNotifier>>>,
    Json(register_user_model): Json<RegisterUserModel>,
) -> impl IntoResponse
where
    T: UserRepository + Send + Sync,
{
    match users_usecase.register(register_user_model).await {
        Ok(user_id) => (StatusCode::CREATED, Json(json!({ "id": user_id }))).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn login<T>(
    State(users_usecase): State<Arc<UserUseCase<T, dyn MailNotifier>>>,
    Json(login_model): Json<LoginModel>,
) -> impl IntoResponse
where
    T: UserRepository + Send + Sync,
{
    match users_usecase.login(login_model).await {
        Ok(token) => (StatusCode::OK, Json(token)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn list_users<T>(
    State(users_usecase): State<Arc<UserUseCase<T, dyn MailNotifier>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    T: UserRepository + Send + Sync,
{
    match users_usecase.list_users(auth.is_moderator()).await {
        Ok(users) => (StatusCode::OK, Json(users)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn block_user<T>(
    State(users_usecase): State<Arc<UserUseCase<T, dyn MailNotifier>>>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> impl IntoResponse
where
    T: UserRepository + Send + Sync,
{
    match users_usecase
        .set_blocked(auth.is_moderator(), user_id, true)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn unblock_user<T>(
    State(users_usecase): State<Arc<UserUseCase<T, dyn MailNotifier>>>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> impl IntoResponse
where
    T: UserRepository + Send + Sync,
{
    match users_usecase
        .set_blocked(auth.is_moderator(), user_id, false)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}
