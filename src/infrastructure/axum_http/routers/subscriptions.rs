use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::{
    application::usecases::subscriptions::SubscriptionUseCase,
    domain::{
        repositories::{subscriptions::SubscriptionRepository, users::UserRepository},
        value_objects::subscriptions::SubscribeModel,
    },
    infrastructure::{
        axum_http::{auth::AuthUser, error_responses::error_response},
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{subscriptions::SubscriptionPostgres, users::UserPostgres},
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let subscriptions_usecase = SubscriptionUseCase::new(
        Arc::new(subscription_repository),
        Arc::new(user_repository),
    );

    Router::new()
        .route("/current", get(current_subscription))
        .route("/subscribe", post(subscribe))
        .with_state(Arc::new(subscriptions_usecase))
}

pub async fn current_subscription<Sub, User>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<Sub, User>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    Sub: SubscriptionRepository + Send + Sync,
    User: UserRepository + Send + Sync,
{
    match subscriptions_usecase.current_subscription(auth.user_id).await {
        Ok(subscription) => (StatusCode::OK, Json(subscription)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn subscribe<Sub, User>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<Sub, User>>>,
    auth: AuthUser,
    Json(subscribe_model): Json<SubscribeModel>,
) -> impl IntoResponse
where
    Sub: SubscriptionRepository + Send + Sync,
    User: UserRepository + Send + Sync,
{
    match subscriptions_usecase
        .subscribe_or_renew(auth.user_id, subscribe_model)
        .await
    {
        Ok(subscription) => (StatusCode::OK, Json(subscription)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}
