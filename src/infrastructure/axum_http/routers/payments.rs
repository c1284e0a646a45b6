use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use crate::{
    application::usecases::payments::{PaymentUseCase, StripeGateway, TierPrices},
    config::config_model::DotEnvyConfig,
    domain::{
        repositories::{
            payments::PaymentRepository, posts::PostRepository,
            subscriptions::SubscriptionRepository, users::UserRepository,
        },
        value_objects::payments::{
            CheckoutModel, CheckoutResponseModel, ManualPaymentModel, PaymentListFilter,
        },
    },
    infrastructure::{
        axum_http::{auth::AuthUser, error_responses::error_response},
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                payments::PaymentPostgres, posts::PostPostgres,
                subscriptions::SubscriptionPostgres, users::UserPostgres,
            },
        },
        stripe::stripe_client::StripeClient,
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let payment_repository = PaymentPostgres::new(Arc::clone(&db_pool));
    let post_repository = PostPostgres::new(Arc::clone(&db_pool));
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let stripe_client = StripeClient::new(
        config.stripe.secret_key.clone(),
        config.stripe.webhook_secret.clone(),
        config.stripe.success_url.clone(),
        config.stripe.cancel_url.clone(),
    );
    let tier_prices = TierPrices {
        basic: config.stripe.price_basic.clone(),
        premium: config.stripe.price_premium.clone(),
    };

    let payments_usecase = PaymentUseCase::new(
        Arc::new(payment_repository),
        Arc::new(post_repository),
        Arc::new(subscription_repository),
        Arc::new(user_repository),
        Arc::new(stripe_client),
        tier_prices,
    );

    Router::new()
        .route("/", get(list_payments))
        .route("/checkout", post(initiate_checkout))
        .route("/manual", post(record_manual_payment))
        .route("/stripe-webhook", post(stripe_webhook))
        .with_state(Arc::new(payments_usecase))
}

pub async fn initiate_checkout<Pay, Post, Sub, User, Stripe>(
    State(payments_usecase): State<Arc<PaymentUseCase<Pay, Post, Sub, User, Stripe>>>,
    auth: AuthUser,
    Json(checkout_model): Json<CheckoutModel>,
) -> impl IntoResponse
where
    Pay: PaymentRepository + Send + Sync,
    Post: PostRepository + Send + Sync,
    Sub: SubscriptionRepository + Send + Sync,
    User: UserRepository + Send + Sync,
    Stripe: StripeGateway + Send + Sync,
{
    match payments_usecase
        .initiate_checkout(auth.user_id, checkout_model)
        .await
    {
        Ok(url) => (StatusCode::CREATED, Json(CheckoutResponseModel { url })).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn record_manual_payment<Pay, Post, Sub, User, Stripe>(
    State(payments_usecase): State<Arc<PaymentUseCase<Pay, Post, Sub, User, Stripe>>>,
    auth: AuthUser,
    Json(manual_payment_model): Json<ManualPaymentModel>,
) -> impl IntoResponse
where
    Pay: PaymentRepository + Send + Sync,
    Post: PostRepository + Send + Sync,
    Sub: SubscriptionRepository + Send + Sync,
    User: UserRepository + Send + Sync,
    Stripe: StripeGateway + Send + Sync,
{
    match payments_usecase
        .record_manual_payment(auth.user_id, manual_payment_model)
        .await
    {
        Ok(payment_id) => {
            (StatusCode::CREATED, Json(json!({ "id": payment_id }))).into_response()
        }
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn list_payments<Pay, Post, Sub, User, Stripe>(
    State(payments_usecase): State<Arc<PaymentUseCase<Pay, Post, Sub, User, Stripe>>>,
    _auth: AuthUser,
    Query(filter): Query<PaymentListFilter>,
) -> impl IntoResponse
where
    Pay: PaymentRepository + Send + Sync,
    Post: PostRepository + Send + Sync,
    Sub: SubscriptionRepository + Send + Sync,
    User: UserRepository + Send + Sync,
    Stripe: StripeGateway + Send + Sync,
{
    match payments_usecase.list_payments(filter).await {
        Ok(payments) => (StatusCode::OK, Json(payments)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

/// Provider-facing endpoint: authenticated by the webhook signature, not a
/// bearer token. Takes the raw body so the HMAC covers exactly the bytes
/// the provider signed.
pub async fn stripe_webhook<Pay, Post, Sub, User, Stripe>(
    State(payments_usecase): State<Arc<PaymentUseCase<Pay, Post, Sub, User, Stripe>>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse
where
    Pay: PaymentRepository + Send + Sync,
    Post: PostRepository + Send + Sync,
    Sub: SubscriptionRepository + Send + Sync,
    User: UserRepository + Send + Sync,
    Stripe: StripeGateway + Send + Sync,
{
    let signature = match headers
        .get("Stripe-Signature")
        .and_then(|value| value.to_str().ok())
    {
        Some(signature) => signature,
        None => {
            return error_response(StatusCode::BAD_REQUEST, "Missing Stripe-Signature header");
        }
    };

    match payments_usecase.handle_stripe_webhook(&body, signature).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}
