use std::{collections::HashMap, sync::Arc};

use anyhow::Result as AnyResult;
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    domain::{
        entities::{payments::InsertPaymentEntity, subscriptions::InsertSubscriptionEntity},
        repositories::{
            payments::PaymentRepository, posts::PostRepository,
            subscriptions::SubscriptionRepository, users::UserRepository,
        },
        value_objects::{
            enums::{
                payment_methods::PaymentMethod, payment_statuses::PaymentStatus,
                subscription_tiers::SubscriptionTier,
            },
            payments::{CheckoutModel, ManualPaymentModel, PaymentListFilter, PaymentModel},
            posts::Pagination,
        },
    },
    infrastructure::stripe::stripe_client::{CheckoutSessionCreated, StripeClient, StripeEvent},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StripeGateway: Send + Sync {
    async fn create_product(&self, name: &str, description: &str) -> AnyResult<String>;

    async fn create_price(&self, product_id: &str, amount_minor: i32) -> AnyResult<String>;

    async fn create_checkout_session(
        &self,
        price_id: &str,
        metadata: HashMap<String, String>,
    ) -> AnyResult<CheckoutSessionCreated>;

    fn verify_webhook_signature(&self, payload: &[u8], signature: &str) -> AnyResult<StripeEvent>;
}

#[async_trait]
impl StripeGateway for StripeClient {
    async fn create_product(&self, name: &str, description: &str) -> AnyResult<String> {
        self.create_product(name, description).await
    }

    async fn create_price(&self, product_id: &str, amount_minor: i32) -> AnyResult<String> {
        self.create_price(product_id, amount_minor).await
    }

    async fn create_checkout_session(
        &self,
        price_id: &str,
        metadata: HashMap<String, String>,
    ) -> AnyResult<CheckoutSessionCreated> {
        self.create_checkout_session(price_id, metadata).await
    }

    fn verify_webhook_signature(&self, payload: &[u8], signature: &str) -> AnyResult<StripeEvent> {
        self.verify_webhook_signature(payload, signature)
    }
}

/// Stripe price ids for the subscription tiers, provisioned ahead of time
/// and read from configuration.
#[derive(Debug, Clone)]
pub struct TierPrices {
    pub basic: String,
    pub premium: String,
}

impl TierPrices {
    fn price_id(&self, tier: SubscriptionTier) -> &str {
        match tier {
            SubscriptionTier::Basic => &self.basic,
            SubscriptionTier::Premium => &self.premium,
        }
    }
}

/// Length of the subscription window opened by a settled tier payment.
const SUBSCRIPTION_WINDOW_DAYS: i64 = 30;

fn tier_for_amount(amount_minor: i32) -> Option<SubscriptionTier> {
    [SubscriptionTier::Basic, SubscriptionTier::Premium]
        .into_iter()
        .find(|tier| tier.amount_minor() == amount_minor)
}

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("invalid selection: {0}")]
    InvalidSelection(String),
    #[error("invalid webhook payload: {0}")]
    InvalidWebhook(String),
    #[error("unknown provider transaction: {0}")]
    UnknownTransaction(String),
    #[error("payment provider rejected the request")]
    UpstreamProvider(#[source] anyhow::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PaymentError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            PaymentError::InvalidSelection(_) | PaymentError::InvalidWebhook(_) => {
                StatusCode::BAD_REQUEST
            }
            PaymentError::UnknownTransaction(_) => StatusCode::NOT_FOUND,
            PaymentError::UpstreamProvider(_) => StatusCode::BAD_GATEWAY,
            PaymentError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, PaymentError>;

enum CheckoutKind {
    Tier(SubscriptionTier),
    Post(i64),
}

pub struct PaymentUseCase<Pay, Post, Sub, User, Stripe>
where
    Pay: PaymentRepository + Send + Sync + 'static,
    Post: PostRepository + Send + Sync + 'static,
    Sub: SubscriptionRepository + Send + Sync + 'static,
    User: UserRepository + Send + Sync + 'static,
    Stripe: StripeGateway + Send + Sync + 'static,
{
    payment_repo: Arc<Pay>,
    post_repo: Arc<Post>,
    subscription_repo: Arc<Sub>,
    user_repo: Arc<User>,
    stripe_client: Arc<Stripe>,
    tier_prices: TierPrices,
}

impl<Pay, Post, Sub, User, Stripe> PaymentUseCase<Pay, Post, Sub, User, Stripe>
where
    Pay: PaymentRepository + Send + Sync + 'static,
    Post: PostRepository + Send + Sync + 'static,
    Sub: SubscriptionRepository + Send + Sync + 'static,
    User: UserRepository + Send + Sync + 'static,
    Stripe: StripeGateway + Send + Sync + 'static,
{
    pub fn new(
        payment_repo: Arc<Pay>,
        post_repo: Arc<Post>,
        subscription_repo: Arc<Sub>,
        user_repo: Arc<User>,
        stripe_client: Arc<Stripe>,
        tier_prices: TierPrices,
    ) -> Self {
        Self {
            payment_repo,
            post_repo,
            subscription_repo,
            user_repo,
            stripe_client,
            tier_prices,
        }
    }

    /// Turns a purchase intent into a provider-hosted checkout session plus
    /// a local pending payment row, and returns the session URL. The row is
    /// written synchronously so the webhook always has something to match
    /// against by provider transaction id.
    pub async fn initiate_checkout(
        &self,
        user_id: Uuid,
        model: CheckoutModel,
    ) -> UseCaseResult<String> {
        info!(
            %user_id,
            subscription_tier = ?model.subscription_tier,
            post_id = ?model.post_id,
            amount = ?model.amount,
            "payments: checkout requested"
        );

        let kind = match (model.subscription_tier.as_deref(), model.post_id) {
            (Some(tier), None) => {
                let tier = SubscriptionTier::from_str(tier).ok_or_else(|| {
                    let err = PaymentError::InvalidSelection(format!(
                        "unknown subscription tier: {tier}"
                    ));
                    warn!(%user_id, status = err.status_code().as_u16(), "payments: unknown tier");
                    err
                })?;
                if let Some(amount) = model.amount {
                    if amount != tier.amount_minor() {
                        let err = PaymentError::InvalidSelection(format!(
                            "amount {} does not match tier {}",
                            amount, tier
                        ));
                        warn!(
                            %user_id,
                            status = err.status_code().as_u16(),
                            "payments: tier amount mismatch"
                        );
                        return Err(err);
                    }
                }
                CheckoutKind::Tier(tier)
            }
            (None, Some(post_id)) => CheckoutKind::Post(post_id),
            _ => {
                let err = PaymentError::InvalidSelection(
                    "exactly one of subscription_tier or post_id is required".to_string(),
                );
                warn!(
                    %user_id,
                    status = err.status_code().as_u16(),
                    "payments: ambiguous checkout selection"
                );
                return Err(err);
            }
        };

        let (price_id, amount_minor, is_subscription, post_id) = match kind {
            CheckoutKind::Tier(tier) => (
                self.tier_prices.price_id(tier).to_string(),
                tier.amount_minor(),
                true,
                None,
            ),
            CheckoutKind::Post(post_id) => {
                let post = self
                    .post_repo
                    .find_by_id(post_id)
                    .await
                    .map_err(PaymentError::Internal)?
                    .ok_or_else(|| {
                        let err = PaymentError::InvalidSelection(format!(
                            "unknown post: {post_id}"
                        ));
                        warn!(
                            %user_id,
                            post_id,
                            status = err.status_code().as_u16(),
                            "payments: checkout for unknown post"
                        );
                        err
                    })?;

                if !post.is_paid || !post.is_published {
                    let err = PaymentError::InvalidSelection(format!(
                        "post {post_id} is not purchasable"
                    ));
                    warn!(
                        %user_id,
                        post_id,
                        is_paid = post.is_paid,
                        is_published = post.is_published,
                        status = err.status_code().as_u16(),
                        "payments: post is not purchasable"
                    );
                    return Err(err);
                }

                let amount = match model.amount {
                    Some(amount) if amount > 0 => amount,
                    _ => {
                        let err = PaymentError::InvalidSelection(
                            "a positive amount is required for a post purchase".to_string(),
                        );
                        warn!(
                            %user_id,
                            post_id,
                            status = err.status_code().as_u16(),
                            "payments: missing amount for post purchase"
                        );
                        return Err(err);
                    }
                };

                let product_id = self
                    .stripe_client
                    .create_product(&post.title, &post.title)
                    .await
                    .map_err(PaymentError::UpstreamProvider)?;
                let price_id = self
                    .stripe_client
                    .create_price(&product_id, amount)
                    .await
                    .map_err(PaymentError::UpstreamProvider)?;

                (price_id, amount, false, Some(post_id))
            }
        };

        let mut metadata = HashMap::from([("user_id".to_string(), user_id.to_string())]);
        if let Some(post_id) = post_id {
            metadata.insert("post_id".to_string(), post_id.to_string());
        }

        let session = self
            .stripe_client
            .create_checkout_session(&price_id, metadata)
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    price_id = %price_id,
                    error = ?err,
                    "payments: stripe checkout session creation failed"
                );
                PaymentError::UpstreamProvider(err)
            })?;

        let checkout_url = session.url.clone().ok_or_else(|| {
            PaymentError::UpstreamProvider(anyhow::anyhow!("checkout session URL is missing"))
        })?;
        let provider_txn_id = session.provider_txn_id();

        self.payment_repo
            .create(InsertPaymentEntity {
                user_id,
                post_id,
                amount_minor,
                method: PaymentMethod::Stripe.to_string(),
                is_subscription,
                provider_txn_id: provider_txn_id.clone(),
                status: PaymentStatus::Pending.to_string(),
            })
            .await
            .map_err(|err| {
                // The provider session already exists at this point; the
                // stale-pending sweep picks these up from the session id.
                error!(
                    %user_id,
                    orphaned_session_id = %session.id,
                    provider_txn_id = %provider_txn_id,
                    db_error = ?err,
                    "payments: failed to persist payment after session creation"
                );
                PaymentError::Internal(err)
            })?;

        info!(
            %user_id,
            provider_txn_id = %provider_txn_id,
            amount_minor,
            is_subscription,
            "payments: checkout session created"
        );

        Ok(checkout_url)
    }

    /// Records a cash or bank-transfer payment taken outside the provider.
    /// The row starts in pending like any other and is settled manually.
    pub async fn record_manual_payment(
        &self,
        user_id: Uuid,
        model: ManualPaymentModel,
    ) -> UseCaseResult<i64> {
        if model.method == PaymentMethod::Stripe {
            let err = PaymentError::InvalidSelection(
                "stripe payments must go through checkout".to_string(),
            );
            warn!(%user_id, status = err.status_code().as_u16(), "payments: manual stripe payment rejected");
            return Err(err);
        }
        if model.amount <= 0 {
            let err =
                PaymentError::InvalidSelection("amount must be positive".to_string());
            warn!(%user_id, status = err.status_code().as_u16(), "payments: non-positive manual amount");
            return Err(err);
        }

        let payment_id = self
            .payment_repo
            .create(InsertPaymentEntity {
                user_id,
                post_id: model.post_id,
                amount_minor: model.amount,
                method: model.method.to_string(),
                is_subscription: false,
                provider_txn_id: model.reference.clone(),
                status: PaymentStatus::Pending.to_string(),
            })
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    reference = %model.reference,
                    db_error = ?err,
                    "payments: failed to record manual payment"
                );
                PaymentError::Internal(err)
            })?;

        info!(%user_id, payment_id, method = %model.method, "payments: manual payment recorded");
        Ok(payment_id)
    }

    pub async fn list_payments(
        &self,
        filter: PaymentListFilter,
    ) -> UseCaseResult<Vec<PaymentModel>> {
        let pagination = Pagination {
            page: filter.page,
            page_size: filter.page_size,
        };
        let (limit, offset) = pagination.limit_offset();

        let payments = self
            .payment_repo
            .list(filter.post_id, filter.method, limit, offset)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "payments: failed to list payments");
                PaymentError::Internal(err)
            })?;

        Ok(payments.into_iter().map(PaymentModel::from).collect())
    }

    /// Webhook entrypoint. Verifies authenticity, then applies the status
    /// transition for the referenced transaction. Duplicate and
    /// out-of-order deliveries are no-ops: terminal statuses are never
    /// overwritten.
    pub async fn handle_stripe_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> UseCaseResult<()> {
        let event = self
            .stripe_client
            .verify_webhook_signature(payload, signature)
            .map_err(|err| {
                warn!(error = %err, "payments: stripe webhook verification failed");
                PaymentError::InvalidWebhook("signature verification failed".to_string())
            })?;

        info!(event_type = %event.type_, event_id = ?event.id, "payments: stripe webhook verified");

        match event.type_.as_str() {
            "payment_intent.succeeded" => {
                self.apply_intent_transition(&event, PaymentStatus::Succeeded)
                    .await
            }
            "payment_intent.payment_failed" => {
                self.apply_intent_transition(&event, PaymentStatus::Failed)
                    .await
            }
            _ => {
                // Acknowledged so the provider can evolve its event set
                // without us bouncing deliveries.
                debug!(event_type = %event.type_, "payments: ignoring unhandled stripe event");
                Ok(())
            }
        }
    }

    async fn apply_intent_transition(
        &self,
        event: &StripeEvent,
        status: PaymentStatus,
    ) -> UseCaseResult<()> {
        let intent = event.extract_payment_intent().ok_or_else(|| {
            let err =
                PaymentError::InvalidWebhook("missing payment intent object".to_string());
            warn!(
                event_type = %event.type_,
                status = err.status_code().as_u16(),
                "payments: malformed payment intent in webhook"
            );
            err
        })?;

        let payment = self
            .payment_repo
            .find_by_provider_txn_id(&intent.id)
            .await
            .map_err(|err| {
                error!(
                    provider_txn_id = %intent.id,
                    db_error = ?err,
                    "payments: failed to look up payment for webhook"
                );
                PaymentError::Internal(err)
            })?
            .ok_or_else(|| {
                // A payment event with no local row means the ledger and
                // the provider disagree; worth alerting on.
                error!(
                    provider_txn_id = %intent.id,
                    event_type = %event.type_,
                    "payments: webhook references unknown transaction"
                );
                PaymentError::UnknownTransaction(intent.id.clone())
            })?;

        let current = PaymentStatus::from_str(&payment.status).unwrap_or_default();
        if current.is_terminal() {
            info!(
                provider_txn_id = %intent.id,
                current_status = %current,
                incoming_status = %status,
                "payments: duplicate webhook delivery, status already terminal"
            );
            return Ok(());
        }

        if status == PaymentStatus::Succeeded {
            if let Some(received) = intent.amount_received {
                if received != i64::from(payment.amount_minor) {
                    warn!(
                        provider_txn_id = %intent.id,
                        expected = payment.amount_minor,
                        received,
                        "payments: received amount differs from the local row"
                    );
                }
            }

            // Flag and window first, transition second: if the transition
            // write fails the provider redelivers and every step here is
            // idempotent.
            if payment.is_subscription {
                self.user_repo
                    .set_paid_subscription(payment.user_id, true)
                    .await
                    .map_err(|err| {
                        error!(
                            user_id = %payment.user_id,
                            provider_txn_id = %intent.id,
                            db_error = ?err,
                            "payments: failed to flag paid subscription"
                        );
                        PaymentError::Internal(err)
                    })?;

                match tier_for_amount(payment.amount_minor) {
                    Some(tier) => {
                        let now = chrono::Utc::now();
                        self.subscription_repo
                            .upsert(InsertSubscriptionEntity {
                                user_id: payment.user_id,
                                plan: tier.to_string(),
                                starts_at: now,
                                ends_at: now + chrono::Duration::days(SUBSCRIPTION_WINDOW_DAYS),
                                is_active: true,
                            })
                            .await
                            .map_err(|err| {
                                error!(
                                    user_id = %payment.user_id,
                                    provider_txn_id = %intent.id,
                                    db_error = ?err,
                                    "payments: failed to open subscription window"
                                );
                                PaymentError::Internal(err)
                            })?;
                    }
                    None => {
                        warn!(
                            provider_txn_id = %intent.id,
                            amount_minor = payment.amount_minor,
                            "payments: subscription payment amount matches no tier, window not opened"
                        );
                    }
                }
            }
        }

        let affected = self
            .payment_repo
            .mark_status_if_pending(&intent.id, status)
            .await
            .map_err(|err| {
                error!(
                    provider_txn_id = %intent.id,
                    db_error = ?err,
                    "payments: failed to transition payment status"
                );
                PaymentError::Internal(err)
            })?;

        if affected == 0 {
            // A concurrent delivery won the race; nothing to do.
            info!(
                provider_txn_id = %intent.id,
                "payments: status transition lost a concurrent race, no-op"
            );
            return Ok(());
        }

        info!(
            provider_txn_id = %intent.id,
            new_status = %status,
            "payments: payment status transitioned"
        );

        Ok(())
    }
}
