use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::subscriptions::InsertSubscriptionEntity,
    repositories::{subscriptions::SubscriptionRepository, users::UserRepository},
    value_objects::{
        enums::subscription_tiers::SubscriptionTier,
        subscriptions::{SubscribeModel, SubscriptionModel},
    },
};

#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("invalid plan: {0}")]
    InvalidPlan(String),
    #[error("invalid period: {0}")]
    InvalidPeriod(String),
    #[error("no subscription found")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl SubscriptionError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            SubscriptionError::InvalidPlan(_) | SubscriptionError::InvalidPeriod(_) => {
                StatusCode::BAD_REQUEST
            }
            SubscriptionError::NotFound => StatusCode::NOT_FOUND,
            SubscriptionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub struct SubscriptionUseCase<Sub, User>
where
    Sub: SubscriptionRepository + Send + Sync + 'static,
    User: UserRepository + Send + Sync + 'static,
{
    subscription_repo: Arc<Sub>,
    user_repo: Arc<User>,
}

impl<Sub, User> SubscriptionUseCase<Sub, User>
where
    Sub: SubscriptionRepository + Send + Sync + 'static,
    User: UserRepository + Send + Sync + 'static,
{
    pub fn new(subscription_repo: Arc<Sub>, user_repo: Arc<User>) -> Self {
        Self {
            subscription_repo,
            user_repo,
        }
    }

    /// Creates or renews the caller's subscription. A user has at most one
    /// subscription row; renewal overwrites plan and period rather than
    /// stacking a second row.
    pub async fn subscribe_or_renew(
        &self,
        user_id: Uuid,
        model: SubscribeModel,
    ) -> Result<SubscriptionModel, SubscriptionError> {
        let tier = SubscriptionTier::from_str(&model.plan).ok_or_else(|| {
            let err = SubscriptionError::InvalidPlan(model.plan.clone());
            warn!(%user_id, plan = %model.plan, "subscriptions: unknown plan");
            err
        })?;

        let now = Utc::now();
        if model.ends_at <= now {
            let err = SubscriptionError::InvalidPeriod(
                "ends_at must be in the future".to_string(),
            );
            warn!(%user_id, ends_at = %model.ends_at, "subscriptions: period ends in the past");
            return Err(err);
        }

        let entity = InsertSubscriptionEntity {
            user_id,
            plan: tier.to_string(),
            starts_at: now,
            ends_at: model.ends_at,
            is_active: true,
        };

        self.subscription_repo.upsert(entity).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "subscriptions: upsert failed");
            SubscriptionError::Internal(err)
        })?;

        self.user_repo
            .set_paid_subscription(user_id, true)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "subscriptions: failed to flag user");
                SubscriptionError::Internal(err)
            })?;

        info!(%user_id, plan = %tier, ends_at = %model.ends_at, "subscriptions: subscribed");

        let stored = self
            .subscription_repo
            .find_by_user(user_id)
            .await
            .map_err(SubscriptionError::Internal)?
            .ok_or(SubscriptionError::NotFound)?;

        Ok(SubscriptionModel::from_entity(stored, now))
    }

    pub async fn current_subscription(
        &self,
        user_id: Uuid,
    ) -> Result<SubscriptionModel, SubscriptionError> {
        let subscription = self
            .subscription_repo
            .find_by_user(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "subscriptions: lookup failed");
                SubscriptionError::Internal(err)
            })?
            .ok_or(SubscriptionError::NotFound)?;

        Ok(SubscriptionModel::from_entity(subscription, Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::subscriptions::SubscriptionEntity,
        repositories::{
            subscriptions::MockSubscriptionRepository, users::MockUserRepository,
        },
    };
    use chrono::Duration;

    fn stored(user_id: Uuid, plan: &str, ends_at: chrono::DateTime<Utc>) -> SubscriptionEntity {
        SubscriptionEntity {
            id: 1,
            user_id,
            plan: plan.to_string(),
            starts_at: Utc::now(),
            ends_at,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn subscribing_upserts_and_flags_the_user() {
        let user_id = Uuid::new_v4();
        let ends_at = Utc::now() + Duration::days(30);

        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_upsert()
            .withf(move |entity| {
                entity.user_id == user_id && entity.plan == "premium" && entity.is_active
            })
            .times(1)
            .returning(|_| Ok(1));
        subscription_repo
            .expect_find_by_user()
            .returning(move |id| Ok(Some(stored(id, "premium", ends_at))));

        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_set_paid_subscription()
            .withf(move |id, value| *id == user_id && *value)
            .times(1)
            .returning(|_, _| Ok(()));

        let usecase = SubscriptionUseCase::new(Arc::new(subscription_repo), Arc::new(user_repo));

        let model = usecase
            .subscribe_or_renew(
                user_id,
                SubscribeModel {
                    plan: "premium".to_string(),
                    ends_at,
                },
            )
            .await
            .expect("subscribe should succeed");

        assert_eq!(model.plan, "premium");
        assert!(model.is_currently_active);
    }

    #[tokio::test]
    async fn unknown_plan_is_rejected() {
        let usecase = SubscriptionUseCase::new(
            Arc::new(MockSubscriptionRepository::new()),
            Arc::new(MockUserRepository::new()),
        );

        let result = usecase
            .subscribe_or_renew(
                Uuid::new_v4(),
                SubscribeModel {
                    plan: "gold".to_string(),
                    ends_at: Utc::now() + Duration::days(30),
                },
            )
            .await;

        assert!(matches!(result, Err(SubscriptionError::InvalidPlan(_))));
    }

    #[tokio::test]
    async fn period_ending_in_the_past_is_rejected() {
        let usecase = SubscriptionUseCase::new(
            Arc::new(MockSubscriptionRepository::new()),
            Arc::new(MockUserRepository::new()),
        );

        let result = usecase
            .subscribe_or_renew(
                Uuid::new_v4(),
                SubscribeModel {
                    plan: "basic".to_string(),
                    ends_at: Utc::now() - Duration::days(1),
                },
            )
            .await;

        assert!(matches!(result, Err(SubscriptionError::InvalidPeriod(_))));
    }

    #[tokio::test]
    async fn expired_subscription_reads_as_not_currently_active() {
        let user_id = Uuid::new_v4();
        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo.expect_find_by_user().returning(move |id| {
            Ok(Some(stored(id, "basic", Utc::now() - Duration::days(1))))
        });

        let usecase = SubscriptionUseCase::new(
            Arc::new(subscription_repo),
            Arc::new(MockUserRepository::new()),
        );

        let model = usecase
            .current_subscription(user_id)
            .await
            .expect("lookup should succeed");

        assert!(model.is_active);
        assert!(!model.is_currently_active);
    }

    #[tokio::test]
    async fn missing_subscription_is_not_found() {
        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo.expect_find_by_user().returning(|_| Ok(None));

        let usecase = SubscriptionUseCase::new(
            Arc::new(subscription_repo),
            Arc::new(MockUserRepository::new()),
        );

        let result = usecase.current_subscription(Uuid::new_v4()).await;
        assert!(matches!(result, Err(SubscriptionError::NotFound)));
    }
}
