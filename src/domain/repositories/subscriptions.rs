use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::subscriptions::{InsertSubscriptionEntity, SubscriptionEntity};

#[automock]
#[async_trait]
pub trait SubscriptionRepository {
    /// Replace-semantics upsert keyed on user_id: a user has exactly one
    /// subscription row, which renewal overwrites.
    async fn upsert(&self, insert_subscription_entity: InsertSubscriptionEntity) -> Result<i64>;
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<SubscriptionEntity>>;
}
