use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*};
use uuid::Uuid;

use crate::{
    domain::{
        entities::subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
        repositories::subscriptions::SubscriptionRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::subscriptions},
};

pub struct SubscriptionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SubscriptionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionPostgres {
    async fn upsert(
        &self,
        insert_subscription_entity: InsertSubscriptionEntity,
    ) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // user_id carries a unique index, so renewal overwrites in place.
        let subscription_id = insert_into(subscriptions::table)
            .values(&insert_subscription_entity)
            .on_conflict(subscriptions::user_id)
            .do_update()
            .set((
                subscriptions::plan.eq(&insert_subscription_entity.plan),
                subscriptions::ends_at.eq(insert_subscription_entity.ends_at),
                subscriptions::is_active.eq(true),
            ))
            .returning(subscriptions::id)
            .get_result::<i64>(&mut conn)?;

        Ok(subscription_id)
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = subscriptions::table
            .filter(subscriptions::user_id.eq(user_id))
            .select(SubscriptionEntity::as_select())
            .first::<SubscriptionEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }
}
