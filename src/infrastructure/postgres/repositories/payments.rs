use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{RunQueryDsl, insert_into, prelude::*, update};

use crate::{
    domain::{
        entities::payments::{InsertPaymentEntity, PaymentEntity},
        repositories::payments::PaymentRepository,
        value_objects::enums::{
            payment_methods::PaymentMethod, payment_statuses::PaymentStatus,
        },
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::payments},
};

pub struct PaymentPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PaymentPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PaymentRepository for PaymentPostgres {
    async fn create(&self, insert_payment_entity: InsertPaymentEntity) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // The unique index on provider_txn_id rejects duplicate provider
        // transactions here.
        let payment_id = insert_into(payments::table)
            .values(&insert_payment_entity)
            .returning(payments::id)
            .get_result::<i64>(&mut conn)?;

        Ok(payment_id)
    }

    async fn find_by_provider_txn_id(
        &self,
        provider_txn_id: &str,
    ) -> Result<Option<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = payments::table
            .filter(payments::provider_txn_id.eq(provider_txn_id))
            .select(PaymentEntity::as_select())
            .first::<PaymentEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn mark_status_if_pending(
        &self,
        provider_txn_id: &str,
        status: PaymentStatus,
    ) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = update(payments::table)
            .filter(payments::provider_txn_id.eq(provider_txn_id))
            .filter(payments::status.eq(PaymentStatus::Pending.to_string()))
            .set(payments::status.eq(status.to_string()))
            .execute(&mut conn)?;

        Ok(affected)
    }

    async fn list(
        &self,
        post_id: Option<i64>,
        method: Option<PaymentMethod>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = payments::table.into_boxed();
        if let Some(post_id) = post_id {
            query = query.filter(payments::post_id.eq(post_id));
        }
        if let Some(method) = method {
            query = query.filter(payments::method.eq(method.to_string()));
        }

        let results = query
            .order(payments::created_at.desc())
            .limit(limit)
            .offset(offset)
            .select(PaymentEntity::as_select())
            .load::<PaymentEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_pending_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = payments::table
            .filter(payments::status.eq(PaymentStatus::Pending.to_string()))
            .filter(payments::created_at.lt(cutoff))
            .select(PaymentEntity::as_select())
            .load::<PaymentEntity>(&mut conn)?;

        Ok(results)
    }
}
