use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;

use crate::domain::{
    entities::payments::{InsertPaymentEntity, PaymentEntity},
    value_objects::enums::{payment_methods::PaymentMethod, payment_statuses::PaymentStatus},
};

#[automock]
#[async_trait]
pub trait PaymentRepository {
    async fn create(&self, insert_payment_entity: InsertPaymentEntity) -> Result<i64>;
    async fn find_by_provider_txn_id(
        &self,
        provider_txn_id: &str,
    ) -> Result<Option<PaymentEntity>>;
    /// Guarded transition: writes the new status only while the row is
    /// still pending, and reports how many rows changed. Zero means the
    /// row had already reached a terminal status.
    async fn mark_status_if_pending(
        &self,
        provider_txn_id: &str,
        status: PaymentStatus,
    ) -> Result<usize>;
    async fn list(
        &self,
        post_id: Option<i64>,
        method: Option<PaymentMethod>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PaymentEntity>>;
    async fn list_pending_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<PaymentEntity>>;
}
