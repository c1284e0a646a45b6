use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::payments;

/// One row per transaction. Rows are an audit record: they are inserted in
/// `pending` status, move to a terminal status at most once, and are never
/// deleted. `provider_txn_id` carries a unique index so a duplicate
/// provider transaction can never create a second row.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = payments)]
pub struct PaymentEntity {
    pub id: i64,
    pub user_id: Uuid,
    pub post_id: Option<i64>,
    pub amount_minor: i32,
    pub method: String,
    pub is_subscription: bool,
    pub provider_txn_id: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payments)]
pub struct InsertPaymentEntity {
    pub user_id: Uuid,
    pub post_id: Option<i64>,
    pub amount_minor: i32,
    pub method: String,
    pub is_subscription: bool,
    pub provider_txn_id: String,
    pub status: String,
}
