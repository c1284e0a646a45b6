use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::payments::PaymentEntity,
    value_objects::enums::{payment_methods::PaymentMethod, payment_statuses::PaymentStatus},
};

/// Purchase intent accepted by the checkout endpoint. Exactly one of
/// `subscription_tier` and `post_id` must be set.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutModel {
    pub amount: Option<i32>,
    pub subscription_tier: Option<String>,
    pub post_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResponseModel {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManualPaymentModel {
    pub amount: i32,
    pub method: PaymentMethod,
    pub post_id: Option<i64>,
    pub reference: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentListFilter {
    pub post_id: Option<i64>,
    pub method: Option<PaymentMethod>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentModel {
    pub id: i64,
    pub user_id: Uuid,
    pub post_id: Option<i64>,
    pub amount_minor: i32,
    pub method: String,
    pub is_subscription: bool,
    pub provider_txn_id: String,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl From<PaymentEntity> for PaymentModel {
    fn from(entity: PaymentEntity) -> Self {
        let status = PaymentStatus::from_str(&entity.status).unwrap_or_default();
        Self {
            id: entity.id,
            user_id: entity.user_id,
            post_id: entity.post_id,
            amount_minor: entity.amount_minor,
            method: entity.method,
            is_subscription: entity.is_subscription,
            provider_txn_id: entity.provider_txn_id,
            status,
            created_at: entity.created_at,
        }
    }
}
