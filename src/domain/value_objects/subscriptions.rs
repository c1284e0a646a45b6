use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::subscriptions::SubscriptionEntity;

#[derive(Debug, Clone, Deserialize)]
pub struct SubscribeModel {
    pub plan: String,
    pub ends_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionModel {
    pub plan: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub is_active: bool,
    pub is_currently_active: bool,
}

impl SubscriptionModel {
    pub fn from_entity(entity: SubscriptionEntity, now: DateTime<Utc>) -> Self {
        let is_currently_active = entity.is_active_at(now);
        Self {
            plan: entity.plan,
            starts_at: entity.starts_at,
            ends_at: entity.ends_at,
            is_active: entity.is_active,
            is_currently_active,
        }
    }
}
