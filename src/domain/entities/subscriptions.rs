use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::subscriptions;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = subscriptions)]
pub struct SubscriptionEntity {
    pub id: i64,
    pub user_id: Uuid,
    pub plan: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub is_active: bool,
}

impl SubscriptionEntity {
    /// A subscription counts as active only while the flag is set and the
    /// end date has not been reached. The comparison is strict: at exactly
    /// `ends_at` the subscription is already inactive.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && now < self.ends_at
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = subscriptions)]
pub struct InsertSubscriptionEntity {
    pub user_id: Uuid,
    pub plan: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn subscription(is_active: bool, ends_at: DateTime<Utc>) -> SubscriptionEntity {
        SubscriptionEntity {
            id: 1,
            user_id: Uuid::new_v4(),
            plan: "basic".to_string(),
            starts_at: Utc::now() - Duration::days(1),
            ends_at,
            is_active,
        }
    }

    #[test]
    fn active_flag_and_future_end_date_is_active() {
        let now = Utc::now();
        let sub = subscription(true, now + Duration::days(30));
        assert!(sub.is_active_at(now));
    }

    #[test]
    fn end_date_boundary_is_inactive() {
        let now = Utc::now();
        let sub = subscription(true, now);
        assert!(!sub.is_active_at(now));
    }

    #[test]
    fn cleared_flag_overrides_future_end_date() {
        let now = Utc::now();
        let sub = subscription(false, now + Duration::days(30));
        assert!(!sub.is_active_at(now));
    }

    #[test]
    fn past_end_date_is_inactive() {
        let now = Utc::now();
        let sub = subscription(true, now - Duration::seconds(1));
        assert!(!sub.is_active_at(now));
    }
}
