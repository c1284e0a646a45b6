use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::users;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = users)]
pub struct UserEntity {
    pub id: Uuid,
    pub phone_number: String,
    pub email: String,
    pub password_hash: String,
    pub country: Option<String>,
    pub role: String,
    pub is_blocked: bool,
    pub has_paid_subscription: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct InsertUserEntity {
    pub phone_number: String,
    pub email: String,
    pub password_hash: String,
    pub country: Option<String>,
    pub role: String,
}
