use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::users::UserEntity;

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUserModel {
    pub phone_number: String,
    pub email: String,
    pub password: String,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginModel {
    pub phone_number: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenResponseModel {
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserModel {
    pub id: Uuid,
    pub phone_number: String,
    pub email: String,
    pub country: Option<String>,
    pub is_blocked: bool,
    pub has_paid_subscription: bool,
    pub created_at: DateTime<Utc>,
}

impl From<UserEntity> for UserModel {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            phone_number: entity.phone_number,
            email: entity.email,
            country: entity.country,
            is_blocked: entity.is_blocked,
            has_paid_subscription: entity.has_paid_subscription,
            created_at: entity.created_at,
        }
    }
}
