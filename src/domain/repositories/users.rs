use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::users::{InsertUserEntity, UserEntity};

#[automock]
#[async_trait]
pub trait UserRepository {
    async fn create(&self, insert_user_entity: InsertUserEntity) -> Result<Uuid>;
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserEntity>>;
    async fn find_by_phone_number(&self, phone_number: &str) -> Result<Option<UserEntity>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>>;
    /// Everyone except moderators, for the moderator user list.
    async fn list_regular(&self) -> Result<Vec<UserEntity>>;
    async fn set_blocked(&self, user_id: Uuid, blocked: bool) -> Result<()>;
    async fn set_paid_subscription(&self, user_id: Uuid, value: bool) -> Result<()>;
    async fn touch_last_login(&self, user_id: Uuid) -> Result<()>;
    /// Blocks users whose last login is older than the cutoff and returns
    /// the affected ids. Safe to re-run; already-blocked users are skipped.
    async fn block_logins_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<Uuid>>;
}
