use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::{
    categories::{CategoryEntity, SubcategoryEntity},
    posts::{InsertPostEntity, PostEntity, UpdatePostEntity},
};

#[automock]
#[async_trait]
pub trait PostRepository {
    async fn insert(&self, insert_post_entity: InsertPostEntity) -> Result<i64>;
    async fn find_by_id(&self, post_id: i64) -> Result<Option<PostEntity>>;
    async fn update(&self, post_id: i64, changes: UpdatePostEntity) -> Result<()>;
    async fn delete(&self, post_id: i64) -> Result<()>;
    async fn set_published(&self, post_id: i64, published: bool) -> Result<()>;
    async fn list_published(&self, limit: i64, offset: i64) -> Result<Vec<PostEntity>>;
    async fn list_by_paid_flag(&self, is_paid: bool) -> Result<Vec<PostEntity>>;
    async fn list_by_category(&self, category_id: i64) -> Result<Vec<PostEntity>>;
    async fn list_categories(&self) -> Result<Vec<CategoryEntity>>;
    async fn list_subcategories(&self, category_id: i64) -> Result<Vec<SubcategoryEntity>>;
}
