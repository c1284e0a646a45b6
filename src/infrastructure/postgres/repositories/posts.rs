use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, delete, insert_into, prelude::*, update};

use crate::{
    domain::{
        entities::{
            categories::{CategoryEntity, SubcategoryEntity},
            posts::{InsertPostEntity, PostEntity, UpdatePostEntity},
        },
        repositories::posts::PostRepository,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{categories, posts, subcategories},
    },
};

pub struct PostPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PostPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PostRepository for PostPostgres {
    async fn insert(&self, insert_post_entity: InsertPostEntity) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let post_id = insert_into(posts::table)
            .values(&insert_post_entity)
            .returning(posts::id)
            .get_result::<i64>(&mut conn)?;

        Ok(post_id)
    }

    async fn find_by_id(&self, post_id: i64) -> Result<Option<PostEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = posts::table
            .find(post_id)
            .select(PostEntity::as_select())
            .first::<PostEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn update(&self, post_id: i64, changes: UpdatePostEntity) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(posts::table)
            .filter(posts::id.eq(post_id))
            .set(&changes)
            .execute(&mut conn)?;

        Ok(())
    }

    async fn delete(&self, post_id: i64) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        delete(posts::table)
            .filter(posts::id.eq(post_id))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn set_published(&self, post_id: i64, published: bool) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(posts::table)
            .filter(posts::id.eq(post_id))
            .set(posts::is_published.eq(published))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn list_published(&self, limit: i64, offset: i64) -> Result<Vec<PostEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = posts::table
            .filter(posts::is_published.eq(true))
            .order(posts::created_at.desc())
            .limit(limit)
            .offset(offset)
            .select(PostEntity::as_select())
            .load::<PostEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_by_paid_flag(&self, is_paid: bool) -> Result<Vec<PostEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = posts::table
            .filter(posts::is_paid.eq(is_paid))
            .order(posts::created_at.desc())
            .select(PostEntity::as_select())
            .load::<PostEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_by_category(&self, category_id: i64) -> Result<Vec<PostEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = posts::table
            .filter(posts::category_id.eq(category_id))
            .order(posts::created_at.desc())
            .select(PostEntity::as_select())
            .load::<PostEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_categories(&self) -> Result<Vec<CategoryEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = categories::table
            .order(categories::name.asc())
            .select(CategoryEntity::as_select())
            .load::<CategoryEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_subcategories(&self, category_id: i64) -> Result<Vec<SubcategoryEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = subcategories::table
            .filter(subcategories::category_id.eq(category_id))
            .order(subcategories::name.asc())
            .select(SubcategoryEntity::as_select())
            .load::<SubcategoryEntity>(&mut conn)?;

        Ok(results)
    }
}
