use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::posts;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = posts)]
pub struct PostEntity {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category_id: i64,
    pub subcategory_id: Option<i64>,
    pub owner_id: Uuid,
    pub is_published: bool,
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = posts)]
pub struct InsertPostEntity {
    pub title: String,
    pub content: String,
    pub category_id: i64,
    pub subcategory_id: Option<i64>,
    pub owner_id: Uuid,
    pub is_paid: bool,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = posts)]
pub struct UpdatePostEntity {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category_id: Option<i64>,
    pub subcategory_id: Option<Option<i64>>,
    pub is_paid: Option<bool>,
    pub updated_at: DateTime<Utc>,
}
