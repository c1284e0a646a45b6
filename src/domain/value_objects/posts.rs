use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{
    categories::{CategoryEntity, SubcategoryEntity},
    posts::{InsertPostEntity, PostEntity, UpdatePostEntity},
};

#[derive(Debug, Clone, Deserialize)]
pub struct InsertPostModel {
    pub title: String,
    pub content: String,
    pub category_id: i64,
    pub subcategory_id: Option<i64>,
    #[serde(default)]
    pub is_paid: bool,
}

impl InsertPostModel {
    pub fn to_entity(&self, owner_id: Uuid) -> InsertPostEntity {
        InsertPostEntity {
            title: self.title.clone(),
            content: self.content.clone(),
            category_id: self.category_id,
            subcategory_id: self.subcategory_id,
            owner_id,
            is_paid: self.is_paid,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePostModel {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category_id: Option<i64>,
    pub subcategory_id: Option<Option<i64>>,
    pub is_paid: Option<bool>,
}

impl UpdatePostModel {
    pub fn to_entity(&self) -> UpdatePostEntity {
        UpdatePostEntity {
            title: self.title.clone(),
            content: self.content.clone(),
            category_id: self.category_id,
            subcategory_id: self.subcategory_id,
            is_paid: self.is_paid,
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostModel {
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

impl From<PostEntity> for PostModel {
    fn from(entity: PostEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            content: entity.content,
            category_id: entity.category_id,
            subcategory_id: entity.subcategory_id,
            owner_id: entity.owner_id,
            is_published: entity.is_published,
            is_paid: entity.is_paid,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryModel {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub subcategories: Vec<SubcategoryModel>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubcategoryModel {
    pub id: i64,
    pub name: String,
}

impl CategoryModel {
    pub fn from_entities(
        category: CategoryEntity,
        subcategories: Vec<SubcategoryEntity>,
    ) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
            subcategories: subcategories
                .into_iter()
                .map(|sub| SubcategoryModel {
                    id: sub.id,
                    name: sub.name,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

pub const DEFAULT_PAGE_SIZE: i64 = 5;
pub const MAX_PAGE_SIZE: i64 = 100;

impl Pagination {
    pub fn limit_offset(&self) -> (i64, i64) {
        let page_size = self
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let page = self.page.unwrap_or(1).max(1);
        (page_size, (page - 1) * page_size)
    }
}
