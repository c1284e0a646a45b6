use diesel::prelude::*;

use crate::infrastructure::postgres::schema::{categories, subcategories};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = categories)]
pub struct CategoryEntity {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = subcategories)]
pub struct SubcategoryEntity {
    pub id: i64,
    pub name: String,
    pub category_id: i64,
}
