use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    repositories::posts::PostRepository,
    value_objects::posts::{
        CategoryModel, InsertPostModel, Pagination, PostModel, SubcategoryModel, UpdatePostModel,
    },
};

/// Words that are rejected in post titles and bodies. Checked
/// case-insensitively on create and update.
const FORBIDDEN_WORDS: &[&str] = &["casino", "jackpot", "lottery", "viagra"];

#[derive(Debug, Error)]
pub enum PostError {
    #[error("invalid {field}: {message}")]
    Validation { field: &'static str, message: String },
    #[error("post not found")]
    NotFound,
    #[error("not allowed")]
    Forbidden,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PostError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            PostError::Validation { .. } => StatusCode::BAD_REQUEST,
            PostError::NotFound => StatusCode::NOT_FOUND,
            PostError::Forbidden => StatusCode::FORBIDDEN,
            PostError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn check_forbidden(field: &'static str, text: &str) -> Result<(), PostError> {
    let lowered = text.to_lowercase();
    for word in FORBIDDEN_WORDS {
        if lowered.contains(word) {
            return Err(PostError::Validation {
                field,
                message: format!("contains a forbidden word: {word}"),
            });
        }
    }
    Ok(())
}

pub struct PostUseCase<Post>
where
    Post: PostRepository + Send + Sync + 'static,
{
    post_repo: Arc<Post>,
}

impl<Post> PostUseCase<Post>
where
    Post: PostRepository + Send + Sync + 'static,
{
    pub fn new(post_repo: Arc<Post>) -> Self {
        Self { post_repo }
    }

    pub async fn list_published(&self, pagination: Pagination) -> Result<Vec<PostModel>, PostError> {
        let (limit, offset) = pagination.limit_offset();
        let posts = self
            .post_repo
            .list_published(limit, offset)
            .await
            .map_err(PostError::Internal)?;
        Ok(posts.into_iter().map(PostModel::from).collect())
    }

    pub async fn list_by_paid_flag(&self, is_paid: bool) -> Result<Vec<PostModel>, PostError> {
        let posts = self
            .post_repo
            .list_by_paid_flag(is_paid)
            .await
            .map_err(PostError::Internal)?;
        Ok(posts.into_iter().map(PostModel::from).collect())
    }

    pub async fn list_by_category(&self, category_id: i64) -> Result<Vec<PostModel>, PostError> {
        let posts = self
            .post_repo
            .list_by_category(category_id)
            .await
            .map_err(PostError::Internal)?;
        Ok(posts.into_iter().map(PostModel::from).collect())
    }

    pub async fn view_post(&self, post_id: i64) -> Result<PostModel, PostError> {
        let post = self
            .post_repo
            .find_by_id(post_id)
            .await
            .map_err(PostError::Internal)?
            .ok_or(PostError::NotFound)?;
        Ok(PostModel::from(post))
    }

    /// Creates an unpublished post owned by the caller. Title and body are
    /// screened against the forbidden-word list.
    pub async fn create_post(
        &self,
        owner_id: Uuid,
        model: InsertPostModel,
    ) -> Result<i64, PostError> {
        check_forbidden("title", &model.title).inspect_err(|err| {
            warn!(%owner_id, error = %err, "posts: rejected title");
        })?;
        check_forbidden("content", &model.content).inspect_err(|err| {
            warn!(%owner_id, error = %err, "posts: rejected content");
        })?;

        let post_id = self
            .post_repo
            .insert(model.to_entity(owner_id))
            .await
            .map_err(|err| {
                error!(%owner_id, db_error = ?err, "posts: insert failed");
                PostError::Internal(err)
            })?;

        info!(%owner_id, post_id, "posts: created");
        Ok(post_id)
    }

    /// Owner or moderator only. Changed title/body go through the same
    /// forbidden-word screen as on create.
    pub async fn update_post(
        &self,
        actor_id: Uuid,
        is_moderator: bool,
        post_id: i64,
        model: UpdatePostModel,
    ) -> Result<(), PostError> {
        let post = self
            .post_repo
            .find_by_id(post_id)
            .await
            .map_err(PostError::Internal)?
            .ok_or(PostError::NotFound)?;

        if post.owner_id != actor_id && !is_moderator {
            warn!(%actor_id, post_id, "posts: update denied");
            return Err(PostError::Forbidden);
        }

        if let Some(title) = &model.title {
            check_forbidden("title", title)?;
        }
        if let Some(content) = &model.content {
            check_forbidden("content", content)?;
        }

        self.post_repo
            .update(post_id, model.to_entity())
            .await
            .map_err(|err| {
                error!(%actor_id, post_id, db_error = ?err, "posts: update failed");
                PostError::Internal(err)
            })?;

        info!(%actor_id, post_id, "posts: updated");
        Ok(())
    }

    /// Publishing is reserved to the owner; unpublishing is open to the
    /// owner or a moderator.
    pub async fn set_published(
        &self,
        actor_id: Uuid,
        is_moderator: bool,
        post_id: i64,
        published: bool,
    ) -> Result<(), PostError> {
        let post = self
            .post_repo
            .find_by_id(post_id)
            .await
            .map_err(PostError::Internal)?
            .ok_or(PostError::NotFound)?;

        let allowed = if published {
            post.owner_id == actor_id
        } else {
            post.owner_id == actor_id || is_moderator
        };
        if !allowed {
            warn!(%actor_id, post_id, published, "posts: publish toggle denied");
            return Err(PostError::Forbidden);
        }

        self.post_repo
            .set_published(post_id, published)
            .await
            .map_err(|err| {
                error!(%actor_id, post_id, db_error = ?err, "posts: publish toggle failed");
                PostError::Internal(err)
            })?;

        info!(%actor_id, post_id, published, "posts: publish state changed");
        Ok(())
    }

    pub async fn delete_post(
        &self,
        actor_id: Uuid,
        is_moderator: bool,
        post_id: i64,
    ) -> Result<(), PostError> {
        if !is_moderator {
            warn!(%actor_id, post_id, "posts: delete denied");
            return Err(PostError::Forbidden);
        }

        self.post_repo
            .find_by_id(post_id)
            .await
            .map_err(PostError::Internal)?
            .ok_or(PostError::NotFound)?;

        self.post_repo.delete(post_id).await.map_err(|err| {
            error!(%actor_id, post_id, db_error = ?err, "posts: delete failed");
            PostError::Internal(err)
        })?;

        info!(%actor_id, post_id, "posts: deleted");
        Ok(())
    }

    pub async fn list_categories(&self) -> Result<Vec<CategoryModel>, PostError> {
        let categories = self
            .post_repo
            .list_categories()
            .await
            .map_err(PostError::Internal)?;

        let mut models = Vec::with_capacity(categories.len());
        for category in categories {
            let subcategories = self
                .post_repo
                .list_subcategories(category.id)
                .await
                .map_err(PostError::Internal)?;
            models.push(CategoryModel::from_entities(category, subcategories));
        }
        Ok(models)
    }

    pub async fn list_subcategories(
        &self,
        category_id: i64,
    ) -> Result<Vec<SubcategoryModel>, PostError> {
        let subcategories = self
            .post_repo
            .list_subcategories(category_id)
            .await
            .map_err(PostError::Internal)?;
        Ok(subcategories
            .into_iter()
            .map(|sub| SubcategoryModel {
                id: sub.id,
                name: sub.name,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::{
            categories::{CategoryEntity, SubcategoryEntity},
            posts::PostEntity,
        },
        repositories::posts::MockPostRepository,
    };
    use chrono::Utc;

    fn post(id: i64, owner_id: Uuid) -> PostEntity {
        PostEntity {
            id,
            title: "Intro to algebra".to_string(),
            content: "Lesson body".to_string(),
            category_id: 1,
            subcategory_id: None,
            owner_id,
            is_published: true,
            is_paid: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn insert_model(title: &str, content: &str) -> InsertPostModel {
        InsertPostModel {
            title: title.to_string(),
            content: content.to_string(),
            category_id: 1,
            subcategory_id: None,
            is_paid: false,
        }
    }

    #[tokio::test]
    async fn creating_a_clean_post_succeeds() {
        let owner_id = Uuid::new_v4();
        let mut post_repo = MockPostRepository::new();
        post_repo
            .expect_insert()
            .withf(move |entity| entity.owner_id == owner_id && entity.title == "Intro to algebra")
            .returning(|_| Ok(10));

        let usecase = PostUseCase::new(Arc::new(post_repo));
        let post_id = usecase
            .create_post(owner_id, insert_model("Intro to algebra", "Lesson body"))
            .await
            .expect("create should succeed");
        assert_eq!(post_id, 10);
    }

    #[tokio::test]
    async fn forbidden_word_in_title_is_rejected_with_the_field() {
        let usecase = PostUseCase::new(Arc::new(MockPostRepository::new()));
        let result = usecase
            .create_post(Uuid::new_v4(), insert_model("Win the Lottery now", "body"))
            .await;

        match result {
            Err(PostError::Validation { field, .. }) => assert_eq!(field, "title"),
            other => panic!("expected a title validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn forbidden_word_in_content_is_rejected_with_the_field() {
        let usecase = PostUseCase::new(Arc::new(MockPostRepository::new()));
        let result = usecase
            .create_post(
                Uuid::new_v4(),
                insert_model("Clean title", "visit our CASINO tonight"),
            )
            .await;

        match result {
            Err(PostError::Validation { field, .. }) => assert_eq!(field, "content"),
            other => panic!("expected a content validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_owner_cannot_update_a_post() {
        let owner_id = Uuid::new_v4();
        let mut post_repo = MockPostRepository::new();
        post_repo
            .expect_find_by_id()
            .returning(move |id| Ok(Some(post(id, owner_id))));

        let usecase = PostUseCase::new(Arc::new(post_repo));
        let result = usecase
            .update_post(
                Uuid::new_v4(),
                false,
                1,
                UpdatePostModel {
                    title: Some("New title".to_string()),
                    content: None,
                    category_id: None,
                    subcategory_id: None,
                    is_paid: None,
                },
            )
            .await;

        assert!(matches!(result, Err(PostError::Forbidden)));
    }

    #[tokio::test]
    async fn moderator_can_update_someone_elses_post() {
        let owner_id = Uuid::new_v4();
        let mut post_repo = MockPostRepository::new();
        post_repo
            .expect_find_by_id()
            .returning(move |id| Ok(Some(post(id, owner_id))));
        post_repo.expect_update().times(1).returning(|_, _| Ok(()));

        let usecase = PostUseCase::new(Arc::new(post_repo));
        usecase
            .update_post(
                Uuid::new_v4(),
                true,
                1,
                UpdatePostModel {
                    title: None,
                    content: Some("Edited".to_string()),
                    category_id: None,
                    subcategory_id: None,
                    is_paid: None,
                },
            )
            .await
            .expect("moderator update should succeed");
    }

    #[tokio::test]
    async fn only_the_owner_can_publish() {
        let owner_id = Uuid::new_v4();
        let mut post_repo = MockPostRepository::new();
        post_repo
            .expect_find_by_id()
            .returning(move |id| Ok(Some(post(id, owner_id))));

        let usecase = PostUseCase::new(Arc::new(post_repo));

        // moderator role does not cover publishing someone else's draft
        let result = usecase.set_published(Uuid::new_v4(), true, 1, true).await;
        assert!(matches!(result, Err(PostError::Forbidden)));
    }

    #[tokio::test]
    async fn moderator_can_unpublish_someone_elses_post() {
        let owner_id = Uuid::new_v4();
        let mut post_repo = MockPostRepository::new();
        post_repo
            .expect_find_by_id()
            .returning(move |id| Ok(Some(post(id, owner_id))));
        post_repo
            .expect_set_published()
            .withf(|post_id, published| *post_id == 1 && !published)
            .times(1)
            .returning(|_, _| Ok(()));

        let usecase = PostUseCase::new(Arc::new(post_repo));
        usecase
            .set_published(Uuid::new_v4(), true, 1, false)
            .await
            .expect("moderator unpublish should succeed");
    }

    #[tokio::test]
    async fn delete_requires_the_moderator_role() {
        let usecase = PostUseCase::new(Arc::new(MockPostRepository::new()));
        let result = usecase.delete_post(Uuid::new_v4(), false, 1).await;
        assert!(matches!(result, Err(PostError::Forbidden)));
    }

    #[tokio::test]
    async fn deleting_a_missing_post_is_not_found() {
        let mut post_repo = MockPostRepository::new();
        post_repo.expect_find_by_id().returning(|_| Ok(None));

        let usecase = PostUseCase::new(Arc::new(post_repo));
        let result = usecase.delete_post(Uuid::new_v4(), true, 99).await;
        assert!(matches!(result, Err(PostError::NotFound)));
    }

    #[tokio::test]
    async fn categories_are_listed_with_their_subcategories() {
        let mut post_repo = MockPostRepository::new();
        post_repo.expect_list_categories().returning(|| {
            Ok(vec![CategoryEntity {
                id: 1,
                name: "Mathematics".to_string(),
                description: None,
            }])
        });
        post_repo.expect_list_subcategories().returning(|category_id| {
            Ok(vec![SubcategoryEntity {
                id: 11,
                name: "Algebra".to_string(),
                category_id,
            }])
        });

        let usecase = PostUseCase::new(Arc::new(post_repo));
        let categories = usecase
            .list_categories()
            .await
            .expect("listing should succeed");

        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].subcategories.len(), 1);
        assert_eq!(categories[0].subcategories[0].name, "Algebra");
    }
}
