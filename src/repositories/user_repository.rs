use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{is_duplicate_key_error, Database},
    errors::{AppError, AppResult},
    models::domain::{Role, User},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: User) -> AppResult<User>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>>;
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;
    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<User>>;
    /// Registered accounts with `role`, by username.
    async fn find_by_role(&self, role: Role) -> AppResult<Vec<User>>;
    /// Writes `score` only if the stored best score is absent or lower.
    /// Returns whether a write happened.
    async fn set_best_score_if_higher(&self, username: &str, score: i32) -> AppResult<bool>;
    async fn top_best_scores(&self, limit: i64) -> AppResult<Vec<User>>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("users");
        Self { collection }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        match self.collection.insert_one(&user).await {
            Ok(_) => Ok(user),
            Err(err) if is_duplicate_key_error(&err) => Err(AppError::AlreadyExists(format!(
                "User with username '{}' already exists",
                user.username
            ))),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let user = self.collection.find_one(doc! { "id": id }).await?;
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = self
            .collection
            .find_one(doc! { "username": username })
            .await?;
        Ok(user)
    }

    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = self
            .collection
            .find(doc! { "id": { "$in": ids.to_vec() } })
            .await?
            .try_collect()
            .await?;
        Ok(users)
    }

    async fn find_by_role(&self, role: Role) -> AppResult<Vec<User>> {
        let users = self
            .collection
            .find(doc! {
                "role": role.to_string(),
                "password_hash": { "$ne": null }
            })
            .sort(doc! { "username": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(users)
    }

    async fn set_best_score_if_higher(&self, username: &str, score: i32) -> AppResult<bool> {
        let filter = doc! {
            "username": username,
            "$or": [
                { "best_score": null },
                { "best_score": { "$lt": score } }
            ]
        };

        let result = self
            .collection
            .update_one(filter, doc! { "$set": { "best_score": score } })
            .await?;

        Ok(result.modified_count > 0)
    }

    async fn top_best_scores(&self, limit: i64) -> AppResult<Vec<User>> {
        let users = self
            .collection
            .find(doc! { "best_score": { "$ne": null } })
            .sort(doc! { "best_score": -1, "created_at": 1 })
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(users)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for users collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let username_index = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("username_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(username_index).await?;

        log::info!("Successfully created indexes for users collection");
        Ok(())
    }
}
