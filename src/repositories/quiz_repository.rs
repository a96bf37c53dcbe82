use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc},
    options::{IndexOptions, ReturnDocument},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::{Question, Quiz},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>>;
    /// Earliest created quiz, used as the global quiz in best-score mode.
    async fn find_first(&self) -> AppResult<Option<Quiz>>;
    /// Quizzes of a module, oldest first.
    async fn find_by_module(&self, module_id: &str) -> AppResult<Vec<Quiz>>;
    async fn add_question(&self, quiz_id: &str, question: Question) -> AppResult<Quiz>;
    async fn set_time_limit(&self, quiz_id: &str, time_limit: i32) -> AppResult<Quiz>;
    async fn delete_by_module(&self, module_id: &str) -> AppResult<u64>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoQuizRepository {
    collection: Collection<Quiz>,
}

impl MongoQuizRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("quizzes");
        Self { collection }
    }
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Quiz with id '{}' not found", id))
}

#[async_trait]
impl QuizRepository for MongoQuizRepository {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        self.collection.insert_one(&quiz).await?;
        Ok(quiz)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        let quiz = self.collection.find_one(doc! { "id": id }).await?;
        Ok(quiz)
    }

    async fn find_first(&self) -> AppResult<Option<Quiz>> {
        let quiz = self
            .collection
            .find_one(doc! {})
            .sort(doc! { "created_at": 1 })
            .await?;
        Ok(quiz)
    }

    async fn find_by_module(&self, module_id: &str) -> AppResult<Vec<Quiz>> {
        let quizzes = self
            .collection
            .find(doc! { "module_id": module_id })
            .sort(doc! { "created_at": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(quizzes)
    }

    async fn add_question(&self, quiz_id: &str, question: Question) -> AppResult<Quiz> {
        let question = bson::to_bson(&question)?;
        let modified_at = bson::to_bson(&Utc::now())?;

        self.collection
            .find_one_and_update(
                doc! { "id": quiz_id },
                doc! {
                    "$push": { "questions": question },
                    "$set": { "modified_at": modified_at }
                },
            )
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| not_found(quiz_id))
    }

    async fn set_time_limit(&self, quiz_id: &str, time_limit: i32) -> AppResult<Quiz> {
        let modified_at = bson::to_bson(&Utc::now())?;

        self.collection
            .find_one_and_update(
                doc! { "id": quiz_id },
                doc! { "$set": { "time_limit": time_limit, "modified_at": modified_at } },
            )
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| not_found(quiz_id))
    }

    async fn delete_by_module(&self, module_id: &str) -> AppResult<u64> {
        let result = self
            .collection
            .delete_many(doc! { "module_id": module_id })
            .await?;
        Ok(result.deleted_count)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quizzes collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let module_index = IndexModel::builder()
            .keys(doc! { "module_id": 1, "created_at": 1 })
            .options(IndexOptions::builder().name("module_created".to_string()).build())
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(module_index).await?;

        log::info!("Successfully created indexes for quizzes collection");
        Ok(())
    }
}
