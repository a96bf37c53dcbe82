use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::QuizResult};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizResultRepository: Send + Sync {
    async fn create(&self, result: QuizResult) -> AppResult<QuizResult>;
    async fn find_by_quizzes(&self, quiz_ids: &[String]) -> AppResult<Vec<QuizResult>>;
    async fn find_by_student(&self, student_id: &str) -> AppResult<Vec<QuizResult>>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoQuizResultRepository {
    collection: Collection<QuizResult>,
}

impl MongoQuizResultRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("quiz_results");
        Self { collection }
    }
}

#[async_trait]
impl QuizResultRepository for MongoQuizResultRepository {
    async fn create(&self, result: QuizResult) -> AppResult<QuizResult> {
        self.collection.insert_one(&result).await?;
        Ok(result)
    }

    async fn find_by_quizzes(&self, quiz_ids: &[String]) -> AppResult<Vec<QuizResult>> {
        if quiz_ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = self
            .collection
            .find(doc! { "quiz_id": { "$in": quiz_ids.to_vec() } })
            .sort(doc! { "submitted_at": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(results)
    }

    async fn find_by_student(&self, student_id: &str) -> AppResult<Vec<QuizResult>> {
        let results = self
            .collection
            .find(doc! { "student_id": student_id })
            .sort(doc! { "submitted_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(results)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quiz_results collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let quiz_index = IndexModel::builder()
            .keys(doc! { "quiz_id": 1 })
            .options(IndexOptions::builder().name("quiz_id".to_string()).build())
            .build();

        let student_index = IndexModel::builder()
            .keys(doc! { "student_id": 1 })
            .options(IndexOptions::builder().name("student_id".to_string()).build())
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(quiz_index).await?;
        self.collection.create_index(student_index).await?;

        log::info!("Successfully created indexes for quiz_results collection");
        Ok(())
    }
}
