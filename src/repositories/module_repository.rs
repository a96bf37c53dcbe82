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
    models::domain::Module,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModuleRepository: Send + Sync {
    async fn create(&self, module: Module) -> AppResult<Module>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Module>>;
    async fn find_by_teacher(&self, teacher_id: &str) -> AppResult<Vec<Module>>;
    async fn find_by_student(&self, student_id: &str) -> AppResult<Vec<Module>>;
    async fn update_details(&self, id: &str, title: &str, terms: &str) -> AppResult<Module>;
    /// Set-add: ids already present are left alone and never duplicated.
    async fn add_students(&self, id: &str, student_ids: &[String]) -> AppResult<Module>;
    async fn delete(&self, id: &str) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoModuleRepository {
    collection: Collection<Module>,
}

impl MongoModuleRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("modules");
        Self { collection }
    }
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Module with id '{}' not found", id))
}

#[async_trait]
impl ModuleRepository for MongoModuleRepository {
    async fn create(&self, module: Module) -> AppResult<Module> {
        self.collection.insert_one(&module).await?;
        Ok(module)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Module>> {
        let module = self.collection.find_one(doc! { "id": id }).await?;
        Ok(module)
    }

    async fn find_by_teacher(&self, teacher_id: &str) -> AppResult<Vec<Module>> {
        let modules = self
            .collection
            .find(doc! { "teacher_id": teacher_id })
            .sort(doc! { "created_at": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(modules)
    }

    async fn find_by_student(&self, student_id: &str) -> AppResult<Vec<Module>> {
        let modules = self
            .collection
            .find(doc! { "student_ids": student_id })
            .sort(doc! { "created_at": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(modules)
    }

    async fn update_details(&self, id: &str, title: &str, terms: &str) -> AppResult<Module> {
        let modified_at = bson::to_bson(&Utc::now())?;
        self.collection
            .find_one_and_update(
                doc! { "id": id },
                doc! { "$set": { "title": title, "terms": terms, "modified_at": modified_at } },
            )
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| not_found(id))
    }

    async fn add_students(&self, id: &str, student_ids: &[String]) -> AppResult<Module> {
        self.collection
            .find_one_and_update(
                doc! { "id": id },
                doc! { "$addToSet": { "student_ids": { "$each": student_ids.to_vec() } } },
            )
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| not_found(id))
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(not_found(id));
        }

        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for modules collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let teacher_index = IndexModel::builder()
            .keys(doc! { "teacher_id": 1 })
            .options(IndexOptions::builder().name("teacher_id".to_string()).build())
            .build();

        let students_index = IndexModel::builder()
            .keys(doc! { "student_ids": 1 })
            .options(IndexOptions::builder().name("student_ids".to_string()).build())
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(teacher_index).await?;
        self.collection.create_index(students_index).await?;

        log::info!("Successfully created indexes for modules collection");
        Ok(())
    }
}
