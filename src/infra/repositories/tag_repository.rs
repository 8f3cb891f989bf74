//! Tag repository.
//!
//! Tags are unique by name; `get_or_create` leans on the unique index so two
//! callers racing on the same name end up with the same row.

use async_trait::async_trait;
use sea_orm::{
    sea_query::OnConflict, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use super::base::Executor;
use super::entities::tag::{self, ActiveModel, Entity as TagEntity};
use crate::domain::Tag;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Tag repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Find tag by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Tag>>;

    /// Find tag by exact name
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Tag>>;

    /// Return the tag with this name, inserting it first if needed
    async fn get_or_create(&self, name: &str) -> AppResult<Tag>;
}

/// SeaORM-backed tag repository.
pub struct TagStore<E = DatabaseConnection> {
    db: E,
}

impl<E: Executor> TagStore<E> {
    /// Create new repository instance
    pub fn new(db: E) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<E: Executor> TagRepository for TagStore<E> {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Tag>> {
        let result = TagEntity::find_by_id(id)
            .one(self.db.connection())
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Tag::from))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Tag>> {
        let result = TagEntity::find()
            .filter(tag::Column::Name.eq(name))
            .one(self.db.connection())
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Tag::from))
    }

    async fn get_or_create(&self, name: &str) -> AppResult<Tag> {
        if let Some(existing) = self.find_by_name(name).await? {
            return Ok(existing);
        }

        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            created_at: Set(chrono::Utc::now()),
        };

        TagEntity::insert(active_model)
            .on_conflict(OnConflict::column(tag::Column::Name).do_nothing().to_owned())
            .exec_without_returning(self.db.connection())
            .await
            .map_err(AppError::from)?;

        self.find_by_name(name)
            .await?
            .ok_or_else(|| AppError::internal(format!("tag '{}' missing after insert", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn tag(name: &str) -> tag::Model {
        tag::Model {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_existing_tag_is_returned_without_insert() {
        let existing = tag("ballad");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![existing.clone()]])
            .into_connection();

        let found = TagStore::new(db).get_or_create("ballad").await.unwrap();

        assert_eq!(found.id, existing.id);
    }

    #[tokio::test]
    async fn test_conflicting_insert_reads_back_winner() {
        let winner = tag("ballad");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::new(), vec![winner.clone()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let found = TagStore::new(db).get_or_create("ballad").await.unwrap();

        assert_eq!(found.id, winner.id);
    }
}
