use async_trait::async_trait;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::Request;
use crate::domain::{NewSong, Song};
use crate::errors::AppResult;
use crate::services::Services;

/// Create song request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateSong {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    #[schema(example = "Automatic")]
    pub title: String,
    pub album_id: Option<Uuid>,
    pub singer_id: Option<Uuid>,
}

#[async_trait]
impl Request for CreateSong {
    type Response = Song;

    async fn execute(self, services: &Services) -> AppResult<Song> {
        services
            .catalog
            .create_song(NewSong {
                title: self.title,
                album_id: self.album_id,
                singer_id: self.singer_id,
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{AppError, FieldError};
    use crate::requests::test_support;
    use crate::services::MockCatalogService;

    #[tokio::test]
    async fn test_empty_title_rejected() {
        let mut catalog = MockCatalogService::new();
        catalog.expect_create_song().never();
        let mediator = test_support::catalog_mediator(catalog);

        let result = mediator.send(CreateSong::default()).await;

        match result {
            Err(AppError::Validation(fields)) => assert_eq!(fields[0].field, "title"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_album_passes_through() {
        let mut catalog = MockCatalogService::new();
        catalog.expect_create_song().returning(|_| {
            Err(AppError::Validation(vec![FieldError::new(
                "albumId",
                "Album does not exist",
            )]))
        });
        let mediator = test_support::catalog_mediator(catalog);

        let result = mediator
            .send(CreateSong {
                title: "Automatic".into(),
                album_id: Some(Uuid::new_v4()),
                singer_id: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
