use async_trait::async_trait;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::Request;
use crate::domain::{Album, NewAlbum};
use crate::errors::AppResult;
use crate::services::Services;

/// Create album request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateAlbum {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    #[schema(example = "First Love")]
    pub title: String,
    pub singer_id: Option<Uuid>,
    #[validate(range(min = 1900, max = 2100, message = "Release year must be between 1900 and 2100"))]
    #[schema(example = 1999)]
    pub release_year: Option<i32>,
}

#[async_trait]
impl Request for CreateAlbum {
    type Response = Album;

    async fn execute(self, services: &Services) -> AppResult<Album> {
        services
            .catalog
            .create_album(NewAlbum {
                title: self.title,
                singer_id: self.singer_id,
                release_year: self.release_year,
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::requests::test_support;
    use crate::services::MockCatalogService;
    use chrono::Utc;

    #[tokio::test]
    async fn test_release_year_out_of_range() {
        let mut catalog = MockCatalogService::new();
        catalog.expect_create_album().never();
        let mediator = test_support::catalog_mediator(catalog);

        let result = mediator
            .send(CreateAlbum {
                title: "First Love".into(),
                singer_id: None,
                release_year: Some(1200),
            })
            .await;

        match result {
            Err(AppError::Validation(fields)) => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].field, "releaseYear");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delegates_to_catalog() {
        let singer_id = Uuid::new_v4();
        let mut catalog = MockCatalogService::new();
        catalog
            .expect_create_album()
            .withf(move |album| album.title == "First Love" && album.singer_id == Some(singer_id))
            .returning(|album| {
                let now = Utc::now();
                Ok(Album {
                    id: Uuid::new_v4(),
                    title: album.title,
                    singer_id: album.singer_id,
                    release_year: album.release_year,
                    created_at: now,
                    updated_at: now,
                })
            });
        let mediator = test_support::catalog_mediator(catalog);

        let album = mediator
            .send(CreateAlbum {
                title: "First Love".into(),
                singer_id: Some(singer_id),
                release_year: None,
            })
            .await
            .unwrap();

        assert_eq!(album.singer_id, Some(singer_id));
    }
}
