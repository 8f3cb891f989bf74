use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::Request;
use crate::domain::{NewSinger, Singer};
use crate::errors::AppResult;
use crate::services::Services;

/// Create singer request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateSinger {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    #[schema(example = "Hikaru Utada")]
    pub name: String,
    #[validate(length(max = 200, message = "Nickname must be at most 200 characters"))]
    #[schema(example = "Hikki")]
    pub nickname: Option<String>,
    pub birthday: Option<NaiveDate>,
}

#[async_trait]
impl Request for CreateSinger {
    type Response = Singer;

    async fn execute(self, services: &Services) -> AppResult<Singer> {
        services
            .catalog
            .create_singer(NewSinger {
                name: self.name,
                nickname: self.nickname,
                birthday: self.birthday,
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

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let mut catalog = MockCatalogService::new();
        catalog.expect_create_singer().never();
        let mediator = test_support::catalog_mediator(catalog);

        let result = mediator.send(CreateSinger::default()).await;

        match result {
            Err(AppError::Validation(fields)) => assert_eq!(fields[0].field, "name"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_birthday_parsed_from_iso_date() {
        let request: CreateSinger =
            serde_json::from_str(r#"{"name":"Hikaru Utada","birthday":"1983-01-19"}"#).unwrap();

        assert_eq!(request.birthday, NaiveDate::from_ymd_opt(1983, 1, 19));
        assert!(request.nickname.is_none());
    }
}
