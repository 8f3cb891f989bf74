use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::Request;
use crate::domain::Tag;
use crate::errors::AppResult;
use crate::services::Services;

static NOT_BLANK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S").expect("valid tag pattern"));

/// Get-or-create tag request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateTag {
    #[validate(
        length(min = 1, max = 64, message = "Name must be between 1 and 64 characters"),
        regex(path = *NOT_BLANK, message = "Name must not be blank")
    )]
    #[schema(example = "j-pop")]
    pub name: String,
}

#[async_trait]
impl Request for CreateTag {
    type Response = Tag;

    async fn execute(self, services: &Services) -> AppResult<Tag> {
        services.catalog.get_or_create_tag(self.name).await
    }
}
