//! Catalog entities: singers, albums, songs and tags.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Performing artist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Singer {
    pub id: Uuid,
    #[schema(example = "Hikaru Utada")]
    pub name: String,
    #[schema(example = "Hikki")]
    pub nickname: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Album, optionally credited to a singer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: Uuid,
    #[schema(example = "First Love")]
    pub title: String,
    pub singer_id: Option<Uuid>,
    #[schema(example = 1999)]
    pub release_year: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Song available for karaoke
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: Uuid,
    #[schema(example = "Automatic")]
    pub title: String,
    pub album_id: Option<Uuid>,
    pub singer_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Free-form label, unique by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: Uuid,
    #[schema(example = "j-pop")]
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSinger {
    pub name: String,
    pub nickname: Option<String>,
    pub birthday: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAlbum {
    pub title: String,
    pub singer_id: Option<Uuid>,
    pub release_year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSong {
    pub title: String,
    pub album_id: Option<Uuid>,
    pub singer_id: Option<Uuid>,
}
