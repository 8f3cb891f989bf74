//! Song database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Song;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "songs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub album_id: Option<Uuid>,
    pub singer_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::album::Entity",
        from = "Column::AlbumId",
        to = "super::album::Column::Id",
        on_delete = "SetNull"
    )]
    Album,
    #[sea_orm(
        belongs_to = "super::singer::Entity",
        from = "Column::SingerId",
        to = "super::singer::Column::Id",
        on_delete = "SetNull"
    )]
    Singer,
}

impl Related<super::album::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Album.def()
    }
}

impl Related<super::singer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Singer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Song {
    fn from(model: Model) -> Self {
        Song {
            id: model.id,
            title: model.title,
            album_id: model.album_id,
            singer_id: model.singer_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
