//! Album database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Album;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "albums")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub singer_id: Option<Uuid>,
    pub release_year: Option<i32>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::singer::Entity",
        from = "Column::SingerId",
        to = "super::singer::Column::Id",
        on_delete = "SetNull"
    )]
    Singer,
    #[sea_orm(has_many = "super::song::Entity")]
    Songs,
}

impl Related<super::singer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Singer.def()
    }
}

impl Related<super::song::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Songs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Album {
    fn from(model: Model) -> Self {
        Album {
            id: model.id,
            title: model.title,
            singer_id: model.singer_id,
            release_year: model.release_year,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
