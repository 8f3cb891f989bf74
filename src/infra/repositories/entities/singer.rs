//! Singer database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Singer;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "singers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub nickname: Option<String>,
    pub birthday: Option<Date>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::album::Entity")]
    Albums,
    #[sea_orm(has_many = "super::song::Entity")]
    Songs,
}

impl Related<super::album::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Albums.def()
    }
}

impl Related<super::song::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Songs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Singer {
    fn from(model: Model) -> Self {
        Singer {
            id: model.id,
            name: model.name,
            nickname: model.nickname,
            birthday: model.birthday,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
