//! Token database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Token;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tokens")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique, column_type = "Text")]
    pub access_token: String,
    pub refresh_token_hash: String,
    pub user_id: Uuid,
    pub ip_address: String,
    pub usage_count: i32,
    pub expires_at: DateTimeUtc,
    pub revoked_at: Option<DateTimeUtc>,
    pub version: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Token {
    fn from(model: Model) -> Self {
        Token {
            id: model.id,
            access_token: model.access_token,
            refresh_token_hash: model.refresh_token_hash,
            user_id: model.user_id,
            ip_address: model.ip_address,
            usage_count: model.usage_count,
            expires_at: model.expires_at,
            revoked_at: model.revoked_at,
            version: model.version,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
