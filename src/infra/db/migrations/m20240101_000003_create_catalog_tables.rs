//! Migration: Create catalog tables (singers, albums, songs, tags).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn timestamps(table: &mut TableCreateStatement, created: impl IntoIden, updated: impl IntoIden) {
    table
        .col(
            ColumnDef::new(created)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(updated)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        );
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut singers = Table::create();
        singers
            .table(Singers::Table)
            .if_not_exists()
            .col(ColumnDef::new(Singers::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Singers::Name).string_len(200).not_null())
            .col(ColumnDef::new(Singers::Nickname).string_len(200).null())
            .col(ColumnDef::new(Singers::Birthday).date().null());
        timestamps(&mut singers, Singers::CreatedAt, Singers::UpdatedAt);
        manager.create_table(singers.to_owned()).await?;

        let mut albums = Table::create();
        albums
            .table(Albums::Table)
            .if_not_exists()
            .col(ColumnDef::new(Albums::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Albums::Title).string_len(200).not_null())
            .col(ColumnDef::new(Albums::SingerId).uuid().null())
            .col(ColumnDef::new(Albums::ReleaseYear).integer().null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_albums_singer_id")
                    .from(Albums::Table, Albums::SingerId)
                    .to(Singers::Table, Singers::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            );
        timestamps(&mut albums, Albums::CreatedAt, Albums::UpdatedAt);
        manager.create_table(albums.to_owned()).await?;

        let mut songs = Table::create();
        songs
            .table(Songs::Table)
            .if_not_exists()
            .col(ColumnDef::new(Songs::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Songs::Title).string_len(200).not_null())
            .col(ColumnDef::new(Songs::AlbumId).uuid().null())
            .col(ColumnDef::new(Songs::SingerId).uuid().null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_songs_album_id")
                    .from(Songs::Table, Songs::AlbumId)
                    .to(Albums::Table, Albums::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_songs_singer_id")
                    .from(Songs::Table, Songs::SingerId)
                    .to(Singers::Table, Singers::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            );
        timestamps(&mut songs, Songs::CreatedAt, Songs::UpdatedAt);
        manager.create_table(songs.to_owned()).await?;

        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tags::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Tags::Name)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Tags::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_songs_album_id")
                    .table(Songs::Table)
                    .col(Songs::AlbumId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Songs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Albums::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Singers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Singers {
    Table,
    Id,
    Name,
    Nickname,
    Birthday,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Albums {
    Table,
    Id,
    Title,
    SingerId,
    ReleaseYear,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Songs {
    Table,
    Id,
    Title,
    AlbumId,
    SingerId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Tags {
    Table,
    Id,
    Name,
    CreatedAt,
}
