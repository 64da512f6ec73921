//! Create `course` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Course::Table)
                    .if_not_exists()
                    .col(uuid(Course::Id).primary_key())
                    .col(string_len(Course::Name, 255).not_null())
                    .col(integer(Course::Credits).not_null())
                    .col(timestamp_with_time_zone(Course::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Course::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Course::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Course { Table, Id, Name, Credits, CreatedAt, UpdatedAt }
