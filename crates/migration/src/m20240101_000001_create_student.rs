//! Create `student` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Student::Table)
                    .if_not_exists()
                    .col(uuid(Student::Id).primary_key())
                    .col(string_len(Student::FirstName, 255).not_null())
                    .col(string_len(Student::LastName, 255).not_null())
                    .col(timestamp_with_time_zone(Student::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Student::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Student::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Student { Table, Id, FirstName, LastName, CreatedAt, UpdatedAt }
