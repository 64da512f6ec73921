use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // CourseEnrollment: index on student_id for roster/course lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_course_enrollment_student")
                    .table(CourseEnrollment::Table)
                    .col(CourseEnrollment::StudentId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_course_enrollment_student")
                    .table(CourseEnrollment::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum CourseEnrollment { Table, StudentId }
