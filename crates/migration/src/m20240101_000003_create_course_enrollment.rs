//! Create `course_enrollment` join table with FKs to `student` and `course`.
//!
//! No uniqueness constraint on (student_id, course_id): the
//! one-enrollment-per-pair rule is enforced by the service layer.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CourseEnrollment::Table)
                    .if_not_exists()
                    .col(uuid(CourseEnrollment::Id).primary_key())
                    .col(uuid(CourseEnrollment::StudentId).not_null())
                    .col(uuid(CourseEnrollment::CourseId).not_null())
                    .col(timestamp_with_time_zone(CourseEnrollment::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(CourseEnrollment::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_enrollment_student")
                            .from(CourseEnrollment::Table, CourseEnrollment::StudentId)
                            .to(Student::Table, Student::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_enrollment_course")
                            .from(CourseEnrollment::Table, CourseEnrollment::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CourseEnrollment::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CourseEnrollment { Table, Id, StudentId, CourseId, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Student { Table, Id }

#[derive(DeriveIden)]
enum Course { Table, Id }
