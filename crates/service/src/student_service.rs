use std::collections::HashMap;

use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;
use uuid::Uuid;

use models::{course, enrollment, student};

use crate::errors::ServiceError;

/// A course as seen from a student's enrollment list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledCourse {
    pub course_id: Uuid,
    pub course_name: String,
    pub course_credits: i32,
}

/// A student annotated with every course they are enrolled in.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentWithCourses {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub enrolled_course: Vec<EnrolledCourse>,
}

/// Create a student with a fresh id and current timestamps.
pub async fn create_student(
    db: &DatabaseConnection,
    first_name: &str,
    last_name: &str,
) -> Result<student::Model, ServiceError> {
    let created = student::create(db, first_name, last_name).await?;
    Ok(created)
}

/// Fetch one student with their enrolled courses. A student with no
/// enrollments yields an empty `enrolled_course` list.
pub async fn get_student_with_courses(
    db: &DatabaseConnection,
    student_id: Uuid,
) -> Result<StudentWithCourses, ServiceError> {
    let found = student::Entity::find_by_id(student_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("student"))?;

    let rows = enrollment::Entity::find()
        .filter(enrollment::Column::StudentId.eq(student_id))
        .find_also_related(course::Entity)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;

    let enrolled_course = rows.into_iter().filter_map(|(_, c)| c).map(course_entry).collect();
    Ok(annotate(found, enrolled_course))
}

/// Fetch every student, each annotated with their enrolled courses.
///
/// One student query plus one enrollment-join query; the join rows are
/// grouped by student id in a single linear pass.
pub async fn list_students_with_courses(
    db: &DatabaseConnection,
) -> Result<Vec<StudentWithCourses>, ServiceError> {
    let students = student::Entity::find()
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;

    let rows = enrollment::Entity::find()
        .find_also_related(course::Entity)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;

    let mut by_student: HashMap<Uuid, Vec<EnrolledCourse>> = HashMap::new();
    for (e, c) in rows {
        if let Some(c) = c {
            by_student.entry(e.student_id).or_default().push(course_entry(c));
        }
    }

    Ok(students
        .into_iter()
        .map(|s| {
            let enrolled = by_student.remove(&s.id).unwrap_or_default();
            annotate(s, enrolled)
        })
        .collect())
}

fn course_entry(c: course::Model) -> EnrolledCourse {
    EnrolledCourse { course_id: c.id, course_name: c.name, course_credits: c.credits }
}

fn annotate(s: student::Model, enrolled_course: Vec<EnrolledCourse>) -> StudentWithCourses {
    StudentWithCourses {
        id: s.id,
        first_name: s.first_name,
        last_name: s.last_name,
        created_at: s.created_at,
        updated_at: s.updated_at,
        enrolled_course,
    }
}
