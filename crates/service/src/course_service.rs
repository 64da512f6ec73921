use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IsolationLevel, QueryFilter, Set, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

use models::{course, enrollment, student};

use crate::errors::ServiceError;

/// A single roster entry: the enrolled student's name fields only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterStudent {
    pub first_name: String,
    pub last_name: String,
}

/// A course together with every student enrolled in it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRoster {
    pub id: Uuid,
    pub name: String,
    pub credits: i32,
    pub course_students: Vec<RosterStudent>,
}

/// List every course, natural store order, no pagination.
pub async fn list_courses(db: &DatabaseConnection) -> Result<Vec<course::Model>, ServiceError> {
    course::Entity::find()
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Fetch a course and its enrolled students. A course with no enrollments
/// yields an empty `course_students` list.
pub async fn get_course_roster(
    db: &DatabaseConnection,
    course_id: Uuid,
) -> Result<CourseRoster, ServiceError> {
    let found = course::Entity::find_by_id(course_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("course"))?;

    let rows = enrollment::Entity::find()
        .filter(enrollment::Column::CourseId.eq(course_id))
        .find_also_related(student::Entity)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;

    let course_students = rows
        .into_iter()
        .filter_map(|(_, s)| s)
        .map(|s| RosterStudent { first_name: s.first_name, last_name: s.last_name })
        .collect();

    Ok(CourseRoster {
        id: found.id,
        name: found.name,
        credits: found.credits,
        course_students,
    })
}

/// Create a course with a fresh id and current timestamps.
pub async fn create_course(
    db: &DatabaseConnection,
    name: &str,
    credits: i32,
) -> Result<course::Model, ServiceError> {
    let created = course::create(db, name, credits).await?;
    Ok(created)
}

/// Partial update: only the provided fields are written; `updated_at` is
/// always stamped with the evaluated current time.
pub async fn update_course(
    db: &DatabaseConnection,
    course_id: Uuid,
    name: Option<&str>,
    credits: Option<i32>,
) -> Result<course::Model, ServiceError> {
    if let Some(n) = name {
        course::validate_name(n)?;
    }
    let txn = db.begin().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let mut am: course::ActiveModel = course::Entity::find_by_id(course_id)
        .one(&txn)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("course"))?
        .into();
    if let Some(n) = name {
        am.name = Set(n.to_string());
    }
    if let Some(c) = credits {
        am.credits = Set(c);
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(&txn).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    txn.commit().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(updated)
}

/// Enroll a student in a course. The existence checks, duplicate check and
/// insert run in one serializable transaction: there is no unique index on
/// the (student, course) pair, so of two racing enrolls one commits and the
/// other aborts with a serialization failure instead of inserting a second
/// row.
pub async fn enroll_student(
    db: &DatabaseConnection,
    student_id: Uuid,
    course_id: Uuid,
) -> Result<enrollment::Model, ServiceError> {
    let txn = db
        .begin_with_config(Some(IsolationLevel::Serializable), None)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    ensure_student_exists(&txn, student_id).await?;
    ensure_course_exists(&txn, course_id).await?;

    let existing = enrollment::Entity::find()
        .filter(enrollment::Column::StudentId.eq(student_id))
        .filter(enrollment::Column::CourseId.eq(course_id))
        .one(&txn)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if existing.is_some() {
        return Err(ServiceError::Duplicate(
            "student already enrolled in this course".into(),
        ));
    }

    let created = enrollment::create(&txn, student_id, course_id).await?;
    txn.commit().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(created)
}

/// Remove a student's enrollment in a course. Deleting zero rows is not an
/// error; both referenced entities must still exist.
pub async fn unenroll_student(
    db: &DatabaseConnection,
    student_id: Uuid,
    course_id: Uuid,
) -> Result<u64, ServiceError> {
    let txn = db.begin().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    ensure_student_exists(&txn, student_id).await?;
    ensure_course_exists(&txn, course_id).await?;

    let res = enrollment::Entity::delete_many()
        .filter(enrollment::Column::StudentId.eq(student_id))
        .filter(enrollment::Column::CourseId.eq(course_id))
        .exec(&txn)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    txn.commit().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(res.rows_affected)
}

pub(crate) async fn ensure_student_exists<C: ConnectionTrait>(
    db: &C,
    student_id: Uuid,
) -> Result<(), ServiceError> {
    student::Entity::find_by_id(student_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("student"))?;
    Ok(())
}

pub(crate) async fn ensure_course_exists<C: ConnectionTrait>(
    db: &C,
    course_id: Uuid,
) -> Result<(), ServiceError> {
    course::Entity::find_by_id(course_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("course"))?;
    Ok(())
}
