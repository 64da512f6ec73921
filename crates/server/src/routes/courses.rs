use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use service::course_service::{self, CourseRoster};

use crate::errors::JsonApiError;
use crate::routes::AppState;

#[derive(Debug, Serialize)]
pub struct Confirmation {
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseInput {
    pub name: String,
    pub credits: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseInput {
    pub name: Option<String>,
    pub credits: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentInput {
    pub student_id: Uuid,
    pub course_id: Uuid,
}

pub async fn list_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<models::course::Model>>, JsonApiError> {
    let list = course_service::list_courses(&state.db).await?;
    Ok(Json(list))
}

pub async fn get_course_roster(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> Result<Json<CourseRoster>, JsonApiError> {
    let roster = course_service::get_course_roster(&state.db, course_id).await?;
    Ok(Json(roster))
}

pub async fn create_course(
    State(state): State<AppState>,
    Json(input): Json<CreateCourseInput>,
) -> Result<Json<Confirmation>, JsonApiError> {
    let created = course_service::create_course(&state.db, &input.name, input.credits).await?;
    info!(course_id = %created.id, name = %created.name, "course created");
    Ok(Json(Confirmation { message: "Course successfully created" }))
}

pub async fn update_course(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
    Json(input): Json<UpdateCourseInput>,
) -> Result<Json<Confirmation>, JsonApiError> {
    course_service::update_course(&state.db, course_id, input.name.as_deref(), input.credits)
        .await?;
    info!(%course_id, "course updated");
    Ok(Json(Confirmation { message: "Course successfully updated" }))
}

pub async fn enroll_student(
    State(state): State<AppState>,
    Json(input): Json<EnrollmentInput>,
) -> Result<Json<Confirmation>, JsonApiError> {
    course_service::enroll_student(&state.db, input.student_id, input.course_id).await?;
    info!(student_id = %input.student_id, course_id = %input.course_id, "student enrolled");
    Ok(Json(Confirmation { message: "Student successfully enrolled" }))
}

pub async fn unenroll_student(
    State(state): State<AppState>,
    Json(input): Json<EnrollmentInput>,
) -> Result<Json<Confirmation>, JsonApiError> {
    let removed =
        course_service::unenroll_student(&state.db, input.student_id, input.course_id).await?;
    info!(student_id = %input.student_id, course_id = %input.course_id, removed, "student unenrolled");
    Ok(Json(Confirmation { message: "Student successfully removed" }))
}
