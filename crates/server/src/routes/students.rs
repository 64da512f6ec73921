use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use service::student_service::{self, StudentWithCourses};

use crate::errors::JsonApiError;
use crate::routes::courses::Confirmation;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentInput {
    pub first_name: String,
    pub last_name: String,
}

pub async fn list_students(
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentWithCourses>>, JsonApiError> {
    let list = student_service::list_students_with_courses(&state.db).await?;
    Ok(Json(list))
}

pub async fn get_student(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> Result<Json<StudentWithCourses>, JsonApiError> {
    let found = student_service::get_student_with_courses(&state.db, student_id).await?;
    Ok(Json(found))
}

pub async fn create_student(
    State(state): State<AppState>,
    Json(input): Json<CreateStudentInput>,
) -> Result<Json<Confirmation>, JsonApiError> {
    let created =
        student_service::create_student(&state.db, &input.first_name, &input.last_name).await?;
    info!(student_id = %created.id, "student created");
    Ok(Json(Confirmation { message: "Student successfully created" }))
}
