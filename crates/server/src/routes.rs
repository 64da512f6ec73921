use axum::{
    routing::{get, patch, post},
    Json, Router,
};
use sea_orm::DatabaseConnection;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

pub mod courses;
pub mod students;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/courses", get(courses::list_courses).post(courses::create_course))
        .route("/api/courses/:course_id", patch(courses::update_course))
        .route("/api/courses/:course_id/roster", get(courses::get_course_roster))
        .route(
            "/api/enrollments",
            post(courses::enroll_student).delete(courses::unenroll_student),
        )
        .route("/api/students", get(students::list_students).post(students::create_student))
        .route("/api/students/:student_id", get(students::get_student))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
