use std::net::SocketAddr;

use migration::MigratorTrait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes::{self, AppState};

// Apply migrations once per test process
static MIGRATED: tokio::sync::OnceCell<()> = tokio::sync::OnceCell::const_new();

struct TestApp {
    base_url: String,
    client: reqwest::Client,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Boot the router on an ephemeral port. Tests are skipped gracefully when no
/// database is reachable.
async fn start_server() -> anyhow::Result<TestApp> {
    let _ = dotenvy::dotenv();
    if std::env::var("DATABASE_URL").is_err() {
        anyhow::bail!("missing DATABASE_URL");
    }
    // Env settings win over any local config file
    std::env::set_var("CONFIG_PATH", "/nonexistent-config-for-tests.toml");

    let db = models::db::connect().await?;
    MIGRATED
        .get_or_try_init(|| async { migration::Migrator::up(&db, None).await })
        .await?;

    let app = routes::build_router(AppState { db }, CorsLayer::very_permissive());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp {
        base_url: format!("http://{}", addr),
        client: reqwest::Client::new(),
    })
}

async fn create_course(app: &TestApp, name: &str, credits: i32) -> anyhow::Result<Uuid> {
    let resp = app
        .client
        .post(app.url("/api/courses"))
        .json(&json!({"name": name, "credits": credits}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await?;
    assert_eq!(body["message"], "Course successfully created");

    // Look the id up via the list endpoint; names carry a uuid suffix so the
    // match is unambiguous across runs.
    let list: Vec<Value> = app.client.get(app.url("/api/courses")).send().await?.json().await?;
    let id = list
        .iter()
        .find(|c| c["name"] == name)
        .and_then(|c| c["id"].as_str())
        .ok_or_else(|| anyhow::anyhow!("created course not listed"))?;
    Ok(id.parse()?)
}

async fn create_student(app: &TestApp, first: &str, last: &str) -> anyhow::Result<Uuid> {
    let resp = app
        .client
        .post(app.url("/api/students"))
        .json(&json!({"firstName": first, "lastName": last}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let list: Vec<Value> =
        app.client.get(app.url("/api/students")).send().await?.json().await?;
    let id = list
        .iter()
        .find(|s| s["firstName"] == first && s["lastName"] == last)
        .and_then(|s| s["id"].as_str())
        .ok_or_else(|| anyhow::anyhow!("created student not listed"))?;
    Ok(id.parse()?)
}

#[tokio::test]
async fn health_works() -> anyhow::Result<()> {
    let app = match start_server().await {
        Ok(app) => app,
        Err(e) => {
            eprintln!("skip e2e: {}", e);
            return Ok(());
        }
    };
    let resp = app.client.get(app.url("/health")).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn enrollment_flow_end_to_end() -> anyhow::Result<()> {
    let app = match start_server().await {
        Ok(app) => app,
        Err(e) => {
            eprintln!("skip e2e: {}", e);
            return Ok(());
        }
    };

    let course_name = format!("Algorithms {}", Uuid::new_v4());
    let course_id = create_course(&app, &course_name, 4).await?;
    let first = format!("Ada-{}", Uuid::new_v4());
    let student_id = create_student(&app, &first, "Lovelace").await?;

    // Enroll and verify via the roster
    let resp = app
        .client
        .post(app.url("/api/enrollments"))
        .json(&json!({"studentId": student_id, "courseId": course_id}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await?;
    assert_eq!(body["message"], "Student successfully enrolled");

    let roster: Value = app
        .client
        .get(app.url(&format!("/api/courses/{}/roster", course_id)))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(roster["name"], course_name);
    assert_eq!(roster["credits"], 4);
    assert_eq!(
        roster["courseStudents"],
        json!([{"firstName": first, "lastName": "Lovelace"}])
    );

    // Second enroll for the same pair is a 400
    let resp = app
        .client
        .post(app.url("/api/enrollments"))
        .json(&json!({"studentId": student_id, "courseId": course_id}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Unenroll, then the student's course list is empty again
    let resp = app
        .client
        .delete(app.url("/api/enrollments"))
        .json(&json!({"studentId": student_id, "courseId": course_id}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await?;
    assert_eq!(body["message"], "Student successfully removed");

    let student: Value = app
        .client
        .get(app.url(&format!("/api/students/{}", student_id)))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(student["enrolledCourse"], json!([]));

    // Idempotent: removing again still succeeds
    let resp = app
        .client
        .delete(app.url("/api/enrollments"))
        .json(&json!({"studentId": student_id, "courseId": course_id}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn partial_update_and_error_statuses() -> anyhow::Result<()> {
    let app = match start_server().await {
        Ok(app) => app,
        Err(e) => {
            eprintln!("skip e2e: {}", e);
            return Ok(());
        }
    };

    let course_name = format!("Databases {}", Uuid::new_v4());
    let course_id = create_course(&app, &course_name, 3).await?;

    // Credits-only update leaves the name untouched
    let resp = app
        .client
        .patch(app.url(&format!("/api/courses/{}", course_id)))
        .json(&json!({"credits": 5}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let list: Vec<Value> = app.client.get(app.url("/api/courses")).send().await?.json().await?;
    let updated = list.iter().find(|c| c["id"] == course_id.to_string()).unwrap();
    assert_eq!(updated["name"], course_name);
    assert_eq!(updated["credits"], 5);

    // Unknown ids are 404s
    let missing = Uuid::new_v4();
    let resp = app
        .client
        .get(app.url(&format!("/api/courses/{}/roster", missing)))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let resp = app
        .client
        .patch(app.url(&format!("/api/courses/{}", missing)))
        .json(&json!({"credits": 1}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let resp = app
        .client
        .get(app.url(&format!("/api/students/{}", missing)))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Blank course name is a validation error
    let resp = app
        .client
        .post(app.url("/api/courses"))
        .json(&json!({"name": "  ", "credits": 2}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
