use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};
use std::sync::Arc;

use super::configure_api_routes;
use crate::report::XLSX_CONTENT_TYPE;
use crate::storage::Storage;
use crate::storage::sea_orm_storage::testing::memory_storage;
use crate::utils::{json_error_handler, query_error_handler};

macro_rules! init_app {
    () => {{
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);
        test::init_service(
            App::new()
                .app_data(web::QueryConfig::default().error_handler(query_error_handler))
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .app_data(web::Data::new(storage))
                .configure(configure_api_routes),
        )
        .await
    }};
}

macro_rules! send {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

fn id_of(body: &Value) -> i64 {
    body["data"]["id"].as_i64().expect("response without id")
}

#[actix_web::test]
async fn test_grading_flow_and_gradebook() {
    let app = init_app!();

    let (status, staff) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({"username": "marker", "display_name": "Dr Marker", "role": "staff"}))
    );
    assert_eq!(status, StatusCode::CREATED);
    let staff_id = id_of(&staff);

    let (_, alice) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({"username": "alice", "display_name": "Alice", "role": "student"}))
    );
    let alice_id = id_of(&alice);

    let (status, course) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/courses")
            .set_json(json!({"name": "Rust 101"}))
    );
    assert_eq!(status, StatusCode::CREATED);
    let course_id = id_of(&course);

    let mut assignment_ids = Vec::new();
    for (title, max_mark, weight, due) in [
        ("Essay", 20.0, 0.3, "2025-03-01T12:00:00Z"),
        ("Quiz", 10.0, 0.2, "2025-03-08T12:00:00Z"),
        ("Project", 50.0, 0.5, "2025-03-15T12:00:00Z"),
    ] {
        let (status, body) = send!(
            app,
            test::TestRequest::post()
                .uri(&format!("/api/v1/courses/{course_id}/assignments"))
                .set_json(json!({
                    "title": title,
                    "max_mark": max_mark,
                    "weight": weight,
                    "due_date": due,
                    "assignment_type": "written",
                }))
        );
        assert_eq!(status, StatusCode::CREATED, "{body}");
        assignment_ids.push(id_of(&body));
    }

    for assignment_id in &assignment_ids[..2] {
        let (status, _) = send!(
            app,
            test::TestRequest::put()
                .uri(&format!("/api/v1/assignments/{assignment_id}/submissions"))
                .set_json(json!({"participant_id": alice_id, "content": "my work"}))
        );
        assert_eq!(status, StatusCode::CREATED);
    }

    let grade = |assignment_id: i64, raw_mark: f64, marker_id: i64| {
        test::TestRequest::post().uri("/api/v1/grades").set_json(json!({
            "assignment_id": assignment_id,
            "participant_id": alice_id,
            "raw_mark": raw_mark,
            "feedback": "Solid",
            "marker_id": marker_id,
        }))
    };

    let (status, body) = send!(app, grade(assignment_ids[0], 16.0, staff_id));
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["outcome"], "created");
    assert_eq!(body["data"]["grade"]["final_mark"], 80.0);
    assert_eq!(body["data"]["grade"]["has_passed"], true);

    let (status, _) = send!(app, grade(assignment_ids[1], 6.0, staff_id));
    assert_eq!(status, StatusCode::CREATED);

    // 相同输入再次评分不写库
    let (status, body) = send!(app, grade(assignment_ids[1], 6.0, staff_id));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["outcome"], "unchanged");

    let (status, body) = send!(app, grade(assignment_ids[1], 60.0, staff_id));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"][0]["field"], "raw_mark");

    let (status, _) = send!(app, grade(assignment_ids[1], 6.0, alice_id));
    assert_eq!(status, StatusCode::FORBIDDEN);

    // 未提交的作业不能评分
    let (status, _) = send!(app, grade(assignment_ids[2], 10.0, staff_id));
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send!(
        app,
        test::TestRequest::get().uri(&format!(
            "/api/v1/courses/{course_id}/gradebook?aggregation=graded_subset"
        ))
    );
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["aggregation"], "graded_subset");
    assert_eq!(data["columns"].as_array().map(Vec::len), Some(3));
    let row = &data["rows"][0];
    assert_eq!(row["display_name"], "Alice");
    assert_eq!(row["cells"], json!(["16/20", "6/10", "-"]));
    assert_eq!(row["final_grade"], "72%");
    assert_eq!(row["has_passed"], true);

    let (_, body) = send!(
        app,
        test::TestRequest::get().uri(&format!(
            "/api/v1/courses/{course_id}/gradebook?aggregation=full_syllabus"
        ))
    );
    assert_eq!(body["data"]["rows"][0]["final_grade"], "36%");
    assert_eq!(body["data"]["rows"][0]["has_passed"], false);

    let (status, body) = send!(
        app,
        test::TestRequest::get().uri(&format!(
            "/api/v1/courses/{course_id}/participants/{alice_id}/report?aggregation=graded_subset"
        ))
    );
    assert_eq!(status, StatusCode::OK);
    let lines = &body["data"]["lines"];
    assert_eq!(lines[0]["status"], "pass");
    assert_eq!(lines[1]["status"], "pass");
    assert_eq!(lines[2]["status"], "not_submitted");
    assert_eq!(body["data"]["final_mark"]["display"], "72%");
}

#[actix_web::test]
async fn test_report_errors() {
    let app = init_app!();

    let (status, body) = send!(
        app,
        test::TestRequest::get().uri("/api/v1/courses/99/gradebook?aggregation=graded_subset")
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 2002);

    let (status, body) = send!(
        app,
        test::TestRequest::get().uri("/api/v1/courses/1/gradebook?aggregation=median")
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"][0]["field"], "aggregation");

    let (status, _) = send!(
        app,
        test::TestRequest::get().uri("/api/v1/courses/abc/gradebook")
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_assignment_with_zero_max_mark_rejected() {
    let app = init_app!();

    let (_, course) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/courses")
            .set_json(json!({"name": "Databases"}))
    );
    let course_id = id_of(&course);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/courses/{course_id}/assignments"))
            .set_json(json!({
                "title": "Lab",
                "max_mark": 0.0,
                "weight": 0.5,
                "due_date": "2025-03-01T12:00:00Z",
                "assignment_type": "project",
            }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"][0]["field"], "max_mark");

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/courses")
            .set_json(json!({"name": "Databases"}))
    );
    assert_eq!(status, StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_gradebook_export_returns_xlsx() {
    let app = init_app!();

    let (_, course) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/courses")
            .set_json(json!({"name": "Rust 101"}))
    );
    let course_id = id_of(&course);

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/courses/{course_id}/gradebook/export?aggregation=graded_subset"
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get("Content-Type")
            .and_then(|v| v.to_str().ok()),
        Some(XLSX_CONTENT_TYPE)
    );
    assert_eq!(
        resp.headers()
            .get("Content-Disposition")
            .and_then(|v| v.to_str().ok()),
        Some("attachment; filename=\"Rust_101_report.xlsx\"")
    );

    let body = test::read_body(resp).await;
    // xlsx 是 zip 容器
    assert!(body.starts_with(b"PK"));
}

#[actix_web::test]
async fn test_participant_report_export_returns_xlsx() {
    let app = init_app!();

    let (_, alice) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({"username": "alice", "display_name": "Alice", "role": "student"}))
    );
    let alice_id = id_of(&alice);

    let (_, course) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/courses")
            .set_json(json!({"name": "Rust 101"}))
    );
    let course_id = id_of(&course);

    let (_, assignment) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/courses/{course_id}/assignments"))
            .set_json(json!({
                "title": "Essay",
                "max_mark": 20.0,
                "weight": 0.5,
                "due_date": "2025-03-01T12:00:00Z",
                "assignment_type": "written",
            }))
    );
    let assignment_id = id_of(&assignment);

    let (status, _) = send!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/assignments/{assignment_id}/submissions"))
            .set_json(json!({"participant_id": alice_id, "content": "draft"}))
    );
    assert_eq!(status, StatusCode::CREATED);

    let uri = format!(
        "/api/v1/courses/{course_id}/participants/{alice_id}/report/export{}",
        "?aggregation=graded_subset"
    );
    let req = test::TestRequest::get().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get("Content-Type")
            .and_then(|v| v.to_str().ok()),
        Some(XLSX_CONTENT_TYPE)
    );
    assert_eq!(
        resp.headers()
            .get("Content-Disposition")
            .and_then(|v| v.to_str().ok()),
        Some("attachment; filename=\"Alice_Rust_101_report.xlsx\"")
    );
    let body = test::read_body(resp).await;
    assert!(body.starts_with(b"PK"));

    let (status, body) = send!(
        app,
        test::TestRequest::get().uri(&format!(
            "/api/v1/courses/{course_id}/participants/999/report/export?aggregation=full_syllabus"
        ))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 2001);
}
