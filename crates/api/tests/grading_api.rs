//! HTTP-level tests for grade ranges, enrollment, mark entry and ranking.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json_auth, put_json_auth, user_with_role};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_range(pool: &PgPool, token: &str, name: &str, point: f64, min: f64, max: f64) {
    let app = common::build_test_app(pool.clone());
    let body = json!({ "name": name, "point": point, "min_percentage": min, "max_percentage": max });
    let response = post_json_auth(app, "/api/v1/grade-ranges", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

/// Create a two-distribution subject and an exam for class 7, returning the exam id.
async fn create_exam(pool: &PgPool, token: &str) -> i64 {
    let app = common::build_test_app(pool.clone());
    let body = json!({ "name": "Mathematics", "code": "MATH", "distributions": ["written", "practical"] });
    let response = post_json_auth(app, "/api/v1/subjects", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let subject_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let body = json!({
        "name": "Midterm",
        "class_id": 7,
        "subject_ids": [subject_id],
        "hall_name": "Hall A",
        "starts_at": "2026-03-01T09:00:00Z",
        "ends_at": "2026-03-01T12:00:00Z",
    });
    let response = post_json_auth(app, "/api/v1/exams", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn enter(pool: &PgPool, token: &str, record_id: i64, written: f64, practical: f64) -> serde_json::Value {
    let app = common::build_test_app(pool.clone());
    let body = json!({ "entries": [
        { "subject_name": "Mathematics", "distribution_name": "written", "mark": written },
        { "subject_name": "Mathematics", "distribution_name": "practical", "mark": practical },
    ]});
    let response = put_json_auth(app, &format!("/api/v1/marks/{record_id}"), body, token).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Grade ranges
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn overlapping_grade_range_is_rejected(pool: PgPool) {
    let (_, token) = user_with_role(&pool, "registrar", "admin").await;
    create_range(&pool, &token, "A", 4.0, 80.0, 100.0).await;

    let app = common::build_test_app(pool.clone());
    let body = json!({ "name": "B", "point": 3.0, "min_percentage": 70.0, "max_percentage": 85.0 });
    let response = post_json_auth(app, "/api/v1/grade-ranges", body, &token).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn inverted_grade_range_is_rejected(pool: PgPool) {
    let (_, token) = user_with_role(&pool, "registrar", "admin").await;

    let app = common::build_test_app(pool);
    let body = json!({ "name": "C", "point": 2.0, "min_percentage": 60.0, "max_percentage": 40.0 });
    let response = post_json_auth(app, "/api/v1/grade-ranges", body, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn teacher_cannot_manage_grade_ranges(pool: PgPool) {
    let (_, token) = user_with_role(&pool, "ms_lee", "teacher").await;

    let app = common::build_test_app(pool.clone());
    let body = json!({ "name": "A", "point": 4.0, "min_percentage": 80.0, "max_percentage": 100.0 });
    let response = post_json_auth(app, "/api/v1/grade-ranges", body, &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Viewing only needs viewMarks, which teachers have.
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/grade-ranges", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Enrollment, entry, ranking
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn full_exam_flow_grades_and_ranks_the_class(pool: PgPool) {
    let (_, token) = user_with_role(&pool, "registrar", "admin").await;
    create_range(&pool, &token, "A", 4.0, 80.0, 100.0).await;
    create_range(&pool, &token, "B", 3.0, 60.0, 79.99).await;
    let exam_id = create_exam(&pool, &token).await;

    // Enroll three students; records start empty with the fallback grade.
    let app = common::build_test_app(pool.clone());
    let body = json!({ "student_ids": [101, 102, 103] });
    let response = post_json_auth(app, &format!("/api/v1/exams/{exam_id}/enroll"), body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let records = body_json(response).await["data"].as_array().unwrap().clone();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["total_marks"], 0.0);
    assert_eq!(records[0]["subject_items"][0]["grade"], "F");
    assert!(records[0]["position"].is_null());
    let ids: Vec<i64> = records.iter().map(|r| r["id"].as_i64().unwrap()).collect();

    // Enter marks: 90 (A), 70 (B), 70 (B).
    let first = enter(&pool, &token, ids[0], 50.0, 40.0).await;
    assert_eq!(first["data"]["total_marks"], 90.0);
    assert_eq!(first["data"]["subject_items"][0]["grade"], "A");
    assert_eq!(first["data"]["grade_point_average"], 4.0);
    enter(&pool, &token, ids[1], 40.0, 30.0).await;
    let third = enter(&pool, &token, ids[2], 45.0, 25.0).await;
    assert_eq!(third["data"]["subject_items"][0]["grade"], "B");
    assert!(third["data"]["position"].is_null());

    // Rank: ties share a position.
    let app = common::build_test_app(pool.clone());
    let body = json!({ "class_id": 7, "exam_id": exam_id });
    let response = post_json_auth(app, "/api/v1/marks/rank", body, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["ranked"], 3);

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/v1/marks?class_id=7&exam_id={exam_id}");
    let listed = body_json(get_auth(app, &uri, &token).await).await;
    let positions: Vec<(i64, i64)> = listed["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| (r["student_id"].as_i64().unwrap(), r["position"].as_i64().unwrap()))
        .collect();
    assert_eq!(positions, vec![(101, 1), (102, 2), (103, 2)]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn enrolling_twice_creates_no_duplicates(pool: PgPool) {
    let (_, token) = user_with_role(&pool, "registrar", "admin").await;
    let exam_id = create_exam(&pool, &token).await;
    let uri = format!("/api/v1/exams/{exam_id}/enroll");

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, &uri, json!({ "student_ids": [1, 2] }), &token).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 2);

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, &uri, json!({ "student_ids": [2, 3] }), &token).await;
    let created = body_json(response).await["data"].as_array().unwrap().clone();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0]["student_id"], 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_distribution_is_rejected(pool: PgPool) {
    let (_, token) = user_with_role(&pool, "registrar", "admin").await;
    let exam_id = create_exam(&pool, &token).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/exams/{exam_id}/enroll"),
        json!({ "student_ids": [1] }),
        &token,
    )
    .await;
    let record_id = body_json(response).await["data"][0]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let body = json!({ "entries": [
        { "subject_name": "Mathematics", "distribution_name": "oral", "mark": 10.0 },
    ]});
    let response = put_json_auth(app, &format!("/api/v1/marks/{record_id}"), body, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn teacher_enters_marks_but_cannot_rank_or_publish(pool: PgPool) {
    let (_, admin) = user_with_role(&pool, "registrar", "admin").await;
    let (_, teacher) = user_with_role(&pool, "ms_lee", "teacher").await;
    let exam_id = create_exam(&pool, &admin).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/exams/{exam_id}/enroll"),
        json!({ "student_ids": [1] }),
        &teacher,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let record_id = body_json(response).await["data"][0]["id"].as_i64().unwrap();

    enter(&pool, &teacher, record_id, 30.0, 20.0).await;

    let app = common::build_test_app(pool.clone());
    let body = json!({ "class_id": 7, "exam_id": exam_id });
    let response = post_json_auth(app, "/api/v1/marks/rank", body, &teacher).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/v1/marks/{record_id}/publish");
    let response = post_json_auth(app, &uri, json!({}), &teacher).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool);
    let response = post_json_auth(app, &uri, json!({}), &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["published"], true);
}

async fn enroll_one(pool: &PgPool, token: &str, exam_id: i64, student_id: i64) -> i64 {
    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/v1/exams/{exam_id}/enroll");
    let response = post_json_auth(app, &uri, json!({ "student_ids": [student_id] }), token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"][0]["id"].as_i64().unwrap()
}

async fn enter_single(pool: &PgPool, token: &str, record_id: i64, distribution: &str, mark: f64) -> StatusCode {
    let app = common::build_test_app(pool.clone());
    let body = json!({ "entries": [
        { "subject_name": "Mathematics", "distribution_name": distribution, "mark": mark },
    ]});
    put_json_auth(app, &format!("/api/v1/marks/{record_id}"), body, token)
        .await
        .status()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn overflowing_marks_are_rejected_and_class_stays_usable(pool: PgPool) {
    let (_, token) = user_with_role(&pool, "registrar", "admin").await;
    let exam_id = create_exam(&pool, &token).await;
    let record_id = enroll_one(&pool, &token, exam_id, 1).await;

    let app = common::build_test_app(pool.clone());
    let body = json!({ "entries": [
        { "subject_name": "Mathematics", "distribution_name": "written", "mark": 1e308 },
        { "subject_name": "Mathematics", "distribution_name": "practical", "mark": 1e308 },
    ]});
    let response = put_json_auth(app, &format!("/api/v1/marks/{record_id}"), body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/v1/marks?class_id=7&exam_id={exam_id}");
    let response = get_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"][0]["total_marks"], 0.0);

    let app = common::build_test_app(pool);
    let body = json!({ "class_id": 7, "exam_id": exam_id });
    let response = post_json_auth(app, "/api/v1/marks/rank", body, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_entries_on_one_record_keep_both_marks(pool: PgPool) {
    let (_, token) = user_with_role(&pool, "registrar", "admin").await;
    let exam_id = create_exam(&pool, &token).await;
    let record_id = enroll_one(&pool, &token, exam_id, 1).await;

    let (written, practical) = tokio::join!(
        enter_single(&pool, &token, record_id, "written", 40.0),
        enter_single(&pool, &token, record_id, "practical", 30.0),
    );
    assert_eq!(written, StatusCode::OK);
    assert_eq!(practical, StatusCode::OK);

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/marks/{record_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["total_marks"], 70.0);
    assert_eq!(json["data"]["subject_items"][0]["total_mark"], 70.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn exam_with_repeated_subject_name_is_rejected(pool: PgPool) {
    let (_, token) = user_with_role(&pool, "registrar", "admin").await;

    let mut subject_ids = Vec::new();
    for code in ["MATH-A", "MATH-B"] {
        let app = common::build_test_app(pool.clone());
        let body = json!({ "name": "Mathematics", "code": code, "distributions": ["written"] });
        let response = post_json_auth(app, "/api/v1/subjects", body, &token).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        subject_ids.push(body_json(response).await["data"]["id"].as_i64().unwrap());
    }

    let app = common::build_test_app(pool.clone());
    let body = json!({
        "name": "Midterm",
        "class_id": 7,
        "subject_ids": subject_ids,
        "starts_at": "2026-03-01T09:00:00Z",
        "ends_at": "2026-03-01T12:00:00Z",
    });
    let response = post_json_auth(app, "/api/v1/exams", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    // The same rule applies when an existing exam's subjects are replaced.
    let exam_id = create_exam(&pool, &token).await;
    let app = common::build_test_app(pool);
    let body = json!({ "subject_ids": subject_ids });
    let response = put_json_auth(app, &format!("/api/v1/exams/{exam_id}"), body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
