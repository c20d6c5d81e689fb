use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{self, ADMIN, ALICE, BRUNO};

#[tokio::test]
async fn create_project_makes_creator_project_manager() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };

    let (status, body) = common::post_json(
        &app,
        "/api/projects",
        ALICE,
        &json!({
            "name": "  Ponte Nord  ",
            "code": "PN-01",
            "start_date": "2026-03-02",
            "end_date": "2026-09-30",
            "hours_per_day": 9.0,
            "holidays": [
                { "date": "2026-08-15", "description": "Ferragosto" },
                { "date": "2026-06-02", "description": "Festa della Repubblica" }
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["name"], "Ponte Nord");
    assert_eq!(body["code"], "PN-01");
    assert_eq!(body["role"], "project-manager");
    assert_eq!(body["hours_per_day"], 9.0);

    let id = body["id"].as_str().unwrap();
    let (status, holidays) = common::get(&app, &format!("/api/projects/{id}/holidays"), Some(ALICE)).await;
    assert_eq!(status, StatusCode::OK);
    let dates: Vec<&str> = holidays
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2026-06-02", "2026-08-15"]);
}

#[tokio::test]
async fn list_returns_only_member_projects_in_name_order() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };

    common::create_project(&app, ALICE, "Viadotto").await;
    common::create_project(&app, ALICE, "Argine").await;
    common::create_project(&app, BRUNO, "Galleria").await;

    let (status, body) = common::get(&app, "/api/projects", Some(ALICE)).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Argine", "Viadotto"]);
}

#[tokio::test]
async fn platform_admin_sees_every_project_as_admin() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };

    common::create_project(&app, ALICE, "Argine").await;
    common::create_project(&app, BRUNO, "Galleria").await;

    let (status, body) = common::get(&app, "/api/projects", Some(ADMIN)).await;
    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert!(list.iter().all(|p| p["role"] == "admin"));
}

#[tokio::test]
async fn project_admin_role_does_not_widen_the_project_list() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };

    let argine = common::create_project(&app, ALICE, "Argine").await;
    common::create_project(&app, ALICE, "Galleria").await;
    let (status, _) = common::assign_role(&app, ADMIN, &argine, BRUNO, "admin").await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = common::get(&app, "/api/projects", Some(BRUNO)).await;
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["name"], "Argine");
    assert_eq!(list[0]["role"], "admin");
}

#[tokio::test]
async fn non_member_gets_not_found() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };

    let id = common::create_project(&app, ALICE, "Argine").await;

    let (status, body) = common::get(&app, &format!("/api/projects/{id}"), Some(BRUNO)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "NotFound");

    let (status, _) = common::get(&app, &format!("/api/projects/{id}/holidays"), Some(BRUNO)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_project_id_is_bad_request() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };

    let (status, body) = common::get(&app, "/api/projects/not-a-uuid", Some(ALICE)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "BadRequest");
}

#[tokio::test]
async fn unauthenticated_requests_are_rejected() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };

    let (status, body) = common::get(&app, "/api/projects", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "Unauthorized");
}

#[tokio::test]
async fn update_replaces_fields_and_holidays() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };

    let id = common::create_project(&app, ALICE, "Argine").await;

    let (status, body) = common::put_json(
        &app,
        &format!("/api/projects/{id}"),
        ALICE,
        &json!({
            "name": "Argine Sud",
            "location": "Ferrara",
            "working_week": {
                "monday": true, "tuesday": true, "wednesday": true,
                "thursday": true, "friday": true, "saturday": true, "sunday": false
            },
            "holidays": [{ "date": "2026-12-25", "description": "Natale" }]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["name"], "Argine Sud");
    assert_eq!(body["location"], "Ferrara");
    assert_eq!(body["working_week"]["saturday"], true);

    let (_, holidays) = common::get(&app, &format!("/api/projects/{id}/holidays"), Some(ALICE)).await;
    assert_eq!(holidays.as_array().unwrap().len(), 1);
    assert_eq!(holidays[0]["description"], "Natale");
}

#[tokio::test]
async fn update_requires_manage_projects() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };

    let id = common::create_project(&app, ALICE, "Argine").await;
    let (status, _) = common::assign_role(&app, ALICE, &id, BRUNO, "site-manager").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) =
        common::put_json(&app, &format!("/api/projects/{id}"), BRUNO, &json!({ "name": "Renamed" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "Forbidden");

    let (status, _) = common::delete(&app, &format!("/api/projects/{id}"), BRUNO).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn duplicate_name_conflicts_only_for_the_same_creator() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };

    common::create_project(&app, ALICE, "Argine").await;

    let (status, body) =
        common::post_json(&app, "/api/projects", ALICE, &json!({ "name": "Argine" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Its creator already has a project with this name");

    // Another user's project of the same name stays invisible.
    let (status, body) =
        common::post_json(&app, "/api/projects", BRUNO, &json!({ "name": "Argine" })).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["role"], "project-manager");

    let (_, list) = common::get(&app, "/api/projects", Some(BRUNO)).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_requests_report_field_errors() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };

    let (status, body) =
        common::post_json(&app, "/api/projects", ALICE, &json!({ "name": "   " })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "ValidationError");
    assert!(body["field_errors"]["name"].is_string());

    let (status, body) = common::post_json(
        &app,
        "/api/projects",
        ALICE,
        &json!({ "name": "Argine", "start_date": "2026-05-01", "end_date": "2026-04-01" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["field_errors"].is_object());
}

#[tokio::test]
async fn delete_removes_project_for_everyone() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };

    let id = common::create_project(&app, ALICE, "Argine").await;
    common::assign_role(&app, ALICE, &id, BRUNO, "engineer").await;

    let (status, body) = common::delete(&app, &format!("/api/projects/{id}"), ALICE).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, serde_json::Value::Null);

    let (_, list) = common::get(&app, "/api/projects", Some(BRUNO)).await;
    assert_eq!(list, json!([]));
}
