use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::common::{self, ADMIN, ALICE, BRUNO, CARLA};

async fn capabilities(app: &axum::Router, id: &str, user: i64) -> (StatusCode, Value) {
    common::get(app, &format!("/api/projects/{id}/capabilities"), Some(user)).await
}

#[tokio::test]
async fn project_manager_has_everything_but_view_all() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };

    let id = common::create_project(&app, ALICE, "Argine").await;
    let (status, body) = capabilities(&app, &id, ALICE).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["project_id"], id.as_str());
    assert_eq!(body["role"], "project-manager");
    let caps = &body["capabilities"];
    assert_eq!(caps["can-manage-projects"], true);
    assert_eq!(caps["can-manage-members"], true);
    assert_eq!(caps["can-access-settings"], true);
    assert_eq!(caps["can-view-all-projects"], false);
}

#[tokio::test]
async fn field_roles_resolve_to_narrow_sets() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };

    let id = common::create_project(&app, ALICE, "Argine").await;
    common::assign_role(&app, ALICE, &id, BRUNO, "foreman").await;
    common::assign_role(&app, ALICE, &id, CARLA, "helper").await;

    let (_, foreman) = capabilities(&app, &id, BRUNO).await;
    let mut granted: Vec<&str> = foreman["capabilities"]
        .as_object()
        .unwrap()
        .iter()
        .filter(|(_, v)| v.as_bool() == Some(true))
        .map(|(k, _)| k.as_str())
        .collect();
    granted.sort_unstable();
    assert_eq!(granted, vec!["can-create-daily-report", "can-manage-squads"]);

    let (_, helper) = capabilities(&app, &id, CARLA).await;
    assert!(helper["capabilities"]
        .as_object()
        .unwrap()
        .values()
        .all(|v| v == false));
}

#[tokio::test]
async fn platform_admin_resolves_as_admin_everywhere() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };

    let id = common::create_project(&app, ALICE, "Argine").await;
    let (status, body) = capabilities(&app, &id, ADMIN).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "admin");
    assert!(body["capabilities"]
        .as_object()
        .unwrap()
        .values()
        .all(|v| v == true));
}

#[tokio::test]
async fn capabilities_of_a_foreign_project_are_hidden() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };

    let id = common::create_project(&app, ALICE, "Argine").await;
    let (status, _) = capabilities(&app, &id, BRUNO).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn role_table_is_public_and_complete() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };

    let (status, body) = common::get(&app, "/api/roles", None).await;
    assert_eq!(status, StatusCode::OK);

    let roles = body.as_array().unwrap();
    assert_eq!(roles.len(), shared_types::ALL_ROLES.len());

    let engineer = roles.iter().find(|r| r["role"] == "engineer").unwrap();
    assert_eq!(engineer["capabilities"]["can-create-work-package"], true);
    assert_eq!(engineer["capabilities"]["can-manage-members"], false);
    assert_eq!(engineer["field_role"], false);

    let foreman = roles.iter().find(|r| r["role"] == "foreman").unwrap();
    assert_eq!(foreman["field_role"], true);
}
