use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common::{self, ALICE, BRUNO, CARLA};

#[tokio::test]
async fn assign_change_and_remove_member() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };

    let id = common::create_project(&app, ALICE, "Argine").await;

    let (status, body) = common::assign_role(&app, ALICE, &id, BRUNO, "foreman").await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["user_id"], BRUNO);
    assert_eq!(body["username"], "bruno");
    assert_eq!(body["role"], "foreman");

    let (status, body) = common::assign_role(&app, ALICE, &id, BRUNO, "supervisor").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "supervisor");

    let (status, members) = common::get(&app, &format!("/api/projects/{id}/members"), Some(BRUNO)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(members.as_array().unwrap().len(), 2);

    let (status, _) = common::delete(&app, &format!("/api/projects/{id}/members/{BRUNO}"), ALICE).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = common::get(&app, &format!("/api/projects/{id}"), Some(BRUNO)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn last_project_manager_cannot_leave_or_be_demoted() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };

    let id = common::create_project(&app, ALICE, "Argine").await;

    let (status, body) = common::assign_role(&app, ALICE, &id, ALICE, "engineer").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "Conflict");

    let (status, _) = common::delete(&app, &format!("/api/projects/{id}/members/{ALICE}"), ALICE).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // A second manager lifts the restriction.
    common::assign_role(&app, ALICE, &id, CARLA, "project-manager").await;
    let (status, body) = common::assign_role(&app, CARLA, &id, ALICE, "engineer").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "engineer");
}

#[tokio::test]
async fn members_without_manage_members_are_forbidden() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };

    let id = common::create_project(&app, ALICE, "Argine").await;
    common::assign_role(&app, ALICE, &id, BRUNO, "engineer").await;

    let (status, body) = common::assign_role(&app, BRUNO, &id, CARLA, "helper").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "Forbidden");

    let (status, _) = common::delete(&app, &format!("/api/projects/{id}/members/{ALICE}"), BRUNO).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn site_manager_can_manage_members() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };

    let id = common::create_project(&app, ALICE, "Argine").await;
    common::assign_role(&app, ALICE, &id, BRUNO, "site-manager").await;

    let (status, body) = common::assign_role(&app, BRUNO, &id, CARLA, "operator").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "operator");
}

#[tokio::test]
async fn unknown_user_or_member_is_not_found() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };

    let id = common::create_project(&app, ALICE, "Argine").await;

    let (status, body) = common::assign_role(&app, ALICE, &id, 4242, "engineer").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");

    let (status, _) = common::delete(&app, &format!("/api/projects/{id}/members/{CARLA}"), ALICE).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_role_is_rejected() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };

    let id = common::create_project(&app, ALICE, "Argine").await;
    let (status, _) = common::assign_role(&app, ALICE, &id, BRUNO, "architect").await;

    assert!(status.is_client_error(), "unexpected status {status}");
}

#[tokio::test]
async fn site_manager_cannot_promote_themselves() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };

    let id = common::create_project(&app, ALICE, "Argine").await;
    common::assign_role(&app, ALICE, &id, BRUNO, "site-manager").await;

    for role in ["project-manager", "admin"] {
        let (status, body) = common::assign_role(&app, BRUNO, &id, BRUNO, role).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{role}: {body}");
        assert_eq!(body["kind"], "Forbidden");
    }

    let (status, _) = common::delete(&app, &format!("/api/projects/{id}"), BRUNO).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, caps) = common::get(&app, &format!("/api/projects/{id}/capabilities"), Some(BRUNO)).await;
    assert_eq!(caps["role"], "site-manager");
}

#[tokio::test]
async fn site_manager_cannot_demote_or_remove_a_manager() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };

    let id = common::create_project(&app, ALICE, "Argine").await;
    common::assign_role(&app, ALICE, &id, BRUNO, "site-manager").await;
    common::assign_role(&app, ALICE, &id, CARLA, "project-manager").await;

    let (status, _) = common::assign_role(&app, BRUNO, &id, ALICE, "helper").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = common::delete(&app, &format!("/api/projects/{id}/members/{CARLA}"), BRUNO).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, members) = common::get(&app, &format!("/api/projects/{id}/members"), Some(ALICE)).await;
    let managers = members
        .as_array()
        .unwrap()
        .iter()
        .filter(|m| m["role"] == "project-manager")
        .count();
    assert_eq!(managers, 2);
}

#[tokio::test]
async fn site_manager_manages_roles_within_their_own() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };

    let id = common::create_project(&app, ALICE, "Argine").await;
    common::assign_role(&app, ALICE, &id, BRUNO, "site-manager").await;

    let (status, _) = common::assign_role(&app, BRUNO, &id, CARLA, "construction-manager").await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = common::assign_role(&app, BRUNO, &id, CARLA, "foreman").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "foreman");

    let (status, _) = common::delete(&app, &format!("/api/projects/{id}/members/{CARLA}"), BRUNO).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn project_manager_cannot_hand_out_admin() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };

    let id = common::create_project(&app, ALICE, "Argine").await;

    let (status, _) = common::assign_role(&app, ALICE, &id, BRUNO, "admin").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = common::assign_role(&app, common::ADMIN, &id, BRUNO, "admin").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "admin");
}
