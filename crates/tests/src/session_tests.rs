//! The client session driven by real project lists from the API.

use axum::Router;
use pretty_assertions::assert_eq;
use shared_types::{
    AccessibleProject, ActiveProject, MemoryStore, ProjectRole, ProjectSession, ReloadOutcome,
    SettingsStore, ACTIVE_PROJECT_KEY,
};

use crate::common::{self, ALICE, BRUNO};

async fn fetch_projects(app: &Router, user: i64) -> Vec<AccessibleProject> {
    let (_, body) = common::get(app, "/api/projects", Some(user)).await;
    serde_json::from_value(body).expect("project list")
}

async fn reload(app: &Router, session: &mut ProjectSession<MemoryStore>, user: i64) -> ReloadOutcome {
    let token = session.begin_reload();
    let projects = fetch_projects(app, user).await;
    session.complete_reload(token, Ok(projects)).expect("reload")
}

#[tokio::test]
async fn first_load_selects_first_project_by_name() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };

    common::create_project(&app, ALICE, "Viadotto").await;
    let argine = common::create_project(&app, ALICE, "Argine").await;

    let mut session = ProjectSession::new(MemoryStore::new());
    let outcome = reload(&app, &mut session, ALICE).await;

    assert_eq!(
        outcome,
        ReloadOutcome::Applied { active: Some(argine.clone()), changed: true }
    );
    assert_eq!(session.active_role(), Some(ProjectRole::ProjectManager));
    assert_eq!(session.store().get(ACTIVE_PROJECT_KEY), Some(argine));
}

#[tokio::test]
async fn persisted_project_is_restored_while_accessible() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };

    common::create_project(&app, ALICE, "Argine").await;
    let viadotto = common::create_project(&app, ALICE, "Viadotto").await;

    let store = MemoryStore::with_entries([(ACTIVE_PROJECT_KEY, viadotto.as_str())]);
    let mut session = ProjectSession::new(store);
    reload(&app, &mut session, ALICE).await;

    assert_eq!(session.active_project_id(), Some(viadotto.as_str()));
}

#[tokio::test]
async fn losing_membership_falls_back_to_next_project() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };

    let argine = common::create_project(&app, ALICE, "Argine").await;
    let galleria = common::create_project(&app, ALICE, "Galleria").await;
    common::assign_role(&app, ALICE, &argine, BRUNO, "engineer").await;
    common::assign_role(&app, ALICE, &galleria, BRUNO, "foreman").await;

    let mut session = ProjectSession::new(MemoryStore::new());
    reload(&app, &mut session, BRUNO).await;
    session.switch_project(&galleria).expect("switch");
    assert_eq!(session.active_role(), Some(ProjectRole::Foreman));

    common::delete(&app, &format!("/api/projects/{galleria}/members/{BRUNO}"), ALICE).await;
    let outcome = reload(&app, &mut session, BRUNO).await;

    assert_eq!(
        outcome,
        ReloadOutcome::Applied { active: Some(argine.clone()), changed: true }
    );
    assert_eq!(session.active_role(), Some(ProjectRole::Engineer));
    assert!(!session.capabilities().can_manage_squads);

    common::delete(&app, &format!("/api/projects/{argine}/members/{BRUNO}"), ALICE).await;
    reload(&app, &mut session, BRUNO).await;

    assert_eq!(session.state(), &ActiveProject::Empty);
    assert_eq!(session.store().get(ACTIVE_PROJECT_KEY), None);
}

#[tokio::test]
async fn older_reload_completing_late_is_discarded() {
    let Some((app, _pool, _guard)) = common::test_app().await else { return };

    common::create_project(&app, ALICE, "Argine").await;

    let mut session = ProjectSession::new(MemoryStore::new());
    let first = session.begin_reload();
    let early = fetch_projects(&app, ALICE).await;

    let acquedotto = common::create_project(&app, ALICE, "Acquedotto").await;
    let second = session.begin_reload();
    let late = fetch_projects(&app, ALICE).await;

    let applied = session.complete_reload(second, Ok(late)).expect("second");
    assert!(matches!(applied, ReloadOutcome::Applied { .. }));
    let stale = session.complete_reload(first, Ok(early)).expect("first");
    assert_eq!(stale, ReloadOutcome::Stale);

    assert_eq!(session.projects().len(), 2);
    assert_eq!(session.active_project_id(), Some(acquedotto.as_str()));
}
