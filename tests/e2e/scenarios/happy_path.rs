use crate::harness::Scenario;
use recall_core::{DocKind, ProjectStatus};

#[test]
fn test_single_project_sync() {
    Scenario::new("single_project_sync")
        .doc(
            "acme",
            "launch",
            DocKind::Tasklist,
            "# Tasks\n\n- [ ] Ship v1 [high]\n",
        )
        .doc(
            "acme",
            "launch",
            DocKind::Status,
            "# Status\n\n## Decisions\n\n- 2026-03-01: Use blue theme\n",
        )
        .sync_all()
        .assert_sync_success(true)
        .assert_project_status("acme", "launch", ProjectStatus::Active)
        .assert_user_memories(&[
            "Decision [launch]: Use blue theme",
            "Task [launch]: Ship v1",
        ])
        .assert_recent_order(&[
            "Decision [launch]: Use blue theme",
            "Task [launch]: Ship v1",
        ])
        .assert_workspace_memories("acme", 2)
        .assert_validate_clean(true)
        .run()
        .expect("scenario should pass");
}

#[test]
fn test_completed_project() {
    Scenario::new("completed_project")
        .doc(
            "acme",
            "wrapped",
            DocKind::Tasklist,
            "# Tasks\n\n- [x] design\n- [x] build\n",
        )
        .sync_all()
        .assert_sync_success(true)
        .assert_project_status("acme", "wrapped", ProjectStatus::Completed)
        // Completed tasks never become memories.
        .assert_user_memories(&[])
        .run()
        .unwrap();
}

#[test]
fn test_note_input_feeds_user_store() {
    Scenario::new("note_input")
        .doc(
            "acme",
            "launch",
            DocKind::Tasklist,
            "# Tasks\n\n- [ ] Ship v1 [high]\n",
        )
        .note("- try a weekly digest #digest\n- TODO: archive workspaces/acme/projects/launch\n")
        .sync_all()
        .assert_sync_success(true)
        .assert_user_memories(&[
            "Task [launch]: Ship v1",
            "try a weekly digest #digest",
            "Task: archive workspaces/acme/projects/launch",
        ])
        .run()
        .unwrap();
}

#[test]
fn test_scope_filter_only_touches_named_workspace() {
    Scenario::new("scope_filter")
        .doc("acme", "launch", DocKind::Tasklist, "- [ ] Ship v1\n")
        .doc("beta", "site", DocKind::Tasklist, "- [ ] Draft copy\n")
        .sync_workspace("acme")
        .assert_sync_success(true)
        .assert_workspace_memories("acme", 1)
        .run()
        .unwrap();
}
