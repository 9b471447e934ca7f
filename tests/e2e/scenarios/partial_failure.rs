use crate::harness::Scenario;
use recall_core::{DocKind, ProjectStatus};

#[test]
fn test_broken_project_does_not_block_siblings() {
    Scenario::new("broken_project_sibling")
        .doc("acme", "launch", DocKind::Tasklist, "- [ ] Ship v1 [high]\n")
        .doc("acme", "broken", DocKind::Tasklist, "- [ ] Never lands\n")
        .break_artifact("acme", "broken")
        .sync_all()
        .assert_sync_success(false)
        .assert_failed_projects(1)
        // The healthy sibling still synced, and only its memories landed.
        .assert_project_status("acme", "launch", ProjectStatus::Active)
        .assert_user_memories(&["Task [launch]: Ship v1"])
        .run()
        .expect("scenario should pass");
}
