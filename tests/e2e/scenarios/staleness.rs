use crate::harness::Scenario;
use recall_core::DocKind;

#[test]
fn test_stale_artifact_names_the_newer_source() {
    Scenario::new("stale_artifact")
        .doc("acme", "launch", DocKind::Tasklist, "- [ ] Ship v1\n")
        .sync_all()
        .assert_validate_clean(true)
        .backdate_artifact("acme", "launch", 2)
        .assert_validate_clean(false)
        .assert_outdated_reason("acme/launch", "tasks.md")
        .run()
        .expect("scenario should pass");
}

#[test]
fn test_unsynced_root_is_all_drift() {
    Scenario::new("unsynced_root")
        .doc("acme", "launch", DocKind::Tasklist, "- [ ] Ship v1\n")
        .assert_validate_clean(false)
        .assert_outdated_reason("acme/launch", "missing")
        .run()
        .unwrap();
}
