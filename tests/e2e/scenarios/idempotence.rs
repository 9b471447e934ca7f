use crate::harness::Scenario;
use recall_core::DocKind;

#[test]
fn test_resync_is_a_fixed_point() {
    // The first pass annotates the sources (shifting their mtimes);
    // every pass after that reproduces the stores byte for byte under
    // the scenario's fixed clock.
    Scenario::new("resync_fixed_point")
        .doc(
            "acme",
            "launch",
            DocKind::Tasklist,
            "# Tasks\n\n- [ ] Ship v1 [high]\n- [~] Wait for legal review\n",
        )
        .doc(
            "acme",
            "launch",
            DocKind::Status,
            "# Status\n\n## Next Steps\n\n- ship the beta\n",
        )
        .sync_all()
        .sync_all()
        .capture_user_store()
        .sync_all()
        .assert_user_store_unchanged()
        .assert_validate_clean(true)
        .run()
        .expect("scenario should pass");
}

#[test]
fn test_merge_does_not_duplicate_memories() {
    Scenario::new("merge_no_duplicates")
        .doc("acme", "launch", DocKind::Tasklist, "- [ ] Ship v1 [high]\n")
        .sync_all()
        .sync_all()
        .sync_all()
        .assert_user_memories(&["Task [launch]: Ship v1"])
        .run()
        .unwrap();
}
