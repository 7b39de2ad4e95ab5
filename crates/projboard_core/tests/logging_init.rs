use projboard_core::{init_logging, logging_status, ProjectStatus, ProjectStore};

#[test]
fn init_logging_is_idempotent_and_rejects_reconfiguration() {
    let dir = tempfile::tempdir().unwrap();
    let other = tempfile::tempdir().unwrap();
    let dir_str = dir.path().to_str().unwrap().to_string();
    let other_str = other.path().to_str().unwrap().to_string();

    init_logging("info", &dir_str).expect("first init should succeed");
    init_logging(" INFO ", &dir_str).expect("same config should be idempotent");

    let level_err = init_logging("debug", &dir_str).expect_err("level switch must fail");
    assert!(level_err.contains("refusing to switch"));
    let dir_err = init_logging("info", &other_str).expect_err("dir switch must fail");
    assert!(dir_err.contains("refusing to switch"));

    let (level, active_dir) = logging_status().expect("logging should be active");
    assert_eq!(level, "info");
    assert_eq!(active_dir, dir.path());

    // Store events go through the active logger without panicking.
    let store = ProjectStore::new();
    let id = store.add_project("Build API", "Write REST endpoints", 3);
    store.move_project(id, ProjectStatus::Finished);
    log::logger().flush();
}

#[test]
fn init_logging_rejects_bad_arguments_before_touching_state() {
    assert!(init_logging("loud", "/tmp").is_err());
    assert!(init_logging("info", "relative/dir").is_err());
}
