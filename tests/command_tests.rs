use frontmind::commands::*;
use frontmind::models::Direction;
use frontmind::storage::load_projects;
use frontmind::tree;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

// Use a mutex to ensure tests run serially since they modify the environment variable
static TEST_MUTEX: Mutex<()> = Mutex::new(());

fn with_test_db<F>(test_name: &str, f: F)
where
    F: FnOnce(PathBuf),
{
    let _guard = TEST_MUTEX.lock().unwrap();

    let mut db_path = env::temp_dir();
    db_path.push(format!("frontmind_test_{}.json", test_name));

    // Set env var
    env::set_var("FRONTMIND_DB", db_path.to_str().unwrap());

    // Clean up before test
    if db_path.exists() {
        fs::remove_file(&db_path).unwrap();
    }

    // Run test
    f(db_path.clone());

    // Clean up after test
    if db_path.exists() {
        fs::remove_file(&db_path).unwrap();
    }
    env::remove_var("FRONTMIND_DB");
}

#[test]
fn test_project_and_task_add() {
    with_test_db("add", |_path| {
        cmd_project_add("Launch".into(), Some("#8B5CF6".into()), true);

        let projects = load_projects();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "Launch");
        assert_eq!(projects[0].color, "#8B5CF6");
        assert!(!projects[0].is_north_star);

        let pid = projects[0].id.clone();
        cmd_add(pid.clone(), "Write spec".into(), None, Some("Sarah".into()), true);

        let projects = load_projects();
        assert_eq!(projects[0].tasks.len(), 1);
        assert_eq!(projects[0].tasks[0].text, "Write spec");
        assert_eq!(projects[0].tasks[0].assignee, "Sarah");
        assert!(projects[0].tasks[0].id.starts_with(&pid));
    });
}

#[test]
fn test_subtask_add_and_cascade_delete() {
    with_test_db("subtask", |_path| {
        cmd_project_add("P".into(), None, true);
        let pid = load_projects()[0].id.clone();

        cmd_add(pid.clone(), "Parent".into(), None, None, true);
        let parent_id = load_projects()[0].tasks[0].id.clone();
        cmd_add(pid.clone(), "Child".into(), Some(parent_id.clone()), None, true);

        let projects = load_projects();
        assert_eq!(projects[0].tasks[0].subtasks.len(), 1);
        assert_eq!(projects[0].tasks[0].subtasks[0].text, "Child");

        cmd_remove(pid.clone(), parent_id, true);
        let projects = load_projects();
        assert!(projects[0].tasks.is_empty());
    });
}

#[test]
fn test_complete_toggle() {
    with_test_db("complete", |_path| {
        cmd_project_add("P".into(), None, true);
        let pid = load_projects()[0].id.clone();
        cmd_add(pid.clone(), "Task".into(), None, None, true);
        let tid = load_projects()[0].tasks[0].id.clone();

        cmd_complete(pid.clone(), tid.clone(), true);
        assert!(load_projects()[0].tasks[0].completed);

        cmd_complete(pid, tid, true);
        assert!(!load_projects()[0].tasks[0].completed);
    });
}

#[test]
fn test_boundary_move_writes_nothing() {
    with_test_db("boundary", |path| {
        cmd_project_add("P".into(), None, true);
        let pid = load_projects()[0].id.clone();
        cmd_add(pid.clone(), "Only task".into(), None, None, true);
        let tid = load_projects()[0].tasks[0].id.clone();

        // A clamped no-op move must not touch the database at all.
        let before = fs::metadata(&path).unwrap().modified().unwrap();
        cmd_move(pid.clone(), tid.clone(), Direction::Up, true);
        cmd_move(pid.clone(), tid.clone(), Direction::Down, true);
        let after = fs::metadata(&path).unwrap().modified().unwrap();
        assert_eq!(before, after);

        // Neither must a move on a missing id.
        fs::remove_file(&path).unwrap();
        cmd_move(pid, tid, Direction::Up, true);
        assert!(!path.exists());
    });
}

#[test]
fn test_today_toggle_and_reorder() {
    with_test_db("today", |_path| {
        cmd_project_add("P".into(), None, true);
        let pid = load_projects()[0].id.clone();
        cmd_add(pid.clone(), "First".into(), None, None, true);
        cmd_add(pid.clone(), "Second".into(), None, None, true);
        let projects = load_projects();
        let (t1, t2) = (projects[0].tasks[0].id.clone(), projects[0].tasks[1].id.clone());

        cmd_today(pid.clone(), t1.clone(), true);
        cmd_today(pid.clone(), t2.clone(), true);

        let projects = load_projects();
        assert_eq!(projects[0].tasks[0].today_order, Some(0));
        assert_eq!(projects[0].tasks[1].today_order, Some(1));

        cmd_today_move(t2.clone(), Direction::Top, true);
        let projects = load_projects();
        assert_eq!(projects[0].tasks[0].today_order, Some(1));
        assert_eq!(projects[0].tasks[1].today_order, Some(0));

        // Leaving Today clears both flag and ordering key.
        cmd_today(pid, t2, true);
        let projects = load_projects();
        assert!(!projects[0].tasks[1].is_today);
        assert_eq!(projects[0].tasks[1].today_order, None);
    });
}

#[test]
fn test_project_star_and_move() {
    with_test_db("star", |_path| {
        cmd_project_add("A".into(), None, true);
        cmd_project_add("B".into(), None, true);
        let ids: Vec<String> = load_projects().iter().map(|p| p.id.clone()).collect();

        cmd_project_star(ids[1].clone(), true);
        let projects = load_projects();
        assert!(projects.iter().find(|p| p.id == ids[1]).unwrap().is_north_star);

        // B is alone in the North Star group; A alone in the regular group.
        cmd_project_move(ids[0].clone(), Direction::Up, true);
        let projects = load_projects();
        assert_eq!(projects.len(), 2);
    });
}

#[test]
fn test_export_and_import_roundtrip() {
    with_test_db("export_import", |_path| {
        cmd_project_add("P".into(), None, true);
        let pid = load_projects()[0].id.clone();
        cmd_add(pid.clone(), "Task".into(), None, None, true);

        let mut export_path = env::temp_dir();
        export_path.push("frontmind_test_export.json");
        cmd_export(Some(export_path.clone()), true);
        assert!(export_path.exists());

        // Wipe and restore from the backup.
        cmd_reset(true);
        assert!(load_projects().is_empty());

        cmd_import(export_path.clone(), true);
        let projects = load_projects();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].tasks[0].text, "Task");

        fs::remove_file(export_path).unwrap();
    });
}

#[test]
fn test_import_malformed_leaves_state_untouched() {
    with_test_db("import_bad", |_path| {
        cmd_project_add("Keep me".into(), None, true);

        let mut bad_path = env::temp_dir();
        bad_path.push("frontmind_test_bad_import.json");
        fs::write(&bad_path, "{ not json ]").unwrap();

        cmd_import(bad_path.clone(), true);

        let projects = load_projects();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "Keep me");

        fs::remove_file(bad_path).unwrap();
    });
}

#[test]
fn test_legacy_blob_migrates_today_fields() {
    with_test_db("migrate", |path| {
        // A blob written before the Today list existed: no isToday/todayOrder
        // anywhere, including subtasks.
        let legacy = r##"[
            {
                "id": "1",
                "name": "Old project",
                "isNorthStar": true,
                "color": "#EC4899",
                "tasks": [
                    {
                        "id": "1-1",
                        "text": "Old task",
                        "completed": false,
                        "assignee": "Mike",
                        "subtasks": [
                            { "id": "1-1-1", "text": "Old subtask", "completed": true, "assignee": "", "subtasks": [] }
                        ]
                    }
                ]
            }
        ]"##;
        fs::write(&path, legacy).unwrap();

        let projects = load_projects();
        assert_eq!(projects.len(), 1);
        assert!(projects[0].is_north_star);
        let t = &projects[0].tasks[0];
        assert!(!t.is_today);
        assert_eq!(t.today_order, None);
        assert!(!t.subtasks[0].is_today);
        assert_eq!(t.subtasks[0].today_order, None);
    });
}

#[test]
fn test_remove_missing_task_keeps_state() {
    with_test_db("missing", |_path| {
        cmd_project_add("P".into(), None, true);
        let pid = load_projects()[0].id.clone();
        cmd_add(pid.clone(), "Task".into(), None, None, true);

        cmd_remove(pid.clone(), "does-not-exist".into(), true);
        cmd_edit(pid.clone(), "does-not-exist".into(), Some("x".into()), None, true);
        cmd_complete(pid, "does-not-exist".into(), true);

        let projects = load_projects();
        assert_eq!(tree::count_tasks(&projects[0].tasks), 1);
        assert_eq!(projects[0].tasks[0].text, "Task");
        assert!(!projects[0].tasks[0].completed);
    });
}
