use std::fs;
use std::path::Path;

use daylist_core::error::CoreError;
use daylist_core::lifecycle::{CloseCoordinator, ClosePolicy, CloseState, Confirmation};
use daylist_core::manager::TaskManager;
use daylist_core::messages::MessageBundle;
use daylist_core::prefs::{Locale, PrefWarning, PrefsStore, Theme};
use daylist_core::task::{Task, TaskId, TaskSet};
use tempfile::tempdir;

fn en_bundle() -> MessageBundle {
    MessageBundle::new(&Locale::new("en"))
}

fn store_at(path: &Path) -> PrefsStore {
    PrefsStore::open(path).expect("open store")
}

#[test]
fn task_blob_round_trips_through_the_store() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("prefs.data");

    let mut set = TaskSet::new();
    set.add(Task::with_state("stand-up notes", true));
    set.add(Task::with_state("review queue", false));
    set.add(Task::with_state("water the plants", true));

    store_at(&path).set_tasks(&set).expect("save tasks");

    let loaded = store_at(&path)
        .get_tasks(&en_bundle())
        .expect("load tasks");
    assert_eq!(loaded.len(), set.len());
    for (original, restored) in set.iter().zip(loaded.iter()) {
        assert_eq!(original.label(), restored.label());
        assert_eq!(original.is_done(), restored.is_done());
    }
}

#[test]
fn fresh_store_yields_the_default_prompt_task() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("prefs.data");

    let tasks = store_at(&path)
        .get_tasks(&en_bundle())
        .expect("load tasks");
    assert_eq!(tasks.len(), 1);
    let only = tasks.iter().next().expect("default task");
    assert_eq!(only.label(), "Add more tasks");
    assert!(!only.is_done());
}

#[test]
fn update_task_persists_before_returning() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("prefs.data");
    let bundle = en_bundle();

    let mut seed = TaskSet::new();
    seed.add(Task::new("only task"));
    store_at(&path).set_tasks(&seed).expect("seed tasks");

    let mut manager = TaskManager::load(store_at(&path), &bundle).expect("load manager");
    let id = manager.tasks().iter().next().expect("seeded task").id();
    manager.update_task(id, true).expect("update task");

    // A separate store handle sees the new state: write-through, not
    // write-back.
    let reloaded = store_at(&path).get_tasks(&bundle).expect("reload tasks");
    assert!(reloaded.iter().next().expect("task").is_done());
    assert!(reloaded.all_done());
}

#[test]
fn update_with_unknown_id_is_loud_and_changes_nothing() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("prefs.data");
    let bundle = en_bundle();

    let mut manager = TaskManager::load(store_at(&path), &bundle).expect("load manager");
    let err = manager
        .update_task(TaskId::from(u64::MAX), true)
        .expect_err("unknown id must fail");
    assert!(matches!(err, CoreError::TaskNotFound { .. }));
    assert!(!manager.all_done());
}

#[test]
fn corrupt_task_blob_is_an_error_not_a_default() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("prefs.data");
    fs::write(&path, "daylist.tasks=this is not json\n").expect("write corrupt blob");

    let err = store_at(&path)
        .get_tasks(&en_bundle())
        .expect_err("corrupt blob must not be defaulted");
    assert!(matches!(err, CoreError::CorruptTaskBlob { .. }));
}

#[test]
fn empty_stored_set_falls_back_with_a_warning() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("prefs.data");
    fs::write(&path, "daylist.tasks=[]\n").expect("write empty blob");

    let mut store = store_at(&path);
    let tasks = store.get_tasks(&en_bundle()).expect("load tasks");
    assert_eq!(tasks.len(), 1);
    assert_eq!(store.take_warnings(), vec![PrefWarning::EmptyTaskSet]);
    // Drained once; a second take is empty.
    assert!(store.take_warnings().is_empty());
}

#[test]
fn blank_task_blob_falls_back_like_an_absent_one() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("prefs.data");
    fs::write(&path, "daylist.tasks=\n").expect("write blank blob");

    let mut store = store_at(&path);
    let tasks = store.get_tasks(&en_bundle()).expect("load tasks");
    assert_eq!(tasks.len(), 1);
    assert_eq!(
        tasks.iter().next().expect("default task").label(),
        "Add more tasks"
    );
    assert_eq!(store.take_warnings(), vec![PrefWarning::EmptyTaskSet]);
}

#[test]
fn invalid_stored_theme_is_cleaned_up() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("prefs.data");
    fs::write(&path, "daylist.theme=NOT_A_THEME\n").expect("write bad theme");

    let mut store = store_at(&path);
    assert_eq!(store.get_theme().expect("get theme"), Theme::Orange);
    assert_eq!(
        store.take_warnings(),
        vec![PrefWarning::InvalidTheme {
            stored: "NOT_A_THEME".to_string()
        }]
    );

    // The bad entry is gone from the backing file: a second handle reads
    // the default with no warning.
    let mut reopened = store_at(&path);
    assert_eq!(reopened.get_theme().expect("get theme"), Theme::Orange);
    assert!(reopened.take_warnings().is_empty());
}

#[test]
fn theme_and_on_top_round_trip() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("prefs.data");

    {
        let mut store = store_at(&path);
        store.set_theme(Theme::Cyan).expect("set theme");
        store.set_always_on_top(false).expect("set ontop");
    }

    let mut store = store_at(&path);
    assert_eq!(store.get_theme().expect("get theme"), Theme::Cyan);
    assert!(!store.is_always_on_top().expect("get ontop"));
}

#[test]
fn on_top_defaults_to_true() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("prefs.data");
    assert!(store_at(&path).is_always_on_top().expect("get ontop"));
}

#[test]
fn invalid_stored_on_top_is_cleaned_up() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("prefs.data");
    fs::write(&path, "daylist.ontop=maybe\n").expect("write bad flag");

    let mut store = store_at(&path);
    assert!(store.is_always_on_top().expect("get ontop"));
    assert_eq!(
        store.take_warnings(),
        vec![PrefWarning::InvalidOnTop {
            stored: "maybe".to_string()
        }]
    );

    // The bad entry is gone from the backing file: a second handle reads
    // the default with no warning.
    let mut reopened = store_at(&path);
    assert!(reopened.is_always_on_top().expect("get ontop"));
    assert!(reopened.take_warnings().is_empty());
    let text = fs::read_to_string(&path).expect("read backing file");
    assert!(!text.contains("daylist.ontop"));
}

#[test]
fn locale_is_seeded_on_first_read() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("prefs.data");

    let seeded = store_at(&path).get_locale().expect("seed locale");

    // The seed write survives into a fresh handle.
    let stored = store_at(&path).get_locale().expect("read locale");
    assert_eq!(stored, seeded);
    let text = fs::read_to_string(&path).expect("read backing file");
    assert!(text.contains("daylist.locale.lang="));
}

#[test]
fn set_locale_without_country_removes_the_country_key() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("prefs.data");

    {
        let mut store = store_at(&path);
        store.set_locale("fr", Some("FR")).expect("set locale");
        store.set_locale("fr", None).expect("narrow locale");
    }

    let locale = store_at(&path).get_locale().expect("read locale");
    assert_eq!(locale, Locale::new("fr"));
}

#[test]
fn clear_wipes_every_namespaced_key() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("prefs.data");

    let mut store = store_at(&path);
    store.set_theme(Theme::Red).expect("set theme");
    store.set_always_on_top(false).expect("set ontop");
    store.clear().expect("clear");

    let mut reopened = store_at(&path);
    assert_eq!(reopened.get_theme().expect("get theme"), Theme::Orange);
    assert!(reopened.is_always_on_top().expect("get ontop"));
}

#[test]
fn close_protocol_with_unfinished_tasks() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("prefs.data");
    let bundle = en_bundle();

    let mut seed = TaskSet::new();
    seed.add(Task::with_state("first", true));
    seed.add(Task::with_state("second", true));
    seed.add(Task::new("third"));
    store_at(&path).set_tasks(&seed).expect("seed tasks");

    let mut manager = TaskManager::load(store_at(&path), &bundle).expect("load manager");
    let mut coordinator = CloseCoordinator::new(ClosePolicy::TerminateProcess);

    // 2 of 3 done: a close request asks first.
    assert_eq!(
        coordinator.request_close(manager.all_done()),
        CloseState::ConfirmPending
    );
    assert_eq!(coordinator.confirm(Confirmation::No), CloseState::Open);
    assert!(!manager.all_done());

    // Completing the last task closes with no prompt.
    let third = manager
        .tasks()
        .iter()
        .find(|t| !t.is_done())
        .expect("unfinished task")
        .id();
    manager.update_task(third, true).expect("finish third");
    assert_eq!(
        coordinator.task_completed(manager.all_done()),
        CloseState::Closing
    );
}
