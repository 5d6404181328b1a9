use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use engine::storage::{FileStorage, SaveStore, Storage};
use serde::{Deserialize, Serialize};

fn unique_data_dir(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!("retrocade_storage_test_{tag}_{nanos}"))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct FakeState {
    grid: Vec<u32>,
    score: u32,
}

#[test]
fn saved_state_round_trips_through_the_filesystem() {
    let dir = unique_data_dir("roundtrip");
    let mut store = SaveStore::new(FileStorage::new(&dir));

    let state = FakeState {
        grid: vec![2, 0, 4, 8],
        score: 12,
    };
    store.save_state("2048", &state).expect("save state");
    assert_eq!(store.load_state::<FakeState>("2048"), Some(state));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn high_scores_survive_reopening_the_store() {
    let dir = unique_data_dir("reopen");

    {
        let mut store = SaveStore::new(FileStorage::new(&dir));
        store.record_score("space-invaders", 340);
    }

    let store = SaveStore::new(FileStorage::new(&dir));
    assert_eq!(store.high_score("space-invaders"), 340);

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn corrupt_files_on_disk_degrade_to_defaults() {
    let dir = unique_data_dir("corrupt");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("pong-high-score.json"), "{{{{").unwrap();
    fs::write(dir.join("pong-saved-state.json"), "also not json").unwrap();

    let store = SaveStore::new(FileStorage::new(&dir));
    assert_eq!(store.high_score("pong"), 0);
    assert_eq!(store.load_state::<FakeState>("pong"), None);

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn clear_state_removes_the_file_and_is_idempotent() {
    let dir = unique_data_dir("clear");
    let mut store = SaveStore::new(FileStorage::new(&dir));

    let state = FakeState {
        grid: vec![1],
        score: 1,
    };
    store.save_state("flappy-bird", &state).expect("save state");
    store.clear_state("flappy-bird");
    assert_eq!(store.load_state::<FakeState>("flappy-bird"), None);

    // Clearing again must not error or resurrect anything.
    store.clear_state("flappy-bird");
    assert_eq!(store.load_state::<FakeState>("flappy-bird"), None);

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn writes_leave_no_temp_files_behind() {
    let dir = unique_data_dir("tmpfiles");
    let mut storage = FileStorage::new(&dir);
    storage.write("2048-high-score", "64").expect("write");
    storage.write("2048-high-score", "128").expect("overwrite");

    let leftovers: Vec<_> = fs::read_dir(&dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
        .collect();
    assert!(leftovers.is_empty(), "temp files left behind: {leftovers:?}");
    assert_eq!(storage.read("2048-high-score"), Some("128".to_string()));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn env_override_selects_the_data_dir() {
    // Serialized against other env-reading tests by using a process-unique
    // variable value and restoring it afterwards.
    let dir = unique_data_dir("envdir");
    let previous = std::env::var_os("RETROCADE_DATA_DIR");
    unsafe { std::env::set_var("RETROCADE_DATA_DIR", &dir) };

    let storage = FileStorage::from_env();
    assert_eq!(storage.dir(), &dir);

    match previous {
        Some(v) => unsafe { std::env::set_var("RETROCADE_DATA_DIR", v) },
        None => unsafe { std::env::remove_var("RETROCADE_DATA_DIR") },
    }
}
