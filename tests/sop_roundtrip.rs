//! Save/load behaviour of SOP documents through the public library API.
//!
//! Covers the document lifecycle end to end: an editing session is saved,
//! reloaded into a fresh session, overwritten, and rejected when a step has
//! no title.

use std::fs;

use sopmaker::{DocumentStore, SopError, Step, StepEditor};
use tempfile::TempDir;

fn store_in(temp_dir: &TempDir) -> DocumentStore {
    DocumentStore::new(temp_dir.path().join("sops"))
}

fn session(steps: &[(&str, &str, &str)]) -> StepEditor {
    let mut editor = StepEditor::new();
    for (title, summary, image) in steps {
        let i = editor.add_step();
        editor.set_title(i, title);
        editor.set_summary(i, summary);
        editor.set_image(i, image);
    }
    editor
}

#[test]
fn round_trip_preserves_content_and_order() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_in(&temp_dir);
    let editor = session(&[
        ("Isolate power", "Switch off breaker B3.\nLock and tag.", ""),
        ("Verify zero energy", "", "/photos/meter.jpg"),
        ("  Remove cover  ", "Four screws, keep them.\n\n", "rel/cover.png"),
        ("Inspect — wiring", "Look for scorch marks ⚠", ""),
    ]);

    store.save("panel-maintenance", editor.steps()).unwrap();
    let loaded = store.load("panel-maintenance").unwrap();

    assert_eq!(loaded, editor.steps());
}

#[test]
fn load_into_session_replaces_previous_steps() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_in(&temp_dir);
    store.save("short", &[Step::new("Only step")]).unwrap();

    let mut editor = session(&[("a", "", ""), ("b", "", ""), ("c", "", "")]);
    let steps = store.load("short").unwrap();
    editor.replace_steps(steps);

    assert_eq!(editor.len(), 1);
    assert_eq!(editor.steps()[0].title, "Only step");
}

#[test]
fn loading_twice_is_identical() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_in(&temp_dir);
    let editor = session(&[("One", "x", ""), ("Two", "", "y.png")]);
    store.save("twice", editor.steps()).unwrap();

    let first = store.load("twice").unwrap();
    let second = store.load("twice").unwrap();
    assert_eq!(first, second);
}

#[test]
fn empty_session_saves_and_loads_as_empty() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_in(&temp_dir);

    store.save("blank", StepEditor::new().steps()).unwrap();
    assert_eq!(store.load("blank").unwrap(), Vec::<Step>::new());
    assert_eq!(store.list().unwrap(), vec!["blank"]);
}

#[test]
fn untitled_step_aborts_save_and_keeps_prior_version() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_in(&temp_dir);
    let good = session(&[("Keep me", "", "")]);
    store.save("doc", good.steps()).unwrap();

    let mut bad = session(&[("Fine", "", ""), ("", "no title here", "")]);
    let err = store.save("doc", bad.steps()).unwrap_err();
    assert!(matches!(err, SopError::Validation { step: 2 }));
    assert_eq!(err.to_string(), "step 2: title required");

    // Nothing in the session was touched either
    assert_eq!(bad.len(), 2);
    assert_eq!(bad.steps()[1].summary, "no title here");

    assert_eq!(store.load("doc").unwrap(), good.steps());

    bad.set_title(1, "Now titled");
    store.save("doc", bad.steps()).unwrap();
    assert_eq!(store.load("doc").unwrap().len(), 2);
}

#[test]
fn overwrite_drops_every_old_step() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_in(&temp_dir);
    store
        .save(
            "rev",
            session(&[("Old 1", "", ""), ("Old 2", "", ""), ("Old 3", "", "")]).steps(),
        )
        .unwrap();
    store
        .save("rev", session(&[("New 1", "", "")]).steps())
        .unwrap();

    let loaded = store.load("rev").unwrap();
    assert_eq!(loaded.len(), 1);
    assert!(loaded.iter().all(|s| !s.title.starts_with("Old")));
}

#[test]
fn load_errors_are_distinguished() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_in(&temp_dir);

    assert!(store.load("ghost").unwrap_err().is_not_found());

    fs::create_dir_all(store.dir()).unwrap();
    fs::write(store.dir().join("garbled.json"), "not json at all").unwrap();
    assert!(matches!(
        store.load("garbled").unwrap_err(),
        SopError::Parse { .. }
    ));
}

#[test]
fn stored_file_matches_expected_layout() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_in(&temp_dir);

    let path = store
        .save(
            "layout",
            &[Step::new("Mix").with_summary("Stir 2 min").with_image("/img/mix.png")],
        )
        .unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(
        value,
        serde_json::json!([
            {"title": "Mix", "summary": "Stir 2 min", "image": "/img/mix.png"}
        ])
    );
}

#[test]
fn no_temp_files_left_behind() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_in(&temp_dir);

    store.save("a", &[Step::new("x")]).unwrap();
    let _ = store.save("a", &[Step::default()]);
    store.save("b", &[]).unwrap();

    let mut entries: Vec<_> = fs::read_dir(store.dir())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    entries.sort();
    assert_eq!(entries, vec!["a.json", "b.json"]);
}
