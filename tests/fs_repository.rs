use notemark::error::NoteMarkError;
use notemark::model::Outcome;
use notemark::notes::NoteStore;
use notemark::store::{FileRepository, NoteRepository};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_list_creates_missing_root() {
    let temp = tempdir().unwrap();
    let root = temp.path().join("nested").join("NoteMark");
    let repo = FileRepository::open(root.clone());

    assert!(repo.list().unwrap().is_empty());
    assert!(root.is_dir());
}

#[test]
fn test_writes_leave_no_temp_files() {
    let temp = tempdir().unwrap();
    let mut repo = FileRepository::open(temp.path().to_path_buf());

    repo.write("Plan", "one").unwrap();
    repo.write("Plan", "two").unwrap();

    let names: Vec<String> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["Plan.md".to_string()]);
    assert_eq!(repo.read("Plan").unwrap(), "two");
}

#[test]
fn test_list_ignores_other_files_and_dirs() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("a.md"), "A").unwrap();
    fs::write(temp.path().join("b.txt"), "B").unwrap();
    fs::write(temp.path().join(".hidden.md"), "H").unwrap();
    fs::create_dir(temp.path().join("dir.md")).unwrap();

    let repo = FileRepository::open(temp.path().to_path_buf());
    let notes = repo.list().unwrap();

    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title, "a");
    assert_eq!(notes[0].content.as_deref(), Some("A"));
}

#[test]
fn test_resolve_location_on_disk() {
    let temp = tempdir().unwrap();
    let repo = FileRepository::open(temp.path().to_path_buf());
    repo.list().unwrap();

    assert_eq!(
        repo.resolve_location(&temp.path().join("Inbox.md")).unwrap(),
        "Inbox"
    );
    assert_eq!(
        repo.resolve_location(std::path::Path::new("Inbox")).unwrap(),
        "Inbox"
    );
    assert!(matches!(
        repo.resolve_location(&temp.path().join("sub").join("Deep.md")),
        Err(NoteMarkError::InvalidLocation(_))
    ));
}

#[test]
fn test_store_lifecycle_on_disk() {
    let temp = tempdir().unwrap();
    let mut store = NoteStore::new(FileRepository::open(temp.path().to_path_buf()));
    store.load_all().unwrap();

    store.create("First", "# First").unwrap();
    store.create("Second", "").unwrap();
    assert_eq!(store.selected_note().unwrap().title, "Second");

    let saved = store.save("# Second\n\nbody").unwrap().done().unwrap();
    assert_eq!(
        fs::read_to_string(temp.path().join("Second.md")).unwrap(),
        "# Second\n\nbody"
    );

    let mut reloaded = NoteStore::new(FileRepository::open(temp.path().to_path_buf()));
    reloaded.load_all().unwrap();
    assert_eq!(reloaded.len(), 2);
    assert!(reloaded.position(&saved.title).is_some());

    assert!(matches!(store.remove_selected().unwrap(), Outcome::Done(_)));
    assert!(!temp.path().join("Second.md").exists());
    assert_eq!(store.selected_note().unwrap().title, "First");
}

#[test]
fn test_delete_of_vanished_file_keeps_memory() {
    let temp = tempdir().unwrap();
    let mut store = NoteStore::new(FileRepository::open(temp.path().to_path_buf()));
    store.create("Gone", "x").unwrap();
    fs::remove_file(temp.path().join("Gone.md")).unwrap();

    assert!(matches!(
        store.remove_selected(),
        Err(NoteMarkError::NoteNotFound(_))
    ));
    assert_eq!(store.len(), 1);
}
