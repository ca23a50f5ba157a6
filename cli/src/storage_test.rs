use super::*;

fn scratch() -> FileStorage {
    let dir = std::env::temp_dir().join(format!("gallery-cli-{}", uuid::Uuid::new_v4()));
    FileStorage::new(dir.join("session.json"))
}

#[test]
fn missing_file_reads_as_empty() {
    let storage = scratch();
    assert_eq!(storage.read("access_token"), None);
}

#[test]
fn write_then_read_survives_new_handle() {
    let storage = scratch();
    storage.write("access_token", "tok-1");
    let reopened = FileStorage::new(storage.path());
    assert_eq!(reopened.read("access_token").as_deref(), Some("tok-1"));
    let _ = fs::remove_dir_all(storage.path().parent().unwrap());
}

#[test]
fn remove_keeps_other_keys() {
    let storage = scratch();
    storage.write("access_token", "tok-1");
    storage.write("other", "x");
    storage.remove("access_token");
    assert_eq!(storage.read("access_token"), None);
    assert_eq!(storage.read("other").as_deref(), Some("x"));
    let _ = fs::remove_dir_all(storage.path().parent().unwrap());
}

#[test]
fn corrupt_file_is_treated_as_empty() {
    let storage = scratch();
    fs::create_dir_all(storage.path().parent().unwrap()).unwrap();
    fs::write(storage.path(), "[1, 2]").unwrap();
    assert_eq!(storage.read("access_token"), None);
    storage.write("access_token", "tok-2");
    assert_eq!(storage.read("access_token").as_deref(), Some("tok-2"));
    let _ = fs::remove_dir_all(storage.path().parent().unwrap());
}
