use super::*;

fn store_in(dir: &tempfile::TempDir) -> FileTokenStore {
    FileTokenStore::load(dir.path().join("session.json")).unwrap()
}

fn header(value: &'static str) -> HeaderValue {
    HeaderValue::from_static(value)
}

#[test]
fn missing_file_is_an_empty_session() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    assert_eq!(store.snapshot(), SessionData::default());
    assert!(store.access_token().is_none());
    assert!(store.cookie_header().is_none());
    assert!(!store.path().exists());
}

#[test]
fn saved_token_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    store_in(&dir).save_access_token("abc");

    let reloaded = store_in(&dir);
    assert_eq!(reloaded.access_token().as_deref(), Some("abc"));
    assert!(!dir.path().join("session.json.tmp").exists());
}

#[test]
fn empty_token_is_stored_as_absent() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.save_access_token("abc");
    store.save_access_token("");

    assert!(store_in(&dir).access_token().is_none());
}

#[test]
fn relay_keeps_only_the_refresh_pair() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.relay(&header("refresh_token=r-1; HttpOnly; Path=/; Max-Age=604800"));

    let reloaded = store_in(&dir);
    assert_eq!(reloaded.snapshot().cookie.as_deref(), Some("refresh_token=r-1"));
    assert_eq!(reloaded.cookie_header().unwrap(), "refresh_token=r-1");
}

#[test]
fn relay_ignores_other_cookies() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.relay(&header("refresh_token=r-1; Path=/"));
    store.relay(&header("refresh_token_hint=x; Path=/"));

    assert_eq!(store.snapshot().cookie.as_deref(), Some("refresh_token=r-1"));
}

#[test]
fn cleared_refresh_cookie_is_forgotten() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.save_access_token("abc");
    store.relay(&header("refresh_token=r-1; Path=/"));

    store.relay(&header("refresh_token=; Max-Age=0; Path=/"));
    store.remove_access_token();

    assert_eq!(store_in(&dir).snapshot(), SessionData::default());
}

#[test]
fn corrupt_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    fs::write(&path, "not json").unwrap();

    assert!(matches!(FileTokenStore::load(&path), Err(SessionError::Corrupt { .. })));
}

#[test]
fn hand_edited_empty_token_reads_as_absent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    fs::write(&path, r#"{"access_token": "", "cookie": "refresh_token=r-1"}"#).unwrap();

    let store = FileTokenStore::load(&path).unwrap();
    assert!(store.access_token().is_none());
    assert_eq!(store.cookie_header().unwrap(), "refresh_token=r-1");
}

#[cfg(unix)]
#[test]
fn session_file_is_private_to_owner() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.save_access_token("abc");

    let mode = fs::metadata(store.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
