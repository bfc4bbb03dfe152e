//! Unit tests for session configuration parsing.

use super::*;
use mockable::MockEnv;
use rstest::rstest;
use std::collections::HashMap;

struct KeyFile {
    _dir: tempfile::TempDir,
    path: PathBuf,
}

impl KeyFile {
    fn with_len(len: usize) -> Self {
        let dir = tempfile::tempdir().expect("temporary directory");
        let path = dir.path().join("session_key");
        std::fs::write(&path, vec![b'k'; len]).expect("write key file");
        Self { _dir: dir, path }
    }

    fn path_str(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

fn mock_env(vars: HashMap<&'static str, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

fn release_vars(key_file: &KeyFile) -> HashMap<&'static str, String> {
    HashMap::from([
        (KEY_FILE_ENV, key_file.path_str()),
        (COOKIE_SECURE_ENV, "1".to_owned()),
        (SAMESITE_ENV, "Strict".to_owned()),
        (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
    ])
}

fn release_error(vars: HashMap<&'static str, String>) -> SessionConfigError {
    match session_settings_from_env(&mock_env(vars), BuildMode::Release) {
        Ok(_) => panic!("release settings should have been rejected"),
        Err(error) => error,
    }
}

#[rstest]
fn release_valid_settings_succeed() {
    let key_file = KeyFile::with_len(SESSION_KEY_MIN_LEN);
    let settings = session_settings_from_env(&mock_env(release_vars(&key_file)), BuildMode::Release)
        .expect("valid release settings");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
}

#[rstest]
#[case(COOKIE_SECURE_ENV)]
#[case(SAMESITE_ENV)]
#[case(ALLOW_EPHEMERAL_ENV)]
fn release_requires_every_toggle(#[case] missing: &'static str) {
    let key_file = KeyFile::with_len(SESSION_KEY_MIN_LEN);
    let mut vars = release_vars(&key_file);
    vars.remove(missing);
    let error = release_error(vars);
    assert!(matches!(error, SessionConfigError::MissingEnv { name } if name == missing));
}

#[rstest]
#[case("maybe")]
#[case("")]
fn release_rejects_unparseable_booleans(#[case] value: &str) {
    let key_file = KeyFile::with_len(SESSION_KEY_MIN_LEN);
    let mut vars = release_vars(&key_file);
    vars.insert(COOKIE_SECURE_ENV, value.to_owned());
    let error = release_error(vars);
    assert!(matches!(
        error,
        SessionConfigError::InvalidEnv { name: COOKIE_SECURE_ENV, .. }
    ));
}

#[rstest]
fn release_rejects_ephemeral_keys() {
    let key_file = KeyFile::with_len(SESSION_KEY_MIN_LEN);
    let mut vars = release_vars(&key_file);
    vars.insert(ALLOW_EPHEMERAL_ENV, "yes".to_owned());
    assert!(matches!(release_error(vars), SessionConfigError::EphemeralNotAllowed));
}

#[rstest]
fn release_rejects_short_keys() {
    let key_file = KeyFile::with_len(16);
    let error = release_error(release_vars(&key_file));
    assert!(matches!(error, SessionConfigError::KeyTooShort { length: 16, .. }));
}

#[rstest]
fn release_rejects_missing_key_file() {
    let key_file = KeyFile::with_len(SESSION_KEY_MIN_LEN);
    let mut vars = release_vars(&key_file);
    vars.insert(KEY_FILE_ENV, key_file.path.with_file_name("absent").to_string_lossy().into_owned());
    assert!(matches!(release_error(vars), SessionConfigError::KeyRead { .. }));
}

#[rstest]
fn release_rejects_insecure_same_site_none() {
    let key_file = KeyFile::with_len(SESSION_KEY_MIN_LEN);
    let mut vars = release_vars(&key_file);
    vars.insert(COOKIE_SECURE_ENV, "0".to_owned());
    vars.insert(SAMESITE_ENV, "None".to_owned());
    assert!(matches!(release_error(vars), SessionConfigError::InsecureSameSiteNone));
}

#[rstest]
fn debug_defaults_generate_an_ephemeral_key() {
    let mut vars = HashMap::new();
    vars.insert(KEY_FILE_ENV, "/definitely/not/here/session_key".to_owned());
    let settings = session_settings_from_env(&mock_env(vars), BuildMode::Debug)
        .expect("debug falls back to defaults");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn debug_invalid_same_site_falls_back_to_lax() {
    let key_file = KeyFile::with_len(SESSION_KEY_MIN_LEN);
    let mut vars = release_vars(&key_file);
    vars.insert(SAMESITE_ENV, "sideways".to_owned());
    let settings = session_settings_from_env(&mock_env(vars), BuildMode::Debug)
        .expect("debug tolerates bad SameSite");
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn key_file_contents_drive_the_key() {
    let first = KeyFile::with_len(SESSION_KEY_MIN_LEN);
    let a = session_settings_from_env(&mock_env(release_vars(&first)), BuildMode::Release)
        .expect("valid settings");
    let b = session_settings_from_env(&mock_env(release_vars(&first)), BuildMode::Release)
        .expect("valid settings");
    assert_eq!(
        fingerprint::key_fingerprint(&a.key),
        fingerprint::key_fingerprint(&b.key)
    );
}
