//! Unit tests for session configuration parsing.

use super::*;
use mockable::MockEnv;
use rstest::rstest;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug)]
struct TempKeyFile {
    path: PathBuf,
}

impl TempKeyFile {
    fn new(len: usize) -> std::io::Result<Self> {
        let path = std::env::temp_dir().join(format!("ticketdesk-session-key-{}", Uuid::new_v4()));
        std::fs::write(&path, vec![b'k'; len])?;
        Ok(Self { path })
    }

    fn path_string(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

impl Drop for TempKeyFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

fn mock_env(vars: HashMap<&'static str, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

fn release_vars(key_file: &TempKeyFile) -> HashMap<&'static str, String> {
    HashMap::from([
        (VAR_KEY_FILE, key_file.path_string()),
        (VAR_COOKIE_SECURE, "1".to_owned()),
        (VAR_SAME_SITE, "Strict".to_owned()),
        (VAR_ALLOW_EPHEMERAL, "0".to_owned()),
    ])
}

fn release_error(vars: HashMap<&'static str, String>) -> SessionConfigError {
    match session_settings_from_env(&mock_env(vars), BuildMode::Release) {
        Ok(_) => panic!("release configuration should be rejected"),
        Err(error) => error,
    }
}

#[rstest]
fn release_accepts_complete_configuration() {
    let key_file = TempKeyFile::new(MIN_KEY_BYTES).expect("key file");
    let settings = session_settings_from_env(&mock_env(release_vars(&key_file)), BuildMode::Release)
        .expect("valid release settings");

    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
    assert_eq!(settings.ttl, DEFAULT_TTL);
}

#[rstest]
#[case(VAR_COOKIE_SECURE)]
#[case(VAR_SAME_SITE)]
#[case(VAR_ALLOW_EPHEMERAL)]
fn release_requires_each_toggle(#[case] missing: &'static str) {
    let key_file = TempKeyFile::new(MIN_KEY_BYTES).expect("key file");
    let mut vars = release_vars(&key_file);
    vars.remove(missing);

    let err = release_error(vars);
    assert!(matches!(err, SessionConfigError::Missing { var } if var == missing));
}

#[rstest]
#[case(VAR_COOKIE_SECURE, "maybe")]
#[case(VAR_SAME_SITE, "sometimes")]
#[case(VAR_ALLOW_EPHEMERAL, "")]
#[case(VAR_TTL_HOURS, "0")]
#[case(VAR_TTL_HOURS, "forever")]
fn release_rejects_invalid_values(#[case] name: &'static str, #[case] value: &str) {
    let key_file = TempKeyFile::new(MIN_KEY_BYTES).expect("key file");
    let mut vars = release_vars(&key_file);
    vars.insert(name, value.to_owned());

    let err = release_error(vars);
    assert!(matches!(err, SessionConfigError::Invalid { var, .. } if var == name));
}

#[rstest]
fn release_rejects_ephemeral_keys() {
    let key_file = TempKeyFile::new(MIN_KEY_BYTES).expect("key file");
    let mut vars = release_vars(&key_file);
    vars.insert(VAR_ALLOW_EPHEMERAL, "yes".to_owned());

    assert!(matches!(
        release_error(vars),
        SessionConfigError::EphemeralKeyInRelease
    ));
}

#[rstest]
fn release_rejects_same_site_none_without_secure_cookie() {
    let key_file = TempKeyFile::new(MIN_KEY_BYTES).expect("key file");
    let mut vars = release_vars(&key_file);
    vars.insert(VAR_COOKIE_SECURE, "0".to_owned());
    vars.insert(VAR_SAME_SITE, "None".to_owned());

    assert!(matches!(
        release_error(vars),
        SessionConfigError::SameSiteNoneNeedsSecure
    ));
}

#[rstest]
fn release_rejects_short_key() {
    let key_file = TempKeyFile::new(MIN_KEY_BYTES - 1).expect("key file");

    let err = release_error(release_vars(&key_file));
    assert!(matches!(
        err,
        SessionConfigError::KeyTooShort { length, .. } if length == MIN_KEY_BYTES - 1
    ));
}

#[rstest]
fn release_rejects_missing_key_file() {
    let mut vars = HashMap::from([
        (VAR_COOKIE_SECURE, "1".to_owned()),
        (VAR_SAME_SITE, "Lax".to_owned()),
        (VAR_ALLOW_EPHEMERAL, "0".to_owned()),
    ]);
    vars.insert(
        VAR_KEY_FILE,
        std::env::temp_dir()
            .join(format!("missing-{}", Uuid::new_v4()))
            .to_string_lossy()
            .into_owned(),
    );

    assert!(matches!(release_error(vars), SessionConfigError::KeyUnreadable { .. }));
}

#[rstest]
fn debug_defaults_are_secure_and_lax() {
    let mut vars = HashMap::new();
    vars.insert(
        VAR_KEY_FILE,
        std::env::temp_dir()
            .join(format!("missing-{}", Uuid::new_v4()))
            .to_string_lossy()
            .into_owned(),
    );

    let settings =
        session_settings_from_env(&mock_env(vars), BuildMode::Debug).expect("debug defaults");

    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
#[case("TRUE", true)]
#[case(" n ", false)]
#[case("Yes", true)]
#[case("0", false)]
#[case("off", false)]
fn toggles_accept_common_spellings(#[case] raw: &str, #[case] expected: bool) {
    assert_eq!(parse_bool(raw), Some(expected));
}

#[rstest]
fn ttl_override_is_applied() {
    let key_file = TempKeyFile::new(MIN_KEY_BYTES).expect("key file");
    let mut vars = release_vars(&key_file);
    vars.insert(VAR_TTL_HOURS, "2".to_owned());

    let settings = session_settings_from_env(&mock_env(vars), BuildMode::Release)
        .expect("valid release settings");
    assert_eq!(settings.ttl, Duration::from_secs(2 * 3600));
}

#[rstest]
fn debug_keeps_same_site_none_on_insecure_cookie() {
    let vars = HashMap::from([
        (VAR_COOKIE_SECURE, "0".to_owned()),
        (VAR_SAME_SITE, "none".to_owned()),
        (
            VAR_KEY_FILE,
            std::env::temp_dir()
                .join(format!("missing-{}", Uuid::new_v4()))
                .to_string_lossy()
                .into_owned(),
        ),
    ]);

    let settings =
        session_settings_from_env(&mock_env(vars), BuildMode::Debug).expect("debug tolerates it");

    assert!(!settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::None);
}
