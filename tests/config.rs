use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use deskgate::{Config, ProvisionError};

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

#[test]
fn env_overrides_apply() {
    let vars = env(&[
        ("CI_USER", "builder"),
        ("RDP_PORT", "13389"),
        ("GUAC_PORT", "9090"),
        ("INSTALL_DIR", "/srv/desk"),
        ("DESKTOP_ENV", "lxde"),
        ("GIT_USER_NAME", "Bot"),
        ("GIT_USER_EMAIL", "bot@example.org"),
    ]);

    let config = Config::new()
        .with_env_overrides(|k| vars.get(k).cloned())
        .unwrap();

    assert_eq!(config.user, "builder");
    assert_eq!(config.rdp_port, 13389);
    assert_eq!(config.gateway_port, 9090);
    assert_eq!(config.install_dir, PathBuf::from("/srv/desk"));
    assert_eq!(config.desktop, "lxde");
    assert_eq!(config.publish.git_name, "Bot");
    assert_eq!(config.publish.git_email, "bot@example.org");
}

#[test]
fn empty_values_keep_defaults() {
    let vars = env(&[("CI_USER", ""), ("GUAC_PORT", "")]);

    let config = Config::new()
        .with_env_overrides(|k| vars.get(k).cloned())
        .unwrap();

    assert_eq!(config.user, "ciuser");
    assert_eq!(config.gateway_port, 8080);
}

#[test]
fn invalid_port_is_rejected() {
    let vars = env(&[("RDP_PORT", "99999")]);

    let err = Config::new()
        .with_env_overrides(|k| vars.get(k).cloned())
        .unwrap_err();

    assert!(matches!(err, ProvisionError::InvalidConfig(ref m) if m.contains("RDP_PORT")));
}

#[test]
fn token_not_read_when_publish_disabled() {
    let vars = env(&[("GITHUB_REPO", "o/r"), ("GITHUB_TOKEN", "secret")]);
    let seen = RefCell::new(Vec::new());

    let config = Config::new()
        .with_env_overrides(|k| {
            seen.borrow_mut().push(k.to_string());
            vars.get(k).cloned()
        })
        .unwrap();

    assert!(!config.publish.enabled);
    assert!(config.publish.token.is_none());
    assert!(!seen.borrow().iter().any(|k| k == "GITHUB_TOKEN"));
}

#[test]
fn token_read_when_publish_enabled() {
    let vars = env(&[
        ("PUSH_TO_GITHUB", "true"),
        ("GITHUB_REPO", "o/r"),
        ("GITHUB_TOKEN", "secret"),
    ]);

    let config = Config::new()
        .with_env_overrides(|k| vars.get(k).cloned())
        .unwrap();

    assert!(config.publish.enabled);
    assert_eq!(config.publish.repo.as_deref(), Some("o/r"));
    assert_eq!(
        config.publish.token.as_ref().map(|t| t.expose()),
        Some("secret")
    );
}

#[test]
fn yaml_snapshot_has_no_secrets() {
    let config = Config::new()
        .user_password("user-pw")
        .admin("admin", "admin-pw")
        .db_password("db-pw")
        .publish_to("o/r", "tok-123");

    let yaml = config.to_yaml().unwrap();

    assert!(yaml.contains("user: ciuser"));
    assert!(yaml.contains("repo: o/r"));
    for secret in ["user-pw", "admin-pw", "db-pw", "tok-123"] {
        assert!(!yaml.contains(secret), "{secret} leaked");
    }
}

#[test]
fn load_partial_file_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deskgate.yml");
    std::fs::write(&path, "user: builder\ngateway_port: 9443\npublish:\n  repo: o/r\n").unwrap();

    let config = Config::load(&path).unwrap();

    assert_eq!(config.user, "builder");
    assert_eq!(config.gateway_port, 9443);
    assert_eq!(config.rdp_port, 3389);
    assert_eq!(config.publish.repo.as_deref(), Some("o/r"));
    assert_eq!(config.publish.git_name, "CI Provisioner");
}

#[test]
fn load_missing_file() {
    let err = Config::load(std::path::Path::new("/nonexistent/deskgate.yml")).unwrap_err();

    assert!(matches!(err, ProvisionError::FileNotFound(_)));
}

#[test]
fn custom_credentials_clear_default_warning() {
    let config = Config::new()
        .user_password("a")
        .admin("guacadmin", "b")
        .db_password("c");

    assert!(!config.uses_default_credentials());
}

#[test]
fn env_overrides_layer_over_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deskgate.yml");
    std::fs::write(&path, "user: builder\ngateway_port: 9443\n").unwrap();
    let vars = env(&[("GUAC_PORT", "7000")]);

    let config = Config::layered(Some(&path), |k| vars.get(k).cloned()).unwrap();

    assert_eq!(config.user, "builder");
    assert_eq!(config.gateway_port, 7000);
    assert_eq!(config.rdp_port, 3389);
}

#[test]
fn layered_without_file_uses_defaults() {
    let vars = env(&[("CI_USER", "builder")]);

    let config = Config::layered(None, |k| vars.get(k).cloned()).unwrap();

    assert_eq!(config.user, "builder");
    assert_eq!(config.gateway_port, 8080);
}
