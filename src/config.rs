use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ProvisionError, ProvisionResult};

pub const DEFAULT_USER: &str = "ciuser";
pub const DEFAULT_USER_PASSWORD: &str = "ciuser";
pub const DEFAULT_ADMIN_USER: &str = "guacadmin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "guacadmin";
pub const DEFAULT_DB_PASSWORD: &str = "guacamole_pass";
pub const SSH_PORT: u16 = 22;

/// A value that must never show up in logs or generated files.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.to_string())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Git publishing options for the install directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    pub enabled: bool,
    /// GitHub repository as `owner/name`.
    pub repo: Option<String>,
    #[serde(skip_serializing)]
    pub token: Option<Secret>,
    pub git_name: String,
    pub git_email: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            repo: None,
            token: None,
            git_name: "CI Provisioner".to_string(),
            git_email: "ci@example.com".to_string(),
        }
    }
}

/// Everything a provisioning run can be told.
///
/// # Example
///
/// ```
/// use deskgate::Config;
///
/// let config = Config::new()
///     .user("builder")
///     .gateway_port(9090)
///     .desktop("mate-desktop-environment");
///
/// assert_eq!(config.user, "builder");
/// assert_eq!(config.rdp_port, 3389);
/// assert_eq!(config.gateway_port, 9090);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub user: String,
    #[serde(skip_serializing)]
    pub user_password: Secret,
    pub rdp_port: u16,
    pub gateway_port: u16,
    pub work_dir: PathBuf,
    pub install_dir: PathBuf,
    pub desktop: String,
    pub admin_user: String,
    #[serde(skip_serializing)]
    pub admin_password: Secret,
    #[serde(skip_serializing)]
    pub db_password: Secret,
    pub verify_delay_secs: u64,
    pub publish: PublishConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user: DEFAULT_USER.to_string(),
            user_password: Secret::new(DEFAULT_USER_PASSWORD),
            rdp_port: 3389,
            gateway_port: 8080,
            work_dir: PathBuf::from("deskgate-build"),
            install_dir: PathBuf::from("/opt/ci-rdp-setup"),
            desktop: "xfce4".to_string(),
            admin_user: DEFAULT_ADMIN_USER.to_string(),
            admin_password: Secret::new(DEFAULT_ADMIN_PASSWORD),
            db_password: Secret::new(DEFAULT_DB_PASSWORD),
            verify_delay_secs: 20,
            publish: PublishConfig::default(),
        }
    }
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a YAML config file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> ProvisionResult<Self> {
        if !path.exists() {
            return Err(ProvisionError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Apply overrides from the process environment.
    pub fn from_env() -> ProvisionResult<Self> {
        Self::layered(None, |key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`. Empty values count as unset.
    ///
    /// `GITHUB_TOKEN` is only looked up when publishing is enabled.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> ProvisionResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(v) = get("CI_USER") {
            self.user = v;
        }
        if let Some(v) = get("CI_USER_PASSWORD") {
            self.user_password = Secret(v);
        }
        if let Some(v) = get("RDP_PORT") {
            self.rdp_port = parse_port("RDP_PORT", &v)?;
        }
        if let Some(v) = get("GUAC_PORT") {
            self.gateway_port = parse_port("GUAC_PORT", &v)?;
        }
        if let Some(v) = get("WORK_DIR") {
            self.work_dir = PathBuf::from(v);
        }
        if let Some(v) = get("INSTALL_DIR") {
            self.install_dir = PathBuf::from(v);
        }
        if let Some(v) = get("DESKTOP_ENV") {
            self.desktop = v;
        }
        if let Some(v) = get("GUAC_ADMIN_USER") {
            self.admin_user = v;
        }
        if let Some(v) = get("GUAC_ADMIN_PASSWORD") {
            self.admin_password = Secret(v);
        }
        if let Some(v) = get("MYSQL_PASSWORD") {
            self.db_password = Secret(v);
        }
        if let Some(v) = get("VERIFY_DELAY_SECS") {
            self.verify_delay_secs = v.parse().map_err(|_| {
                ProvisionError::InvalidConfig(format!("VERIFY_DELAY_SECS: '{v}' is not a number"))
            })?;
        }
        if let Some(v) = get("PUSH_TO_GITHUB") {
            self.publish.enabled = parse_flag(&v);
        }
        if let Some(v) = get("GITHUB_REPO") {
            self.publish.repo = Some(v);
        }
        if let Some(v) = get("GIT_USER_NAME") {
            self.publish.git_name = v;
        }
        if let Some(v) = get("GIT_USER_EMAIL") {
            self.publish.git_email = v;
        }
        if self.publish.enabled {
            if let Some(v) = get("GITHUB_TOKEN") {
                self.publish.token = Some(Secret(v));
            }
        }

        Ok(self)
    }

    /// Defaults, then the YAML file at `file` if given, then
    /// overrides from `lookup`.
    pub fn layered<F>(file: Option<&Path>, lookup: F) -> ProvisionResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = match file {
            Some(path) => Self::load(path)?,
            None => Self::new(),
        };
        base.with_env_overrides(lookup)
    }

    /// Serialize the non-secret settings.
    pub fn to_yaml(&self) -> ProvisionResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Like [`Config::to_yaml`] with directories made absolute, so
    /// the snapshot means the same thing from any working directory.
    pub fn snapshot(&self) -> ProvisionResult<String> {
        let mut pinned = self.clone();
        pinned.work_dir = absolute(&self.work_dir)?;
        pinned.install_dir = absolute(&self.install_dir)?;
        pinned.to_yaml()
    }

    /// True while any credential still has its built-in value.
    #[must_use]
    pub fn uses_default_credentials(&self) -> bool {
        self.user_password.expose() == DEFAULT_USER_PASSWORD
            || self.admin_password.expose() == DEFAULT_ADMIN_PASSWORD
            || self.db_password.expose() == DEFAULT_DB_PASSWORD
    }

    #[must_use]
    pub const fn verify_delay(&self) -> Duration {
        Duration::from_secs(self.verify_delay_secs)
    }

    #[must_use]
    pub fn user(mut self, name: &str) -> Self {
        self.user = name.to_string();
        self
    }

    #[must_use]
    pub fn user_password(mut self, password: &str) -> Self {
        self.user_password = Secret::new(password);
        self
    }

    #[must_use]
    pub const fn rdp_port(mut self, port: u16) -> Self {
        self.rdp_port = port;
        self
    }

    #[must_use]
    pub const fn gateway_port(mut self, port: u16) -> Self {
        self.gateway_port = port;
        self
    }

    #[must_use]
    pub fn work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    #[must_use]
    pub fn install_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.install_dir = dir.into();
        self
    }

    #[must_use]
    pub fn desktop(mut self, package: &str) -> Self {
        self.desktop = package.to_string();
        self
    }

    #[must_use]
    pub fn admin(mut self, user: &str, password: &str) -> Self {
        self.admin_user = user.to_string();
        self.admin_password = Secret::new(password);
        self
    }

    #[must_use]
    pub fn db_password(mut self, password: &str) -> Self {
        self.db_password = Secret::new(password);
        self
    }

    #[must_use]
    pub const fn verify_delay_secs(mut self, secs: u64) -> Self {
        self.verify_delay_secs = secs;
        self
    }

    /// Enable publishing to `repo` (`owner/name`) with `token`.
    #[must_use]
    pub fn publish_to(mut self, repo: &str, token: &str) -> Self {
        self.publish.enabled = true;
        self.publish.repo = Some(repo.to_string());
        self.publish.token = Some(Secret::new(token));
        self
    }

    #[must_use]
    pub fn git_identity(mut self, name: &str, email: &str) -> Self {
        self.publish.git_name = name.to_string();
        self.publish.git_email = email.to_string();
        self
    }
}

fn absolute(path: &Path) -> ProvisionResult<PathBuf> {
    if let Ok(canonical) = path.canonicalize() {
        return Ok(canonical);
    }
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn parse_port(key: &str, value: &str) -> ProvisionResult<u16> {
    value
        .trim()
        .parse()
        .map_err(|_| ProvisionError::InvalidConfig(format!("{key}: '{value}' is not a valid port")))
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
