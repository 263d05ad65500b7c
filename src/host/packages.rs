use tracing::info;

use crate::cmd::FailurePolicy;
use crate::config::Config;
use crate::error::ProvisionResult;
use crate::step::{Context, Step};

/// Services enabled and started once packages are in place.
pub const SERVICES: [&str; 2] = ["xrdp", "docker"];

/// Install XRDP, the desktop and the container runtime via apt.
pub struct Packages;

impl Packages {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Full package list for `config`, desktop included.
    #[must_use]
    pub fn list(config: &Config) -> Vec<String> {
        [
            "xrdp",
            config.desktop.as_str(),
            "xorgxrdp",
            "dbus-x11",
            "docker.io",
            "docker-compose",
            "openssh-server",
            "git",
            "curl",
        ]
        .iter()
        .map(|p| (*p).to_string())
        .collect()
    }
}

impl Default for Packages {
    fn default() -> Self {
        Self::new()
    }
}

impl Step for Packages {
    fn name(&self) -> &'static str {
        "packages"
    }

    fn run(&self, ctx: &Context<'_>) -> ProvisionResult<()> {
        let shell = ctx.shell;

        info!("Updating package index...");
        shell.run_interactive("apt-get", &["update"])?;

        let packages = Self::list(ctx.config);
        info!(packages = %packages.join(" "), "Installing packages...");
        let mut args = vec!["DEBIAN_FRONTEND=noninteractive", "apt-get", "install", "-y"];
        args.extend(packages.iter().map(String::as_str));
        shell.run_interactive("env", &args)?;

        // xrdp reads the snakeoil key through this group
        FailurePolicy::Tolerated.settle(
            "adding xrdp to ssl-cert",
            shell.run("adduser", &["xrdp", "ssl-cert"]),
        )?;

        for service in SERVICES {
            FailurePolicy::Tolerated.settle(
                &format!("enabling {service}"),
                shell.run("systemctl", &["enable", "--now", service]),
            )?;
        }

        Ok(())
    }
}
