use tracing::info;

use crate::cmd::FailurePolicy;
use crate::error::ProvisionResult;
use crate::step::{Context, Step};

/// Create the login account used for RDP and SSH sessions.
pub struct User;

impl User {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for User {
    fn default() -> Self {
        Self::new()
    }
}

/// Session command xrdp should launch for a desktop package, if
/// the package is one we know.
#[must_use]
pub fn session_command(desktop: &str) -> Option<&'static str> {
    match desktop {
        "xfce4" => Some("xfce4-session"),
        "mate-desktop-environment" | "mate-desktop-environment-core" => Some("mate-session"),
        "lxde" => Some("startlxde"),
        "kde-plasma-desktop" => Some("startplasma-x11"),
        _ => None,
    }
}

impl Step for User {
    fn name(&self) -> &'static str {
        "user"
    }

    fn run(&self, ctx: &Context<'_>) -> ProvisionResult<()> {
        let shell = ctx.shell;
        let user = ctx.config.user.as_str();

        if shell.run("id", &["-u", user]).is_ok() {
            info!(%user, "Account already exists, skipping");
            return Ok(());
        }

        info!(%user, "Creating account...");
        shell.run("useradd", &["-m", "-s", "/bin/bash", user])?;

        let credentials = format!("{user}:{}\n", ctx.config.user_password.expose());
        shell.run_with_stdin("chpasswd", &[], credentials.as_bytes())?;

        shell.run("usermod", &["-aG", "sudo", user])?;

        if let Some(session) = session_command(&ctx.config.desktop) {
            let path = format!("/home/{user}/.xsession");
            let written = FailurePolicy::Tolerated.settle(
                "writing .xsession",
                shell.run_with_stdin("tee", &[path.as_str()], format!("{session}\n").as_bytes()),
            )?;
            if written.is_some() {
                let owner = format!("{user}:{user}");
                FailurePolicy::Tolerated.settle(
                    "chown .xsession",
                    shell.run("chown", &[owner.as_str(), path.as_str()]),
                )?;
            }
        }

        info!(%user, "Account ready (sudo)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_sessions() {
        assert_eq!(session_command("xfce4"), Some("xfce4-session"));
        assert_eq!(session_command("lxde"), Some("startlxde"));
        assert_eq!(
            session_command("mate-desktop-environment"),
            Some("mate-session")
        );
    }

    #[test]
    fn unknown_session() {
        assert_eq!(session_command("ubuntu-desktop"), None);
    }
}
