use tracing::{info, warn};

use crate::error::{ProvisionError, ProvisionResult};
use crate::step::{Context, Step};

/// Refuse to start on hosts the run cannot possibly succeed on.
pub struct Preflight;

impl Preflight {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for Preflight {
    fn default() -> Self {
        Self::new()
    }
}

impl Step for Preflight {
    fn name(&self) -> &'static str {
        "preflight"
    }

    fn run(&self, ctx: &Context<'_>) -> ProvisionResult<()> {
        if !ctx.shell.command_exists("apt-get") {
            return Err(ProvisionError::PrerequisiteMissing(
                "apt-get not found; an Ubuntu or Debian host is required".into(),
            ));
        }

        let uid = ctx.shell.run("id", &["-u"])?;
        if uid.trim() != "0" {
            return Err(ProvisionError::PrerequisiteMissing(format!(
                "must run as root (current uid {})",
                uid.trim()
            )));
        }

        if ctx.config.uses_default_credentials() {
            warn!("default credentials in use; only acceptable on ephemeral CI hosts");
        }

        info!("Prerequisites OK");
        Ok(())
    }
}
