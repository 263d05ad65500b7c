use tracing::info;

use crate::cmd::FailurePolicy;
use crate::config::SSH_PORT;
use crate::error::ProvisionResult;
use crate::step::{Context, Step};

/// Open SSH, RDP and the web gateway port in `ufw`.
pub struct Firewall;

impl Firewall {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for Firewall {
    fn default() -> Self {
        Self::new()
    }
}

impl Step for Firewall {
    fn name(&self) -> &'static str {
        "firewall"
    }

    fn run(&self, ctx: &Context<'_>) -> ProvisionResult<()> {
        let shell = ctx.shell;

        if !shell.command_exists("ufw") {
            info!("ufw not installed, skipping firewall rules");
            return Ok(());
        }

        let ports = [SSH_PORT, ctx.config.rdp_port, ctx.config.gateway_port];
        for port in ports {
            let rule = format!("{port}/tcp");
            info!(%rule, "Allowing inbound");
            FailurePolicy::Tolerated
                .settle(&format!("ufw allow {rule}"), shell.run("ufw", &["allow", &rule]))?;
        }

        FailurePolicy::Tolerated.settle("ufw enable", shell.run("ufw", &["--force", "enable"]))?;

        Ok(())
    }
}
