use std::thread;

use tracing::{info, warn};

use crate::cmd::FailurePolicy;
use crate::error::ProvisionResult;
use crate::gateway::{GATEWAY_SERVICE, WEB_PATH};
use crate::step::{Context, Step};

/// Outcome of the post-launch check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Running { url: String },
    NotRunning,
}

/// Wait once, then look for the gateway container.
///
/// This is a single blind delay, not a readiness probe: the
/// database may still be initializing when it reports success.
pub fn check(ctx: &Context<'_>) -> ProvisionResult<Verification> {
    let delay = ctx.config.verify_delay();
    if !delay.is_zero() {
        info!("Waiting {}s for containers to start...", delay.as_secs());
        thread::sleep(delay);
    }

    let names = FailurePolicy::Tolerated.settle(
        "listing containers",
        ctx.shell.run("docker", &["ps", "--format", "{{.Names}}"]),
    )?;

    let running = names.is_some_and(|out| out.lines().any(|l| l.trim() == GATEWAY_SERVICE));
    if !running {
        return Ok(Verification::NotRunning);
    }

    let ip = FailurePolicy::Tolerated
        .settle("resolving host IP", ctx.shell.run("hostname", &["-I"]))?
        .and_then(|out| primary_ip(&out))
        .unwrap_or_else(|| "localhost".to_string());

    Ok(Verification::Running {
        url: format!("http://{ip}:{}{WEB_PATH}", ctx.config.gateway_port),
    })
}

/// First address in `hostname -I` output.
#[must_use]
pub fn primary_ip(output: &str) -> Option<String> {
    output.split_whitespace().next().map(ToString::to_string)
}

/// Report whether the web gateway came up. Never fails the run.
pub struct Verify;

impl Verify {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for Verify {
    fn default() -> Self {
        Self::new()
    }
}

impl Step for Verify {
    fn name(&self) -> &'static str {
        "verify"
    }

    fn run(&self, ctx: &Context<'_>) -> ProvisionResult<()> {
        match check(ctx)? {
            Verification::Running { url } => {
                info!(%url, "Guacamole is running");
                info!(
                    "RDP: {}:{} as {}",
                    url_host(&url),
                    ctx.config.rdp_port,
                    ctx.config.user
                );
            }
            Verification::NotRunning => {
                warn!(
                    "Guacamole container is not running; inspect with `docker ps -a` and `docker logs {GATEWAY_SERVICE}`"
                );
            }
        }
        Ok(())
    }
}

fn url_host(url: &str) -> &str {
    url.trim_start_matches("http://")
        .split(':')
        .next()
        .unwrap_or("localhost")
}
