use crate::cmd::Shell;
use crate::config::Config;
use crate::error::ProvisionResult;

/// What every step gets to work with.
pub struct Context<'a> {
    pub config: &'a Config,
    pub shell: &'a dyn Shell,
}

impl<'a> Context<'a> {
    #[must_use]
    pub fn new(config: &'a Config, shell: &'a dyn Shell) -> Self {
        Self { config, shell }
    }
}

/// One named stage of a provisioning run.
///
/// Steps are expected to be safe to re-run on an already
/// provisioned host.
pub trait Step {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Apply the step. An error aborts the run.
    fn run(&self, ctx: &Context<'_>) -> ProvisionResult<()>;
}
