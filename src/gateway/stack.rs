use tracing::info;

use crate::error::ProvisionResult;
use crate::gateway::{COMPOSE_FILE, compose};
use crate::step::{Context, Step};

/// Write `docker-compose.yml` and bring the stack up detached.
pub struct Stack;

impl Stack {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

impl Step for Stack {
    fn name(&self) -> &'static str {
        "stack"
    }

    fn run(&self, ctx: &Context<'_>) -> ProvisionResult<()> {
        let work_dir = &ctx.config.work_dir;
        std::fs::create_dir_all(work_dir)?;

        let path = work_dir.join(COMPOSE_FILE);
        std::fs::write(&path, compose::render(ctx.config)?)?;
        let file = path.to_string_lossy().to_string();

        info!("Starting containers...");
        // Ubuntu's docker.io ships without the compose plugin; the
        // docker-compose package provides the standalone binary.
        if ctx.shell.command_exists("docker-compose") {
            ctx.shell
                .run_interactive("docker-compose", &["-f", &file, "up", "-d"])
        } else {
            ctx.shell
                .run_interactive("docker", &["compose", "-f", &file, "up", "-d"])
        }
    }
}
