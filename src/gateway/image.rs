use std::path::Path;

use tracing::info;

use crate::cmd::FailurePolicy;
use crate::error::ProvisionResult;
use crate::gateway::{BASE_IMAGE, DOCKERFILE, IMAGE_TAG, INITDB_DIR, SCHEMA_FILE, SEED_FILE, seed};
use crate::step::{Context, Step};

/// Render the image descriptor that layers the seed onto the base
/// Guacamole image.
#[must_use]
pub fn render_dockerfile() -> String {
    format!(
        "FROM {BASE_IMAGE}\n\
         COPY {INITDB_DIR}/{SEED_FILE} /docker-entrypoint-initdb.d/{SEED_FILE}\n"
    )
}

/// Write the seed, schema and Dockerfile, then build
/// `custom-guacamole:latest`.
pub struct Image {
    schema: bool,
}

impl Image {
    #[must_use]
    pub const fn new() -> Self {
        Self { schema: true }
    }

    /// Skip dumping the upstream schema from the base image.
    #[must_use]
    pub const fn without_schema(mut self) -> Self {
        self.schema = false;
        self
    }

    fn write_schema(ctx: &Context<'_>, initdb: &Path) -> ProvisionResult<()> {
        info!("Exporting database schema from {BASE_IMAGE}...");
        let schema = FailurePolicy::Tolerated.settle(
            "schema export",
            ctx.shell.run(
                "docker",
                &[
                    "run",
                    "--rm",
                    BASE_IMAGE,
                    "/opt/guacamole/bin/initdb.sh",
                    "--mysql",
                ],
            ),
        )?;

        if let Some(schema) = schema {
            std::fs::write(initdb.join(SCHEMA_FILE), format!("{schema}\n"))?;
        }
        Ok(())
    }
}

impl Default for Image {
    fn default() -> Self {
        Self::new()
    }
}

impl Step for Image {
    fn name(&self) -> &'static str {
        "image"
    }

    fn run(&self, ctx: &Context<'_>) -> ProvisionResult<()> {
        let work_dir = &ctx.config.work_dir;
        let initdb = work_dir.join(INITDB_DIR);
        std::fs::create_dir_all(&initdb)?;

        if self.schema {
            Self::write_schema(ctx, &initdb)?;
        }

        info!("Writing seed and Dockerfile to {}", work_dir.display());
        std::fs::write(initdb.join(SEED_FILE), seed::render(ctx.config))?;
        let dockerfile = work_dir.join(DOCKERFILE);
        std::fs::write(&dockerfile, render_dockerfile())?;

        info!("Building {IMAGE_TAG}...");
        let dockerfile = dockerfile.to_string_lossy().to_string();
        let context = work_dir.to_string_lossy().to_string();
        ctx.shell.run_interactive(
            "docker",
            &["build", "-t", IMAGE_TAG, "-f", &dockerfile, &context],
        )
    }
}
