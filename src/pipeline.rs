use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{info, info_span};

use crate::cmd::{Shell, SystemShell};
use crate::config::Config;
use crate::error::{ProvisionError, ProvisionResult};
use crate::gateway::{self, GATEWAY_SERVICE, Image, Stack, Verify, compose, seed};
use crate::host::{Firewall, Packages, Preflight, User};
use crate::publish::{self, Publish};
use crate::step::{Context, Step};

/// The provisioning run: a fixed sequence of steps applied to the
/// local host.
pub struct Pipeline {
    config: Config,
    shell: Box<dyn Shell>,
    steps: Vec<Box<dyn Step>>,
}

impl Pipeline {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            shell: Box::new(SystemShell),
            steps: default_steps(),
        }
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> ProvisionResult<Self> {
        Ok(Self::new(Config::from_env()?))
    }

    #[must_use]
    pub fn shell(mut self, shell: impl Shell + 'static) -> Self {
        self.shell = Box::new(shell);
        self
    }

    #[must_use]
    pub fn steps(mut self, steps: Vec<Box<dyn Step>>) -> Self {
        self.steps = steps;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Parse CLI arguments and dispatch the appropriate
    /// command.
    pub fn run(mut self) -> ProvisionResult<()> {
        let cli = Cli::parse();

        if let Some(path) = &cli.config {
            self.config = Config::layered(Some(path), |key| std::env::var(key).ok())?;
        }

        match cli.command {
            Command::Up => self.execute(),
            Command::Render => {
                self.cmd_render();
                Ok(())
            }
            Command::Status => self.cmd_status(),
        }
    }

    /// Run every step in order, stopping at the first failure.
    pub fn execute(&self) -> ProvisionResult<()> {
        let ctx = Context::new(&self.config, self.shell.as_ref());

        for step in &self.steps {
            let name = step.name();
            let _span = info_span!("step", name).entered();
            info!("Starting");
            step.run(&ctx).map_err(|source| ProvisionError::Step {
                step: name.to_string(),
                source: Box::new(source),
            })?;
        }

        info!("Provisioning complete");
        Ok(())
    }

    /// Print every generated file without touching the host.
    pub fn cmd_render(&self) {
        let config = &self.config;

        eprintln!("=== Dry run: no changes will be made ===");
        eprintln!();

        eprintln!("--- {}/{} ---", gateway::INITDB_DIR, gateway::SEED_FILE);
        println!("{}", seed::render(config));

        eprintln!("--- {} ---", gateway::DOCKERFILE);
        println!("{}", gateway::image::render_dockerfile());

        eprintln!("--- {} ---", gateway::COMPOSE_FILE);
        match compose::render(config) {
            Ok(content) => println!("{content}"),
            Err(e) => eprintln!("failed to render compose file: {e}"),
        }

        eprintln!("--- {} ---", publish::README_FILE);
        println!("{}", publish::render_readme(config));

        eprintln!("--- Steps that would run ---");
        for (i, name) in self.step_names().iter().enumerate() {
            eprintln!("{}. {name}", i + 1);
        }
    }

    fn cmd_status(&self) -> ProvisionResult<()> {
        let mut args = vec!["ps", "-a"];
        let filters: Vec<String> = [gateway::GUACD_SERVICE, gateway::DB_SERVICE, GATEWAY_SERVICE]
            .iter()
            .map(|name| format!("name=^{name}$"))
            .collect();
        for filter in &filters {
            args.push("--filter");
            args.push(filter);
        }
        self.shell.run_interactive("docker", &args)
    }
}

/// Preflight, host setup, gateway image and stack, check, publish.
#[must_use]
pub fn default_steps() -> Vec<Box<dyn Step>> {
    vec![
        Box::new(Preflight::new()),
        Box::new(Packages::new()),
        Box::new(User::new()),
        Box::new(Firewall::new()),
        Box::new(Image::new()),
        Box::new(Stack::new()),
        Box::new(Verify::new()),
        Box::new(Publish::new()),
    ]
}

#[derive(Parser)]
#[command(name = "deskgate")]
#[command(about = "Provision an XRDP desktop and Guacamole gateway on this host")]
struct Cli {
    /// YAML config file; environment variables still override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Provision this host
    Up,

    /// Print generated files without changing anything
    Render,

    /// Show the gateway containers
    Status,
}
