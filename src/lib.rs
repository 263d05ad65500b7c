//! Provision an Ubuntu CI host with a remote desktop and a
//! browser-based gateway to it.
//!
//! `deskgate` installs XRDP and a desktop environment, creates a
//! login account, opens the firewall, builds a Guacamole image with
//! a seeded admin account and SSH connection, starts the guacd /
//! MySQL / Guacamole stack with docker compose, and commits the
//! generated files to a local git repository that can optionally
//! be pushed to GitHub.
//!
//! # Overview
//!
//! A run is a [`Pipeline`] of named [`Step`]s executed in a fixed
//! order:
//!
//! 1. **preflight** - `apt-get` present, running as root
//! 2. **packages** - apt install, enable `xrdp` and `docker`
//! 3. **user** - create the account unless it exists
//! 4. **firewall** - open SSH, RDP and gateway ports in `ufw`
//! 5. **image** - write the SQL seed and Dockerfile, build the image
//! 6. **stack** - write `docker-compose.yml`, bring it up
//! 7. **verify** - one delayed check that the gateway is running
//! 8. **publish** - copy artifacts, commit, optionally push
//!
//! Every external command goes through a [`Shell`](cmd::Shell) with
//! an explicit [`FailurePolicy`](cmd::FailurePolicy): fatal commands
//! abort the run, tolerated ones log a warning.
//!
//! # Configuration
//!
//! Defaults suit an ephemeral CI host. Override them with a YAML
//! file (`--config`) and environment variables such as `CI_USER`,
//! `RDP_PORT`, `GUAC_PORT`, `INSTALL_DIR`, `DESKTOP_ENV`,
//! `PUSH_TO_GITHUB`, `GITHUB_REPO` and `GITHUB_TOKEN`.
//!
//! ```sh
//! # Preview the generated files
//! deskgate render
//!
//! # Provision with a custom gateway port
//! sudo GUAC_PORT=9090 deskgate up
//!
//! # Check the containers
//! deskgate status
//! ```
//!
//! # Library use
//!
//! ```rust,no_run
//! use deskgate::{Config, Pipeline};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::new()
//!         .user("builder")
//!         .gateway_port(9090)
//!         .publish_to("acme/ci-desktop", "ghp_example");
//!
//!     Pipeline::new(config).execute()?;
//!     Ok(())
//! }
//! ```

// Allow noisy pedantic lints that don't add value for a
// provisioning tool crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod cmd;
pub mod config;
pub mod error;
pub mod gateway;
pub mod host;
pub mod logging;
pub mod pipeline;
pub mod publish;
pub mod step;

pub use cmd::{FailurePolicy, Shell, SystemShell};
pub use config::{Config, Secret};
pub use error::{ProvisionError, ProvisionResult};
pub use pipeline::Pipeline;
pub use step::{Context, Step};
