//! The Guacamole side of the host: seed data, the custom image,
//! the compose stack and the post-launch check.

pub mod compose;
pub mod image;
pub mod seed;
pub mod stack;
pub mod verify;

pub use image::Image;
pub use stack::Stack;
pub use verify::{Verification, Verify};

/// Public image the custom gateway image is layered on.
pub const BASE_IMAGE: &str = "guacamole/guacamole:latest";
/// Tag of the locally built gateway image.
pub const IMAGE_TAG: &str = "custom-guacamole:latest";
pub const GUACD_IMAGE: &str = "guacamole/guacd:latest";
pub const DB_IMAGE: &str = "mysql:8.0";

pub const GUACD_SERVICE: &str = "guacd";
pub const DB_SERVICE: &str = "mysql";
/// Service and container name of the web gateway.
pub const GATEWAY_SERVICE: &str = "guacamole";

pub const DB_NAME: &str = "guacamole_db";
pub const DB_USER: &str = "guacamole_user";
/// Port the web gateway listens on inside its container.
pub const GATEWAY_INTERNAL_PORT: u16 = 8080;
/// Path the web UI is served under.
pub const WEB_PATH: &str = "/guacamole/";

/// Directory (relative to the work dir) mounted as the database
/// init directory.
pub const INITDB_DIR: &str = "initdb";
pub const SCHEMA_FILE: &str = "001-schema.sql";
pub const SEED_FILE: &str = "002-seed.sql";
pub const DOCKERFILE: &str = "Dockerfile";
pub const COMPOSE_FILE: &str = "docker-compose.yml";
