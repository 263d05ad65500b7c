//! Host-level provisioning: packages, the login account and the
//! firewall.

pub mod firewall;
pub mod packages;
pub mod preflight;
pub mod user;

pub use firewall::Firewall;
pub use packages::Packages;
pub use preflight::Preflight;
pub use user::User;
