//! Nagios plugins for vSphere: guest power state and host temperature
//! sensors, read through the VI/JSON API of vCenter or ESXi.

pub mod api;
pub mod checks;
pub mod cli;
pub mod config;
pub mod inventory;
pub mod logging;
pub mod report;
pub mod session;

pub use checks::{CheckResult, Status};
pub use session::run_check;
