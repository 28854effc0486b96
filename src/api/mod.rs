pub mod vsphere;

use crate::config::{ConfigError, Endpoint};
use crate::inventory::{GuestVm, HostSystem};
use async_trait::async_trait;
use thiserror::Error;

pub use vsphere::VsphereConnector;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("cannot build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error(transparent)]
    Endpoint(#[from] ConfigError),
    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{path} returned HTTP {status}: {body}")]
    Status {
        path: String,
        status: u16,
        body: String,
    },
    #[error("unexpected response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("login response carried no session id")]
    MissingSession,
}

/// Opens authenticated sessions against a management endpoint.
#[async_trait]
pub trait Connector: Send + Sync {
    type Session: Session;

    async fn connect(&self, endpoint: &Endpoint) -> Result<Self::Session, ApiError>;
}

/// An open session. Lookups return `Ok(None)` when the inventory has no
/// matching object.
#[async_trait]
pub trait Session: Send + Sync {
    async fn find_vm_by_uuid(&self, uuid: &str) -> Result<Option<GuestVm>, ApiError>;

    async fn find_host_by_dns_name(&self, dns_name: &str)
        -> Result<Option<HostSystem>, ApiError>;

    async fn disconnect(&self) -> Result<(), ApiError>;
}
