//! vSphere VI/JSON client (`/sdk/vim25/<release>/...`).
//!
//! Only the handful of managed-object calls the probes need: service content,
//! login/logout, the two SearchIndex finders and property reads on
//! VirtualMachine and HostSystem.

use super::{ApiError, Connector, Session};
use crate::config::{ConfigError, Endpoint};
use crate::inventory::{GuestVm, HostSystem, NumericSensor, PowerState};
use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use url::Url;

pub const SESSION_HEADER: &str = "vmware-api-session-id";
const USER_AGENT: &str = concat!("vsphere-probes/", env!("CARGO_PKG_VERSION"));
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Clone, Default)]
pub struct VsphereConnector;

impl VsphereConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Connector for VsphereConnector {
    type Session = VsphereSession;

    async fn connect(&self, endpoint: &Endpoint) -> Result<VsphereSession, ApiError> {
        let base = endpoint.api_base()?;
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(!endpoint.verify_tls)
            .build()
            .map_err(ApiError::Client)?;
        let mut rest = RestClient {
            http,
            base,
            session_id: None,
        };

        let content: ServiceContent = rest
            .get("ServiceInstance/ServiceInstance/content")
            .await?;
        if let Some(about) = &content.about {
            debug!(
                product = %about.full_name,
                api_version = %about.api_version,
                "service content retrieved"
            );
        }

        let login_path = format!("SessionManager/{}/Login", content.session_manager.value);
        let login = LoginRequest {
            user_name: &endpoint.username,
            password: &endpoint.password,
        };
        let response = rest.send(Method::POST, &login_path, Some(&login)).await?;
        let session_id = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .ok_or(ApiError::MissingSession)?;
        rest.session_id = Some(session_id);

        Ok(VsphereSession { rest, content })
    }
}

pub struct VsphereSession {
    rest: RestClient,
    content: ServiceContent,
}

impl VsphereSession {
    async fn find(
        &self,
        operation: &str,
        body: &(impl Serialize + Sync),
        expected_type: &str,
    ) -> Result<Option<ManagedObjectReference>, ApiError> {
        let path = format!("SearchIndex/{}/{operation}", self.content.search_index.value);
        let response = self.rest.send(Method::POST, &path, Some(body)).await?;
        let found: Option<ManagedObjectReference> = decode_optional(&path, response).await?;
        Ok(found.filter(|moref| {
            let matches = moref.kind == expected_type;
            if !matches {
                debug!(
                    kind = %moref.kind,
                    id = %moref.value,
                    "ignoring reference of unexpected type"
                );
            }
            matches
        }))
    }
}

#[async_trait]
impl Session for VsphereSession {
    async fn find_vm_by_uuid(&self, uuid: &str) -> Result<Option<GuestVm>, ApiError> {
        let request = FindByUuidRequest {
            uuid,
            vm_search: true,
            instance_uuid: false,
        };
        let Some(moref) = self.find("FindByUuid", &request, "VirtualMachine").await? else {
            return Ok(None);
        };

        let name: String = self
            .rest
            .get(&format!("VirtualMachine/{}/name", moref.value))
            .await?;
        let runtime: VmRuntime = self
            .rest
            .get(&format!("VirtualMachine/{}/runtime", moref.value))
            .await?;

        Ok(Some(GuestVm {
            uuid: uuid.to_string(),
            name,
            power_state: runtime.power_state,
        }))
    }

    async fn find_host_by_dns_name(
        &self,
        dns_name: &str,
    ) -> Result<Option<HostSystem>, ApiError> {
        let request = FindByDnsNameRequest {
            dns_name,
            vm_search: false,
        };
        let Some(moref) = self.find("FindByDnsName", &request, "HostSystem").await? else {
            return Ok(None);
        };

        let name: String = self
            .rest
            .get(&format!("HostSystem/{}/name", moref.value))
            .await?;
        let summary: HostSummary = self
            .rest
            .get(&format!("HostSystem/{}/summary", moref.value))
            .await?;
        let runtime: HostRuntime = self
            .rest
            .get(&format!("HostSystem/{}/runtime", moref.value))
            .await?;

        Ok(Some(HostSystem {
            dns_name: dns_name.to_string(),
            name,
            model: summary.hardware.and_then(|h| h.model),
            sensors: runtime.numeric_sensors(),
        }))
    }

    async fn disconnect(&self) -> Result<(), ApiError> {
        let path = format!("SessionManager/{}/Logout", self.content.session_manager.value);
        self.rest.send::<()>(Method::POST, &path, None).await?;
        Ok(())
    }
}

struct RestClient {
    http: Client,
    base: Url,
    session_id: Option<String>,
}

impl RestClient {
    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base.join(path).map_err(|source| {
            ApiError::Endpoint(ConfigError::Endpoint {
                endpoint: format!("{}{path}", self.base),
                source,
            })
        })
    }

    async fn send<B: Serialize + Sync + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, ApiError> {
        trace!(%method, path, "api request");
        let mut request = self.http.request(method, self.url(path)?);
        if let Some(id) = &self.session_id {
            request = request.header(SESSION_HEADER, id);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|source| ApiError::Transport {
            path: path.to_string(),
            source,
        })?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                path: path.to_string(),
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }
        Ok(response)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send::<()>(Method::GET, path, None).await?;
        let bytes = read_body(path, response).await?;
        serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
    }
}

async fn read_body(path: &str, response: Response) -> Result<Vec<u8>, ApiError> {
    let bytes = response.bytes().await.map_err(|source| ApiError::Transport {
        path: path.to_string(),
        source,
    })?;
    Ok(bytes.to_vec())
}

/// Finders answer 204 or `null` when nothing matches.
async fn decode_optional<T: DeserializeOwned>(
    path: &str,
    response: Response,
) -> Result<Option<T>, ApiError> {
    let bytes = read_body(path, response).await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
        path: path.to_string(),
        source,
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManagedObjectReference {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceContent {
    session_manager: ManagedObjectReference,
    search_index: ManagedObjectReference,
    #[serde(default)]
    about: Option<AboutInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AboutInfo {
    #[serde(default)]
    full_name: String,
    #[serde(default)]
    api_version: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    user_name: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FindByUuidRequest<'a> {
    uuid: &'a str,
    vm_search: bool,
    instance_uuid: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FindByDnsNameRequest<'a> {
    dns_name: &'a str,
    vm_search: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VmRuntime {
    power_state: PowerState,
}

#[derive(Debug, Deserialize)]
struct HostSummary {
    #[serde(default)]
    hardware: Option<HostHardwareSummary>,
}

#[derive(Debug, Deserialize)]
struct HostHardwareSummary {
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HostRuntime {
    #[serde(default)]
    health_system_runtime: Option<HealthSystemRuntime>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HealthSystemRuntime {
    #[serde(default)]
    system_health_info: Option<SystemHealthInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SystemHealthInfo {
    #[serde(default)]
    numeric_sensor_info: Option<Vec<NumericSensor>>,
}

impl HostRuntime {
    fn numeric_sensors(self) -> Vec<NumericSensor> {
        self.health_system_runtime
            .and_then(|h| h.system_health_info)
            .and_then(|s| s.numeric_sensor_info)
            .unwrap_or_default()
    }
}
