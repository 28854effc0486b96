use super::{CheckError, CheckResult, Probe, Status};
use crate::api::Session;
use crate::config::{require_non_empty, ConfigError};
use crate::inventory::PowerState;
use async_trait::async_trait;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct GuestPowerCheck {
    pub uuid: String,
}

impl GuestPowerCheck {
    pub fn new(uuid: impl Into<String>) -> Self {
        Self { uuid: uuid.into() }
    }
}

pub fn classify_power_state(state: &PowerState) -> Status {
    match state {
        PowerState::PoweredOn => Status::Ok,
        PowerState::PoweredOff => Status::Critical,
        PowerState::Suspended | PowerState::Other(_) => Status::Unknown,
    }
}

#[async_trait]
impl Probe for GuestPowerCheck {
    fn name(&self) -> &'static str {
        "guest_powerstate"
    }

    fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty("uuid", &self.uuid)
    }

    async fn evaluate<S: Session>(&self, session: &S) -> Result<CheckResult, CheckError> {
        debug!(uuid = %self.uuid, "looking for guest");
        let Some(vm) = session.find_vm_by_uuid(&self.uuid).await? else {
            info!(uuid = %self.uuid, "guest not found");
            return Err(CheckError::GuestNotFound {
                uuid: self.uuid.clone(),
            });
        };
        info!(name = %vm.name, "found guest");
        debug!(power_state = %vm.power_state, "read power state");

        let status = classify_power_state(&vm.power_state);
        Ok(CheckResult::new(
            status,
            format!("Guest {} powerstate is {}", vm.name, vm.power_state),
        ))
    }
}
