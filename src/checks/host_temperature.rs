use super::{CheckError, CheckResult, Probe, Status};
use crate::api::Session;
use crate::config::{require_non_empty, ConfigError};
use crate::inventory::{HealthState, NumericSensor};
use async_trait::async_trait;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct HostTemperatureCheck {
    pub dns_name: String,
    pub sensor_prefix: String,
}

impl HostTemperatureCheck {
    pub fn new(dns_name: impl Into<String>, sensor_prefix: impl Into<String>) -> Self {
        Self {
            dns_name: dns_name.into(),
            sensor_prefix: sensor_prefix.into(),
        }
    }
}

/// First temperature sensor, in API order, whose name starts with `prefix`.
pub fn select_sensor<'a>(
    sensors: &'a [NumericSensor],
    prefix: &str,
) -> Option<&'a NumericSensor> {
    sensors
        .iter()
        .find(|s| s.is_temperature() && s.name.starts_with(prefix))
}

pub fn classify_health(state: &HealthState) -> Status {
    match state {
        HealthState::Green => Status::Ok,
        HealthState::Yellow => Status::Warning,
        HealthState::Red => Status::Critical,
        HealthState::Unknown | HealthState::Other(_) => Status::Unknown,
    }
}

#[async_trait]
impl Probe for HostTemperatureCheck {
    fn name(&self) -> &'static str {
        "host_temperature"
    }

    fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty("hostname", &self.dns_name)?;
        require_non_empty("sensor name", &self.sensor_prefix)
    }

    async fn evaluate<S: Session>(&self, session: &S) -> Result<CheckResult, CheckError> {
        debug!(dns_name = %self.dns_name, "looking for host");
        let Some(host) = session.find_host_by_dns_name(&self.dns_name).await? else {
            info!(dns_name = %self.dns_name, "host not found");
            return Err(CheckError::HostNotFound {
                dns_name: self.dns_name.clone(),
            });
        };
        info!(host = %host.name, "host found");
        debug!(
            model = host.model.as_deref().unwrap_or("unknown"),
            sensors = host.sensors.len(),
            "host hardware"
        );

        let Some(sensor) = select_sensor(&host.sensors, &self.sensor_prefix) else {
            info!(prefix = %self.sensor_prefix, "temperature sensor not found");
            return Err(CheckError::SensorNotFound {
                prefix: self.sensor_prefix.clone(),
            });
        };

        let health = sensor.health();
        let reading = sensor.reading();
        debug!(
            sensor = %sensor.name,
            health = %health,
            reading = %reading,
            "sensor selected"
        );

        Ok(CheckResult::new(
            classify_health(&health),
            format!(
                "Host {} temperature sensor {} reading is {} {}",
                host.name, sensor.name, reading, sensor.base_units
            ),
        )
        .with_perf_data(format!("temperature={reading}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeSession;
    use crate::inventory::{HealthDescription, HostSystem};

    fn sensor(
        name: &str,
        sensor_type: &str,
        reading: i64,
        modifier: i32,
        health: &str,
    ) -> NumericSensor {
        NumericSensor {
            name: name.to_string(),
            sensor_type: sensor_type.to_string(),
            current_reading: reading,
            unit_modifier: modifier,
            base_units: "C".to_string(),
            health_state: HealthDescription {
                key: health.to_string(),
                label: String::new(),
            },
        }
    }

    fn host(sensors: Vec<NumericSensor>) -> FakeSession {
        FakeSession {
            hosts: vec![HostSystem {
                dns_name: "esx01.lab".to_string(),
                name: "esx01".to_string(),
                model: Some("PowerEdge R640".to_string()),
                sensors,
            }],
            ..FakeSession::default()
        }
    }

    #[test]
    fn health_table() {
        assert_eq!(classify_health(&HealthState::from("green")), Status::Ok);
        assert_eq!(classify_health(&HealthState::from("yellow")), Status::Warning);
        assert_eq!(classify_health(&HealthState::from("red")), Status::Critical);
        assert_eq!(classify_health(&HealthState::from("unknown")), Status::Unknown);
        assert_eq!(classify_health(&HealthState::from("Green")), Status::Unknown);
        assert_eq!(classify_health(&HealthState::from("")), Status::Unknown);
    }

    #[test]
    fn first_matching_temperature_sensor_wins() {
        let sensors = vec![
            sensor("CPU1 Fan", "fan", 4200, 0, "green"),
            sensor("CPU1 Temp", "temperature", 450, -1, "yellow"),
            sensor("CPU1 Temp 2", "temperature", 300, -1, "green"),
            sensor("CPU2 Temp", "temperature", 410, -1, "green"),
        ];
        let picked = select_sensor(&sensors, "CPU1").expect("sensor");
        assert_eq!(picked.name, "CPU1 Temp");
        assert_eq!(
            select_sensor(&sensors, "CPU2").map(|s| s.current_reading),
            Some(410)
        );
        assert!(select_sensor(&sensors, "PSU").is_none());
        assert!(select_sensor(&sensors, "cpu1").is_none());
    }

    #[tokio::test]
    async fn yellow_sensor_reports_warning_with_perf_data() {
        let session = host(vec![
            sensor("System Board Inlet", "temperature", 220, -1, "green"),
            sensor("CPU1 Temp", "temperature", 450, -1, "yellow"),
        ]);
        let result = HostTemperatureCheck::new("esx01.lab", "CPU1")
            .evaluate(&session)
            .await
            .expect("check result");
        assert_eq!(
            result.to_string(),
            "WARNING - Host esx01 temperature sensor CPU1 Temp reading is 45.0 C|temperature=45.0"
        );
        assert_eq!(result.exit_code(), 1);
    }

    #[tokio::test]
    async fn every_health_key_maps_to_its_exit_code() {
        let cases = [("green", 0), ("yellow", 1), ("red", 2), ("unknown", 3), ("grey", 3)];
        for (key, code) in cases {
            let session = host(vec![sensor("CPU1", "temperature", 5, 1, key)]);
            let result = HostTemperatureCheck::new("esx01.lab", "CPU1")
                .evaluate(&session)
                .await
                .expect("check result");
            assert_eq!(result.exit_code(), code, "health key {key}");
            assert_eq!(result.perf_data.as_deref(), Some("temperature=50"));
        }
    }

    #[tokio::test]
    async fn unknown_host_is_reported() {
        let err = HostTemperatureCheck::new("esx99.lab", "CPU1")
            .evaluate(&host(vec![]))
            .await
            .expect_err("host must not be found");
        let result = CheckResult::from(err);
        assert_eq!(result.to_string(), "UNKNOWN - Unable to find host esx99.lab");
        assert_eq!(result.exit_code(), 3);
    }

    #[tokio::test]
    async fn missing_sensor_is_reported() {
        let session = host(vec![sensor("CPU1 Fan", "fan", 4200, 0, "green")]);
        let err = HostTemperatureCheck::new("esx01.lab", "CPU1")
            .evaluate(&session)
            .await
            .expect_err("sensor must not be found");
        let result = CheckResult::from(err);
        assert_eq!(
            result.to_string(),
            "UNKNOWN - Unable to find temperature sensor named CPU1"
        );
        assert_eq!(result.exit_code(), 3);
    }
}
