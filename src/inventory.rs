use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestVm {
    pub uuid: String,
    pub name: String,
    pub power_state: PowerState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSystem {
    pub dns_name: String,
    pub name: String,
    pub model: Option<String>,
    pub sensors: Vec<NumericSensor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericSensor {
    pub name: String,
    #[serde(default)]
    pub sensor_type: String,
    #[serde(default)]
    pub current_reading: i64,
    #[serde(default)]
    pub unit_modifier: i32,
    #[serde(default)]
    pub base_units: String,
    #[serde(default)]
    pub health_state: HealthDescription,
}

/// `healthState` is an ElementDescription; only its key drives classification.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct HealthDescription {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub label: String,
}

impl NumericSensor {
    pub fn is_temperature(&self) -> bool {
        self.sensor_type == "temperature"
    }

    pub fn health(&self) -> HealthState {
        HealthState::from(self.health_state.key.as_str())
    }

    pub fn reading(&self) -> Reading {
        Reading {
            value: self.current_reading,
            exponent: self.unit_modifier,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum PowerState {
    PoweredOn,
    PoweredOff,
    Suspended,
    Other(String),
}

impl From<String> for PowerState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "poweredOn" => Self::PoweredOn,
            "poweredOff" => Self::PoweredOff,
            "suspended" => Self::Suspended,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for PowerState {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PoweredOn => f.write_str("poweredOn"),
            Self::PoweredOff => f.write_str("poweredOff"),
            Self::Suspended => f.write_str("suspended"),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthState {
    Green,
    Yellow,
    Red,
    Unknown,
    Other(String),
}

impl From<&str> for HealthState {
    fn from(key: &str) -> Self {
        match key {
            "green" => Self::Green,
            "yellow" => Self::Yellow,
            "red" => Self::Red,
            "unknown" => Self::Unknown,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Green => f.write_str("green"),
            Self::Yellow => f.write_str("yellow"),
            Self::Red => f.write_str("red"),
            Self::Unknown => f.write_str("unknown"),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

/// Raw integer sensor reading scaled by a power-of-ten exponent.
///
/// Displays as an integer when the exponent is non-negative and with exactly
/// `-exponent` decimals otherwise, so `220 * 10^-1` renders as `22.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reading {
    pub value: i64,
    pub exponent: i32,
}

impl Reading {
    pub fn scaled(&self) -> f64 {
        self.value as f64 * 10_f64.powi(self.exponent)
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exponent >= 0 {
            let exact = u32::try_from(self.exponent)
                .ok()
                .and_then(|exp| 10_i64.checked_pow(exp))
                .and_then(|factor| self.value.checked_mul(factor));
            return match exact {
                Some(v) => write!(f, "{v}"),
                None => write!(f, "{}", self.scaled()),
            };
        }
        // Same digits as the plain float: 3900/-2 is 39.0, 4505/-2 is 45.05.
        let decimals = self.exponent.unsigned_abs() as usize;
        let rendered = format!("{:.*}", decimals, self.scaled());
        let trimmed = rendered.trim_end_matches('0');
        if trimmed.ends_with('.') {
            write!(f, "{trimmed}0")
        } else {
            f.write_str(trimmed)
        }
    }
}
