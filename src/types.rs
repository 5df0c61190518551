use std::fmt;

use serde::Deserialize;

/// Temperature scale, either as reported by the vendor for a zone or as
/// presented by the host. Discriminants match the host's
/// TemperatureDisplayUnits values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[repr(u8)]
pub enum TemperatureScale {
    #[default]
    #[serde(alias = "C", alias = "c", alias = "celsius")]
    Celsius = 0,
    #[serde(alias = "F", alias = "f", alias = "fahrenheit")]
    Fahrenheit = 1,
}

impl TemperatureScale {
    pub fn as_vendor_str(&self) -> &'static str {
        match self {
            TemperatureScale::Celsius => "c",
            TemperatureScale::Fahrenheit => "f",
        }
    }

    pub fn from_vendor_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c" | "celsius" => Some(TemperatureScale::Celsius),
            "f" | "fahrenheit" => Some(TemperatureScale::Fahrenheit),
            _ => None,
        }
    }

    /// Convert `value` from this scale into `to`.
    pub fn convert(self, value: f64, to: TemperatureScale) -> f64 {
        match (self, to) {
            (TemperatureScale::Fahrenheit, TemperatureScale::Celsius) => fahrenheit_to_celsius(value),
            (TemperatureScale::Celsius, TemperatureScale::Fahrenheit) => celsius_to_fahrenheit(value),
            _ => value,
        }
    }
}

impl TryFrom<u8> for TemperatureScale {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, u8> {
        match value {
            0 => Ok(TemperatureScale::Celsius),
            1 => Ok(TemperatureScale::Fahrenheit),
            other => Err(other),
        }
    }
}

impl fmt::Display for TemperatureScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemperatureScale::Celsius => write!(f, "\u{00b0}C"),
            TemperatureScale::Fahrenheit => write!(f, "\u{00b0}F"),
        }
    }
}

/// Rounds halves toward positive infinity, so -2.5 becomes -2.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Fahrenheit to Celsius, rounded to the nearest 0.1.
pub fn fahrenheit_to_celsius(value: f64) -> f64 {
    round_half_up((value - 32.0) * 5.0 / 9.0 * 10.0) / 10.0
}

/// Celsius to Fahrenheit, rounded to the nearest whole degree.
pub fn celsius_to_fahrenheit(value: f64) -> f64 {
    round_half_up(value * 9.0 / 5.0 + 32.0)
}

/// Zone mode in the vendor's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneMode {
    Off,
    Heat,
    Cool,
    Auto,
}

impl ZoneMode {
    pub fn as_vendor_str(&self) -> &'static str {
        match self {
            ZoneMode::Off => "OFF",
            ZoneMode::Heat => "HEAT",
            ZoneMode::Cool => "COOL",
            ZoneMode::Auto => "AUTO",
        }
    }

    pub fn from_vendor_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OFF" => Some(ZoneMode::Off),
            "HEAT" => Some(ZoneMode::Heat),
            "COOL" => Some(ZoneMode::Cool),
            "AUTO" => Some(ZoneMode::Auto),
            _ => None,
        }
    }
}

impl From<HeatingCoolingState> for ZoneMode {
    fn from(state: HeatingCoolingState) -> Self {
        match state {
            HeatingCoolingState::Off => ZoneMode::Off,
            HeatingCoolingState::Heat => ZoneMode::Heat,
            HeatingCoolingState::Cool => ZoneMode::Cool,
            HeatingCoolingState::Auto => ZoneMode::Auto,
        }
    }
}

/// What the zone is actually doing. AUTO never appears here; it is resolved
/// to heating or cooling from the current temperature and setpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatingMode {
    Off,
    Heat,
    Cool,
}

/// Host heating/cooling state. Discriminants are the host's wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum HeatingCoolingState {
    #[default]
    Off = 0,
    Heat = 1,
    Cool = 2,
    Auto = 3,
}

impl TryFrom<u8> for HeatingCoolingState {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, u8> {
        match value {
            0 => Ok(HeatingCoolingState::Off),
            1 => Ok(HeatingCoolingState::Heat),
            2 => Ok(HeatingCoolingState::Cool),
            3 => Ok(HeatingCoolingState::Auto),
            other => Err(other),
        }
    }
}

impl From<HeatingCoolingState> for u8 {
    fn from(value: HeatingCoolingState) -> Self {
        value as u8
    }
}

impl From<ZoneMode> for HeatingCoolingState {
    fn from(mode: ZoneMode) -> Self {
        match mode {
            ZoneMode::Off => HeatingCoolingState::Off,
            ZoneMode::Heat => HeatingCoolingState::Heat,
            ZoneMode::Cool => HeatingCoolingState::Cool,
            ZoneMode::Auto => HeatingCoolingState::Auto,
        }
    }
}

impl From<OperatingMode> for HeatingCoolingState {
    fn from(mode: OperatingMode) -> Self {
        match mode {
            OperatingMode::Off => HeatingCoolingState::Off,
            OperatingMode::Heat => HeatingCoolingState::Heat,
            OperatingMode::Cool => HeatingCoolingState::Cool,
        }
    }
}

/// Point-in-time view of one zone. Temperatures are in `host_scale`.
///
/// Snapshots are never edited; a successful fetch produces a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneSnapshot {
    pub name: Option<String>,
    pub current_mode: OperatingMode,
    pub target_mode: ZoneMode,
    /// Scale the vendor reports this zone in.
    pub display_scale: TemperatureScale,
    pub host_scale: TemperatureScale,
    pub current_temperature: f64,
    pub target_temperature: f64,
    pub heating_setpoint: f64,
    pub cooling_setpoint: f64,
    /// Setpoints exactly as the vendor reported them, in `display_scale`.
    pub vendor_heating_setpoint: f64,
    pub vendor_cooling_setpoint: f64,
    pub mode_change_endpoint: String,
    pub setpoint_change_endpoint: String,
}

impl ZoneSnapshot {
    /// Setpoints in the vendor's scale as `(heat, cool)`, never round-tripped
    /// through the host scale.
    pub fn vendor_setpoints(&self) -> (f64, f64) {
        (self.vendor_heating_setpoint, self.vendor_cooling_setpoint)
    }
}
