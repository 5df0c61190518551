//! Characteristic Adapter: answers the host's get/set requests for the
//! thermostat service.
//!
//! Every read fetches the zone again. If that fails the last good snapshot
//! answers instead, and if there has never been one the value is
//! [`CharacteristicValue::Unknown`]. Writes are logged on failure and never
//! reported back to the host.

use std::sync::{Arc, RwLock};

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::client::NexiaClient;
use crate::config::AccessoryConfig;
use crate::protocol::{mode_change_body, setpoint_body};
use crate::translate::parse_zone;
use crate::types::*;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Characteristic {
    CurrentHeatingCoolingState,
    TargetHeatingCoolingState,
    CurrentTemperature,
    TargetTemperature,
    TemperatureDisplayUnits,
}

impl Characteristic {
    pub const ALL: [Characteristic; 5] = [
        Characteristic::CurrentHeatingCoolingState,
        Characteristic::TargetHeatingCoolingState,
        Characteristic::CurrentTemperature,
        Characteristic::TargetTemperature,
        Characteristic::TemperatureDisplayUnits,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Characteristic::CurrentHeatingCoolingState => "CurrentHeatingCoolingState",
            Characteristic::TargetHeatingCoolingState => "TargetHeatingCoolingState",
            Characteristic::CurrentTemperature => "CurrentTemperature",
            Characteristic::TargetTemperature => "TargetTemperature",
            Characteristic::TemperatureDisplayUnits => "TemperatureDisplayUnits",
        }
    }

    pub fn is_writable(&self) -> bool {
        matches!(
            self,
            Characteristic::TargetHeatingCoolingState
                | Characteristic::TargetTemperature
                | Characteristic::TemperatureDisplayUnits
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CharacteristicValue {
    Mode(HeatingCoolingState),
    Temperature(f64),
    Units(TemperatureScale),
    /// No fetch has succeeded yet.
    Unknown,
}

impl CharacteristicValue {
    /// Interpret a host wire value for `characteristic`.
    pub fn from_json(characteristic: Characteristic, value: &Value) -> Option<Self> {
        match characteristic {
            Characteristic::CurrentHeatingCoolingState | Characteristic::TargetHeatingCoolingState => {
                let raw = u8::try_from(value.as_u64()?).ok()?;
                HeatingCoolingState::try_from(raw).ok().map(CharacteristicValue::Mode)
            }
            Characteristic::CurrentTemperature | Characteristic::TargetTemperature => {
                value.as_f64().map(CharacteristicValue::Temperature)
            }
            Characteristic::TemperatureDisplayUnits => {
                let raw = u8::try_from(value.as_u64()?).ok()?;
                TemperatureScale::try_from(raw).ok().map(CharacteristicValue::Units)
            }
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            CharacteristicValue::Mode(state) => json!(*state as u8),
            CharacteristicValue::Temperature(t) => json!(t),
            CharacteristicValue::Units(scale) => json!(*scale as u8),
            CharacteristicValue::Unknown => Value::Null,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessoryInformation {
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
}

/// Outgoing setpoint body for a target temperature write. Both setpoints are
/// seeded from the snapshot; the current mode decides which one `requested`
/// replaces, and OFF replaces both. All values are in the vendor's scale.
pub fn setpoint_payload(snapshot: &ZoneSnapshot, requested: f64) -> Value {
    let (mut heat, mut cool) = snapshot.vendor_setpoints();
    let requested = snapshot.host_scale.convert(requested, snapshot.display_scale);
    match snapshot.current_mode {
        OperatingMode::Heat => heat = requested,
        OperatingMode::Cool => cool = requested,
        OperatingMode::Off => {
            heat = requested;
            cool = requested;
        }
    }
    setpoint_body(heat, cool)
}

pub struct ThermostatAccessory {
    information: AccessoryInformation,
    client: NexiaClient,
    host_scale: TemperatureScale,
    last_snapshot: RwLock<Option<Arc<ZoneSnapshot>>>,
}

impl ThermostatAccessory {
    pub fn new(name: impl Into<String>, client: NexiaClient, host_scale: TemperatureScale) -> Self {
        Self {
            information: AccessoryInformation {
                name: name.into(),
                manufacturer: "Nexia".to_string(),
                model: "Thermostat".to_string(),
                serial_number: "Default".to_string(),
            },
            client,
            host_scale,
            last_snapshot: RwLock::new(None),
        }
    }

    pub fn from_config(config: &AccessoryConfig) -> Result<Self> {
        config.validate()?;
        let client = config.client_builder().build()?;
        let mut accessory = Self::new(&config.name, client, config.display_scale);
        accessory.information.manufacturer = config.manufacturer.clone();
        accessory.information.model = config.model.clone();
        accessory.information.serial_number = config.serial_number.clone();
        Ok(accessory)
    }

    pub fn information(&self) -> &AccessoryInformation {
        &self.information
    }

    /// Characteristics of the thermostat service, in registration order.
    pub fn characteristics(&self) -> &'static [Characteristic] {
        &Characteristic::ALL
    }

    pub fn host_scale(&self) -> TemperatureScale {
        self.host_scale
    }

    pub fn last_snapshot(&self) -> Option<Arc<ZoneSnapshot>> {
        match self.last_snapshot.read() {
            Ok(slot) => slot.clone(),
            Err(e) => {
                warn!("snapshot cache unreadable: {e}");
                None
            }
        }
    }

    /// Fetch and parse the zone, replacing the cached snapshot on success.
    pub async fn refresh(&self) -> Result<Arc<ZoneSnapshot>> {
        let raw = self.client.fetch_zone().await?;
        let snapshot = Arc::new(parse_zone(&raw, self.host_scale)?);
        match self.last_snapshot.write() {
            Ok(mut slot) => *slot = Some(Arc::clone(&snapshot)),
            Err(e) => warn!("snapshot cache not updated: {e}"),
        }
        Ok(snapshot)
    }

    async fn snapshot_for_read(&self, characteristic: Characteristic) -> Option<Arc<ZoneSnapshot>> {
        match self.refresh().await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                let cached = self.last_snapshot();
                warn!(
                    characteristic = characteristic.name(),
                    cached = cached.is_some(),
                    "zone fetch failed: {e}"
                );
                cached
            }
        }
    }

    pub async fn current_heating_cooling_state(&self) -> Option<HeatingCoolingState> {
        self.snapshot_for_read(Characteristic::CurrentHeatingCoolingState)
            .await
            .map(|s| s.current_mode.into())
    }

    pub async fn target_heating_cooling_state(&self) -> Option<HeatingCoolingState> {
        self.snapshot_for_read(Characteristic::TargetHeatingCoolingState)
            .await
            .map(|s| s.target_mode.into())
    }

    pub async fn current_temperature(&self) -> Option<f64> {
        self.snapshot_for_read(Characteristic::CurrentTemperature)
            .await
            .map(|s| s.current_temperature)
    }

    pub async fn target_temperature(&self) -> Option<f64> {
        self.snapshot_for_read(Characteristic::TargetTemperature)
            .await
            .map(|s| s.target_temperature)
    }

    pub async fn temperature_display_units(&self) -> Option<TemperatureScale> {
        self.snapshot_for_read(Characteristic::TemperatureDisplayUnits)
            .await
            .map(|s| s.display_scale)
    }

    /// Host read. Always resolves.
    pub async fn get(&self, characteristic: Characteristic) -> CharacteristicValue {
        let value = match characteristic {
            Characteristic::CurrentHeatingCoolingState => self
                .current_heating_cooling_state()
                .await
                .map(CharacteristicValue::Mode),
            Characteristic::TargetHeatingCoolingState => self
                .target_heating_cooling_state()
                .await
                .map(CharacteristicValue::Mode),
            Characteristic::CurrentTemperature => self
                .current_temperature()
                .await
                .map(CharacteristicValue::Temperature),
            Characteristic::TargetTemperature => self
                .target_temperature()
                .await
                .map(CharacteristicValue::Temperature),
            Characteristic::TemperatureDisplayUnits => self
                .temperature_display_units()
                .await
                .map(CharacteristicValue::Units),
        };
        value.unwrap_or(CharacteristicValue::Unknown)
    }

    /// Host write. Never fails, but the future only resolves after the
    /// re-fetch and the POST have finished (or failed), so it can take up to
    /// two request timeouts. Failures are only logged.
    pub async fn set(&self, characteristic: Characteristic, value: CharacteristicValue) {
        match (characteristic, value) {
            (Characteristic::TargetHeatingCoolingState, CharacteristicValue::Mode(state)) => {
                if let Err(e) = self.write_target_mode(state).await {
                    warn!(?state, "target mode write failed: {e}");
                }
            }
            (Characteristic::TargetTemperature, CharacteristicValue::Temperature(temp)) => {
                if let Err(e) = self.write_target_temperature(temp).await {
                    warn!(temp, "target temperature write failed: {e}");
                }
            }
            (Characteristic::TemperatureDisplayUnits, CharacteristicValue::Units(scale)) => {
                debug!(?scale, "display units are set on the vendor account, ignoring");
            }
            (c, _) if !c.is_writable() => {
                warn!(characteristic = c.name(), "write to read-only characteristic ignored");
            }
            (c, v) => {
                warn!(characteristic = c.name(), value = ?v, "write with mismatched value ignored");
            }
        }
    }

    pub async fn write_target_mode(&self, state: HeatingCoolingState) -> Result<()> {
        let snapshot = self.refresh().await?;
        let mode = ZoneMode::from(state);
        let body = mode_change_body(mode.as_vendor_str());
        self.client
            .post_command("set_mode", &snapshot.mode_change_endpoint, &body)
            .await?;
        info!(mode = mode.as_vendor_str(), "zone mode change sent");
        Ok(())
    }

    /// `temp` is in the host scale.
    pub async fn write_target_temperature(&self, temp: f64) -> Result<()> {
        let snapshot = self.refresh().await?;
        let body = setpoint_payload(&snapshot, temp);
        self.client
            .post_command("set_setpoints", &snapshot.setpoint_change_endpoint, &body)
            .await?;
        info!(%body, "setpoint change sent");
        Ok(())
    }
}
