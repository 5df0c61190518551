//! State Translator: raw zone record to [`ZoneSnapshot`].

use serde_json::Value;
use tracing::debug;

use crate::protocol::{
    RawZone, ThermostatActions, HEAT_SETPOINT_ACTION, MODE_ACTION, MODE_PATH_SEGMENT,
    SETPOINT_PATH_SEGMENT, THERMOSTAT_FEATURE, THERMOSTAT_MODE_FEATURE,
};
use crate::types::*;
use crate::{Error, Result};

/// Parse one zone record into a snapshot expressed in `host_scale`.
pub fn parse_zone(raw: &Value, host_scale: TemperatureScale) -> Result<ZoneSnapshot> {
    let zone = RawZone::decode(raw)?;

    let target_mode = ZoneMode::from_vendor_str(&zone.current_zone_mode)
        .ok_or_else(|| Error::UnknownZoneMode(zone.current_zone_mode.clone()))?;

    let (scale_str, setpoint_actions) = zone
        .thermostat()
        .ok_or(Error::MissingFeature(THERMOSTAT_FEATURE))?;
    let mode_actions = zone
        .thermostat_mode()
        .ok_or(Error::MissingFeature(THERMOSTAT_MODE_FEATURE))?;

    let mode_change_endpoint = mode_actions
        .update_thermostat_mode
        .as_ref()
        .map(|link| link.href.clone())
        .ok_or(Error::MissingAction(MODE_ACTION))?;
    let setpoint_change_endpoint =
        resolve_setpoint_endpoint(setpoint_actions, &mode_change_endpoint)?;

    let display_scale = TemperatureScale::from_vendor_str(scale_str)
        .ok_or_else(|| Error::UnknownScale(scale_str.to_string()))?;

    let current_mode = resolve_operating_mode(
        target_mode,
        zone.temperature,
        zone.heating_setpoint,
        zone.cooling_setpoint,
    );

    let convert = |v: f64| display_scale.convert(v, host_scale);
    let heating_setpoint = convert(zone.heating_setpoint);
    let cooling_setpoint = convert(zone.cooling_setpoint);
    let target_temperature = match current_mode {
        OperatingMode::Heat => heating_setpoint,
        _ => cooling_setpoint,
    };

    let snapshot = ZoneSnapshot {
        name: zone.name,
        current_mode,
        target_mode,
        display_scale,
        host_scale,
        current_temperature: convert(zone.temperature),
        target_temperature,
        heating_setpoint,
        cooling_setpoint,
        vendor_heating_setpoint: zone.heating_setpoint,
        vendor_cooling_setpoint: zone.cooling_setpoint,
        mode_change_endpoint,
        setpoint_change_endpoint,
    };
    debug!(
        mode = ?snapshot.current_mode,
        target = ?snapshot.target_mode,
        temp = snapshot.current_temperature,
        "parsed zone"
    );
    Ok(snapshot)
}

/// AUTO is resolved against the setpoints, with cooling checked last so it
/// wins when both conditions hold.
pub fn resolve_operating_mode(
    mode: ZoneMode,
    temperature: f64,
    heating_setpoint: f64,
    cooling_setpoint: f64,
) -> OperatingMode {
    match mode {
        ZoneMode::Off => OperatingMode::Off,
        ZoneMode::Heat => OperatingMode::Heat,
        ZoneMode::Cool => OperatingMode::Cool,
        ZoneMode::Auto => {
            let mut resolved = OperatingMode::Heat;
            if temperature < heating_setpoint {
                resolved = OperatingMode::Heat;
            }
            if temperature > cooling_setpoint {
                resolved = OperatingMode::Cool;
            }
            resolved
        }
    }
}

/// Heat action, then cool action, then the mode endpoint with its
/// `zone_mode` segment swapped for `setpoints`.
pub fn resolve_setpoint_endpoint(actions: &ThermostatActions, mode_endpoint: &str) -> Result<String> {
    if let Some(link) = &actions.set_heat_setpoint {
        return Ok(link.href.clone());
    }
    if let Some(link) = &actions.set_cool_setpoint {
        return Ok(link.href.clone());
    }
    if mode_endpoint.contains(MODE_PATH_SEGMENT) {
        return Ok(mode_endpoint.replacen(MODE_PATH_SEGMENT, SETPOINT_PATH_SEGMENT, 1));
    }
    Err(Error::MissingAction(HEAT_SETPOINT_ACTION))
}
