use serde::Deserialize;
use serde_json::{json, Value};

use crate::{Error, Result};

pub const DEFAULT_API_ROUTE: &str = "https://www.mynexia.com/mobile";

pub const HEADER_MOBILE_ID: &str = "X-MobileId";
pub const HEADER_API_KEY: &str = "X-ApiKey";
pub const HEADER_APP_VERSION: &str = "X-AppVersion";
pub const HEADER_ASSOCIATED_BRAND: &str = "X-AssociatedBrand";

pub const THERMOSTAT_FEATURE: &str = "thermostat";
pub const THERMOSTAT_MODE_FEATURE: &str = "thermostat_mode";
pub const MODE_ACTION: &str = "update_thermostat_mode";
pub const HEAT_SETPOINT_ACTION: &str = "set_heat_setpoint";

/// Segment of the mode endpoint replaced when no setpoint action is offered.
pub const MODE_PATH_SEGMENT: &str = "zone_mode";
pub const SETPOINT_PATH_SEGMENT: &str = "setpoints";

pub fn house_url(api_route: &str, house_id: &str) -> String {
    format!("{}/houses/{}", api_route.trim_end_matches('/'), house_id)
}

/// Path from the house document to a thermostat's first zone. `None` marks
/// the slot filled with the thermostat index.
const ZONE_PATH: [Option<&str>; 9] = [
    Some("result"),
    Some("_links"),
    Some("child"),
    Some("0"),
    Some("data"),
    Some("items"),
    None,
    Some("zones"),
    Some("0"),
];

fn step<'a>(node: &'a Value, key: &str, index: Option<usize>) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(key),
        Value::Array(items) => index.and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Walk from the house document down to the first zone of the thermostat at
/// `thermostat_index`. Fails on the first step that is absent.
pub fn extract_zone(house: &Value, thermostat_index: usize) -> Result<&Value> {
    let mut node = house;
    let mut pointer = String::new();
    for segment in ZONE_PATH {
        let next = match segment {
            Some(key) => {
                pointer.push('/');
                pointer.push_str(key);
                step(node, key, key.parse().ok())
            }
            None => {
                pointer.push_str(&format!("/{thermostat_index}"));
                match node {
                    Value::Array(items) => items.get(thermostat_index),
                    _ => None,
                }
            }
        };
        node = match next {
            Some(v) if !v.is_null() => v,
            _ => return Err(Error::MissingField(pointer)),
        };
    }
    Ok(node)
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActionLink {
    pub href: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThermostatActions {
    pub set_heat_setpoint: Option<ActionLink>,
    pub set_cool_setpoint: Option<ActionLink>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModeActions {
    pub update_thermostat_mode: Option<ActionLink>,
}

/// Feature blocks are an unordered list keyed by `name`. Only the two blocks
/// the accessory needs are decoded; everything else is `Other`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "name")]
pub enum Feature {
    #[serde(rename = "thermostat")]
    Thermostat {
        scale: String,
        #[serde(default)]
        actions: ThermostatActions,
    },
    #[serde(rename = "thermostat_mode")]
    ThermostatMode {
        #[serde(default)]
        actions: ModeActions,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawZone {
    pub name: Option<String>,
    pub current_zone_mode: String,
    pub temperature: f64,
    pub heating_setpoint: f64,
    pub cooling_setpoint: f64,
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl RawZone {
    pub fn decode(raw: &Value) -> Result<Self> {
        Ok(serde_path_to_error::deserialize(raw)?)
    }

    pub fn thermostat(&self) -> Option<(&str, &ThermostatActions)> {
        self.features.iter().find_map(|f| match f {
            Feature::Thermostat { scale, actions } => Some((scale.as_str(), actions)),
            _ => None,
        })
    }

    pub fn thermostat_mode(&self) -> Option<&ModeActions> {
        self.features.iter().find_map(|f| match f {
            Feature::ThermostatMode { actions } => Some(actions),
            _ => None,
        })
    }
}

/// Whole degrees go out as integers, the way the vendor's own apps send them.
fn json_number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        json!(value as i64)
    } else {
        json!(value)
    }
}

pub fn mode_change_body(vendor_mode: &str) -> Value {
    json!({ "value": vendor_mode })
}

pub fn setpoint_body(heat: f64, cool: f64) -> Value {
    json!({
        "heat": json_number(heat),
        "cool": json_number(cool),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn house(items: Value) -> Value {
        json!({
            "result": {
                "_links": {
                    "child": [{ "data": { "items": items } }]
                }
            }
        })
    }

    #[test]
    fn house_url_trims_trailing_slash() {
        assert_eq!(
            house_url("https://www.mynexia.com/mobile/", "1234"),
            "https://www.mynexia.com/mobile/houses/1234"
        );
    }

    #[test]
    fn extract_zone_by_index() {
        let doc = house(json!([
            { "zones": [{ "name": "first" }] },
            { "zones": [{ "name": "second" }, { "name": "ignored" }] }
        ]));
        let zone = extract_zone(&doc, 1).unwrap();
        assert_eq!(zone["name"], "second");
    }

    #[test]
    fn extract_zone_reports_first_missing_step() {
        let doc = house(json!([{ "zones": [] }]));
        match extract_zone(&doc, 0).unwrap_err() {
            Error::MissingField(path) => {
                assert_eq!(path, "/result/_links/child/0/data/items/0/zones/0")
            }
            other => panic!("unexpected error: {other:?}"),
        }

        match extract_zone(&doc, 3).unwrap_err() {
            Error::MissingField(path) => assert_eq!(path, "/result/_links/child/0/data/items/3"),
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(matches!(
            extract_zone(&json!({"result": null}), 0),
            Err(Error::MissingField(_))
        ));
    }

    #[test]
    fn extract_zone_index_slot_needs_an_array() {
        let doc = json!({
            "result": { "_links": { "child": [{ "data": { "items": { "0": { "zones": [{}] } } } }] } }
        });
        match extract_zone(&doc, 0).unwrap_err() {
            Error::MissingField(path) => assert_eq!(path, "/result/_links/child/0/data/items/0"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn features_decode_by_name_in_any_order() {
        let raw = json!({
            "current_zone_mode": "HEAT",
            "temperature": 70,
            "heating_setpoint": 68,
            "cooling_setpoint": 75,
            "features": [
                { "name": "thermostat_mode", "actions": { "update_thermostat_mode": { "href": "https://x/zone_mode" } } },
                { "name": "advanced_info", "items": [] },
                { "name": "thermostat", "scale": "f", "actions": {} }
            ]
        });
        let zone = RawZone::decode(&raw).unwrap();
        let (scale, actions) = zone.thermostat().unwrap();
        assert_eq!(scale, "f");
        assert!(actions.set_heat_setpoint.is_none());
        let mode = zone.thermostat_mode().unwrap();
        assert_eq!(mode.update_thermostat_mode.as_ref().unwrap().href, "https://x/zone_mode");
    }

    #[test]
    fn decode_failure_names_the_path() {
        let raw = json!({
            "current_zone_mode": "HEAT",
            "temperature": "warm",
            "heating_setpoint": 68,
            "cooling_setpoint": 75
        });
        match RawZone::decode(&raw).unwrap_err() {
            Error::Payload { path, .. } => assert_eq!(path, "temperature"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn setpoint_body_keeps_whole_degrees_integral() {
        let body = setpoint_body(68.0, 23.5);
        assert_eq!(body.to_string(), r#"{"cool":23.5,"heat":68}"#);
    }

    #[test]
    fn mode_body_structure() {
        assert_eq!(mode_change_body("AUTO"), json!({"value": "AUTO"}));
    }
}
