#![allow(dead_code)]

use nexia_thermostat::{NexiaClient, TemperatureScale, ThermostatAccessory};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const HOUSE_ID: &str = "123456";
pub const MOBILE_ID: &str = "8080";
pub const API_KEY: &str = "api-key";

pub fn mode_url(server: &MockServer) -> String {
    format!("{}/xxl_zones/83037337/zone_mode", server.uri())
}

pub fn setpoint_url(server: &MockServer) -> String {
    format!("{}/xxl_zones/83037337/setpoints", server.uri())
}

/// Zone record as the vendor returns it, setpoints 68/75.
pub fn zone(server: &MockServer, mode: &str, temperature: f64, scale: &str) -> Value {
    zone_with_setpoints(server, mode, temperature, scale, 68.0, 75.0)
}

pub fn zone_with_setpoints(
    server: &MockServer,
    mode: &str,
    temperature: f64,
    scale: &str,
    heat: f64,
    cool: f64,
) -> Value {
    json!({
        "id": 83037337,
        "name": "Native Zone",
        "current_zone_mode": mode,
        "temperature": temperature,
        "heating_setpoint": heat,
        "cooling_setpoint": cool,
        "features": [
            { "name": "advanced_info", "items": [] },
            {
                "name": "thermostat",
                "scale": scale,
                "actions": {
                    "set_heat_setpoint": { "href": setpoint_url(server) },
                    "set_cool_setpoint": { "href": setpoint_url(server) }
                }
            },
            {
                "name": "thermostat_mode",
                "value": mode,
                "actions": { "update_thermostat_mode": { "href": mode_url(server) } }
            }
        ]
    })
}

pub fn house(thermostats: Vec<Value>) -> Value {
    let items: Vec<Value> = thermostats
        .into_iter()
        .map(|zone| json!({ "type": "xxl_thermostat", "zones": [zone] }))
        .collect();
    json!({
        "success": true,
        "result": {
            "id": 123456,
            "name": "Home",
            "_links": {
                "child": [{
                    "type": "application/vnd.nexia.collection+json",
                    "data": { "items": items }
                }]
            }
        }
    })
}

pub async fn mount_house(server: &MockServer, body: Value, times: Option<u64>) {
    let mock = Mock::given(method("GET"))
        .and(path(format!("/houses/{HOUSE_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body));
    match times {
        Some(n) => mock.up_to_n_times(n).mount(server).await,
        None => mock.mount(server).await,
    }
}

pub async fn mount_house_failure(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/houses/{HOUSE_ID}")))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

pub fn client(server: &MockServer) -> NexiaClient {
    NexiaClient::builder(HOUSE_ID, MOBILE_ID, API_KEY)
        .api_route(server.uri())
        .build()
        .expect("client should build")
}

pub fn accessory(server: &MockServer) -> ThermostatAccessory {
    accessory_with_scale(server, TemperatureScale::Celsius)
}

pub fn accessory_with_scale(server: &MockServer, host_scale: TemperatureScale) -> ThermostatAccessory {
    ThermostatAccessory::new("Hallway", client(server), host_scale)
}
