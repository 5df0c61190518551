mod accessory;
mod client;
mod config;
mod error;
mod logger;
mod protocol;
mod translate;
mod types;

pub use accessory::{
    setpoint_payload, AccessoryInformation, Characteristic, CharacteristicValue, ThermostatAccessory,
};
pub use client::{NexiaClient, NexiaClientBuilder};
pub use config::AccessoryConfig;
pub use error::{Error, Result};
pub use logger::MessageLogMode;
pub use translate::{parse_zone, resolve_operating_mode};
pub use types::*;
