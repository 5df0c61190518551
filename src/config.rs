//! Accessory configuration, as found in the host platform's JSON config.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::client::NexiaClientBuilder;
use crate::protocol::DEFAULT_API_ROUTE;
use crate::types::TemperatureScale;
use crate::{Error, Result};

fn default_api_route() -> String {
    DEFAULT_API_ROUTE.to_string()
}

fn default_manufacturer() -> String {
    "Nexia".to_string()
}

fn default_model() -> String {
    "Thermostat".to_string()
}

fn default_serial_number() -> String {
    "Default".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessoryConfig {
    pub name: String,
    #[serde(default = "default_api_route")]
    pub apiroute: String,
    pub house_id: String,
    #[serde(default)]
    pub thermostat_index: usize,
    pub x_mobile_id: String,
    pub x_api_key: String,
    #[serde(default)]
    pub x_app_version: Option<String>,
    #[serde(default)]
    pub x_associated_brand: Option<String>,
    #[serde(default = "default_manufacturer")]
    pub manufacturer: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_serial_number")]
    pub serial_number: String,
    /// Scale the host presents temperatures in.
    #[serde(default)]
    pub display_scale: TemperatureScale,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl AccessoryConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        let required = [
            ("name", &self.name),
            ("apiroute", &self.apiroute),
            ("houseId", &self.house_id),
            ("xMobileId", &self.x_mobile_id),
            ("xApiKey", &self.x_api_key),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("{key} must not be empty")));
            }
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config("timeoutSecs must be positive".to_string()));
        }
        Ok(())
    }

    pub fn client_builder(&self) -> NexiaClientBuilder {
        let mut builder = NexiaClientBuilder::new(&self.house_id, &self.x_mobile_id, &self.x_api_key)
            .api_route(&self.apiroute)
            .thermostat_index(self.thermostat_index)
            .timeout(Duration::from_secs(self.timeout_secs));
        if let Some(ref version) = self.x_app_version {
            builder = builder.app_version(version);
        }
        if let Some(ref brand) = self.x_associated_brand {
            builder = builder.associated_brand(brand);
        }
        builder
    }
}
