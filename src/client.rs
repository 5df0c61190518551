use std::sync::Mutex;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::RequestBuilder;
use serde_json::Value;
use tracing::{debug, trace};

use crate::logger::{MessageLogMode, MessageLogger};
use crate::protocol::{
    extract_zone, house_url, DEFAULT_API_ROUTE, HEADER_API_KEY, HEADER_APP_VERSION,
    HEADER_ASSOCIATED_BRAND, HEADER_MOBILE_ID,
};
use crate::Result;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}

pub struct NexiaClientBuilder {
    api_route: String,
    house_id: String,
    mobile_id: String,
    api_key: String,
    thermostat_index: usize,
    app_version: Option<String>,
    associated_brand: Option<String>,
    timeout: Duration,
    log_mode: Option<MessageLogMode>,
    log_path: Option<String>,
}

impl NexiaClientBuilder {
    pub fn new(
        house_id: impl Into<String>,
        mobile_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            api_route: DEFAULT_API_ROUTE.to_string(),
            house_id: house_id.into(),
            mobile_id: mobile_id.into(),
            api_key: api_key.into(),
            thermostat_index: 0,
            app_version: None,
            associated_brand: None,
            timeout: DEFAULT_TIMEOUT,
            log_mode: None,
            log_path: None,
        }
    }

    pub fn api_route(mut self, route: impl Into<String>) -> Self {
        self.api_route = route.into();
        self
    }

    /// Zero-based index of the thermostat within the house's device list.
    pub fn thermostat_index(mut self, index: usize) -> Self {
        self.thermostat_index = index;
        self
    }

    /// Sent as `X-AppVersion`. Empty strings leave the header off.
    pub fn app_version(mut self, version: impl Into<String>) -> Self {
        self.app_version = non_empty(version.into());
        self
    }

    /// Sent as `X-AssociatedBrand`. Empty strings leave the header off.
    pub fn associated_brand(mut self, brand: impl Into<String>) -> Self {
        self.associated_brand = non_empty(brand.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn message_log(mut self, mode: MessageLogMode, path: impl Into<String>) -> Self {
        self.log_mode = Some(mode);
        self.log_path = Some(path.into());
        self
    }

    pub fn build(self) -> Result<NexiaClient> {
        let http = reqwest::Client::builder().timeout(self.timeout).build()?;

        let logger = match (self.log_mode, self.log_path) {
            (Some(mode), Some(path)) => Some(Mutex::new(MessageLogger::new(mode, &path)?)),
            _ => None,
        };

        Ok(NexiaClient {
            http,
            house_url: house_url(&self.api_route, &self.house_id),
            mobile_id: self.mobile_id,
            api_key: self.api_key,
            thermostat_index: self.thermostat_index,
            app_version: self.app_version,
            associated_brand: self.associated_brand,
            logger,
        })
    }
}

/// Authenticated access to one house: reads the zone record and posts
/// commands to the endpoints the zone advertises.
pub struct NexiaClient {
    http: reqwest::Client,
    house_url: String,
    mobile_id: String,
    api_key: String,
    thermostat_index: usize,
    app_version: Option<String>,
    associated_brand: Option<String>,
    logger: Option<Mutex<MessageLogger>>,
}

impl NexiaClient {
    pub fn builder(
        house_id: impl Into<String>,
        mobile_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> NexiaClientBuilder {
        NexiaClientBuilder::new(house_id, mobile_id, api_key)
    }

    pub fn house_url(&self) -> &str {
        &self.house_url
    }

    pub fn thermostat_index(&self) -> usize {
        self.thermostat_index
    }

    /// Fetch the house and return the first zone of the configured
    /// thermostat. No retries.
    pub async fn fetch_zone(&self) -> Result<Value> {
        debug!(url = %self.house_url, "fetching house");
        self.with_logger(|logger| logger.log_request("GET", &self.house_url));

        let house: Value = self
            .authed(self.http.get(&self.house_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        trace!(body = %house, "house response");

        let zone = extract_zone(&house, self.thermostat_index)?.clone();
        self.with_logger(|logger| logger.log_zone(&zone));
        Ok(zone)
    }

    /// POST `body` to an absolute endpoint taken from the zone's action links.
    pub async fn post_command(&self, action: &str, endpoint: &str, body: &Value) -> Result<()> {
        debug!(action, endpoint, "posting command");
        self.with_logger(|logger| logger.log_command(action, endpoint, body));

        self.authed(self.http.post(endpoint))
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        let mut request = request
            .header(HEADER_MOBILE_ID, &self.mobile_id)
            .header(HEADER_API_KEY, &self.api_key)
            .header(CONTENT_TYPE, "application/json");
        if let Some(ref version) = self.app_version {
            request = request.header(HEADER_APP_VERSION, version);
        }
        if let Some(ref brand) = self.associated_brand {
            request = request.header(HEADER_ASSOCIATED_BRAND, brand);
        }
        request
    }

    fn with_logger(&self, f: impl FnOnce(&mut MessageLogger)) {
        if let Some(ref logger) = self.logger
            && let Ok(mut logger) = logger.lock()
        {
            f(&mut logger);
        }
    }
}
