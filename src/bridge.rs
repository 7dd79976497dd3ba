//! Bridge records and bridge-level API calls.

use std::collections::HashMap;
use std::fmt;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::Config;
use crate::errors::Error;
use crate::light::Light;
use crate::response;
use crate::status::LightState;
use crate::transport::Transport;

type Result<T> = std::result::Result<T, Error>;

/// A Hue bridge: where it lives and the API username we hold for it.
///
/// `address` is a base URL such as `http://192.168.1.2`. A bridge without a
/// username is unpaired and can only be registered with.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bridge {
    #[serde(rename = "ip")]
    address: String,
    username: Option<String>,
}

/// A light entry in `GET /api/{username}/lights`.
#[derive(Debug, Deserialize)]
struct LightRecord {
    name: String,
    state: LightState,
}

impl Bridge {
    pub(crate) const SCHEME: &'static str = "http://";

    /// Create an unpaired bridge. A bare host gets the `http://` scheme.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::Bridge;
    ///
    /// let bridge = Bridge::new("192.168.1.2");
    /// assert_eq!(bridge.address(), "http://192.168.1.2");
    /// assert!(bridge.username().is_none());
    /// ```
    pub fn new(address: &str) -> Self {
        let address = address.trim_end_matches('/');
        let address = if address.contains("://") {
            address.to_string()
        } else {
            format!("{}{}", Self::SCHEME, address)
        };
        Bridge {
            address,
            username: None,
        }
    }

    /// Create a bridge we already hold a username for.
    pub fn paired(address: &str, username: &str) -> Self {
        Bridge {
            username: Some(username.to_string()),
            ..Bridge::new(address)
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// `{address}/api/{username}{path}`; fails on an unpaired bridge.
    pub(crate) fn api_url(&self, path: &str) -> Result<String> {
        let username = self
            .username
            .as_deref()
            .ok_or_else(|| Error::NotPaired(self.address.clone()))?;
        Ok(format!("{}/api/{}{}", self.address, username, path))
    }

    /// List the lights on this bridge, sorted by id.
    ///
    /// A single malformed entry fails the whole listing.
    pub async fn lights<T: Transport>(&self, transport: &T) -> Result<Vec<Light<'_>>> {
        let body = transport.get(&self.api_url("/lights")?).await?;
        response::check_read(&body)?;

        let records: HashMap<String, LightRecord> =
            serde_json::from_slice(&body).map_err(Error::JsonLoad)?;

        let mut lights = records
            .into_iter()
            .map(|(key, record)| {
                let id = key.parse::<u32>().map_err(|_| {
                    Error::MalformedResponse(format!("light id {key:?} is not an integer"))
                })?;
                Ok(Light::new(id, record.name, record.state, self))
            })
            .collect::<Result<Vec<_>>>()?;
        lights.sort_by_key(Light::id);

        debug!("bridge {} has {} lights", self.address, lights.len());
        Ok(lights)
    }

    /// Fetch one light by its bridge-assigned id.
    pub async fn light<T: Transport>(&self, transport: &T, id: u32) -> Result<Light<'_>> {
        let body = transport
            .get(&self.api_url(&format!("/lights/{id}"))?)
            .await?;
        response::check_read(&body)?;

        let record: LightRecord = serde_json::from_slice(&body).map_err(Error::JsonLoad)?;
        Ok(Light::new(id, record.name, record.state, self))
    }

    /// Register an application user and return the paired bridge.
    ///
    /// The link button on the bridge must have been pressed shortly before;
    /// otherwise the bridge answers with error 101. With
    /// `config.fixed_username` set, no request is made.
    pub async fn register<T: Transport>(&self, config: &Config, transport: &T) -> Result<Bridge> {
        let username = match &config.fixed_username {
            Some(username) => username.clone(),
            None => {
                let body = serde_json::to_vec(&json!({"devicetype": config.device_type}))
                    .map_err(Error::JsonDump)?;
                let reply = transport
                    .post(&format!("{}/api", self.address), body)
                    .await?;
                response::decode_username(&reply)?
            }
        };

        info!("registered with bridge {}", self.address);
        Ok(Bridge {
            address: self.address.clone(),
            username: Some(username),
        })
    }
}

impl fmt::Display for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ip<{}> username<{}>",
            self.address,
            self.username.as_deref().unwrap_or("")
        )
    }
}
