//! Individual light control.

use std::fmt;

use log::debug;

use crate::bridge::Bridge;
use crate::errors::Error;
use crate::payload::StateUpdate;
use crate::response::{self, Applied};
use crate::status::LightState;
use crate::transport::Transport;
use crate::types::Rgb;

type Result<T> = std::result::Result<T, Error>;

/// A light as listed by its bridge.
///
/// Lights are read fresh from the bridge for every command and never
/// cached. Each one borrows the [`Bridge`] it came from, so the bridge is
/// guaranteed to outlive every call made through the light.
#[derive(Debug, Clone)]
pub struct Light<'a> {
    id: u32,
    name: String,
    state: LightState,
    bridge: &'a Bridge,
}

impl<'a> Light<'a> {
    pub(crate) fn new(id: u32, name: String, state: LightState, bridge: &'a Bridge) -> Self {
        Light {
            id,
            name,
            state,
            bridge,
        }
    }

    /// Bridge-assigned id, stable across restarts.
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// State as of the listing this light came from.
    pub fn state(&self) -> &LightState {
        &self.state
    }

    pub fn bridge(&self) -> &'a Bridge {
        self.bridge
    }

    /// Send a state update to the light.
    ///
    /// Returns the attributes the bridge confirmed. An empty update is
    /// rejected before anything is sent.
    pub async fn set_state<T: Transport>(
        &self,
        transport: &T,
        update: &StateUpdate,
    ) -> Result<Vec<Applied>> {
        if !update.is_valid() {
            return Err(Error::NoAttribute);
        }

        let url = self.bridge.api_url(&format!("/lights/{}/state", self.id))?;
        let body = serde_json::to_vec(update).map_err(Error::JsonDump)?;
        let reply = transport.put(&url, body).await?;

        let applied = response::decode_applied(&reply)?;
        debug!("light {} applied {:?}", self.id, applied);
        Ok(applied)
    }

    pub async fn turn_on<T: Transport>(&self, transport: &T) -> Result<Vec<Applied>> {
        self.set_power(transport, true).await
    }

    pub async fn turn_off<T: Transport>(&self, transport: &T) -> Result<Vec<Applied>> {
        self.set_power(transport, false).await
    }

    /// Flip the power state read at listing time.
    pub async fn toggle<T: Transport>(&self, transport: &T) -> Result<Vec<Applied>> {
        self.set_power(transport, !self.state.on()).await
    }

    /// Switch the light on at the chromaticity of `rgb`.
    ///
    /// Black has no chromaticity, so it turns the light off instead.
    pub async fn set_color<T: Transport>(&self, transport: &T, rgb: &Rgb) -> Result<Vec<Applied>> {
        if rgb.is_black() {
            return self.turn_off(transport).await;
        }

        let mut update = StateUpdate::from(&rgb.to_xy()?);
        update.on(true);
        self.set_state(transport, &update).await
    }

    async fn set_power<T: Transport>(&self, transport: &T, on: bool) -> Result<Vec<Applied>> {
        let mut update = StateUpdate::new();
        update.on(on);
        self.set_state(transport, &update).await
    }
}

impl fmt::Display for Light<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = &self.state;
        write!(f, "id<{}> name<{}> on<{}>", self.id, self.name, state.on())?;
        if let Some(bri) = state.raw_brightness() {
            write!(f, " bri<{bri}>")?;
        }
        write!(f, " reachable<{}>", state.reachable())?;
        if let Some(mode) = state.color_mode() {
            write!(f, " colormode<{mode}>")?;
        }
        if let Some(xy) = state.xy() {
            write!(f, " xy<{:.4},{:.4}>", xy.x(), xy.y())?;
        }
        Ok(())
    }
}
