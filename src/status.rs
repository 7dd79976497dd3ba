//! Light state as reported by the bridge.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::types::{Brightness, HueSaturation, Mired, Xy};

/// The dynamic effect of the light.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Effect {
    None,
    /// Cycle through all hues using the current brightness and saturation.
    Colorloop,
}

/// The alert effect the light is performing.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Alert {
    None,
    /// One breathe cycle.
    Select,
    /// Breathe cycles for 15 seconds or until an `Alert::None` is sent.
    Lselect,
}

/// The last kind of color command the light received.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ColorMode {
    /// Hue and saturation
    Hs,
    /// CIE xy
    Xy,
    /// Color temperature
    Ct,
}

/// Current state of a light.
///
/// Capability fields are absent for lights that lack the capability (a
/// dimmable white bulb reports neither `hue` nor `xy`, an on/off plug has no
/// `bri`), so they are optional. Every other field is required and a type
/// mismatch anywhere fails decoding.
#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LightState {
    pub(crate) on: bool,
    #[serde(rename = "bri")]
    pub(crate) brightness: Option<u8>,
    pub(crate) hue: Option<u16>,
    #[serde(rename = "sat")]
    pub(crate) saturation: Option<u8>,
    #[serde(rename = "ct")]
    pub(crate) color_temperature: Option<u16>,
    pub(crate) effect: Option<Effect>,
    pub(crate) alert: Alert,
    #[serde(rename = "colormode")]
    pub(crate) color_mode: Option<ColorMode>,
    pub(crate) reachable: bool,
    pub(crate) xy: Option<Xy>,
}

impl LightState {
    /// Check if the light is on.
    pub fn on(&self) -> bool {
        self.on
    }

    /// Raw brightness, 0-254; `None` for lights that can't dim.
    pub fn raw_brightness(&self) -> Option<u8> {
        self.brightness
    }

    /// Brightness as a command value; `None` when the bridge reports 0 or
    /// the light can't dim.
    pub fn brightness(&self) -> Option<Brightness> {
        self.brightness.and_then(Brightness::create)
    }

    pub fn hue_saturation(&self) -> Option<HueSaturation> {
        HueSaturation::create(self.hue?, self.saturation?)
    }

    pub fn color_temperature(&self) -> Option<Mired> {
        self.color_temperature.and_then(Mired::create)
    }

    pub fn effect(&self) -> Option<Effect> {
        self.effect
    }

    pub fn alert(&self) -> Alert {
        self.alert
    }

    pub fn color_mode(&self) -> Option<ColorMode> {
        self.color_mode
    }

    /// Check if the bridge can reach the light.
    pub fn reachable(&self) -> bool {
        self.reachable
    }

    pub fn xy(&self) -> Option<Xy> {
        self.xy
    }
}
