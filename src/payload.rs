//! State update body for Hue lights.

use serde::{Deserialize, Serialize};

use crate::status::{Alert, Effect};
use crate::types::{Brightness, HueSaturation, Mired, TransitionTime, Xy};

/// The body of a `PUT /api/{username}/lights/{id}/state` request.
///
/// Only attributes that were set are serialized, so the bridge leaves every
/// other part of the light state alone.
///
/// # Creating Updates
///
/// 1. **From a single attribute** using the [`From`] trait:
///    ```
///    use hue_bridge_rs::{Brightness, StateUpdate};
///    let update = StateUpdate::from(&Brightness::create(100).unwrap());
///    assert!(update.is_valid());
///    ```
///
/// 2. **Builder pattern** for combining multiple attributes:
///    ```
///    use hue_bridge_rs::{Brightness, Mired, StateUpdate};
///    let mut update = StateUpdate::new();
///    update.on(true);
///    update.brightness(&Brightness::create(200).unwrap());
///    update.color_temperature(&Mired::create(366).unwrap());
///    ```
#[serde_with::skip_serializing_none]
#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StateUpdate {
    pub(crate) on: Option<bool>,
    #[serde(rename = "bri")]
    pub(crate) brightness: Option<u8>,
    pub(crate) hue: Option<u16>,
    #[serde(rename = "sat")]
    pub(crate) saturation: Option<u8>,
    pub(crate) xy: Option<Xy>,
    #[serde(rename = "ct")]
    pub(crate) color_temperature: Option<u16>,
    pub(crate) alert: Option<Alert>,
    pub(crate) effect: Option<Effect>,
    #[serde(rename = "transitiontime")]
    pub(crate) transition_time: Option<u16>,
}

impl StateUpdate {
    /// Create a new empty update.
    ///
    /// At least one attribute must be set for the update to be valid.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::StateUpdate;
    ///
    /// let update = StateUpdate::new();
    /// assert_eq!(update.is_valid(), false);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if this update changes anything.
    ///
    /// A transition time alone does not; it only shapes other changes.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::{StateUpdate, TransitionTime};
    ///
    /// let mut update = StateUpdate::new();
    /// update.transition_time(&TransitionTime::from_steps(10));
    /// assert_eq!(update.is_valid(), false);
    ///
    /// update.on(false);
    /// assert_eq!(update.is_valid(), true);
    /// ```
    pub fn is_valid(&self) -> bool {
        self.on.is_some()
            || self.brightness.is_some()
            || self.hue.is_some()
            || self.saturation.is_some()
            || self.xy.is_some()
            || self.color_temperature.is_some()
            || self.alert.is_some()
            || self.effect.is_some()
    }

    pub fn on(&mut self, on: bool) {
        self.on = Some(on);
    }

    pub fn brightness(&mut self, brightness: &Brightness) {
        self.brightness = Some(brightness.value);
    }

    pub fn hue_saturation(&mut self, hs: &HueSaturation) {
        self.hue = Some(hs.hue());
        self.saturation = Some(hs.saturation());
    }

    /// Set the color as CIE xy chromaticity.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::{Rgb, StateUpdate};
    ///
    /// let mut update = StateUpdate::new();
    /// update.xy(&Rgb::new(1.0, 0.0, 0.0).unwrap().to_xy().unwrap());
    /// let body = serde_json::to_value(&update).unwrap();
    /// assert!(body["xy"].is_array());
    /// assert!(body.get("on").is_none());
    /// ```
    pub fn xy(&mut self, xy: &Xy) {
        self.xy = Some(*xy);
    }

    pub fn color_temperature(&mut self, ct: &Mired) {
        self.color_temperature = Some(ct.mired);
    }

    pub fn alert(&mut self, alert: Alert) {
        self.alert = Some(alert);
    }

    pub fn effect(&mut self, effect: Effect) {
        self.effect = Some(effect);
    }

    pub fn transition_time(&mut self, transition: &TransitionTime) {
        self.transition_time = Some(transition.steps);
    }
}

impl From<&Brightness> for StateUpdate {
    fn from(brightness: &Brightness) -> Self {
        let mut update = StateUpdate::new();
        update.brightness(brightness);
        update
    }
}

impl From<&HueSaturation> for StateUpdate {
    fn from(hs: &HueSaturation) -> Self {
        let mut update = StateUpdate::new();
        update.hue_saturation(hs);
        update
    }
}

impl From<&Xy> for StateUpdate {
    fn from(xy: &Xy) -> Self {
        let mut update = StateUpdate::new();
        update.xy(xy);
        update
    }
}

impl From<&Mired> for StateUpdate {
    fn from(ct: &Mired) -> Self {
        let mut update = StateUpdate::new();
        update.color_temperature(ct);
        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_only_set_fields_are_serialized() {
        let mut update = StateUpdate::new();
        update.on(false);
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({"on": false}));
    }

    #[test]
    fn test_full_update_body() {
        let mut update = StateUpdate::new();
        update.on(true);
        update.brightness(&Brightness::create(200).unwrap());
        update.hue_saturation(&HueSaturation::create(3000, 140).unwrap());
        update.color_temperature(&Mired::create(366).unwrap());
        update.alert(Alert::Lselect);
        update.effect(Effect::Colorloop);
        update.transition_time(&TransitionTime::from_steps(0));
        update.xy(&Xy::create(0.4571, 0.4097).unwrap());

        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({
                "on": true,
                "bri": 200,
                "hue": 3000,
                "sat": 140,
                "xy": [0.4571, 0.4097],
                "ct": 366,
                "alert": "lselect",
                "effect": "colorloop",
                "transitiontime": 0
            })
        );
    }

    #[test]
    fn test_off_is_serialized_even_though_false() {
        let mut update = StateUpdate::new();
        update.on(false);
        update.brightness(&Brightness::create(1).unwrap());
        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(body["on"], json!(false));
        assert_eq!(body["bri"], json!(1));
    }
}
