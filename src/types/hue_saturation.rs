//! Hue and Saturation color representation.

use serde::{Deserialize, Serialize};

/// Hue and saturation as the bridge understands them.
///
/// - Hue: a wrapping value between 0 and 65535. Both 0 and 65535 are red,
///   25500 is green and 46920 is blue.
/// - Saturation: 0 is white, 254 is the most saturated.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
pub struct HueSaturation {
    hue: u16,
    saturation: u8,
}

impl HueSaturation {
    const MAX_SATURATION: u8 = 254;

    /// Create a new HueSaturation with the given values.
    ///
    /// Every `u16` is a valid hue, so only saturation is checked.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::HueSaturation;
    ///
    /// assert!(HueSaturation::create(0, 254).is_some());
    /// assert!(HueSaturation::create(65535, 0).is_some());
    /// assert!(HueSaturation::create(25500, 255).is_none());
    /// ```
    pub fn create(hue: u16, saturation: u8) -> Option<Self> {
        if saturation <= Self::MAX_SATURATION {
            Some(HueSaturation { hue, saturation })
        } else {
            None
        }
    }

    /// Build from a color-wheel angle in degrees and a saturation in percent.
    ///
    /// Angles wrap, so 360 and -360 are both red.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::HueSaturation;
    ///
    /// let hs = HueSaturation::from_degrees(120.0, 100.0);
    /// assert_eq!(hs.hue(), 21845);
    /// assert_eq!(hs.saturation(), 254);
    ///
    /// assert_eq!(HueSaturation::from_degrees(360.0, 50.0).hue(), 0);
    /// ```
    pub fn from_degrees(degrees: f64, percent: f64) -> Self {
        let turn = degrees.rem_euclid(360.0) / 360.0;
        let hue = (turn * 65536.0).round() as u32 % 65536;
        let saturation = (percent.clamp(0.0, 100.0) / 100.0 * 254.0).round();
        HueSaturation {
            hue: hue as u16,
            saturation: saturation as u8,
        }
    }

    /// Get the hue value.
    pub fn hue(&self) -> u16 {
        self.hue
    }

    /// Get the saturation value.
    pub fn saturation(&self) -> u8 {
        self.saturation
    }
}
