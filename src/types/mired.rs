//! Color temperature control.

use serde::{Deserialize, Serialize};

/// Color temperature in mired (reciprocal megakelvin), from 153 to 500.
///
/// Lower values are cooler: 153 is roughly 6500K daylight, 500 is a warm
/// 2000K.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Mired {
    pub(crate) mired: u16,
}

impl Mired {
    const MIN: u16 = 153;
    const MAX: u16 = 500;

    /// Get the mired value.
    pub fn mired(&self) -> u16 {
        self.mired
    }

    /// Approximate temperature in Kelvin.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::Mired;
    ///
    /// assert_eq!(Mired::create(500).unwrap().kelvin(), 2000);
    /// ```
    pub fn kelvin(&self) -> u32 {
        1_000_000 / u32::from(self.mired)
    }

    /// Returns `None` if value is outside the valid range (153-500).
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::Mired;
    ///
    /// assert!(Mired::create(152).is_none());
    /// assert!(Mired::create(153).is_some());
    /// assert!(Mired::create(500).is_some());
    /// assert!(Mired::create(501).is_none());
    /// ```
    pub fn create(mired: u16) -> Option<Self> {
        if (Self::MIN..=Self::MAX).contains(&mired) {
            Some(Mired { mired })
        } else {
            None
        }
    }

    /// Nearest valid mired for a temperature in Kelvin.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::Mired;
    ///
    /// assert_eq!(Mired::from_kelvin(4000).mired(), 250);
    /// assert_eq!(Mired::from_kelvin(10_000).mired(), 153);
    /// assert_eq!(Mired::from_kelvin(0).mired(), 500);
    /// ```
    pub fn from_kelvin(kelvin: u32) -> Self {
        let mired = 1_000_000u32
            .checked_div(kelvin)
            .unwrap_or(u32::MAX)
            .clamp(u32::from(Self::MIN), u32::from(Self::MAX));
        Mired {
            mired: mired as u16,
        }
    }
}
