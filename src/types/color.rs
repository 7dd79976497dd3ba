//! sRGB input colors and their conversion to CIE xy.

use std::str::FromStr;

use crate::errors::Error;
use crate::types::Xy;

/// An sRGB color with red, green, and blue components in [0, 1].
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub(crate) red: f64,
    pub(crate) green: f64,
    pub(crate) blue: f64,
}

impl Rgb {
    /// Create a color, rejecting channels outside [0, 1] (NaN included).
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::Rgb;
    ///
    /// assert!(Rgb::new(1.0, 0.5, 0.0).is_ok());
    /// assert!(Rgb::new(1.2, 0.0, 0.0).is_err());
    /// ```
    pub fn new(red: f64, green: f64, blue: f64) -> Result<Self, Error> {
        for channel in [red, green, blue] {
            if !(0.0..=1.0).contains(&channel) {
                return Err(Error::ChannelOutOfRange(channel));
            }
        }
        Ok(Self { red, green, blue })
    }

    /// Create a color from 8-bit channels.
    pub fn from_bytes(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: f64::from(red) / 255.0,
            green: f64::from(green) / 255.0,
            blue: f64::from(blue) / 255.0,
        }
    }

    pub fn red(&self) -> f64 {
        self.red
    }

    pub fn green(&self) -> f64 {
        self.green
    }

    pub fn blue(&self) -> f64 {
        self.blue
    }

    pub fn is_black(&self) -> bool {
        self.red == 0.0 && self.green == 0.0 && self.blue == 0.0
    }

    /// Convert to CIE 1931 xy chromaticity.
    ///
    /// Applies the sRGB gamma expansion, then the wide-gamut RGB to XYZ
    /// matrix used by Hue lights, then projects onto the xy plane. Black has
    /// no chromaticity and is rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::Rgb;
    ///
    /// let xy = Rgb::new(1.0, 1.0, 1.0).unwrap().to_xy().unwrap();
    /// assert!((xy.x() - 0.3227).abs() < 1e-4);
    /// assert!((xy.y() - 0.3290).abs() < 1e-4);
    ///
    /// assert!(Rgb::new(0.0, 0.0, 0.0).unwrap().to_xy().is_err());
    /// ```
    pub fn to_xy(&self) -> Result<Xy, Error> {
        let red = gamma(self.red);
        let green = gamma(self.green);
        let blue = gamma(self.blue);

        let x = red * 0.664511 + green * 0.154324 + blue * 0.162028;
        let y = red * 0.283881 + green * 0.668433 + blue * 0.047685;
        let z = red * 0.000088 + green * 0.072310 + blue * 0.986039;

        let sum = x + y + z;
        if sum == 0.0 {
            return Err(Error::BlackColor);
        }
        Ok(Xy::clamped(x / sum, y / sum))
    }
}

/// Inverse sRGB companding of a single channel.
fn gamma(c: f64) -> f64 {
    if c > 0.04045 {
        ((c + 0.055) / 1.055).powf(2.4)
    } else {
        c / 12.92
    }
}

impl FromStr for Rgb {
    type Err = Error;

    /// Parse from `0xRRGGBB` (exactly 8 characters).
    fn from_str(s: &str) -> Result<Self, Error> {
        let invalid = |reason: &str| Error::InvalidColorString(format!("{s:?}: {reason}"));

        if s.len() != 8 {
            return Err(invalid("expected 8 characters, e.g. 0xFF8800"));
        }
        let Some(digits) = s.strip_prefix("0x") else {
            return Err(invalid("should start with 0x"));
        };
        // from_str_radix accepts a leading '+', so check the digits first
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid("expected hex digits after 0x"));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid("bad hex pair"))
        };
        Ok(Self::from_bytes(channel(0)?, channel(2)?, channel(4)?))
    }
}
