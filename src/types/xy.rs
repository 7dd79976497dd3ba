//! CIE 1931 chromaticity coordinates.

use serde::{Deserialize, Serialize};

/// A point on the CIE xy chromaticity diagram, both coordinates in [0, 1].
///
/// The bridge serializes this as a two-element array, `[x, y]`. Whether the
/// point is inside a particular light's gamut is left to the bridge.
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Xy {
    x: f64,
    y: f64,
}

impl Xy {
    /// Returns None if either coordinate is outside [0, 1].
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::Xy;
    ///
    /// assert!(Xy::create(0.3144, 0.3301).is_some());
    /// assert!(Xy::create(1.5, 0.3).is_none());
    /// ```
    pub fn create(x: f64, y: f64) -> Option<Self> {
        if (0.0..=1.0).contains(&x) && (0.0..=1.0).contains(&y) {
            Some(Xy { x, y })
        } else {
            None
        }
    }

    /// Clamp both coordinates into [0, 1]. Absorbs float rounding at the edges.
    pub(crate) fn clamped(x: f64, y: f64) -> Self {
        Xy {
            x: x.clamp(0.0, 1.0),
            y: y.clamp(0.0, 1.0),
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }
}

impl From<[f64; 2]> for Xy {
    fn from([x, y]: [f64; 2]) -> Self {
        Xy { x, y }
    }
}

impl From<Xy> for [f64; 2] {
    fn from(xy: Xy) -> Self {
        [xy.x, xy.y]
    }
}
