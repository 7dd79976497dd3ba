//! Transition duration for state changes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How long a light takes to move to a new state, in steps of 100ms.
///
/// The bridge default is 4 (400ms).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct TransitionTime {
    pub(crate) steps: u16,
}

impl Default for TransitionTime {
    fn default() -> Self {
        TransitionTime { steps: 4 }
    }
}

impl TransitionTime {
    /// Transition time in 100ms steps.
    pub fn steps(&self) -> u16 {
        self.steps
    }

    pub fn from_steps(steps: u16) -> Self {
        TransitionTime { steps }
    }

    /// Round a duration to the nearest 100ms step, saturating at `u16::MAX`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use hue_bridge_rs::TransitionTime;
    ///
    /// assert_eq!(TransitionTime::from_duration(Duration::from_millis(1260)).steps(), 13);
    /// assert_eq!(TransitionTime::from_duration(Duration::ZERO).steps(), 0);
    /// ```
    pub fn from_duration(duration: Duration) -> Self {
        let steps = (duration.as_millis() + 50) / 100;
        TransitionTime {
            steps: u16::try_from(steps).unwrap_or(u16::MAX),
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.steps) * 100)
    }
}
