//! Value types for light control parameters.

mod brightness;
mod color;
mod hue_saturation;
mod mired;
mod transition;
mod xy;

pub use brightness::Brightness;
pub use color::Rgb;
pub use hue_saturation::HueSaturation;
pub use mired::Mired;
pub use transition::TransitionTime;
pub use xy::Xy;
