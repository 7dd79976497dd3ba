//! # hue_bridge_rs
//!
//! An async Rust client for Philips Hue bridges on the local network.
//!
//! The crate finds a bridge over SSDP, registers an application user with
//! it, lists its lights and changes their state through the bridge's JSON
//! REST API. Colors given as sRGB are converted to the CIE xy chromaticity
//! the bridge expects.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::time::Duration;
//! use hue_bridge_rs::{Config, HttpTransport, Rgb, discover_bridge};
//!
//! async fn paint_it_red() -> Result<(), hue_bridge_rs::Error> {
//!     let config = Config::default();
//!     let transport = HttpTransport::new(config.request_timeout)?;
//!
//!     // Press the link button on the bridge before registering.
//!     let bridge = discover_bridge(&config, Duration::from_secs(10)).await?;
//!     let bridge = bridge.register(&config, &transport).await?;
//!
//!     for light in bridge.lights(&transport).await? {
//!         light.set_color(&transport, &Rgb::from_bytes(255, 0, 0)).await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Discovery**: Find a bridge with [`discover_bridge`]
//! - **Pairing**: Obtain an API username with [`Bridge::register`]
//! - **Lights**: List and control lights with [`Bridge::lights`] and [`Light`]
//! - **RGB Colors**: Convert sRGB to bridge xy with [`Rgb::to_xy`]
//! - **State Updates**: Compose arbitrary updates with [`StateUpdate`]
//! - **Bridge Directory**: Remember bridges between runs with [`BridgeDirectory`]
//! - **Command Dispatch**: The CLI's command table, [`dispatch`]
//!
//! ## Communication
//!
//! Discovery uses SSDP on UDP port 1900. Everything else is HTTP against
//! `http://<bridge>/api/<username>/...`, sent through a [`Transport`]. The
//! stock [`HttpTransport`] is built on `reqwest`; tests substitute their own.

mod bridge;
mod config;
mod directory;
mod discovery;
mod dispatch;
mod errors;
mod light;
mod payload;
mod response;
pub mod runtime;
mod status;
mod transport;
mod types;

// Re-export public API
pub use bridge::Bridge;
pub use config::Config;
pub use directory::BridgeDirectory;
pub use discovery::discover_bridge;
pub use dispatch::{Command, Invocation, Requirements, dispatch};
pub use errors::{Error, ErrorKind};
pub use light::Light;
pub use payload::StateUpdate;
pub use response::Applied;
pub use status::{Alert, ColorMode, Effect, LightState};
pub use transport::{HttpTransport, Transport};
pub use types::{Brightness, HueSaturation, Mired, Rgb, TransitionTime, Xy};
