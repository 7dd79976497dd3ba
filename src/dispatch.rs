//! Command table and dispatch for the CLI.
//!
//! Every command declares the resources it needs. Flags, the color string
//! and the bridge index are all checked before the first network call; the
//! light index can only be checked once the bridge has listed its lights.

use std::io::Write;

use log::debug;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::bridge::Bridge;
use crate::config::Config;
use crate::directory::BridgeDirectory;
use crate::discovery::discover_bridge;
use crate::errors::Error;
use crate::light::Light;
use crate::transport::Transport;
use crate::types::Rgb;

type Result<T> = std::result::Result<T, Error>;

/// The commands the CLI understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Command {
    Usage,
    Bridges,
    Lights,
    Discover,
    Pair,
    On,
    Off,
    Toggle,
    Color,
}

/// What a command needs resolved before its handler runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Requirements {
    pub bridge: bool,
    pub light: bool,
    pub color: bool,
}

impl Command {
    pub fn requirements(&self) -> Requirements {
        let bridge = Requirements {
            bridge: true,
            ..Default::default()
        };
        let light = Requirements {
            light: true,
            ..bridge
        };
        match self {
            Command::Usage | Command::Bridges | Command::Discover => Requirements::default(),
            Command::Lights | Command::Pair => bridge,
            Command::On | Command::Off | Command::Toggle => light,
            Command::Color => Requirements {
                color: true,
                ..light
            },
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            Command::Usage => "show this help",
            Command::Bridges => "list saved bridges",
            Command::Lights => "list the lights of a bridge",
            Command::Discover => "search the network for a bridge and save it",
            Command::Pair => "register with a bridge (press its link button first)",
            Command::On => "turn a light on",
            Command::Off => "turn a light off",
            Command::Toggle => "turn a light on if it is off, off if it is on",
            Command::Color => "set a light to an RGB color",
        }
    }
}

/// A command name plus the selection flags it was invoked with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Invocation {
    pub command: String,
    pub bridge: Option<usize>,
    pub light: Option<usize>,
    pub color: Option<String>,
}

impl Invocation {
    pub fn new(command: &str) -> Self {
        Invocation {
            command: command.to_string(),
            ..Default::default()
        }
    }
}

/// Flags checked and parsed, nothing fetched yet.
struct Checked {
    command: Command,
    bridge: Option<usize>,
    light: Option<usize>,
    color: Option<Rgb>,
}

impl Checked {
    fn bridge(&self) -> Result<usize> {
        self.bridge
            .ok_or_else(|| Error::missing_argument(self.command.as_ref(), "bridge"))
    }

    fn light(&self) -> Result<usize> {
        self.light
            .ok_or_else(|| Error::missing_argument(self.command.as_ref(), "light"))
    }

    fn color(&self) -> Result<Rgb> {
        self.color
            .ok_or_else(|| Error::missing_argument(self.command.as_ref(), "color"))
    }
}

fn check(invocation: &Invocation) -> Result<Checked> {
    let command: Command = invocation
        .command
        .parse()
        .map_err(|_| Error::UnknownCommand(invocation.command.clone()))?;
    let needs = command.requirements();
    let name: &str = command.as_ref();

    let require = |value: Option<usize>, needed: bool, flag: &str| -> Result<Option<usize>> {
        match (needed, value) {
            (false, _) => Ok(None),
            (true, Some(index)) => Ok(Some(index)),
            (true, None) => Err(Error::missing_argument(name, flag)),
        }
    };
    let bridge = require(invocation.bridge, needs.bridge, "bridge")?;
    let light = require(invocation.light, needs.light, "light")?;

    let color = if needs.color {
        let color = invocation
            .color
            .as_deref()
            .ok_or_else(|| Error::missing_argument(name, "color"))?;
        Some(color.parse::<Rgb>()?)
    } else {
        None
    };

    Ok(Checked {
        command,
        bridge,
        light,
        color,
    })
}

fn select_light<'b>(lights: Vec<Light<'b>>, index: usize) -> Result<Light<'b>> {
    let len = lights.len();
    lights
        .into_iter()
        .nth(index)
        .ok_or_else(|| Error::index_out_of_range("light", index, len))
}

/// Resolve the resources `invocation` needs and run its handler.
///
/// Output meant for the user goes to `out`. Errors are returned untouched
/// for the caller to report.
pub async fn dispatch<T: Transport, W: Write>(
    invocation: &Invocation,
    config: &Config,
    transport: &T,
    out: &mut W,
) -> Result<()> {
    let checked = check(invocation)?;
    debug!(
        "dispatching {} bridge={:?} light={:?}",
        checked.command, checked.bridge, checked.light
    );

    match checked.command {
        Command::Usage => usage(out),
        Command::Bridges => list_bridges(config, out),
        Command::Discover => discover(config, out).await,
        Command::Lights => {
            let directory = BridgeDirectory::load(&config.directory)?;
            let bridge = directory.select(checked.bridge()?)?;
            list_lights(bridge, transport, out).await
        }
        Command::Pair => {
            let directory = BridgeDirectory::load(&config.directory)?;
            let bridge = directory.select(checked.bridge()?)?;
            pair(config, transport, &directory, bridge, out).await
        }
        Command::On => control(Action::On, &checked, config, transport, out).await,
        Command::Off => control(Action::Off, &checked, config, transport, out).await,
        Command::Toggle => control(Action::Toggle, &checked, config, transport, out).await,
        Command::Color => {
            let rgb = checked.color()?;
            control(Action::Color(rgb), &checked, config, transport, out).await
        }
    }
}

/// What a light command does once its light is resolved.
#[derive(Debug, Clone, Copy)]
enum Action {
    On,
    Off,
    Toggle,
    Color(Rgb),
}

async fn control<T: Transport, W: Write>(
    action: Action,
    checked: &Checked,
    config: &Config,
    transport: &T,
    out: &mut W,
) -> Result<()> {
    let bridge_index = checked.bridge()?;
    let light_index = checked.light()?;
    let directory = BridgeDirectory::load(&config.directory)?;
    let bridge = directory.select(bridge_index)?;
    let light = select_light(bridge.lights(transport).await?, light_index)?;

    let written = match action {
        Action::On => {
            light.turn_on(transport).await?;
            writeln!(out, "light <{}> is on", light.name())
        }
        Action::Off => {
            light.turn_off(transport).await?;
            writeln!(out, "light <{}> is off", light.name())
        }
        Action::Toggle => {
            light.toggle(transport).await?;
            let now = if light.state().on() { "off" } else { "on" };
            writeln!(out, "light <{}> is {}", light.name(), now)
        }
        Action::Color(rgb) => {
            light.set_color(transport, &rgb).await?;
            writeln!(
                out,
                "light <{}> set to r<{:.3}> g<{:.3}> b<{:.3}>",
                light.name(),
                rgb.red(),
                rgb.green(),
                rgb.blue()
            )
        }
    };
    written.map_err(Error::Output)
}

fn usage<W: Write>(out: &mut W) -> Result<()> {
    let write = |out: &mut W| -> std::io::Result<()> {
        writeln!(out, "usage: hue-cli --cmd <command> [--bridge N] [--light N] [--color 0xRRGGBB]")?;
        writeln!(out)?;
        for command in Command::iter() {
            let needs = command.requirements();
            let mut flags = String::new();
            if needs.bridge {
                flags.push_str(" --bridge N");
            }
            if needs.light {
                flags.push_str(" --light N");
            }
            if needs.color {
                flags.push_str(" --color 0xRRGGBB");
            }
            writeln!(out, "  {:<9}{:<38}{}", command.as_ref(), flags, command.summary())?;
        }
        Ok(())
    };
    write(out).map_err(Error::Output)
}

fn list_bridges<W: Write>(config: &Config, out: &mut W) -> Result<()> {
    let directory = BridgeDirectory::load(&config.directory)?;
    let write = |out: &mut W| -> std::io::Result<()> {
        if directory.is_empty() {
            return writeln!(out, "There are no saved bridges");
        }
        writeln!(out, "#### Found bridges:")?;
        for (ix, bridge) in directory.bridges().iter().enumerate() {
            writeln!(out, "\t[{ix}] {bridge}")?;
        }
        Ok(())
    };
    write(out).map_err(Error::Output)
}

async fn list_lights<T: Transport, W: Write>(
    bridge: &Bridge,
    transport: &T,
    out: &mut W,
) -> Result<()> {
    let lights = bridge.lights(transport).await?;
    let write = |out: &mut W| -> std::io::Result<()> {
        writeln!(out, "#### Available lights:")?;
        for (ix, light) in lights.iter().enumerate() {
            writeln!(out, "\t[{ix}] {light}")?;
        }
        Ok(())
    };
    write(out).map_err(Error::Output)
}

async fn discover<W: Write>(config: &Config, out: &mut W) -> Result<()> {
    let bridge = discover_bridge(config, config.discovery_timeout).await?;
    let mut directory = BridgeDirectory::load(&config.directory)?;
    let index = directory.add(bridge.clone());
    directory.save(&config.directory)?;
    writeln!(out, "Found bridge at {}, saved as [{index}]", bridge.address()).map_err(Error::Output)
}

async fn pair<T: Transport, W: Write>(
    config: &Config,
    transport: &T,
    directory: &BridgeDirectory,
    bridge: &Bridge,
    out: &mut W,
) -> Result<()> {
    let paired = bridge.register(config, transport).await?;
    let mut directory = directory.clone();
    let index = directory.add(paired);
    directory.save(&config.directory)?;
    writeln!(out, "Paired with bridge [{index}] {}", bridge.address()).map_err(Error::Output)
}
