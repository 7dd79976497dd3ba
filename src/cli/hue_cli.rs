//! Command-line front end for Hue bridges.
//!
//! Every run executes one command from the dispatch table:
//!
//! ```text
//! hue-cli --cmd discover
//! hue-cli --cmd pair --bridge 0
//! hue-cli --cmd lights --bridge 0
//! hue-cli --cmd color --bridge 0 --light 2 --color 0xFF8000
//! ```
//!
//! Long flags are also accepted with a single dash (`-cmd lights -bridge 0`).
//! Logging goes to stderr and is controlled by `RUST_LOG`.

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use hue_bridge_rs::{Config, HttpTransport, Invocation, dispatch};
use log::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hue-cli")]
#[command(about = "Discover, pair with and control Philips Hue lights", long_about = None)]
struct Cli {
    /// Command to run; `usage` lists them all
    #[arg(short, long, default_value = "usage")]
    cmd: String,

    /// Index of a saved bridge, as shown by `bridges`
    #[arg(short, long)]
    bridge: Option<usize>,

    /// Index of a light on the bridge, as shown by `lights`
    #[arg(short, long)]
    light: Option<usize>,

    /// Color as 0xRRGGBB
    #[arg(long)]
    color: Option<String>,

    /// File holding the saved bridges
    #[arg(long, env = "HUE_DIRECTORY", default_value = Config::DEFAULT_DIRECTORY)]
    directory: PathBuf,

    /// How long discovery waits for a bridge, in seconds
    #[arg(short, long, env = "HUE_DISCOVERY_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    /// Bridge address to use instead of SSDP discovery
    #[arg(long, env = "HUE_BRIDGE")]
    fixed_bridge: Option<String>,

    /// API username to use instead of registering one
    #[arg(long, env = "HUE_USERNAME")]
    fixed_username: Option<String>,
}

/// Long flags that may also be spelled with a single dash.
const LONG_FLAGS: &[&str] = &[
    "cmd",
    "bridge",
    "light",
    "color",
    "directory",
    "timeout",
    "fixed-bridge",
    "fixed-username",
    "help",
];

/// Rewrite `-flag` and `-flag=value` to `--flag` forms clap understands.
fn long_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            let Some(flag) = arg.to_str().and_then(|a| a.strip_prefix('-')) else {
                return arg;
            };
            let name = flag.split_once('=').map_or(flag, |(name, _)| name);
            if LONG_FLAGS.contains(&name) {
                OsString::from(format!("--{flag}"))
            } else {
                arg
            }
        })
        .collect()
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::default()
            .with_directory(&self.directory)
            .with_discovery_timeout(Duration::from_secs(self.timeout));
        if let Some(address) = &self.fixed_bridge {
            config = config.with_fixed_bridge(address);
        }
        if let Some(username) = &self.fixed_username {
            config = config.with_fixed_username(username);
        }
        config
    }

    fn invocation(&self) -> Invocation {
        Invocation {
            command: self.cmd.clone(),
            bridge: self.bridge,
            light: self.light,
            color: self.color.clone(),
        }
    }
}

async fn run(cli: &Cli) -> Result<(), hue_bridge_rs::Error> {
    let config = cli.config();
    let transport = HttpTransport::new(config.request_timeout)?;
    let mut stdout = io::stdout().lock();
    dispatch(&cli.invocation(), &config, &transport, &mut stdout).await?;
    stdout.flush().map_err(hue_bridge_rs::Error::Output)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse_from(long_flags(std::env::args_os()));
    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!("{} failed: {:?}", cli.cmd, err);
            eprintln!("Error: {err}");
            ExitCode::from(err.kind().exit_code())
        }
    }
}
