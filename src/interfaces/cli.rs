use std::path::PathBuf;

use clap::{ArgAction, Parser};

/// Command line flags. Values stay raw strings here; conversion happens
/// once, in `Config::from_layer`.
#[derive(Parser, Debug)]
#[command(name = "laundromatic", about = "Discord laundry notifications from a GPIO light sensor")]
pub struct Args {
    /// Bot token
    #[arg(short = 't', long, conflicts_with = "base64_token")]
    pub token: Option<String>,

    /// Bot token, base64 encoded
    #[arg(short = 'b', long = "base64-token", alias = "base64_token")]
    pub base64_token: Option<String>,

    /// Channel name for status messages
    #[arg(short, long)]
    pub channel: Option<String>,

    /// Minutes between "complete" messages
    #[arg(short, long)]
    pub delay: Option<String>,

    /// GPIO (BCM) pin for the light sensor's digital output
    #[arg(short = 'g', long = "gpio", alias = "pin")]
    pub gpio_pin: Option<String>,

    /// Logging level (debug | info | warning | error | critical)
    #[arg(short, long)]
    pub loglevel: Option<String>,

    /// Prefix for commands
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// User id of a watcher (can be used multiple times)
    #[arg(short = 'w', long = "watcher", action = ArgAction::Append)]
    pub watcher: Vec<String>,

    /// User ids of watchers (space separated)
    #[arg(long, num_args = 1.., conflicts_with = "watcher")]
    pub watchers: Vec<String>,

    /// Path to the JSON config file
    #[arg(long, default_value = "config.json")]
    pub config: PathBuf,

    /// Log file path, "-" to log to stdout only
    #[arg(long)]
    pub log_file: Option<String>,

    /// Display timezone offset from UTC in hours
    #[arg(long, allow_hyphen_values = true)]
    pub tz_offset: Option<String>,

    /// Display timezone label
    #[arg(long)]
    pub tz_name: Option<String>,
}
