use std::io::{BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::TimeDelta;
use serde::Deserialize;

use crate::application::{AppError, AppResult};
use crate::domain::{DisplayZone, UserId};
use crate::interfaces::cli::Args;
use crate::interfaces::logging::LogLevel;

pub const ENV_PREFIX: &str = "LAUNDROMATIC_";

const DEFAULT_CHANNEL: &str = "laundromatic";
const DEFAULT_PREFIX: &str = "!";
const DEFAULT_DELAY_MINUTES: u32 = 30;
const DEFAULT_GPIO_PIN: u8 = 4;
const DEFAULT_LOG_FILE: &str = "laundromatic.log";
const DEFAULT_TZ_OFFSET: i32 = -7;
const DEFAULT_TZ_NAME: &str = "Arizona";

/// Settings the bot runs with.
#[derive(Clone, Debug)]
pub struct Config {
    pub token: String,
    pub channel: String,
    pub prefix: String,
    pub delay_minutes: u32,
    pub gpio_pin: u8,
    pub loglevel: LogLevel,
    pub watchers: Vec<UserId>,
    pub log_file: Option<PathBuf>,
    pub zone: DisplayZone,
}

/// One configuration source, unconverted. Empty values count as unset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    pub token: Option<String>,
    pub channel: Option<String>,
    pub prefix: Option<String>,
    pub delay: Option<String>,
    pub gpio_pin: Option<String>,
    pub loglevel: Option<String>,
    pub watchers: Option<Vec<String>>,
    pub log_file: Option<String>,
    pub tz_offset: Option<String>,
    pub tz_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Number(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    token: Option<Scalar>,
    channel: Option<Scalar>,
    prefix: Option<Scalar>,
    delay: Option<Scalar>,
    gpiopin: Option<Scalar>,
    loglevel: Option<Scalar>,
    watchers: Option<Vec<Scalar>>,
    log_file: Option<Scalar>,
    tz_offset: Option<Scalar>,
    tz_name: Option<Scalar>,
}

fn set(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn set_list(values: Vec<String>) -> Option<Vec<String>> {
    let values: Vec<String> = values
        .into_iter()
        .filter(|v| !v.trim().is_empty())
        .collect();
    if values.is_empty() { None } else { Some(values) }
}

impl ConfigLayer {
    pub fn from_args(args: &Args) -> AppResult<Self> {
        let token = match &args.base64_token {
            Some(encoded) => Some(decode_base64_token(encoded)?),
            None => args.token.clone(),
        };

        let mut watchers = args.watcher.clone();
        watchers.extend(args.watchers.iter().cloned());

        Ok(Self {
            token: set(token),
            channel: set(args.channel.clone()),
            prefix: set(args.prefix.clone()),
            delay: set(args.delay.clone()),
            gpio_pin: set(args.gpio_pin.clone()),
            loglevel: set(args.loglevel.clone()),
            watchers: set_list(watchers),
            log_file: set(args.log_file.clone()),
            tz_offset: set(args.tz_offset.clone()),
            tz_name: set(args.tz_name.clone()),
        })
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `lookup` receives the full variable name, e.g. `LAUNDROMATIC_TOKEN`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| set(lookup(&format!("{ENV_PREFIX}{name}")));
        Self {
            token: get("TOKEN"),
            channel: get("CHANNEL"),
            prefix: get("PREFIX"),
            delay: get("DELAY"),
            gpio_pin: get("GPIOPIN"),
            loglevel: get("LOGLEVEL"),
            watchers: get("WATCHERS")
                .and_then(|raw| set_list(raw.split_whitespace().map(str::to_string).collect())),
            log_file: get("LOG_FILE"),
            tz_offset: get("TZ_OFFSET"),
            tz_name: get("TZ_NAME"),
        }
    }

    pub fn from_json_str(raw: &str) -> AppResult<Self> {
        let file: FileConfig =
            serde_json::from_str(raw).map_err(|e| AppError::Config(format!("config file: {e}")))?;
        let s = |v: Option<Scalar>| set(v.map(Scalar::into_string));

        Ok(Self {
            token: s(file.token),
            channel: s(file.channel),
            prefix: s(file.prefix),
            delay: s(file.delay),
            gpio_pin: s(file.gpiopin),
            loglevel: s(file.loglevel),
            watchers: file
                .watchers
                .and_then(|w| set_list(w.into_iter().map(Scalar::into_string).collect())),
            log_file: s(file.log_file),
            tz_offset: s(file.tz_offset),
            tz_name: s(file.tz_name),
        })
    }

    /// `None` if the file does not exist.
    pub fn from_file(path: &Path) -> AppResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&raw).map(Some)
    }

    /// Fields set in `self` win; `lower` fills the gaps.
    pub fn overlay(self, lower: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            token: self.token.or(lower.token),
            channel: self.channel.or(lower.channel),
            prefix: self.prefix.or(lower.prefix),
            delay: self.delay.or(lower.delay),
            gpio_pin: self.gpio_pin.or(lower.gpio_pin),
            loglevel: self.loglevel.or(lower.loglevel),
            watchers: self.watchers.or(lower.watchers),
            log_file: self.log_file.or(lower.log_file),
            tz_offset: self.tz_offset.or(lower.tz_offset),
            tz_name: self.tz_name.or(lower.tz_name),
        }
    }
}

pub fn decode_base64_token(encoded: &str) -> AppResult<String> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| AppError::Config(format!("base64 token: {e}")))?;
    String::from_utf8(bytes).map_err(|e| AppError::Config(format!("base64 token: {e}")))
}

impl Config {
    /// CLI > environment > config file > interactive prompt > defaults.
    pub fn load(args: &Args) -> AppResult<Self> {
        let cli = ConfigLayer::from_args(args)?;
        let env = ConfigLayer::from_env();
        let file = ConfigLayer::from_file(&args.config)?.unwrap_or_default();

        Self::from_layer(cli.overlay(env).overlay(file), prompt_token)
    }

    /// Convert a merged layer. `prompt` is only asked for a missing token.
    pub fn from_layer(
        layer: ConfigLayer,
        prompt: impl FnOnce() -> Option<String>,
    ) -> AppResult<Self> {
        let token = layer
            .token
            .or_else(|| set(prompt()))
            .ok_or_else(|| AppError::Config("no token provided".into()))?;

        let delay_minutes = match layer.delay {
            Some(raw) => match raw.trim().parse::<u32>() {
                // 0 means "use the default", as it always has
                Ok(0) => DEFAULT_DELAY_MINUTES,
                Ok(m) => m,
                Err(_) => {
                    return Err(AppError::Config(format!(
                        "delay must be a whole number of minutes, got {raw:?}"
                    )));
                }
            },
            None => DEFAULT_DELAY_MINUTES,
        };

        let gpio_pin = match layer.gpio_pin {
            Some(raw) => raw
                .trim()
                .parse::<u8>()
                .map_err(|_| AppError::Config(format!("invalid gpio pin {raw:?}")))?,
            None => DEFAULT_GPIO_PIN,
        };

        let loglevel = match layer.loglevel {
            Some(raw) => raw.parse::<LogLevel>().map_err(AppError::Config)?,
            None => LogLevel::default(),
        };

        let watchers = layer
            .watchers
            .unwrap_or_default()
            .iter()
            .map(|raw| {
                raw.parse::<UserId>()
                    .map_err(|e| AppError::Config(format!("watchers: {e}")))
            })
            .collect::<AppResult<Vec<_>>>()?;

        let log_file = match layer.log_file.as_deref() {
            Some("-") => None,
            Some(path) => Some(PathBuf::from(path)),
            None => Some(PathBuf::from(DEFAULT_LOG_FILE)),
        };

        let tz_offset = match layer.tz_offset {
            Some(raw) => raw
                .trim()
                .parse::<i32>()
                .map_err(|_| AppError::Config(format!("invalid tz offset {raw:?}")))?,
            None => DEFAULT_TZ_OFFSET,
        };
        let tz_name = layer.tz_name.unwrap_or_else(|| DEFAULT_TZ_NAME.to_string());
        let zone = DisplayZone::from_hours(tz_offset, tz_name)
            .ok_or_else(|| AppError::Config(format!("tz offset out of range: {tz_offset}")))?;

        Ok(Self {
            token,
            channel: layer.channel.unwrap_or_else(|| DEFAULT_CHANNEL.to_string()),
            prefix: layer.prefix.unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
            delay_minutes,
            gpio_pin,
            loglevel,
            watchers,
            log_file,
            zone,
        })
    }

    pub fn cooldown(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.delay_minutes))
    }

    /// Loggable view; the token is masked.
    pub fn redacted(&self) -> String {
        format!(
            "channel={} prefix={} delay={}m gpio={} loglevel={} watchers={:?} log_file={:?} zone={} token=***",
            self.channel,
            self.prefix,
            self.delay_minutes,
            self.gpio_pin,
            self.loglevel,
            self.watchers.iter().map(|w| w.get()).collect::<Vec<_>>(),
            self.log_file,
            self.zone.name,
        )
    }
}

/// Ask for the token on the terminal; never when stdin is piped.
fn prompt_token() -> Option<String> {
    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        return None;
    }

    let mut stderr = std::io::stderr();
    let _ = write!(stderr, "Token: ");
    let _ = stderr.flush();

    let mut line = String::new();
    stdin.lock().read_line(&mut line).ok()?;
    Some(line.trim().to_string())
}
