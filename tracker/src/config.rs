use crate::scheduler::SchedulerConfig;
use serde::Deserialize;
use std::{
    fs, io,
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;
use url::Url;

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_SOURCE_URL: &str =
    "https://celestrak.org/NORAD/elements/gp.php?GROUP=active&FORMAT=tle";
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 10);
pub const DEFAULT_REFRESH_PERIOD: Duration = Duration::from_secs(2);
pub const DEFAULT_MAX_RECORDS: usize = 200;
pub const DEFAULT_ORIGIN_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_FOCUS_ZOOM: u8 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse config file")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid duration '{value}' for '{key}'")]
    Duration {
        key: &'static str,
        value: String,
        #[source]
        source: humantime::DurationError,
    },
    #[error("Invalid listen address '{0}'")]
    ListenAddr(String),
    #[error("Invalid source URL '{value}'")]
    SourceUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("'{0}' must be greater than zero")]
    Zero(&'static str),
}

/// The configuration file, as written by users.
///
/// Durations are human-readable strings, e.g. `refresh-period = '2s'`.
#[derive(Clone, PartialEq, Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub listen: Option<String>,
    pub source: Option<String>,
    pub cache: Option<Cache>,
    pub scheduler: Option<Scheduler>,
    pub origin: Option<Origin>,
    pub focus: Option<Focus>,
}

#[derive(Clone, PartialEq, Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Cache {
    pub ttl: Option<String>,
}

#[derive(Clone, PartialEq, Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Scheduler {
    pub refresh_period: Option<String>,
    pub max_records: Option<usize>,
}

#[derive(Clone, PartialEq, Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Origin {
    pub timeout: Option<String>,
}

#[derive(Clone, PartialEq, Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Focus {
    pub zoom: Option<u8>,
}

/// Fully resolved runtime configuration
#[derive(Clone, PartialEq, Debug)]
pub struct TrackerConfig {
    pub listen: SocketAddr,
    pub source: Url,
    pub cache_ttl: Duration,
    pub refresh_period: Duration,
    pub max_records: usize,
    pub origin_timeout: Duration,
    pub focus_zoom: u8,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            listen: SocketAddr::from(([127, 0, 0, 1], 8080)),
            source: Url::parse(DEFAULT_SOURCE_URL).expect("Default source URL is valid"),
            cache_ttl: DEFAULT_CACHE_TTL,
            refresh_period: DEFAULT_REFRESH_PERIOD,
            max_records: DEFAULT_MAX_RECORDS,
            origin_timeout: DEFAULT_ORIGIN_TIMEOUT,
            focus_zoom: DEFAULT_FOCUS_ZOOM,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_str_checked(&content)
    }

    pub fn from_str_checked(s: &str) -> Result<Self, ConfigError> {
        let cfg: Config = toml::from_str(s)?;
        // Surface invalid values at load time rather than at startup
        cfg.resolve()?;
        Ok(cfg)
    }

    /// Apply this file's values on top of the defaults
    pub fn resolve(&self) -> Result<TrackerConfig, ConfigError> {
        let mut out = TrackerConfig::default();

        if let Some(listen) = self.listen.as_deref() {
            out.listen = listen
                .parse()
                .map_err(|_| ConfigError::ListenAddr(listen.to_owned()))?;
        }
        if let Some(source) = self.source.as_deref() {
            out.source = Url::parse(source).map_err(|e| ConfigError::SourceUrl {
                value: source.to_owned(),
                source: e,
            })?;
        }
        if let Some(ttl) = self.cache.as_ref().and_then(|c| c.ttl.as_deref()) {
            out.cache_ttl = duration("cache.ttl", ttl)?;
        }
        if let Some(s) = self.scheduler.as_ref() {
            if let Some(p) = s.refresh_period.as_deref() {
                out.refresh_period = duration("scheduler.refresh-period", p)?;
            }
            if let Some(n) = s.max_records {
                out.max_records = n;
            }
        }
        if let Some(t) = self.origin.as_ref().and_then(|o| o.timeout.as_deref()) {
            out.origin_timeout = duration("origin.timeout", t)?;
        }
        if let Some(z) = self.focus.as_ref().and_then(|f| f.zoom) {
            out.focus_zoom = z;
        }

        out.check()?;
        Ok(out)
    }
}

impl TrackerConfig {
    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            refresh_period: self.refresh_period,
            max_records: self.max_records,
        }
    }

    pub fn check(&self) -> Result<(), ConfigError> {
        self.scheduler_config().check()?;
        if self.cache_ttl.is_zero() {
            return Err(ConfigError::Zero("cache.ttl"));
        }
        Ok(())
    }
}

fn duration(key: &'static str, value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value).map_err(|source| ConfigError::Duration {
        key,
        value: value.to_owned(),
        source,
    })
}
