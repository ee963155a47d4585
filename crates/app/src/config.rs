//! Controller settings.
//!
//! Defaults reproduce the demo app's fixed values; every setting can be
//! overridden from `ORDERAPP_*` environment variables.

use std::ops::RangeInclusive;
use std::time::Duration;

use thiserror::Error;

use orderapp_core::Time;
use orderapp_observability::LogFormat;

pub const ENV_CONNECTIVITY_INTERVAL_SECS: &str = "ORDERAPP_CONNECTIVITY_INTERVAL_SECS";
pub const ENV_PROBE_ADDR: &str = "ORDERAPP_PROBE_ADDR";
pub const ENV_RECORDS_FROM: &str = "ORDERAPP_RECORDS_FROM";
pub const ENV_RECORDS_TO: &str = "ORDERAPP_RECORDS_TO";
pub const ENV_ORDERS_FROM: &str = "ORDERAPP_ORDERS_FROM";
pub const ENV_ORDERS_TO: &str = "ORDERAPP_ORDERS_TO";
pub const ENV_STARTUP_BLOG_NAME: &str = "ORDERAPP_STARTUP_BLOG_NAME";
pub const ENV_DELETE_BLOG_NAME: &str = "ORDERAPP_DELETE_BLOG_NAME";
pub const ENV_LOG_FORMAT: &str = "ORDERAPP_LOG_FORMAT";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// How often the connectivity monitor polls.
    pub connectivity_interval: Duration,
    /// `host:port` the TCP probe dials; `None` assumes the network is up.
    pub probe_addr: Option<String>,
    /// Suffixes used by `add_records` (`WareHouse3001`, `P3001`, ...).
    pub record_ids: RangeInclusive<u32>,
    /// Ids of the blogs and orders written by `create_orders`.
    pub order_ids: RangeInclusive<u32>,
    /// Blog saved during startup.
    pub startup_blog_name: String,
    /// Blog looked up and removed by `delete_blog`.
    pub delete_blog_name: String,
    /// Time stamped on the sample blogs.
    pub sample_blog_time: Time,
    pub log_format: LogFormat,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            connectivity_interval: Duration::from_secs(60),
            probe_addr: None,
            record_ids: 3001..=4000,
            order_ids: 35011..=35013,
            startup_blog_name: "new blog 7".to_string(),
            delete_blog_name: "new blog 6".to_string(),
            sample_blog_time: Time::new(default_sample_time()),
            log_format: LogFormat::Json,
        }
    }
}

fn default_sample_time() -> chrono::NaiveTime {
    chrono::NaiveTime::from_hms_nano_opt(21, 37, 56, 955_359_000).unwrap_or_default()
}

impl ControllerConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `ORDERAPP_*` key.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_CONNECTIVITY_INTERVAL_SECS) {
            let secs: u64 = parse(ENV_CONNECTIVITY_INTERVAL_SECS, &raw)?;
            if secs == 0 {
                return Err(ConfigError::invalid(ENV_CONNECTIVITY_INTERVAL_SECS, &raw, "must be positive"));
            }
            config.connectivity_interval = Duration::from_secs(secs);
        }

        if let Some(addr) = lookup(ENV_PROBE_ADDR).filter(|a| !a.trim().is_empty()) {
            config.probe_addr = Some(addr.trim().to_string());
        }

        config.record_ids = range(&lookup, ENV_RECORDS_FROM, ENV_RECORDS_TO, config.record_ids)?;
        config.order_ids = range(&lookup, ENV_ORDERS_FROM, ENV_ORDERS_TO, config.order_ids)?;

        if let Some(name) = lookup(ENV_STARTUP_BLOG_NAME) {
            config.startup_blog_name = name;
        }
        if let Some(name) = lookup(ENV_DELETE_BLOG_NAME) {
            config.delete_blog_name = name;
        }

        if let Some(raw) = lookup(ENV_LOG_FORMAT) {
            config.log_format = raw
                .parse()
                .map_err(|reason: String| ConfigError::invalid(ENV_LOG_FORMAT, &raw, reason))?;
        }

        Ok(config)
    }
}

fn parse<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::invalid(key, raw, e.to_string()))
}

fn range(
    lookup: &impl Fn(&str) -> Option<String>,
    from_key: &'static str,
    to_key: &'static str,
    default: RangeInclusive<u32>,
) -> Result<RangeInclusive<u32>, ConfigError> {
    let start = match lookup(from_key) {
        Some(raw) => parse(from_key, &raw)?,
        None => *default.start(),
    };
    let end = match lookup(to_key) {
        Some(raw) => parse(to_key, &raw)?,
        None => *default.end(),
    };
    if start > end {
        return Err(ConfigError::invalid(
            to_key,
            &end.to_string(),
            format!("must not be below {from_key} ({start})"),
        ));
    }
    Ok(start..=end)
}
