use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{bail, Context};

use crate::models::INITIAL_RATE;

/// Simulated processing delay applied before each operation takes effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    pub rate_update: Duration,
    pub conversion: Duration,
    pub history: Duration,
}

impl Latency {
    pub fn none() -> Self {
        Self {
            rate_update: Duration::ZERO,
            conversion: Duration::ZERO,
            history: Duration::ZERO,
        }
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self {
            rate_update: Duration::from_millis(1000),
            conversion: Duration::from_millis(2000),
            history: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub initial_rate: f64,
    pub latency: Latency,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            initial_rate: INITIAL_RATE,
            latency: Latency::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let port: u16 = parse_or(&lookup, "PORT", defaults.listen_addr.port())?;
        let initial_rate: f64 = parse_or(&lookup, "CAMBIO_INITIAL_RATE", defaults.initial_rate)?;
        if !initial_rate.is_finite() || initial_rate <= 0.0 {
            bail!("CAMBIO_INITIAL_RATE must be greater than zero, got {initial_rate}");
        }

        let latency = Latency {
            rate_update: millis_or(&lookup, "CAMBIO_RATE_LATENCY_MS", defaults.latency.rate_update)?,
            conversion: millis_or(
                &lookup,
                "CAMBIO_CONVERSION_LATENCY_MS",
                defaults.latency.conversion,
            )?,
            history: millis_or(&lookup, "CAMBIO_HISTORY_LATENCY_MS", defaults.latency.history)?,
        };

        Ok(Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], port)),
            initial_rate,
            latency,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid {key}: {raw:?}")),
        None => Ok(default),
    }
}

fn millis_or<F>(lookup: &F, key: &str, default: Duration) -> anyhow::Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let default_ms = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
    parse_or(lookup, key, default_ms).map(Duration::from_millis)
}
