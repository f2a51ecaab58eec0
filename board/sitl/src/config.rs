use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use hal::GnssMode;

const START_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Scenario played back by the simulated receiver
#[derive(Debug, Clone, PartialEq)]
pub struct SitlConfig {
    /// UTC date and time of the first tick
    pub start: NaiveDateTime,
    /// Starting latitude in degrees
    pub latitude: f64,
    /// Starting longitude in degrees
    pub longitude: f64,
    /// Latitude change per tick in degrees
    pub latitude_step: f64,
    /// Longitude change per tick in degrees
    pub longitude_step: f64,
    /// Satellites reported as used
    pub satellites: u8,
    /// Constellations to configure on bring-up
    pub gnss_mode: GnssMode,
    /// Number of update cycles to run
    pub ticks: u32,
    /// Wall-clock pause between cycles
    pub tick_interval: Duration,
}

impl Default for SitlConfig {
    fn default() -> Self {
        Self {
            start: NaiveDateTime::parse_from_str("2024-06-01T12:00:00", START_FORMAT)
                .unwrap_or_default(),
            latitude: 51.508333,
            longitude: -0.125,
            latitude_step: 0.0001,
            longitude_step: 0.0001,
            satellites: 9,
            gnss_mode: GnssMode::default(),
            ticks: 10,
            tick_interval: Duration::from_millis(1000),
        }
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}

impl SitlConfig {
    /// Defaults overridden by `SITL_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let start = match lookup("SITL_START") {
            Some(raw) => NaiveDateTime::parse_from_str(raw.trim(), START_FORMAT)
                .with_context(|| format!("invalid value for SITL_START: {raw:?}"))?,
            None => defaults.start,
        };

        let latitude = parse_var(&lookup, "SITL_LATITUDE", defaults.latitude)?;
        if !(-90.0..=90.0).contains(&latitude) {
            bail!("SITL_LATITUDE out of range: {latitude}");
        }
        let longitude = parse_var(&lookup, "SITL_LONGITUDE", defaults.longitude)?;
        if !(-180.0..=180.0).contains(&longitude) {
            bail!("SITL_LONGITUDE out of range: {longitude}");
        }

        let mode: u8 = parse_var(&lookup, "SITL_GNSS_MODE", defaults.gnss_mode.into())?;
        let gnss_mode = GnssMode::try_from(mode).context("invalid value for SITL_GNSS_MODE")?;

        let tick_ms: u64 = parse_var(
            &lookup,
            "SITL_TICK_MS",
            defaults.tick_interval.as_millis() as u64,
        )?;

        Ok(Self {
            start,
            latitude,
            longitude,
            latitude_step: parse_var(&lookup, "SITL_LATITUDE_STEP", defaults.latitude_step)?,
            longitude_step: parse_var(&lookup, "SITL_LONGITUDE_STEP", defaults.longitude_step)?,
            satellites: parse_var(&lookup, "SITL_SATELLITES", defaults.satellites)?,
            gnss_mode,
            ticks: parse_var(&lookup, "SITL_TICKS", defaults.ticks)?,
            tick_interval: Duration::from_millis(tick_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_overrides() {
        let config = SitlConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, SitlConfig::default());
        assert_eq!(config.start.to_string(), "2024-06-01 12:00:00");
        assert_eq!(config.gnss_mode, GnssMode::GpsBeiDou);
    }

    #[test]
    fn test_overrides() {
        let config = SitlConfig::from_lookup(lookup_from(&[
            ("SITL_START", "2025-01-31T23:59:58"),
            ("SITL_LATITUDE", "-33.8651"),
            ("SITL_LONGITUDE", " 151.2099 "),
            ("SITL_SATELLITES", "14"),
            ("SITL_GNSS_MODE", "7"),
            ("SITL_TICKS", "3"),
            ("SITL_TICK_MS", "0"),
        ]))
        .unwrap();

        assert_eq!(config.start.to_string(), "2025-01-31 23:59:58");
        assert_eq!(config.latitude, -33.8651);
        assert_eq!(config.longitude, 151.2099);
        assert_eq!(config.satellites, 14);
        assert_eq!(config.gnss_mode, GnssMode::GpsBeiDouGlonass);
        assert_eq!(config.ticks, 3);
        assert_eq!(config.tick_interval, Duration::ZERO);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = SitlConfig::from_lookup(lookup_from(&[("SITL_SATELLITES", "lots")])).unwrap_err();
        assert!(err.to_string().contains("SITL_SATELLITES"), "got: {err}");

        let err = SitlConfig::from_lookup(lookup_from(&[("SITL_GNSS_MODE", "8")])).unwrap_err();
        assert!(err.to_string().contains("SITL_GNSS_MODE"), "got: {err}");

        let err = SitlConfig::from_lookup(lookup_from(&[("SITL_LATITUDE", "91")])).unwrap_err();
        assert!(err.to_string().contains("out of range"), "got: {err}");

        let err = SitlConfig::from_lookup(lookup_from(&[("SITL_START", "yesterday")])).unwrap_err();
        assert!(err.to_string().contains("SITL_START"), "got: {err}");
    }
}
