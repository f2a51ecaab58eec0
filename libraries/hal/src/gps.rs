/// GPS sensor interface
use core::fmt;

use crate::types::GnssMode;

/// Calendar date reported by the receiver (UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpsDate {
    /// Year (e.g. 2024)
    pub year: u16,
    /// Month (1-12)
    pub month: u8,
    /// Day (1-31)
    pub day: u8,
}

/// Renders as `DD-MM-YYYY`; wider values are printed in full
impl fmt::Display for GpsDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}-{:04}", self.day, self.month, self.year)
    }
}

/// UTC time of day reported by the receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UtcTime {
    /// Hour (0-23)
    pub hour: u8,
    /// Minute (0-59)
    pub minute: u8,
    /// Second (0-59)
    pub second: u8,
}

/// Renders as `HH:MM:SS`
impl fmt::Display for UtcTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

/// GPS position in signed decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpsPosition {
    /// Latitude in degrees, negative south of the equator
    pub latitude: f64,
    /// Longitude in degrees, negative west of Greenwich
    pub longitude: f64,
}

/// GPS interface
///
/// Readings follow an update/get split: the `update_*` methods talk to the
/// device and refresh a snapshot, the plain getters only return that
/// snapshot. A getter called before its updater returns the zero value.
pub trait GpsSensor {
    type Error;

    /// Refresh the cached date
    fn update_date(&mut self) -> Result<(), Self::Error>;

    /// Refresh the cached UTC time
    fn update_utc(&mut self) -> Result<(), Self::Error>;

    /// Refresh the cached latitude and longitude
    fn update_coordinates(&mut self) -> Result<(), Self::Error>;

    /// Refresh date, time and position, in that order
    fn update_all(&mut self) -> Result<(), Self::Error> {
        self.update_date()?;
        self.update_utc()?;
        self.update_coordinates()
    }

    fn date(&self) -> GpsDate;

    fn utc_time(&self) -> UtcTime;

    fn position(&self) -> GpsPosition;

    /// Number of satellites used for the current solution, read from the device
    fn satellite_count(&mut self) -> Result<u8, Self::Error>;

    /// Constellations the receiver is tracking, read from the device
    fn gnss_mode(&mut self) -> Result<GnssMode, Self::Error>;

    /// Configure which GNSS constellations to use
    fn configure_gnss(&mut self, mode: GnssMode) -> Result<(), Self::Error>;

    /// Power the receiver up or put it to sleep
    fn set_power(&mut self, enabled: bool) -> Result<(), Self::Error>;

    /// Switch the status LED on or off
    fn set_indicator(&mut self, on: bool) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_zero_padding() {
        let date = GpsDate { year: 5, month: 3, day: 1 };
        assert_eq!(date.to_string(), "01-03-0005");

        let date = GpsDate { year: 2024, month: 12, day: 31 };
        assert_eq!(date.to_string(), "31-12-2024");
    }

    #[test]
    fn test_date_wide_values_are_not_truncated() {
        let date = GpsDate { year: 65535, month: 255, day: 255 };
        assert_eq!(date.to_string(), "255-255-65535");
    }

    #[test]
    fn test_time_zero_padding() {
        let time = UtcTime { hour: 1, minute: 2, second: 3 };
        assert_eq!(time.to_string(), "01:02:03");

        let time = UtcTime { hour: 23, minute: 59, second: 0 };
        assert_eq!(time.to_string(), "23:59:00");
    }

    #[test]
    fn test_defaults_are_zero() {
        assert_eq!(GpsDate::default().to_string(), "00-00-0000");
        assert_eq!(UtcTime::default().to_string(), "00:00:00");
        let position = GpsPosition::default();
        assert_eq!(position.latitude, 0.0);
        assert_eq!(position.longitude, 0.0);
    }
}
