/// Common data types for the GNSS hardware abstraction
use core::fmt;

use thiserror::Error;

/// Constellation selection of the receiver
///
/// The discriminants are the values the module stores in its mode register.
/// They form a bit set: bit 0 = GPS, bit 1 = BeiDou, bit 2 = GLONASS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum GnssMode {
    Gps = 1,
    BeiDou = 2,
    /// Power-on default of the module
    #[default]
    GpsBeiDou = 3,
    Glonass = 4,
    GpsGlonass = 5,
    BeiDouGlonass = 6,
    GpsBeiDouGlonass = 7,
}

const GPS_BIT: u8 = 0b001;
const BEIDOU_BIT: u8 = 0b010;
const GLONASS_BIT: u8 = 0b100;

impl GnssMode {
    /// Build a mode from the set of constellations to track.
    /// Returns `None` when no constellation is selected.
    pub fn from_constellations(use_gps: bool, use_beidou: bool, use_glonass: bool) -> Option<Self> {
        let mut bits = 0;
        if use_gps {
            bits |= GPS_BIT;
        }
        if use_beidou {
            bits |= BEIDOU_BIT;
        }
        if use_glonass {
            bits |= GLONASS_BIT;
        }
        Self::try_from(bits).ok()
    }

    pub fn uses_gps(self) -> bool {
        self as u8 & GPS_BIT != 0
    }

    pub fn uses_beidou(self) -> bool {
        self as u8 & BEIDOU_BIT != 0
    }

    pub fn uses_glonass(self) -> bool {
        self as u8 & GLONASS_BIT != 0
    }
}

/// Raised when a byte does not name one of the seven GNSS modes
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("invalid GNSS mode value {0} (expected 1..=7)")]
pub struct InvalidGnssMode(pub u8);

impl TryFrom<u8> for GnssMode {
    type Error = InvalidGnssMode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(GnssMode::Gps),
            2 => Ok(GnssMode::BeiDou),
            3 => Ok(GnssMode::GpsBeiDou),
            4 => Ok(GnssMode::Glonass),
            5 => Ok(GnssMode::GpsGlonass),
            6 => Ok(GnssMode::BeiDouGlonass),
            7 => Ok(GnssMode::GpsBeiDouGlonass),
            other => Err(InvalidGnssMode(other)),
        }
    }
}

impl From<GnssMode> for u8 {
    fn from(mode: GnssMode) -> Self {
        mode as u8
    }
}

impl fmt::Display for GnssMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GnssMode::Gps => "GPS",
            GnssMode::BeiDou => "BeiDou",
            GnssMode::GpsBeiDou => "GPS+BeiDou",
            GnssMode::Glonass => "GLONASS",
            GnssMode::GpsGlonass => "GPS+GLONASS",
            GnssMode::BeiDouGlonass => "BeiDou+GLONASS",
            GnssMode::GpsBeiDouGlonass => "GPS+BeiDou+GLONASS",
        };
        f.write_str(name)
    }
}

/// Which coordinate a raw degrees-minutes reading belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CoordinateAxis {
    Latitude,
    Longitude,
}

impl CoordinateAxis {
    /// ASCII hemisphere letter that makes the coordinate negative
    pub const fn negative_indicator(self) -> u8 {
        match self {
            CoordinateAxis::Latitude => b'S',
            CoordinateAxis::Longitude => b'W',
        }
    }

    /// ASCII hemisphere letter for non-negative coordinates
    pub const fn positive_indicator(self) -> u8 {
        match self {
            CoordinateAxis::Latitude => b'N',
            CoordinateAxis::Longitude => b'E',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gnss_mode_register_values() {
        for value in 1..=7u8 {
            let mode = GnssMode::try_from(value).expect("1..=7 are valid modes");
            assert_eq!(u8::from(mode), value);
        }
        assert_eq!(GnssMode::try_from(0), Err(InvalidGnssMode(0)));
        assert_eq!(GnssMode::try_from(8), Err(InvalidGnssMode(8)));
    }

    #[test]
    fn test_gnss_mode_default_is_gps_beidou() {
        assert_eq!(GnssMode::default(), GnssMode::GpsBeiDou);
        assert_eq!(u8::from(GnssMode::default()), 3);
    }

    #[test]
    fn test_gnss_mode_constellations() {
        let mode = GnssMode::GpsGlonass;
        assert!(mode.uses_gps());
        assert!(!mode.uses_beidou());
        assert!(mode.uses_glonass());

        assert_eq!(
            GnssMode::from_constellations(false, true, true),
            Some(GnssMode::BeiDouGlonass)
        );
        assert_eq!(
            GnssMode::from_constellations(true, true, true),
            Some(GnssMode::GpsBeiDouGlonass)
        );
        assert_eq!(GnssMode::from_constellations(false, false, false), None);
    }

    #[test]
    fn test_gnss_mode_display() {
        assert_eq!(GnssMode::BeiDou.to_string(), "BeiDou");
        assert_eq!(GnssMode::GpsBeiDouGlonass.to_string(), "GPS+BeiDou+GLONASS");
        assert_eq!(
            InvalidGnssMode(9).to_string(),
            "invalid GNSS mode value 9 (expected 1..=7)"
        );
    }

    #[test]
    fn test_hemisphere_indicators() {
        assert_eq!(CoordinateAxis::Latitude.negative_indicator(), b'S');
        assert_eq!(CoordinateAxis::Latitude.positive_indicator(), b'N');
        assert_eq!(CoordinateAxis::Longitude.negative_indicator(), b'W');
        assert_eq!(CoordinateAxis::Longitude.positive_indicator(), b'E');
    }
}
