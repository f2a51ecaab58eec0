//! Conversions from raw register bytes to readings.
//!
//! The decoders take slices so that a short buffer is a defined
//! [`Error::Truncated`] instead of an out-of-bounds access.

use core::fmt::Write;

use hal::{CoordinateAxis, GpsDate, GpsPosition, UtcTime};
use heapless::String;

use crate::error::Error;
use crate::registers::{COORDINATE_DATA_LEN, DATE_LEN, FRACTION_SCALE, HEMISPHERE_LEN, UTC_LEN};

/// Capacity of a rendered date, `255-255-65535` at the widest
pub const DATE_STRING_LEN: usize = 13;
/// Capacity of a rendered time, `255:255:255` at the widest
pub const TIME_STRING_LEN: usize = 11;

fn ensure_len(buf: &[u8], expected: usize) -> Result<(), Error> {
    if buf.len() < expected {
        return Err(Error::Truncated { expected, actual: buf.len() });
    }
    Ok(())
}

/// Decode `[year_hi, year_lo, month, day]`
pub fn decode_date(raw: &[u8]) -> Result<GpsDate, Error> {
    ensure_len(raw, DATE_LEN)?;
    Ok(GpsDate {
        year: u16::from_be_bytes([raw[0], raw[1]]),
        month: raw[2],
        day: raw[3],
    })
}

/// Decode `[hour, minute, second]`
pub fn decode_utc(raw: &[u8]) -> Result<UtcTime, Error> {
    ensure_len(raw, UTC_LEN)?;
    Ok(UtcTime {
        hour: raw[0],
        minute: raw[1],
        second: raw[2],
    })
}

/// Convert a degrees-minutes reading to signed decimal degrees.
///
/// `raw` is `[degrees, minutes, frac_hi, frac_mid, frac_lo]` where the
/// fraction counts 1/100000 of a minute. The result is negated only when the
/// hemisphere byte equals the axis's negative letter; any other byte counts
/// as positive. Degree and minute ranges are not validated.
pub fn decode_coordinate(raw: &[u8], hemisphere: &[u8], axis: CoordinateAxis) -> Result<f64, Error> {
    ensure_len(raw, COORDINATE_DATA_LEN)?;
    ensure_len(hemisphere, HEMISPHERE_LEN)?;

    let degrees = raw[0] as f64;
    let minutes = raw[1] as f64;
    let fraction = u32::from_be_bytes([0, raw[2], raw[3], raw[4]]) as f64;

    let value = degrees + minutes / 60.0 + fraction / FRACTION_SCALE / 60.0;
    if hemisphere[0] == axis.negative_indicator() {
        Ok(-value)
    } else {
        Ok(value)
    }
}

fn render<const N: usize>(value: impl core::fmt::Display) -> String<N> {
    let mut out = String::new();
    // Capacity covers the widest rendering of every u8/u16 field.
    let _ = write!(out, "{}", value);
    out
}

/// Snapshot of the readings last fetched from the module
///
/// Each field is written only by its matching updater.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GnssState {
    pub date: GpsDate,
    pub time: UtcTime,
    pub position: GpsPosition,
}

impl GnssState {
    /// Date as `DD-MM-YYYY`
    pub fn format_date(&self) -> String<DATE_STRING_LEN> {
        render(self.date)
    }

    /// Time as `HH:MM:SS`
    pub fn format_utc_time(&self) -> String<TIME_STRING_LEN> {
        render(self.time)
    }
}
