use embedded_hal::i2c::{Error as _, I2c};
use hal::{CoordinateAxis, GnssMode, GpsDate, GpsPosition, GpsSensor, UtcTime};
use heapless::String;

use crate::decode::{decode_coordinate, decode_date, decode_utc, GnssState, DATE_STRING_LEN, TIME_STRING_LEN};
use crate::error::Error;
use crate::registers::*;

/// Configuration for the L76K driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct L76kConfig {
    /// 7-bit I2C address of the module
    pub address: u8,
}

impl Default for L76kConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_I2C_ADDRESS,
        }
    }
}

/// Blocking driver for the L76K GNSS module
///
/// Owns the bus and a snapshot of the last readings. Updaters read the
/// device and overwrite one part of the snapshot; getters never touch the
/// bus. Every call runs its transactions to completion before returning.
pub struct L76k<I> {
    i2c: I,
    config: L76kConfig,
    state: GnssState,
}

impl<I: I2c> L76k<I> {
    /// Create a driver for a module at the default address (0x20)
    pub fn new(i2c: I) -> Self {
        Self::new_with_config(i2c, L76kConfig::default())
    }

    pub fn new_with_config(i2c: I, config: L76kConfig) -> Self {
        Self {
            i2c,
            config,
            state: GnssState::default(),
        }
    }

    pub fn config(&self) -> &L76kConfig {
        &self.config
    }

    /// Access the underlying bus
    pub fn bus_mut(&mut self) -> &mut I {
        &mut self.i2c
    }

    /// Give the bus back, dropping the cached readings
    pub fn release(self) -> I {
        self.i2c
    }

    /// Select `register` with a one-byte write, then read `buf.len()` bytes
    /// in a separate transaction
    fn read_registers(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Error> {
        let address = self.config.address;
        log::trace!("select register {} on {:#04x}", register, address);
        self.i2c.write(address, &[register]).map_err(|e| {
            log::warn!("register select {} failed: {:?}", register, e.kind());
            Error::RegisterSelect { register, kind: e.kind() }
        })?;

        let len = buf.len();
        self.i2c.read(address, buf).map_err(|e| {
            log::warn!("read of register {} failed: {:?}", register, e.kind());
            Error::Read { register, len, kind: e.kind() }
        })?;
        log::trace!("register {} -> {:02x?}", register, buf);
        Ok(())
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), Error> {
        let address = self.config.address;
        log::trace!("write {:#04x} to register {} on {:#04x}", value, register, address);
        self.i2c.write(address, &[register, value]).map_err(|e| {
            log::warn!("write of register {} failed: {:?}", register, e.kind());
            Error::Write { register, value, kind: e.kind() }
        })
    }

    fn read_register(&mut self, register: u8) -> Result<u8, Error> {
        let mut buf = [0u8; 1];
        self.read_registers(register, &mut buf)?;
        Ok(buf[0])
    }

    /// Read year, month and day into the snapshot
    pub fn update_date(&mut self) -> Result<(), Error> {
        let mut raw = [0u8; DATE_LEN];
        self.read_registers(REG_YEAR_H, &mut raw)?;
        self.state.date = decode_date(&raw)?;
        log::debug!("date updated: {}", self.state.date);
        Ok(())
    }

    /// Read hours, minutes and seconds into the snapshot
    pub fn update_utc(&mut self) -> Result<(), Error> {
        let mut raw = [0u8; UTC_LEN];
        self.read_registers(REG_HOUR, &mut raw)?;
        self.state.time = decode_utc(&raw)?;
        log::debug!("utc updated: {}", self.state.time);
        Ok(())
    }

    /// Read latitude and longitude into the snapshot.
    /// Nothing is stored unless all four reads succeed.
    pub fn update_coordinates(&mut self) -> Result<(), Error> {
        let mut lat_raw = [0u8; COORDINATE_LEN];
        let mut lat_dis = [0u8; HEMISPHERE_LEN];
        let mut lon_raw = [0u8; COORDINATE_LEN];
        let mut lon_dis = [0u8; HEMISPHERE_LEN];

        self.read_registers(REG_LAT_1, &mut lat_raw)?;
        self.read_registers(REG_LAT_DIS, &mut lat_dis)?;
        self.read_registers(REG_LON_1, &mut lon_raw)?;
        self.read_registers(REG_LON_DIS, &mut lon_dis)?;

        let position = GpsPosition {
            latitude: decode_coordinate(&lat_raw, &lat_dis, CoordinateAxis::Latitude)?,
            longitude: decode_coordinate(&lon_raw, &lon_dis, CoordinateAxis::Longitude)?,
        };
        self.state.position = position;
        log::debug!("position updated: {}, {}", position.latitude, position.longitude);
        Ok(())
    }

    /// Cached date as `DD-MM-YYYY`
    pub fn get_date(&self) -> String<DATE_STRING_LEN> {
        self.state.format_date()
    }

    pub fn get_day(&self) -> u8 {
        self.state.date.day
    }

    pub fn get_month(&self) -> u8 {
        self.state.date.month
    }

    pub fn get_year(&self) -> u16 {
        self.state.date.year
    }

    /// Cached UTC time as `HH:MM:SS`
    pub fn get_utc_time(&self) -> String<TIME_STRING_LEN> {
        self.state.format_utc_time()
    }

    pub fn get_hours(&self) -> u8 {
        self.state.time.hour
    }

    pub fn get_minutes(&self) -> u8 {
        self.state.time.minute
    }

    pub fn get_seconds(&self) -> u8 {
        self.state.time.second
    }

    pub fn get_latitude_degree(&self) -> f64 {
        self.state.position.latitude
    }

    pub fn get_longitude_degree(&self) -> f64 {
        self.state.position.longitude
    }

    /// Whole snapshot of cached readings
    pub fn state(&self) -> &GnssState {
        &self.state
    }

    /// Number of satellites in use, read straight from the device
    pub fn get_satellite_count(&mut self) -> Result<u8, Error> {
        self.read_register(REG_USE_STAR)
    }

    /// Raw content of the GNSS mode register
    pub fn get_gnss_mode_raw(&mut self) -> Result<u8, Error> {
        self.read_register(REG_GNSS_MODE)
    }

    pub fn get_gnss_mode(&mut self) -> Result<GnssMode, Error> {
        let raw = self.get_gnss_mode_raw()?;
        Ok(GnssMode::try_from(raw)?)
    }

    pub fn set_gnss_mode(&mut self, mode: GnssMode) -> Result<(), Error> {
        log::debug!("gnss mode -> {}", mode);
        self.write_register(REG_GNSS_MODE, mode.into())
    }

    /// Write the GNSS mode register without checking the value
    pub fn set_gnss_mode_raw(&mut self, mode: u8) -> Result<(), Error> {
        self.write_register(REG_GNSS_MODE, mode)
    }

    pub fn enable_power(&mut self) -> Result<(), Error> {
        log::debug!("power on");
        self.write_register(REG_SLEEP_MODE, POWER_ENABLE)
    }

    pub fn disable_power(&mut self) -> Result<(), Error> {
        log::debug!("power off");
        self.write_register(REG_SLEEP_MODE, POWER_DISABLE)
    }

    pub fn set_rgb_on(&mut self) -> Result<(), Error> {
        self.write_register(REG_RGB_MODE, RGB_ON)
    }

    pub fn set_rgb_off(&mut self) -> Result<(), Error> {
        self.write_register(REG_RGB_MODE, RGB_OFF)
    }
}

impl<I: I2c> GpsSensor for L76k<I> {
    type Error = Error;

    fn update_date(&mut self) -> Result<(), Error> {
        L76k::update_date(self)
    }

    fn update_utc(&mut self) -> Result<(), Error> {
        L76k::update_utc(self)
    }

    fn update_coordinates(&mut self) -> Result<(), Error> {
        L76k::update_coordinates(self)
    }

    fn date(&self) -> GpsDate {
        self.state.date
    }

    fn utc_time(&self) -> UtcTime {
        self.state.time
    }

    fn position(&self) -> GpsPosition {
        self.state.position
    }

    fn satellite_count(&mut self) -> Result<u8, Error> {
        self.get_satellite_count()
    }

    fn gnss_mode(&mut self) -> Result<GnssMode, Error> {
        self.get_gnss_mode()
    }

    fn configure_gnss(&mut self, mode: GnssMode) -> Result<(), Error> {
        self.set_gnss_mode(mode)
    }

    fn set_power(&mut self, enabled: bool) -> Result<(), Error> {
        if enabled {
            self.enable_power()
        } else {
            self.disable_power()
        }
    }

    fn set_indicator(&mut self, on: bool) -> Result<(), Error> {
        if on {
            self.set_rgb_on()
        } else {
            self.set_rgb_off()
        }
    }
}
