//! Async variant of the L76K driver over `embedded-hal-async`.
//!
//! Same register traffic and semantics as [`crate::L76k`]; each transaction
//! is awaited in turn.

use embedded_hal_async::i2c::{Error as _, I2c};
use hal::{CoordinateAxis, GnssMode, GpsPosition};
use heapless::String;

use crate::decode::{decode_coordinate, decode_date, decode_utc, GnssState, DATE_STRING_LEN, TIME_STRING_LEN};
use crate::error::Error;
use crate::l76k::L76kConfig;
use crate::registers::*;

/// Async driver for the L76K GNSS module
pub struct L76k<I> {
    i2c: I,
    config: L76kConfig,
    state: GnssState,
}

impl<I: I2c> L76k<I> {
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

    pub fn bus_mut(&mut self) -> &mut I {
        &mut self.i2c
    }

    pub fn release(self) -> I {
        self.i2c
    }

    async fn read_registers(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Error> {
        let address = self.config.address;
        self.i2c.write(address, &[register]).await.map_err(|e| {
            log::warn!("register select {} failed: {:?}", register, e.kind());
            Error::RegisterSelect { register, kind: e.kind() }
        })?;

        let len = buf.len();
        self.i2c.read(address, buf).await.map_err(|e| {
            log::warn!("read of register {} failed: {:?}", register, e.kind());
            Error::Read { register, len, kind: e.kind() }
        })
    }

    async fn write_register(&mut self, register: u8, value: u8) -> Result<(), Error> {
        let address = self.config.address;
        self.i2c.write(address, &[register, value]).await.map_err(|e| {
            log::warn!("write of register {} failed: {:?}", register, e.kind());
            Error::Write { register, value, kind: e.kind() }
        })
    }

    async fn read_register(&mut self, register: u8) -> Result<u8, Error> {
        let mut buf = [0u8; 1];
        self.read_registers(register, &mut buf).await?;
        Ok(buf[0])
    }

    pub async fn update_date(&mut self) -> Result<(), Error> {
        let mut raw = [0u8; DATE_LEN];
        self.read_registers(REG_YEAR_H, &mut raw).await?;
        self.state.date = decode_date(&raw)?;
        Ok(())
    }

    pub async fn update_utc(&mut self) -> Result<(), Error> {
        let mut raw = [0u8; UTC_LEN];
        self.read_registers(REG_HOUR, &mut raw).await?;
        self.state.time = decode_utc(&raw)?;
        Ok(())
    }

    pub async fn update_coordinates(&mut self) -> Result<(), Error> {
        let mut lat_raw = [0u8; COORDINATE_LEN];
        let mut lat_dis = [0u8; HEMISPHERE_LEN];
        let mut lon_raw = [0u8; COORDINATE_LEN];
        let mut lon_dis = [0u8; HEMISPHERE_LEN];

        self.read_registers(REG_LAT_1, &mut lat_raw).await?;
        self.read_registers(REG_LAT_DIS, &mut lat_dis).await?;
        self.read_registers(REG_LON_1, &mut lon_raw).await?;
        self.read_registers(REG_LON_DIS, &mut lon_dis).await?;

        self.state.position = GpsPosition {
            latitude: decode_coordinate(&lat_raw, &lat_dis, CoordinateAxis::Latitude)?,
            longitude: decode_coordinate(&lon_raw, &lon_dis, CoordinateAxis::Longitude)?,
        };
        Ok(())
    }

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

    pub fn state(&self) -> &GnssState {
        &self.state
    }

    pub async fn get_satellite_count(&mut self) -> Result<u8, Error> {
        self.read_register(REG_USE_STAR).await
    }

    pub async fn get_gnss_mode_raw(&mut self) -> Result<u8, Error> {
        self.read_register(REG_GNSS_MODE).await
    }

    pub async fn get_gnss_mode(&mut self) -> Result<GnssMode, Error> {
        let raw = self.get_gnss_mode_raw().await?;
        Ok(GnssMode::try_from(raw)?)
    }

    pub async fn set_gnss_mode(&mut self, mode: GnssMode) -> Result<(), Error> {
        self.write_register(REG_GNSS_MODE, mode.into()).await
    }

    pub async fn set_gnss_mode_raw(&mut self, mode: u8) -> Result<(), Error> {
        self.write_register(REG_GNSS_MODE, mode).await
    }

    pub async fn enable_power(&mut self) -> Result<(), Error> {
        self.write_register(REG_SLEEP_MODE, POWER_ENABLE).await
    }

    pub async fn disable_power(&mut self) -> Result<(), Error> {
        self.write_register(REG_SLEEP_MODE, POWER_DISABLE).await
    }

    pub async fn set_rgb_on(&mut self) -> Result<(), Error> {
        self.write_register(REG_RGB_MODE, RGB_ON).await
    }

    pub async fn set_rgb_off(&mut self) -> Result<(), Error> {
        self.write_register(REG_RGB_MODE, RGB_OFF).await
    }
}
