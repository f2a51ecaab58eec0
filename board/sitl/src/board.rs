use anyhow::{ensure, Context, Result};
use chrono::{Datelike, NaiveDateTime, TimeDelta, Timelike};
use hal::{GnssMode, GpsDate, GpsPosition, GpsSensor, UtcTime};
use l76k::sim::SimulatedL76k;
use l76k::L76k;

use crate::config::SitlConfig;

/// One round of readings taken through the driver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fix {
    pub date: GpsDate,
    pub time: UtcTime,
    pub position: GpsPosition,
    pub satellites: u8,
}

/// Refresh every cached reading and collect them
pub fn read_fix<G: GpsSensor>(gps: &mut G) -> Result<Fix, G::Error> {
    gps.update_all()?;
    Ok(Fix {
        date: gps.date(),
        time: gps.utc_time(),
        position: gps.position(),
        satellites: gps.satellite_count()?,
    })
}

/// Host-side board: the L76K driver wired to a simulated module
pub struct SitlBoard {
    gps: L76k<SimulatedL76k>,
    clock: NaiveDateTime,
    latitude: f64,
    longitude: f64,
    latitude_step: f64,
    longitude_step: f64,
}

impl SitlBoard {
    pub fn new(config: &SitlConfig) -> Self {
        let mut sim = SimulatedL76k::new();
        sim.set_satellites(config.satellites);

        let mut board = Self {
            gps: L76k::new(sim),
            clock: config.start,
            latitude: config.latitude,
            longitude: config.longitude,
            latitude_step: config.latitude_step,
            longitude_step: config.longitude_step,
        };
        board.sync_device();
        board
    }

    pub fn name(&self) -> &str {
        "SITL"
    }

    pub fn driver(&mut self) -> &mut L76k<SimulatedL76k> {
        &mut self.gps
    }

    /// Push the simulated clock and position into the module's registers
    fn sync_device(&mut self) {
        let clock = self.clock;
        let sim = self.gps.bus_mut();
        // The module only has room for a 16-bit year
        sim.set_date(clock.year().clamp(0, u16::MAX as i32) as u16, clock.month() as u8, clock.day() as u8);
        sim.set_utc(clock.hour() as u8, clock.minute() as u8, clock.second() as u8);
        sim.set_latitude(self.latitude);
        sim.set_longitude(self.longitude);
    }

    /// Power the receiver, select constellations and light the indicator
    pub fn bring_up(&mut self, mode: GnssMode) -> Result<()> {
        self.gps.enable_power().context("power on")?;
        self.gps.set_gnss_mode(mode).context("set GNSS mode")?;
        self.gps.set_rgb_on().context("RGB on")?;

        let active = self.gps.get_gnss_mode().context("read back GNSS mode")?;
        ensure!(active == mode, "module reports {active}, expected {mode}");
        log::info!("{} receiver up, tracking {}", self.name(), active);
        Ok(())
    }

    /// Advance the simulated world by one second
    pub fn step(&mut self) {
        self.clock += TimeDelta::seconds(1);
        self.latitude = (self.latitude + self.latitude_step).clamp(-90.0, 90.0);
        self.longitude += self.longitude_step;
        if self.longitude > 180.0 {
            self.longitude -= 360.0;
        } else if self.longitude < -180.0 {
            self.longitude += 360.0;
        }
        self.sync_device();
    }

    pub fn poll(&mut self) -> Result<Fix> {
        read_fix(&mut self.gps).context("reading fix")
    }

    pub fn shut_down(&mut self) -> Result<()> {
        self.gps.set_rgb_off().context("RGB off")?;
        self.gps.disable_power().context("power off")?;
        log::info!("{} receiver powered down", self.name());
        Ok(())
    }
}
