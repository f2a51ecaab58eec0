// L76K register map as exposed by the module's I2C bridge

// Default 7-bit I2C address
pub const DEFAULT_I2C_ADDRESS: u8 = 0x20;

// Date: year high byte, year low byte, month, day
pub const REG_YEAR_H: u8 = 0;
pub const DATE_LEN: usize = 4;

// UTC time: hour, minute, second
pub const REG_HOUR: u8 = 4;
pub const UTC_LEN: usize = 3;

// Coordinates: degrees, minutes, 24-bit big-endian fractional minutes.
// The bridge reports six bytes per coordinate; only the first five carry data.
pub const REG_LAT_1: u8 = 7;
pub const REG_LON_DIS: u8 = 12;
pub const REG_LON_1: u8 = 13;
pub const REG_LAT_DIS: u8 = 18;
pub const COORDINATE_LEN: usize = 6;
pub const COORDINATE_DATA_LEN: usize = 5;
pub const HEMISPHERE_LEN: usize = 1;

// Satellites used in the current fix
pub const REG_USE_STAR: u8 = 19;

// Control registers
pub const REG_GNSS_MODE: u8 = 34;
pub const REG_SLEEP_MODE: u8 = 35;
pub const REG_RGB_MODE: u8 = 36;

// Highest register address in the map
pub const REG_LAST: u8 = REG_RGB_MODE;

// Sleep mode values
pub const POWER_ENABLE: u8 = 0x00;
pub const POWER_DISABLE: u8 = 0x01;

// RGB indicator values
pub const RGB_ON: u8 = 0x05;
pub const RGB_OFF: u8 = 0x02;

// Fractional minutes are stored in units of 1/100000 minute
pub const FRACTION_SCALE: f64 = 100_000.0;
