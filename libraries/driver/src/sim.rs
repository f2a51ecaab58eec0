//! In-memory stand-in for the L76K I2C bridge
//!
//! Behaves like the module's register file: a write selects a register and
//! optionally stores bytes at successive addresses, a read streams bytes from
//! the selected register onwards. Used by the crate's own tests and by the
//! SITL board.

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation, SevenBitAddress};
use hal::{CoordinateAxis, GnssMode};
use heapless::Vec;
use num_traits::float::FloatCore;

use crate::registers::*;

/// Number of registers backed by the simulator
pub const REGISTER_COUNT: usize = REG_LAST as usize + 1;
/// Transactions kept in the log before new ones are dropped
pub const LOG_CAPACITY: usize = 64;
/// Bytes of write payload kept per logged transaction
pub const LOGGED_WRITE_LEN: usize = 8;

/// One bus transaction seen by the simulator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    Write { addr: u8, data: Vec<u8, LOGGED_WRITE_LEN> },
    Read { addr: u8, len: usize },
}

impl Transaction {
    fn write(addr: u8, bytes: &[u8]) -> Self {
        let kept = &bytes[..bytes.len().min(LOGGED_WRITE_LEN)];
        let mut data = Vec::new();
        // Cannot fail: `kept` is capped at the vector's capacity.
        let _ = data.extend_from_slice(kept);
        Transaction::Write { addr, data }
    }
}

/// Simulated L76K module
#[derive(Debug, Clone)]
pub struct SimulatedL76k {
    address: u8,
    registers: [u8; REGISTER_COUNT],
    pointer: u8,
    fail_select: bool,
    fail_reads: bool,
    fail_writes: bool,
    log: Vec<Transaction, LOG_CAPACITY>,
}

impl Default for SimulatedL76k {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedL76k {
    /// Device at the default address, powered on, GPS+BeiDou, RGB on
    pub fn new() -> Self {
        Self::with_address(DEFAULT_I2C_ADDRESS)
    }

    pub fn with_address(address: u8) -> Self {
        let mut registers = [0u8; REGISTER_COUNT];
        registers[REG_GNSS_MODE as usize] = GnssMode::default().into();
        registers[REG_SLEEP_MODE as usize] = POWER_ENABLE;
        registers[REG_RGB_MODE as usize] = RGB_ON;
        Self {
            address,
            registers,
            pointer: 0,
            fail_select: false,
            fail_reads: false,
            fail_writes: false,
            log: Vec::new(),
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// NACK every single-byte register-select write
    pub fn fail_register_select(&mut self, fail: bool) {
        self.fail_select = fail;
    }

    /// Fail every read transaction with a bus error
    pub fn fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    /// NACK every write that carries register data
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Current value of a register, 0 outside the map
    pub fn register(&self, register: u8) -> u8 {
        self.registers.get(register as usize).copied().unwrap_or(0)
    }

    pub fn set_register(&mut self, register: u8, value: u8) {
        if let Some(slot) = self.registers.get_mut(register as usize) {
            *slot = value;
        }
    }

    fn set_registers(&mut self, start: u8, values: &[u8]) {
        for (offset, &value) in values.iter().enumerate() {
            self.set_register(start.saturating_add(offset as u8), value);
        }
    }

    pub fn set_date(&mut self, year: u16, month: u8, day: u8) {
        let [year_hi, year_lo] = year.to_be_bytes();
        self.set_registers(REG_YEAR_H, &[year_hi, year_lo, month, day]);
    }

    pub fn set_utc(&mut self, hour: u8, minute: u8, second: u8) {
        self.set_registers(REG_HOUR, &[hour, minute, second]);
    }

    /// Store a latitude in signed decimal degrees
    pub fn set_latitude(&mut self, degrees: f64) {
        let (raw, hemisphere) = encode_coordinate(degrees, CoordinateAxis::Latitude);
        self.set_registers(REG_LAT_1, &raw);
        self.set_register(REG_LAT_DIS, hemisphere);
    }

    /// Store a longitude in signed decimal degrees
    pub fn set_longitude(&mut self, degrees: f64) {
        let (raw, hemisphere) = encode_coordinate(degrees, CoordinateAxis::Longitude);
        self.set_registers(REG_LON_1, &raw);
        self.set_register(REG_LON_DIS, hemisphere);
    }

    pub fn set_satellites(&mut self, count: u8) {
        self.set_register(REG_USE_STAR, count);
    }

    pub fn is_powered(&self) -> bool {
        self.register(REG_SLEEP_MODE) == POWER_ENABLE
    }

    pub fn is_rgb_on(&self) -> bool {
        self.register(REG_RGB_MODE) == RGB_ON
    }

    /// Transactions seen since the last [`clear_transactions`](Self::clear_transactions)
    pub fn transactions(&self) -> &[Transaction] {
        &self.log
    }

    pub fn clear_transactions(&mut self) {
        self.log.clear();
    }

    fn record(&mut self, transaction: Transaction) {
        // A full log keeps the oldest entries.
        let _ = self.log.push(transaction);
    }

    fn handle_write(&mut self, addr: u8, bytes: &[u8]) -> Result<(), ErrorKind> {
        self.record(Transaction::write(addr, bytes));
        if addr != self.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        let Some((&register, values)) = bytes.split_first() else {
            return Ok(());
        };
        if values.is_empty() && self.fail_select {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data));
        }
        if !values.is_empty() && self.fail_writes {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data));
        }

        self.pointer = register;
        for &value in values {
            self.set_register(self.pointer, value);
            self.pointer = self.pointer.saturating_add(1);
        }
        Ok(())
    }

    fn handle_read(&mut self, addr: u8, buffer: &mut [u8]) -> Result<(), ErrorKind> {
        self.record(Transaction::Read { addr, len: buffer.len() });
        if addr != self.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        if self.fail_reads {
            return Err(ErrorKind::Bus);
        }

        for byte in buffer.iter_mut() {
            *byte = self.register(self.pointer);
            self.pointer = self.pointer.saturating_add(1);
        }
        Ok(())
    }

    fn run(&mut self, address: SevenBitAddress, operations: &mut [Operation<'_>]) -> Result<(), ErrorKind> {
        for operation in operations {
            match operation {
                Operation::Write(bytes) => self.handle_write(address, bytes)?,
                Operation::Read(buffer) => self.handle_read(address, buffer)?,
            }
        }
        Ok(())
    }
}

/// Split signed decimal degrees into `[deg, min, frac_hi, frac_mid, frac_lo]`
/// plus the hemisphere letter. Degrees above 255 saturate.
pub fn encode_coordinate(degrees: f64, axis: CoordinateAxis) -> ([u8; COORDINATE_DATA_LEN], u8) {
    let hemisphere = if degrees < 0.0 {
        axis.negative_indicator()
    } else {
        axis.positive_indicator()
    };

    let magnitude = FloatCore::abs(degrees);
    let whole = FloatCore::trunc(magnitude);
    let minutes = (magnitude - whole) * 60.0;
    let whole_minutes = FloatCore::trunc(minutes);
    let fraction = FloatCore::round((minutes - whole_minutes) * FRACTION_SCALE);

    let mut whole = whole as u32;
    let mut whole_minutes = whole_minutes as u32;
    let mut fraction = fraction as u32;
    // Rounding can carry into the next minute and degree
    if fraction >= FRACTION_SCALE as u32 {
        fraction -= FRACTION_SCALE as u32;
        whole_minutes += 1;
    }
    if whole_minutes >= 60 {
        whole_minutes -= 60;
        whole += 1;
    }

    let [_, frac_hi, frac_mid, frac_lo] = fraction.to_be_bytes();
    let raw = [whole.min(u8::MAX as u32) as u8, whole_minutes as u8, frac_hi, frac_mid, frac_lo];
    (raw, hemisphere)
}

impl ErrorType for SimulatedL76k {
    type Error = ErrorKind;
}

impl I2c for SimulatedL76k {
    fn transaction(&mut self, address: SevenBitAddress, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
        self.run(address, operations)
    }
}

#[cfg(feature = "async")]
impl embedded_hal_async::i2c::I2c for SimulatedL76k {
    async fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.run(address, operations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_coordinate;

    #[test]
    fn test_select_then_read_streams_registers() {
        let mut sim = SimulatedL76k::new();
        sim.set_date(2024, 6, 15);

        let mut buf = [0u8; 4];
        sim.write(DEFAULT_I2C_ADDRESS, &[REG_YEAR_H]).unwrap();
        sim.read(DEFAULT_I2C_ADDRESS, &mut buf).unwrap();
        assert_eq!(buf, [0x07, 0xE8, 6, 15]);

        // The pointer keeps advancing into the time registers
        sim.set_utc(12, 0, 0);
        let mut next = [0u8; 1];
        sim.read(DEFAULT_I2C_ADDRESS, &mut next).unwrap();
        assert_eq!(next, [12]);
    }

    #[test]
    fn test_read_past_end_returns_zero() {
        let mut sim = SimulatedL76k::new();
        let mut buf = [0xAAu8; 3];
        sim.write(DEFAULT_I2C_ADDRESS, &[REG_RGB_MODE]).unwrap();
        sim.read(DEFAULT_I2C_ADDRESS, &mut buf).unwrap();
        assert_eq!(buf, [RGB_ON, 0, 0]);
    }

    #[test]
    fn test_register_write() {
        let mut sim = SimulatedL76k::new();
        sim.write(DEFAULT_I2C_ADDRESS, &[REG_GNSS_MODE, 7]).unwrap();
        assert_eq!(sim.register(REG_GNSS_MODE), 7);
        assert_eq!(
            sim.transactions(),
            &[Transaction::write(DEFAULT_I2C_ADDRESS, &[REG_GNSS_MODE, 7])]
        );
    }

    #[test]
    fn test_wrong_address_is_nacked() {
        let mut sim = SimulatedL76k::new();
        let result = sim.write(0x42, &[REG_GNSS_MODE, 1]);
        assert_eq!(result, Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)));
        assert_eq!(sim.register(REG_GNSS_MODE), 3, "register must be untouched");
    }

    #[test]
    fn test_fault_injection() {
        let mut sim = SimulatedL76k::new();
        sim.fail_register_select(true);
        assert!(sim.write(DEFAULT_I2C_ADDRESS, &[REG_USE_STAR]).is_err());
        // Data writes are unaffected by a failing select
        assert!(sim.write(DEFAULT_I2C_ADDRESS, &[REG_USE_STAR, 9]).is_ok());

        sim.fail_register_select(false);
        sim.fail_reads(true);
        let mut buf = [0u8; 1];
        assert_eq!(sim.read(DEFAULT_I2C_ADDRESS, &mut buf), Err(ErrorKind::Bus));

        sim.fail_writes(true);
        assert!(sim.write(DEFAULT_I2C_ADDRESS, &[REG_RGB_MODE, RGB_OFF]).is_err());
        assert!(sim.is_rgb_on());
    }

    #[test]
    fn test_transaction_log_is_bounded() {
        let mut sim = SimulatedL76k::new();
        for _ in 0..LOG_CAPACITY + 10 {
            sim.write(DEFAULT_I2C_ADDRESS, &[REG_USE_STAR]).unwrap();
        }
        assert_eq!(sim.transactions().len(), LOG_CAPACITY);
        sim.clear_transactions();
        assert!(sim.transactions().is_empty());
    }

    #[test]
    fn test_encode_coordinate_matches_decoder() {
        let (raw, hemisphere) = encode_coordinate(-33.865143, CoordinateAxis::Latitude);
        assert_eq!(hemisphere, b'S');
        assert_eq!(raw[0], 33);
        assert_eq!(raw[1], 51);
        let decoded = decode_coordinate(&raw, &[hemisphere], CoordinateAxis::Latitude).unwrap();
        // One unit of the fraction is 1/6,000,000 of a degree
        assert!((decoded + 33.865143).abs() < 1e-6, "got {}", decoded);
    }

    #[test]
    fn test_encode_coordinate_carries_rounding() {
        // 59.999999 minutes rounds up to a whole degree
        let (raw, hemisphere) = encode_coordinate(10.0 + 59.999999 / 60.0, CoordinateAxis::Longitude);
        assert_eq!(hemisphere, b'E');
        assert_eq!(raw, [11, 0, 0, 0, 0]);
    }
}
