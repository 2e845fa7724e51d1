//! INA219 bidirectional current and bus voltage monitor.
use embedded_hal::i2c::I2c;

use crate::vcp_sensors::{BusRange, CurrentSensor};

pub mod registers {
    pub const CONFIG: u8 = 0x00;
    pub const SHUNT_VOLTAGE: u8 = 0x01;
    pub const BUS_VOLTAGE: u8 = 0x02;
}

/// Power-on configuration: 32 V bus, +-320 mV shunt, 12 bit, continuous
const CONFIG_DEFAULT: u16 = 0x399F;
const CONFIG_BRNG: u16 = 1 << 13;
/// Bus voltage register LSB
const BUS_MV_PER_BIT: u16 = 4;
/// Shunt voltage register LSB is 10 uV
const SHUNT_BITS_PER_MV: i32 = 100;

pub struct Ina219<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Ina219<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    pub fn read_register(&mut self, register: u8) -> Result<u16, I2C::Error> {
        let mut buf = [0u8; 2];
        self.i2c.write_read(self.address, &[register], &mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    pub fn write_register(&mut self, register: u8, value: u16) -> Result<(), I2C::Error> {
        let [hi, lo] = value.to_be_bytes();
        self.i2c.write(self.address, &[register, hi, lo])
    }

    pub const fn range_config(range: BusRange) -> u16 {
        match range {
            BusRange::Range16V => CONFIG_DEFAULT & !CONFIG_BRNG,
            BusRange::Range32V => CONFIG_DEFAULT,
        }
    }
}

impl<I2C: I2c> CurrentSensor for Ina219<I2C> {
    type Error = I2C::Error;

    fn set_range(&mut self, range: BusRange) -> Result<(), Self::Error> {
        self.write_register(registers::CONFIG, Self::range_config(range))
    }

    fn bus_millivolts(&mut self) -> Result<i16, Self::Error> {
        let raw = self.read_register(registers::BUS_VOLTAGE)?;
        // Bits 0..2 carry status flags
        Ok(((raw >> 3) * BUS_MV_PER_BIT) as i16)
    }

    fn shunt_millivolts(&mut self) -> Result<i32, Self::Error> {
        let raw = self.read_register(registers::SHUNT_VOLTAGE)? as i16;
        Ok(raw as i32 / SHUNT_BITS_PER_MV)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::mock_i2c::MockI2c;

    #[test]
    fn test_set_range_writes_config() {
        let mut sensor = Ina219::new(MockI2c::default(), 0x40);
        sensor.set_range(BusRange::Range16V).unwrap();
        let i2c = sensor.release();
        assert_eq!(i2c.writes, [(0x40, vec![0x00, 0x19, 0x9F])]);
    }

    #[test]
    fn test_bus_voltage() {
        let mut i2c = MockI2c::default();
        // 5000 mV / 4 mV = 1250 counts, shifted past the status bits
        i2c.registers.insert(registers::BUS_VOLTAGE, (1250 << 3) | 0b011);
        let mut sensor = Ina219::new(i2c, 0x41);
        assert_eq!(sensor.bus_millivolts().unwrap(), 5_000);
    }

    #[test]
    fn test_shunt_voltage_signed() {
        let mut i2c = MockI2c::default();
        i2c.registers.insert(registers::SHUNT_VOLTAGE, 5_000);
        let mut sensor = Ina219::new(i2c, 0x40);
        assert_eq!(sensor.shunt_millivolts().unwrap(), 50);

        let mut i2c = sensor.release();
        i2c.registers.insert(registers::SHUNT_VOLTAGE, (-2_000i16) as u16);
        let mut sensor = Ina219::new(i2c, 0x40);
        assert_eq!(sensor.shunt_millivolts().unwrap(), -20);
    }

    #[test]
    fn test_bus_error_is_reported() {
        let mut i2c = MockI2c::default();
        i2c.fail = true;
        let mut sensor = Ina219::new(i2c, 0x40);
        assert!(sensor.bus_millivolts().is_err());
        assert!(sensor.set_range(BusRange::Range32V).is_err());
    }
}
