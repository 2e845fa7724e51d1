//! Blocking drivers for the peripherals on the shared I2C bus.
pub mod ina219;
pub mod lcd1602;

pub use ina219::Ina219;
pub use lcd1602::Lcd1602;

#[cfg(test)]
pub(crate) mod mock_i2c;
