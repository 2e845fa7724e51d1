use crate::units::{Millis, time};
use crate::vcp_sensors::{BusRange, SUPPLY_COUNT};

/// Reference voltage of a 5 V analog front end
pub const DEFAULT_ADC_REFERENCE_MV: u32 = 5_000;

macro_rules! positive_u32 {
    ($value:expr) => {{
        const _: () = core::assert!($value > 0, "Value must be positive");
        $value
    }};
}

/// Static configuration of the control core.
#[derive(Debug, Clone)]
pub struct PsuConfig {
    /// I2C addresses of the current sensors, indexed by supply
    pub sensor_addresses: [u8; SUPPLY_COUNT],
    pub sensor_range: BusRange,
    /// I2C address of the PCF8574 display backpack
    pub display_address: u8,
    /// Full scale of the 10 bit analog inputs in millivolts
    pub adc_reference_mv: u32,
    pub sensor_poll_interval: Millis,
    /// How long a note or warning stays on screen
    pub notice_duration: Millis,
}

impl Default for PsuConfig {
    fn default() -> Self {
        Self {
            sensor_addresses: [0x40, 0x41],
            sensor_range: BusRange::Range16V,
            display_address: 0x27,
            adc_reference_mv: positive_u32!(DEFAULT_ADC_REFERENCE_MV),
            sensor_poll_interval: time::SENSOR_POLL_INTERVAL,
            notice_duration: time::NOTICE_DURATION,
        }
    }
}
