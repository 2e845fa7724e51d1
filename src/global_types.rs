use core::cell::RefCell;

use embassy_embedded_hal::shared_bus::blocking::i2c::I2cDevice;
use embassy_rp::{
    i2c::{self, I2c},
    peripherals::I2C0,
};
use embassy_sync::blocking_mutex::{Mutex, raw::CriticalSectionRawMutex};
use embassy_time::Delay;

use bench_psu::drivers::{Ina219, Lcd1602};
use bench_psu::{EventConsumer, EventProducer, PowerSupply};

use crate::board::{GpioButtons, GpioOutputs, SignalledAdc};

pub const EVENT_QUEUE_SIZE: usize = 16;

// Global types
pub type I2c0Bus = Mutex<CriticalSectionRawMutex, RefCell<I2c<'static, I2C0, i2c::Blocking>>>;
pub type I2c0DeviceType = I2cDevice<'static, CriticalSectionRawMutex, I2c<'static, I2C0, i2c::Blocking>>;

pub type Sensor = Ina219<I2c0DeviceType>;
pub type Display = Lcd1602<I2c0DeviceType, Delay>;
pub type Psu = PowerSupply<Sensor, SignalledAdc, GpioOutputs, Display, GpioButtons>;

pub type Producer = EventProducer<'static, EVENT_QUEUE_SIZE>;
pub type Consumer = EventConsumer<'static, EVENT_QUEUE_SIZE>;
