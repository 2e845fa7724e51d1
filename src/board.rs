//! RP2040 implementations of the control core's hardware traits.
use embassy_rp::gpio::{Input, Level, Output};
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};
use portable_atomic::{AtomicU16, Ordering};

use bench_psu::input::{BUTTONS_COUNT, ButtonPins};
use bench_psu::sampler::AnalogConverter;
use bench_psu::vcp_sensors::{SUPPLY_COUNT, Supply, SupplyOutputs};

/// Channel the control loop wants converted next
pub static ADC_REQUEST: Signal<CriticalSectionRawMutex, u8> = Signal::new();
/// Last conversion result, already reduced to 10 bits
pub static LAST_CONVERSION: AtomicU16 = AtomicU16::new(0);

/// Converter front end: requests go to the interrupt bridge task, which
/// publishes the result and enqueues `Event::ConversionComplete`.
pub struct SignalledAdc;

impl AnalogConverter for SignalledAdc {
    fn start_conversion(&mut self, channel: u8) {
        ADC_REQUEST.signal(channel);
    }

    fn last_conversion(&self) -> u16 {
        LAST_CONVERSION.load(Ordering::Relaxed)
    }
}

pub struct GpioOutputs {
    pub shutdown: [Output<'static>; SUPPLY_COUNT],
    pub indicator: Output<'static>,
}

impl SupplyOutputs for GpioOutputs {
    fn set_shutdown(&mut self, supply: Supply, asserted: bool) {
        self.shutdown[supply.index()].set_level(Level::from(asserted));
    }

    fn set_indicator(&mut self, on: bool) {
        self.indicator.set_level(Level::from(on));
    }
}

/// Front panel buttons, wired to ground with internal pull-ups.
pub struct GpioButtons {
    pub pins: [Input<'static>; BUTTONS_COUNT],
}

impl ButtonPins for GpioButtons {
    fn read(&mut self) -> [bool; BUTTONS_COUNT] {
        self.pins.each_ref().map(|pin| pin.is_low())
    }
}
