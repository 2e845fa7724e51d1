//! Dual output bench power supply on a Raspberry Pi Pico.
//!
//! Two INA219 sensors and an HD44780 LCD share I2C0. GPIO 6 and 7 drive the
//! regulator shutdown inputs, GPIO 25 the status LED, GPIO 2, 3 and 8 read the
//! Up, Down and Select buttons. The four ADC inputs are sampled round robin.
#![no_std]
#![no_main]

mod board;
mod global_types;

use core::cell::RefCell;

use defmt_or_log as log;
use embassy_embedded_hal::shared_bus::blocking::i2c::I2cDevice;
use embassy_executor::{Executor, Spawner};
use embassy_futures::select::{Either, select};
use embassy_rp::{
    adc::{self, Adc, Channel, InterruptHandler as AdcInterruptHandler},
    bind_interrupts,
    gpio::{Input, Level, Output, Pull},
    i2c::{self, I2c},
};
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::{Delay, Instant, Ticker, Timer};
use portable_atomic::Ordering;
use static_cell::StaticCell;

use bench_psu::drivers::{Ina219, Lcd1602};
use bench_psu::units::{FrequencyExt, Millis, TimeExt};
use bench_psu::{Board, Event, EventQueue, PowerSupply, PsuConfig};

use board::*;
use global_types::*;

// Configure panic behavior based on features
#[cfg(not(any(feature = "defmt", feature = "log")))]
use panic_halt as _;
#[cfg(feature = "defmt")]
use {defmt_rtt as _, panic_probe as _};
#[cfg(all(feature = "log", not(feature = "defmt")))]
use {panic_rtt_target as _, rtt_target as _};

// Constants
const ADC_CHANNELS: usize = 4;
/// RP2040 ADC full scale with the on-board 3.3 V reference
const ADC_REFERENCE_MV: u32 = 3_300;
/// The core expects 10 bit samples, the RP2040 delivers 12
const ADC_EXTRA_BITS: u16 = 2;

// Interrupt handlers
bind_interrupts!(struct AdcIrqs {
    ADC_IRQ_FIFO => AdcInterruptHandler;
});

// Static resources
static EXECUTOR0: StaticCell<Executor> = StaticCell::new();
static I2C0_BUS: StaticCell<I2c0Bus> = StaticCell::new();
static EVENTS: StaticCell<EventQueue<EVENT_QUEUE_SIZE>> = StaticCell::new();

struct ResourcesCore0 {
    psu: Psu,
    consumer: Consumer,
    producer: Producer,
    adc: Adc<'static, adc::Async>,
    adc_channels: [Channel<'static>; ADC_CHANNELS],
    poll_interval: Millis,
}

fn now() -> Millis {
    Millis(Instant::now().as_millis())
}

fn log_system_frequencies() {
    let sys_freq = embassy_rp::clocks::clk_sys_freq();
    let peri_freq = embassy_rp::clocks::clk_peri_freq();
    let adc_freq = embassy_rp::clocks::clk_adc_freq();

    log::info!("=== System Clock Frequencies ===");
    log::info!("System Clock:     {} MHz", sys_freq / 1u32.mhz());
    log::info!("Peripheral Clock: {} MHz", peri_freq / 1u32.mhz());
    log::info!("ADC Clock:        {} MHz", adc_freq / 1u32.mhz());
    log::info!("================================");
}

#[cortex_m_rt::entry]
fn main() -> ! {
    let p: embassy_rp::Peripherals = embassy_rp::init(Default::default());
    log_system_frequencies();

    let config = PsuConfig {
        adc_reference_mv: ADC_REFERENCE_MV,
        ..Default::default()
    };

    // Protective outputs start asserted until the core releases them
    let outputs = GpioOutputs {
        shutdown: [
            Output::new(p.PIN_6, Level::High),
            Output::new(p.PIN_7, Level::High),
        ],
        indicator: Output::new(p.PIN_25, Level::High),
    };

    // Bind button pins
    let buttons = GpioButtons {
        pins: [
            Input::new(p.PIN_2, Pull::Up),
            Input::new(p.PIN_3, Pull::Up),
            Input::new(p.PIN_8, Pull::Up),
        ],
    };

    // Setup I2C0 with standard frequency for sensors and display
    let mut i2c0_cfg = i2c::Config::default();
    i2c0_cfg.frequency = 100u32.khz();
    let i2c0 = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c0_cfg);
    let i2c0_bus: &'static I2c0Bus = I2C0_BUS.init(Mutex::new(RefCell::new(i2c0)));

    let sensors = config
        .sensor_addresses
        .map(|address| Ina219::new(I2cDevice::new(i2c0_bus), address));

    let mut display = Lcd1602::new(I2cDevice::new(i2c0_bus), Delay, config.display_address);
    if display.init().is_err() {
        log::error!("LCD did not respond at {:#x}", config.display_address);
    }

    let adc = Adc::new(p.ADC, AdcIrqs, adc::Config::default());
    let adc_channels = [
        Channel::new_pin(p.PIN_26, Pull::None),
        Channel::new_pin(p.PIN_27, Pull::None),
        Channel::new_pin(p.PIN_28, Pull::None),
        Channel::new_pin(p.PIN_29, Pull::None),
    ];

    let (producer, consumer) = EVENTS.init(EventQueue::new()).split();
    let poll_interval = config.sensor_poll_interval;

    let board = Board {
        sensors,
        adc: SignalledAdc,
        outputs,
        display,
        buttons,
    };
    let psu = PowerSupply::new(board, config);

    let executor0 = EXECUTOR0.init(Executor::new());
    executor0.run(move |spawner| {
        log::debug!("Starting executor on core 0");
        spawner
            .spawn(core0_init(
                spawner,
                ResourcesCore0 {
                    psu,
                    consumer,
                    producer,
                    adc,
                    adc_channels,
                    poll_interval,
                },
            ))
            .unwrap();
    });
}

#[embassy_executor::task]
async fn core0_init(spawner: Spawner, resources: ResourcesCore0) {
    log::info!("Spawn interrupt bridge task on core 0");
    spawner
        .spawn(interrupt_bridge_task(
            resources.producer,
            resources.adc,
            resources.adc_channels,
            resources.poll_interval,
        ))
        .unwrap();

    log::info!("Spawn control loop task on core 0");
    spawner
        .spawn(control_loop_task(resources.psu, resources.consumer))
        .unwrap();
}

/// Single producer of the event queue: forwards the sensor tick and runs the
/// conversions the control loop asks for.
#[embassy_executor::task]
async fn interrupt_bridge_task(
    mut events: Producer,
    mut adc: Adc<'static, adc::Async>,
    mut channels: [Channel<'static>; ADC_CHANNELS],
    poll_interval: Millis,
) -> ! {
    log::debug!("Starting interrupt bridge task...");
    let mut ticker = Ticker::every(poll_interval.into());
    loop {
        match select(ticker.next(), ADC_REQUEST.wait()).await {
            Either::First(()) => {
                events.push(Event::TimerTick);
            }
            Either::Second(channel) => {
                let channel = &mut channels[channel as usize % ADC_CHANNELS];
                match adc.read(channel).await {
                    Ok(raw) => LAST_CONVERSION.store(raw >> ADC_EXTRA_BITS, Ordering::Relaxed),
                    Err(_) => log::warn!("ADC conversion failed"),
                }
                // Completion keeps the sampling chain going even after a failure
                events.push(Event::ConversionComplete);
            }
        }
    }
}

#[embassy_executor::task]
async fn control_loop_task(mut psu: Psu, mut events: Consumer) -> ! {
    log::debug!("Starting control loop task...");
    if psu.start(now()).is_continue() {
        while psu.service(&mut events, now()).is_continue() {
            Timer::after(1u32.ms().into()).await;
        }
    }

    log::error!("Power supply halted, outputs held in shutdown");
    // Never yields again, so the executor stops with the outputs latched
    loop {
        cortex_m::asm::wfi();
    }
}
