//! Current sensor polling and the over-current latch.
//!
//! A supply trips after [`TRIP_COUNT`] consecutive readings above its accepted
//! limit. A single reading at or below the limit restarts the count. Once
//! tripped the shutdown line stays asserted until [`CurrentMonitor::reset_current_limit`].
use defmt_or_log as log;

use super::{BusRange, SUPPLY_COUNT, Supply, SupplyReading};

/// Consecutive over-limit readings needed to trip
pub const TRIP_COUNT: u8 = 4;

// Shunt millivolts to milliamps, 0.33 ohm sense resistor
const SHUNT_MA_PER_MV_NUM: i64 = 100;
const SHUNT_MA_PER_MV_DEN: i64 = 330;

/// Bus voltage and shunt drop of one supply.
pub trait CurrentSensor {
    type Error: core::fmt::Debug;

    fn set_range(&mut self, range: BusRange) -> Result<(), Self::Error>;
    fn bus_millivolts(&mut self) -> Result<i16, Self::Error>;
    fn shunt_millivolts(&mut self) -> Result<i32, Self::Error>;
}

/// Protective outputs. Write only.
pub trait SupplyOutputs {
    fn set_shutdown(&mut self, supply: Supply, asserted: bool);
    fn set_indicator(&mut self, on: bool);
}

#[derive(Debug, Default)]
pub struct CurrentMonitor {
    readings: [SupplyReading; SUPPLY_COUNT],
}

impl CurrentMonitor {
    pub const fn new() -> Self {
        Self {
            readings: [SupplyReading {
                bus_millivolts: 0,
                shunt_milliamps: 0,
                over_count: 0,
                latched: false,
            }; SUPPLY_COUNT],
        }
    }

    pub fn reading(&self, supply: Supply) -> SupplyReading {
        self.readings[supply.index()]
    }

    pub fn is_latched(&self, supply: Supply) -> bool {
        self.readings[supply.index()].latched
    }

    pub fn shunt_to_milliamps(shunt_mv: i32) -> u32 {
        // Widened so the full i32 range converts without overflow
        let shunt_mv = i64::from(shunt_mv.max(0));
        ((shunt_mv * SHUNT_MA_PER_MV_NUM + SHUNT_MA_PER_MV_DEN / 2) / SHUNT_MA_PER_MV_DEN) as u32
    }

    /// Reads one supply and runs the latch against `limit_ma`, the accepted limit.
    ///
    /// Read failures keep the previous value. Returns `true` if anything
    /// shown on screen changed.
    pub fn poll<S, O>(&mut self, supply: Supply, sensor: &mut S, limit_ma: u32, outputs: &mut O) -> bool
    where
        S: CurrentSensor,
        O: SupplyOutputs,
    {
        let mut changed = false;
        let reading = &mut self.readings[supply.index()];

        match sensor.bus_millivolts() {
            Ok(bus_mv) if bus_mv != reading.bus_millivolts => {
                reading.bus_millivolts = bus_mv;
                changed = true;
            }
            Ok(_) => {}
            Err(_) => log::debug!("Supply {:?}: bus voltage read failed", supply),
        }

        match sensor.shunt_millivolts() {
            Ok(shunt_mv) => {
                let milliamps = Self::shunt_to_milliamps(shunt_mv);
                if milliamps != reading.shunt_milliamps {
                    reading.shunt_milliamps = milliamps;
                    changed = true;
                }
            }
            Err(_) => log::debug!("Supply {:?}: shunt voltage read failed", supply),
        }

        if reading.shunt_milliamps > limit_ma {
            reading.over_count = reading.over_count.saturating_add(1);
            if reading.over_count >= TRIP_COUNT && !reading.latched {
                log::warn!(
                    "Supply {:?}: {} mA over {} mA limit, shutting down",
                    supply,
                    reading.shunt_milliamps,
                    limit_ma
                );
                self.set_current_limit(supply, outputs);
                changed = true;
            }
        } else {
            reading.over_count = 0;
        }

        changed
    }

    /// Asserts the shutdown line of `supply` and the indicator.
    pub fn set_current_limit<O: SupplyOutputs>(&mut self, supply: Supply, outputs: &mut O) {
        self.readings[supply.index()].latched = true;
        outputs.set_shutdown(supply, true);
        outputs.set_indicator(true);
    }

    /// Releases both supplies. Safe to call any number of times.
    pub fn reset_current_limit<O: SupplyOutputs>(&mut self, outputs: &mut O) {
        for supply in Supply::ALL {
            let reading = &mut self.readings[supply.index()];
            reading.latched = false;
            reading.over_count = 0;
            outputs.set_shutdown(supply, false);
        }
        outputs.set_indicator(false);
        log::info!("Current limit reset");
    }
}
