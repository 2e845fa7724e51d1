mod current_monitor;
mod data_model;
mod limits;

pub use current_monitor::{CurrentMonitor, CurrentSensor, SupplyOutputs, TRIP_COUNT};
pub use data_model::{BusRange, SUPPLY_COUNT, Supply, SupplyReading};
pub use limits::{CURRENT_LIMITS_MA, LimitEditor, LimitIndex};
