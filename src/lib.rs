//! Control core of a dual output bench power supply.
//!
//! The library holds everything that can run without hardware: debouncing,
//! analog averaging, over-current supervision, the table driven menu and the
//! character display presenter. The RP2040 firmware in `main.rs` only wires
//! these pieces to real peripherals.
#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod drivers;
pub mod error;
pub mod events;
pub mod input;
pub mod main_logic_controller;
pub mod menu;
pub mod sampler;
pub mod ui;
pub mod units;
pub mod vcp_sensors;

pub use config::PsuConfig;
pub use error::{Error, ErrorKind};
pub use events::{Event, EventConsumer, EventProducer, EventQueue};
pub use main_logic_controller::{Board, PowerSupply};
