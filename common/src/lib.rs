//! Text helpers shared by the character display code.
#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod fixed_point;
pub mod string_tools;

pub use fixed_point::{FixedPoint, HexCode};
pub use string_tools::LineBuffer;
