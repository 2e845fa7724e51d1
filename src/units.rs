//! Simple units extension for frequency and timing
//! Provides kHz and MHz methods on numeric types
use core::ops::{Add, Sub};

pub trait FrequencyExt {
    fn khz(self) -> u32;
    fn mhz(self) -> u32;
}

impl FrequencyExt for u32 {
    fn khz(self) -> u32 {
        self * 1_000
    }

    fn mhz(self) -> u32 {
        self * 1_000_000
    }
}

/// Point on (or distance along) the monotonic millisecond clock.
///
/// 64 bits never wrap within any realistic uptime, so plain comparisons are
/// enough for deadlines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Millis(pub u64);

impl Millis {
    pub const ZERO: Millis = Millis(0);

    pub const fn from_secs(secs: u64) -> Self {
        Self(secs * 1_000)
    }

    pub const fn as_millis(&self) -> u64 {
        self.0
    }
}

impl Add for Millis {
    type Output = Millis;

    fn add(self, rhs: Millis) -> Millis {
        Millis(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Millis {
    type Output = Millis;

    fn sub(self, rhs: Millis) -> Millis {
        Millis(self.0.saturating_sub(rhs.0))
    }
}

#[cfg(feature = "firmware")]
impl From<Millis> for embassy_time::Duration {
    fn from(value: Millis) -> Self {
        embassy_time::Duration::from_millis(value.0)
    }
}

/// Time/Duration extensions
pub trait TimeExt {
    fn ms(self) -> Millis;
    fn s(self) -> Millis;
}

impl TimeExt for u64 {
    fn ms(self) -> Millis {
        Millis(self)
    }

    fn s(self) -> Millis {
        Millis::from_secs(self)
    }
}

impl TimeExt for u32 {
    fn ms(self) -> Millis {
        Millis(self as u64)
    }

    fn s(self) -> Millis {
        Millis::from_secs(self as u64)
    }
}

/// Timing constants shared by the firmware and the control core
pub mod time {
    use super::Millis;

    pub const SENSOR_POLL_INTERVAL: Millis = Millis(100);
    pub const NOTICE_DURATION: Millis = Millis(1_000);
    pub const BANNER_DURATION: Millis = Millis(2_000);
    pub const CONFIRM_DURATION: Millis = Millis(2_000);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_extensions() {
        assert_eq!(100u32.khz(), 100_000);
        assert_eq!(1u32.mhz(), 1_000_000);
    }

    #[test]
    fn test_time_extensions() {
        assert_eq!(100u32.ms(), time::SENSOR_POLL_INTERVAL);
        assert_eq!(2u64.s(), time::BANNER_DURATION);
    }

    #[test]
    fn test_millis_arithmetic_saturates() {
        assert_eq!(Millis(10) + Millis(5), Millis(15));
        assert_eq!(Millis(u64::MAX) + Millis(1), Millis(u64::MAX));
        assert_eq!(Millis(3) - Millis(5), Millis::ZERO);
        assert!(Millis(1_999) < Millis(2_000));
    }
}
