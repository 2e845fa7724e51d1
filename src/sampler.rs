//! Averaging of the four analog inputs.
//!
//! Channels are converted round robin. Every completed round is a pass; after
//! [`PASSES_PER_WINDOW`] passes each channel average is rounded, scaled to
//! millivolts and published, and the accumulators start over.
use defmt_or_log as log;

pub const CHANNEL_COUNT: usize = 4;
pub const PASSES_PER_WINDOW: u32 = 16;
const ADC_FULL_SCALE: u32 = 1024;
const ADC_MAX_RAW: u16 = 1023;

/// Analog converter with one conversion in flight at a time.
///
/// Completion is signalled out of band with `Event::ConversionComplete`.
pub trait AnalogConverter {
    fn start_conversion(&mut self, channel: u8);
    /// Result of the last finished conversion, 10 bit
    fn last_conversion(&self) -> u16;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelReading {
    pub accumulator: u32,
    /// Averaged value of the last complete window in millivolts
    pub millivolts: u16,
}

#[derive(Debug)]
pub struct SensorSampler {
    channels: [ChannelReading; CHANNEL_COUNT],
    passes: u32,
    reference_mv: u32,
}

impl SensorSampler {
    pub const fn new(reference_mv: u32) -> Self {
        Self {
            channels: [ChannelReading {
                accumulator: 0,
                millivolts: 0,
            }; CHANNEL_COUNT],
            passes: 0,
            reference_mv,
        }
    }

    /// Accumulates one raw reading. Returns `true` when the sample closed an
    /// averaging window that changed at least one published value.
    pub fn add_sample(&mut self, channel: u8, raw: u16) -> bool {
        let channel = channel as usize % CHANNEL_COUNT;
        self.channels[channel].accumulator += raw.min(ADC_MAX_RAW) as u32;
        if channel != CHANNEL_COUNT - 1 {
            return false;
        }

        self.passes += 1;
        if self.passes < PASSES_PER_WINDOW {
            return false;
        }

        let mut changed = false;
        for reading in self.channels.iter_mut() {
            let average = (reading.accumulator + PASSES_PER_WINDOW / 2) / PASSES_PER_WINDOW;
            let millivolts = (average * self.reference_mv / ADC_FULL_SCALE) as u16;
            changed |= millivolts != reading.millivolts;
            reading.millivolts = millivolts;
            reading.accumulator = 0;
        }
        self.passes = 0;
        log::trace!(
            "Analog window: {} {} {} {} mV",
            self.channels[0].millivolts,
            self.channels[1].millivolts,
            self.channels[2].millivolts,
            self.channels[3].millivolts
        );
        changed
    }

    /// Millivolts of the last complete window, 0 before the first one.
    pub fn last_value(&self, channel: u8) -> u16 {
        self.channels[channel as usize % CHANNEL_COUNT].millivolts
    }

    pub fn reading(&self, channel: u8) -> ChannelReading {
        self.channels[channel as usize % CHANNEL_COUNT]
    }

    pub fn next_channel(channel: u8) -> u8 {
        (channel + 1) % CHANNEL_COUNT as u8
    }
}
