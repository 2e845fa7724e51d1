//! Decides what the character display shows.
//!
//! Three things compete for the screen: the telemetry lines, menu prompts and
//! error notices. A notice wins over everything until it expires; otherwise the
//! current owner draws. Telemetry is redrawn only when marked dirty.
use core::fmt::Write;

use common::{FixedPoint, HexCode, LineBuffer};
use defmt_or_log as log;

use super::{ARROW_LEFT, ARROW_RIGHT, DISPLAY_LINES, DISPLAY_WIDTH, TextDisplay};
use crate::error::ErrorKind;
use crate::sampler::SensorSampler;
use crate::units::Millis;
use crate::vcp_sensors::{CurrentMonitor, Supply};

type Line = LineBuffer<DISPLAY_WIDTH>;

/// Layout of one telemetry line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineMode {
    /// Supply A volts and milliamps
    SupplyA,
    /// Supply B volts and milliamps
    SupplyB,
    /// Milliamps of both supplies
    Currents,
    /// Analog inputs 0 and 1
    AnalogAB,
    /// Analog inputs 2 and 3
    AnalogCD,
}

impl LineMode {
    pub const fn next(self) -> Self {
        match self {
            LineMode::SupplyA => LineMode::SupplyB,
            LineMode::SupplyB => LineMode::Currents,
            LineMode::Currents => LineMode::AnalogAB,
            LineMode::AnalogAB => LineMode::AnalogCD,
            LineMode::AnalogCD => LineMode::SupplyA,
        }
    }

    pub const fn is_analog(self) -> bool {
        matches!(self, LineMode::AnalogAB | LineMode::AnalogCD)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayOwner {
    Telemetry,
    Menu,
}

/// What the arrow on the limit line points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LimitMarker {
    Supply,
    Value,
    None,
}

/// Second line of the limit editing screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitLine {
    pub supply: Supply,
    pub limit_ma: u32,
    pub marker: LimitMarker,
}

#[derive(Debug, Clone, Copy)]
struct Notice {
    /// `None` for fatal notices, which never go away
    until: Option<Millis>,
}

#[derive(Debug)]
pub struct DisplayPresenter {
    line_modes: [LineMode; DISPLAY_LINES as usize],
    dirty: bool,
    owner: DisplayOwner,
    notice: Option<Notice>,
    prompt: Option<&'static str>,
    limit_line: Option<LimitLine>,
}

impl Default for DisplayPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayPresenter {
    pub const fn new() -> Self {
        Self {
            line_modes: [LineMode::SupplyA, LineMode::SupplyB],
            dirty: true,
            owner: DisplayOwner::Telemetry,
            notice: None,
            prompt: None,
            limit_line: None,
        }
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn owner(&self) -> DisplayOwner {
        self.owner
    }

    pub fn has_notice(&self) -> bool {
        self.notice.is_some()
    }

    pub fn line_mode(&self, line: u8) -> LineMode {
        self.line_modes[line as usize % DISPLAY_LINES as usize]
    }

    /// Whether any line currently shows the analog inputs
    pub fn shows_analog(&self) -> bool {
        self.line_modes.iter().any(|mode| mode.is_analog())
    }

    pub fn next_line_mode(&mut self, line: u8) {
        let mode = &mut self.line_modes[line as usize % DISPLAY_LINES as usize];
        *mode = mode.next();
        log::debug!("Line {} layout: {:?}", line, *mode);
        self.dirty = true;
    }

    /// Gives the screen back to telemetry and forces a redraw.
    pub fn release_to_telemetry(&mut self) {
        self.owner = DisplayOwner::Telemetry;
        self.prompt = None;
        self.limit_line = None;
        self.dirty = true;
    }

    /// Menu prompt. A `'\n'` moves to the second line.
    pub fn show_prompt<D: TextDisplay>(&mut self, display: &mut D, text: &'static str) {
        self.owner = DisplayOwner::Menu;
        self.prompt = Some(text);
        self.limit_line = None;
        if self.notice.is_none() {
            Self::draw_prompt(display, text);
        }
    }

    pub fn show_current_limit<D: TextDisplay>(&mut self, display: &mut D, line: LimitLine) {
        self.owner = DisplayOwner::Menu;
        self.limit_line = Some(line);
        if self.notice.is_none() {
            Self::draw_limit_line(display, &line);
        }
    }

    /// Replaces the screen with an error code. `until = None` keeps it forever.
    pub fn show_notice<D: TextDisplay>(
        &mut self,
        display: &mut D,
        kind: ErrorKind,
        code: u32,
        until: Option<Millis>,
    ) {
        self.notice = Some(Notice { until });
        let mut text = Line::new();
        let _ = write!(text, "{}{}", kind.label(), HexCode(code));
        display.clear();
        display.write_str(text.as_str());
    }

    /// Restores the previous screen once the notice timed out.
    pub fn expire_notice<D: TextDisplay>(&mut self, display: &mut D, now: Millis) -> bool {
        match self.notice {
            Some(Notice { until: Some(until) }) if now >= until => {
                self.notice = None;
                match self.owner {
                    DisplayOwner::Telemetry => self.dirty = true,
                    DisplayOwner::Menu => {
                        if let Some(text) = self.prompt {
                            Self::draw_prompt(display, text);
                        }
                        if let Some(line) = self.limit_line {
                            Self::draw_limit_line(display, &line);
                        }
                    }
                }
                true
            }
            _ => false,
        }
    }

    /// Draws telemetry if it is stale and nobody else holds the screen.
    pub fn render<D: TextDisplay>(
        &mut self,
        display: &mut D,
        monitor: &CurrentMonitor,
        sampler: &SensorSampler,
    ) -> bool {
        if !self.dirty || self.owner == DisplayOwner::Menu || self.notice.is_some() {
            return false;
        }
        display.clear();
        for (line, mode) in self.line_modes.iter().enumerate() {
            display.set_line(line as u8);
            display.write_str(Self::format_line(*mode, monitor, sampler).as_str());
        }
        self.dirty = false;
        true
    }

    pub fn format_line(mode: LineMode, monitor: &CurrentMonitor, sampler: &SensorSampler) -> Line {
        let mut text = Line::new();
        let _ = match mode {
            LineMode::SupplyA | LineMode::SupplyB => {
                let supply = if mode == LineMode::SupplyA {
                    Supply::A
                } else {
                    Supply::B
                };
                let reading = monitor.reading(supply);
                write!(
                    text,
                    "{}{}{}v {}ma",
                    supply.name(),
                    if reading.latched { '!' } else { ':' },
                    FixedPoint::millis(reading.bus_millivolts as i32),
                    reading.shunt_milliamps
                )
            }
            LineMode::Currents => write!(
                text,
                "A:{}ma B:{}ma",
                monitor.reading(Supply::A).shunt_milliamps,
                monitor.reading(Supply::B).shunt_milliamps
            ),
            LineMode::AnalogAB => write!(
                text,
                "a:{}v b:{}v",
                FixedPoint::millis(sampler.last_value(0) as i32),
                FixedPoint::millis(sampler.last_value(1) as i32)
            ),
            LineMode::AnalogCD => write!(
                text,
                "c:{}v d:{}v",
                FixedPoint::millis(sampler.last_value(2) as i32),
                FixedPoint::millis(sampler.last_value(3) as i32)
            ),
        };
        text
    }

    fn draw_prompt<D: TextDisplay>(display: &mut D, text: &str) {
        display.clear();
        for (line, part) in text.split('\n').take(DISPLAY_LINES as usize).enumerate() {
            display.set_line(line as u8);
            display.write_str(part);
        }
    }

    fn draw_limit_line<D: TextDisplay>(display: &mut D, line: &LimitLine) {
        let mut text = Line::new();
        if line.marker == LimitMarker::Supply {
            let _ = text.write_char(ARROW_RIGHT);
        }
        let _ = write!(text, "{}:{}ma", line.supply.name(), line.limit_ma);
        if line.marker == LimitMarker::Value {
            let _ = text.write_char(ARROW_LEFT);
        }
        display.clear_line(1);
        display.write_str(text.as_str());
    }
}
