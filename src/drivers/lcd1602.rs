//! HD44780 16x2 character LCD behind a PCF8574 I2C backpack.
//!
//! The expander drives the controller in 4 bit mode: every byte goes out as
//! two nibbles on P4..P7, each latched by pulsing EN.
use defmt_or_log as log;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::ui::{DISPLAY_LINES, DISPLAY_WIDTH, TextDisplay};

/// PCF8574 pin assignment
pub mod pcf8574_bits {
    /// Register select, 0 = command, 1 = data
    pub const RS: u8 = 0x01;
    pub const EN: u8 = 0x04;
    pub const BACKLIGHT: u8 = 0x08;
}

pub mod lcd_commands {
    pub const CLEAR_DISPLAY: u8 = 0x01;
    pub const ENTRY_MODE_SET: u8 = 0x04;
    pub const ENTRY_LEFT: u8 = 0x02;
    pub const DISPLAY_CONTROL: u8 = 0x08;
    pub const DISPLAY_ON: u8 = 0x04;
    pub const FUNCTION_SET: u8 = 0x20;
    pub const TWO_LINE: u8 = 0x08;
    pub const SET_DDRAM_ADDR: u8 = 0x80;
}

const ROW_OFFSETS: [u8; DISPLAY_LINES as usize] = [0x00, 0x40];

pub struct Lcd1602<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    backlight: u8,
}

impl<I2C: I2c, D: DelayNs> Lcd1602<I2C, D> {
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
            backlight: pcf8574_bits::BACKLIGHT,
        }
    }

    /// Power-on sequence forcing the controller into 4 bit, two line mode.
    pub fn init(&mut self) -> Result<(), I2C::Error> {
        use lcd_commands::*;

        self.delay.delay_ms(50);
        self.expander_write(0)?;

        // Three times 8 bit mode to sync, whatever state the controller is in
        for wait_ms in [5, 1, 1] {
            self.write_nibble(0x30, 0)?;
            self.delay.delay_ms(wait_ms);
        }
        self.write_nibble(0x20, 0)?;
        self.delay.delay_ms(1);

        self.command(FUNCTION_SET | TWO_LINE)?;
        self.command(DISPLAY_CONTROL | DISPLAY_ON)?;
        self.command(CLEAR_DISPLAY)?;
        self.delay.delay_ms(2);
        self.command(ENTRY_MODE_SET | ENTRY_LEFT)?;
        log::info!("LCD at {:#x} initialised", self.address);
        Ok(())
    }

    pub fn set_backlight(&mut self, on: bool) -> Result<(), I2C::Error> {
        self.backlight = if on { pcf8574_bits::BACKLIGHT } else { 0 };
        self.expander_write(0)
    }

    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn expander_write(&mut self, data: u8) -> Result<(), I2C::Error> {
        self.i2c.write(self.address, &[data | self.backlight])
    }

    fn write_nibble(&mut self, nibble: u8, mode: u8) -> Result<(), I2C::Error> {
        let data = (nibble & 0xF0) | mode;
        self.expander_write(data | pcf8574_bits::EN)?;
        self.delay.delay_us(1);
        self.expander_write(data)?;
        self.delay.delay_us(50);
        Ok(())
    }

    fn send(&mut self, value: u8, mode: u8) -> Result<(), I2C::Error> {
        self.write_nibble(value & 0xF0, mode)?;
        self.write_nibble(value << 4, mode)
    }

    fn command(&mut self, value: u8) -> Result<(), I2C::Error> {
        self.send(value, 0)
    }

    fn data(&mut self, value: u8) -> Result<(), I2C::Error> {
        self.send(value, pcf8574_bits::RS)
    }

    fn report(result: Result<(), I2C::Error>) {
        if result.is_err() {
            log::error!("LCD write failed");
        }
    }
}

impl<I2C: I2c, D: DelayNs> TextDisplay for Lcd1602<I2C, D> {
    fn clear(&mut self) {
        Self::report(self.command(lcd_commands::CLEAR_DISPLAY));
        self.delay.delay_ms(2);
    }

    fn clear_line(&mut self, line: u8) {
        self.set_line(line);
        for _ in 0..DISPLAY_WIDTH {
            self.write_char(' ');
        }
        self.set_line(line);
    }

    fn set_line(&mut self, line: u8) {
        let offset = ROW_OFFSETS[line as usize % ROW_OFFSETS.len()];
        Self::report(self.command(lcd_commands::SET_DDRAM_ADDR | offset));
    }

    fn write_char(&mut self, c: char) {
        // The character ROM is 8 bit, anything else becomes '?'
        let code = u8::try_from(c as u32).unwrap_or(b'?');
        Self::report(self.data(code));
    }
}
