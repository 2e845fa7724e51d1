//! Character display user interface.
mod presenter;
#[cfg(test)]
pub(crate) mod test_display;

pub use crate::ui::presenter::{DisplayOwner, DisplayPresenter, LimitLine, LimitMarker, LineMode};

pub const DISPLAY_WIDTH: usize = 16;
pub const DISPLAY_LINES: u8 = 2;

/// HD44780 ROM glyphs
pub const ARROW_RIGHT: char = '\x7e';
pub const ARROW_LEFT: char = '\x7f';

/// Line oriented character display. Writes never fail from the caller's view.
pub trait TextDisplay {
    fn clear(&mut self);
    /// Blanks a line and leaves the cursor at its start
    fn clear_line(&mut self, line: u8);
    /// Moves the cursor to the start of a line
    fn set_line(&mut self, line: u8);
    fn write_char(&mut self, c: char);

    fn write_str(&mut self, text: &str) {
        for c in text.chars() {
            self.write_char(c);
        }
    }
}
