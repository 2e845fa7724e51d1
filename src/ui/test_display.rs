use std::string::String;

use super::{DISPLAY_LINES, DISPLAY_WIDTH, TextDisplay};

/// In memory display recording what a real LCD would show.
#[derive(Debug)]
pub struct ScreenBuffer {
    cells: [[char; DISPLAY_WIDTH]; DISPLAY_LINES as usize],
    line: usize,
    column: usize,
    pub clears: usize,
}

impl Default for ScreenBuffer {
    fn default() -> Self {
        Self {
            cells: [[' '; DISPLAY_WIDTH]; DISPLAY_LINES as usize],
            line: 0,
            column: 0,
            clears: 0,
        }
    }
}

impl ScreenBuffer {
    pub fn line(&self, line: usize) -> String {
        let text: String = self.cells[line].iter().collect();
        String::from(text.trim_end())
    }
}

impl TextDisplay for ScreenBuffer {
    fn clear(&mut self) {
        *self = Self {
            clears: self.clears + 1,
            ..Self::default()
        };
    }

    fn clear_line(&mut self, line: u8) {
        self.cells[line as usize] = [' '; DISPLAY_WIDTH];
        self.set_line(line);
    }

    fn set_line(&mut self, line: u8) {
        self.line = line as usize % DISPLAY_LINES as usize;
        self.column = 0;
    }

    fn write_char(&mut self, c: char) {
        if self.column < DISPLAY_WIDTH {
            self.cells[self.line][self.column] = c;
            self.column += 1;
        }
    }
}
