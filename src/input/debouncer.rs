use super::Edge;

/// Two sample debouncer. A level change is reported once it has been seen on
/// two consecutive polls.
#[derive(Debug, Clone, Copy, Default)]
pub struct Debouncer {
    history: u8,
    pressed: bool,
}

impl Debouncer {
    const MASK: u8 = 0b11;

    pub const fn new() -> Self {
        Self {
            history: 0,
            pressed: false,
        }
    }

    pub fn poll(&mut self, is_low: bool) -> Option<Edge> {
        self.history = ((self.history << 1) | is_low as u8) & Self::MASK;
        match (self.history, self.pressed) {
            (Self::MASK, false) => {
                self.pressed = true;
                Some(Edge::Pressed)
            }
            (0, true) => {
                self.pressed = false;
                Some(Edge::Released)
            }
            _ => None,
        }
    }

    pub const fn is_pressed(&self) -> bool {
        self.pressed
    }
}
