mod debouncer;

pub use debouncer::Debouncer;

use heapless::Vec;

pub const BUTTONS_COUNT: usize = 3;

/// Front panel buttons, in the order the menu table lists their targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Up,
    Down,
    Select,
}

impl Button {
    pub const ALL: [Button; BUTTONS_COUNT] = [Button::Up, Button::Down, Button::Select];

    pub const fn index(&self) -> usize {
        *self as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Pressed,
    Released,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonEvent {
    pub button: Button,
    pub edge: Edge,
}

/// Raw switch inputs. `true` means the line is pulled low, i.e. pressed.
pub trait ButtonPins {
    fn read(&mut self) -> [bool; BUTTONS_COUNT];
}

/// Debounced view of all front panel buttons.
#[derive(Debug, Default)]
pub struct ButtonInput {
    debouncers: [Debouncer; BUTTONS_COUNT],
}

impl ButtonInput {
    pub const fn new() -> Self {
        Self {
            debouncers: [Debouncer::new(); BUTTONS_COUNT],
        }
    }

    /// Feeds one raw sample of a single button.
    pub fn poll_button(&mut self, button: Button, is_low: bool) -> Option<ButtonEvent> {
        self.debouncers[button.index()]
            .poll(is_low)
            .map(|edge| ButtonEvent { button, edge })
    }

    /// Feeds one raw sample of every button, returning the confirmed edges.
    pub fn poll(&mut self, raw: [bool; BUTTONS_COUNT]) -> Vec<ButtonEvent, BUTTONS_COUNT> {
        let mut events = Vec::new();
        for button in Button::ALL {
            if let Some(event) = self.poll_button(button, raw[button.index()]) {
                // Capacity equals the button count
                let _ = events.push(event);
            }
        }
        events
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        self.debouncers[button.index()].is_pressed()
    }
}
