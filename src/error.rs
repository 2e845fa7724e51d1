use core::fmt;

use crate::menu::MenuError;
use crate::vcp_sensors::Supply;

/// Severity of a reported error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// Shown briefly, operation continues
    Note,
    /// Shown briefly, operation continues
    Warning,
    /// Outputs are shut down and the control loop stops
    Fatal,
}

impl ErrorKind {
    /// Screen prefix in front of the error code
    pub const fn label(&self) -> &'static str {
        match self {
            ErrorKind::Note => "Note:",
            ErrorKind::Warning => "Warn:",
            ErrorKind::Fatal => "Fatl:",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A current sensor rejected its range configuration at start-up
    SensorConfig(Supply),
    /// The interrupt side produced more events than the queue holds
    EventsDropped(u32),
    Menu(MenuError),
}

impl Error {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::SensorConfig(_) | Error::Menu(_) => ErrorKind::Fatal,
            Error::EventsDropped(_) => ErrorKind::Warning,
        }
    }

    pub const fn code(&self) -> u32 {
        match self {
            Error::SensorConfig(supply) => 0x10 + supply.index() as u32,
            Error::EventsDropped(_) => 0x20,
            Error::Menu(MenuError::ReachedEnd) => 0x30,
            Error::Menu(MenuError::Livelock) => 0x31,
            Error::Menu(MenuError::UnknownState(_)) => 0x32,
        }
    }

    pub fn error_description(&self) -> &'static str {
        match self {
            Error::SensorConfig(_) => "Current sensor configuration failed",
            Error::EventsDropped(_) => "Event queue overflow",
            Error::Menu(MenuError::ReachedEnd) => "Menu reached the end of its table",
            Error::Menu(MenuError::Livelock) => "Menu jumps without waiting for input",
            Error::Menu(MenuError::UnknownState(_)) => "Menu jump to an undeclared state",
        }
    }
}

impl From<MenuError> for Error {
    fn from(value: MenuError) -> Self {
        Error::Menu(value)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} {}",
            self.kind().label(),
            common::HexCode(self.code()),
            self.error_description()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(Error::SensorConfig(Supply::A).kind(), ErrorKind::Fatal);
        assert_eq!(Error::EventsDropped(3).kind(), ErrorKind::Warning);
        assert_eq!(Error::Menu(MenuError::Livelock).kind(), ErrorKind::Fatal);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::SensorConfig(Supply::A).code(), 0x10);
        assert_eq!(Error::SensorConfig(Supply::B).code(), 0x11);
        assert_eq!(Error::EventsDropped(7).code(), 0x20);
        assert_eq!(Error::from(MenuError::UnknownState(4)).code(), 0x32);
    }

    #[test]
    fn test_error_display() {
        let text = std::format!("{}", Error::EventsDropped(2));
        assert_eq!(text, "Warn:0x20 Event queue overflow");
    }
}
