pub const SUPPLY_COUNT: usize = 2;

/// Independently regulated output.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Supply {
    A,
    B,
}

impl Supply {
    pub const ALL: [Supply; SUPPLY_COUNT] = [Supply::A, Supply::B];

    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Label used on screen
    pub const fn name(&self) -> char {
        match self {
            Supply::A => 'A',
            Supply::B => 'B',
        }
    }
}

/// Bus voltage range of the current sensors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusRange {
    Range16V,
    Range32V,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SupplyReading {
    pub bus_millivolts: i16,
    pub shunt_milliamps: u32,
    /// Consecutive readings above the accepted limit
    pub over_count: u8,
    /// Shutdown asserted, only a limit reset clears it
    pub latched: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supply_index() {
        assert_eq!(Supply::A.index(), 0);
        assert_eq!(Supply::B.index(), 1);
        assert_eq!(Supply::ALL.map(|s| s.name()), ['A', 'B']);
    }
}
