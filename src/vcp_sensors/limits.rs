use super::{SUPPLY_COUNT, Supply};

/// Selectable current limits in milliamps, ascending
pub const CURRENT_LIMITS_MA: [u32; 8] = [10, 50, 100, 200, 400, 600, 800, 1000];

/// Position in [`CURRENT_LIMITS_MA`]. Always in range.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LimitIndex(u8);

impl LimitIndex {
    const LEN: u8 = CURRENT_LIMITS_MA.len() as u8;
    pub const MAX: LimitIndex = LimitIndex(Self::LEN - 1);

    pub const fn new(index: u8) -> Option<Self> {
        if index < Self::LEN {
            Some(Self(index))
        } else {
            None
        }
    }

    pub const fn get(&self) -> u8 {
        self.0
    }

    pub const fn limit_ma(&self) -> u32 {
        CURRENT_LIMITS_MA[self.0 as usize]
    }

    pub const fn increment(self) -> Self {
        Self((self.0 + 1) % Self::LEN)
    }

    pub const fn decrement(self) -> Self {
        Self((self.0 + Self::LEN - 1) % Self::LEN)
    }
}

impl Default for LimitIndex {
    fn default() -> Self {
        Self::MAX
    }
}

/// Accepted limits and the scratch copy edited in the menu.
///
/// Protection always uses the accepted values. Edits only become effective
/// through [`LimitEditor::accept`].
#[derive(Debug, Clone)]
pub struct LimitEditor {
    accepted: [LimitIndex; SUPPLY_COUNT],
    adjust: [LimitIndex; SUPPLY_COUNT],
    selected: Supply,
}

impl LimitEditor {
    pub const fn new() -> Self {
        Self {
            accepted: [LimitIndex::MAX; SUPPLY_COUNT],
            adjust: [LimitIndex::MAX; SUPPLY_COUNT],
            selected: Supply::A,
        }
    }

    pub fn accepted(&self, supply: Supply) -> LimitIndex {
        self.accepted[supply.index()]
    }

    pub fn adjusted(&self, supply: Supply) -> LimitIndex {
        self.adjust[supply.index()]
    }

    pub fn selected(&self) -> Supply {
        self.selected
    }

    pub fn select(&mut self, supply: Supply) {
        self.selected = supply;
    }

    pub fn increment(&mut self) {
        let slot = &mut self.adjust[self.selected.index()];
        *slot = slot.increment();
    }

    pub fn decrement(&mut self) {
        let slot = &mut self.adjust[self.selected.index()];
        *slot = slot.decrement();
    }

    pub fn accept(&mut self) {
        self.accepted = self.adjust;
    }

    pub fn reject(&mut self) {
        self.adjust = self.accepted;
    }
}

impl Default for LimitEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_wraps_both_ways() {
        assert_eq!(LimitIndex::MAX.increment().get(), 0);
        assert_eq!(LimitIndex::new(0).unwrap().decrement(), LimitIndex::MAX);
        assert_eq!(LimitIndex::new(3).unwrap().decrement().limit_ma(), 100);
        assert!(LimitIndex::new(8).is_none());
    }

    #[test]
    fn test_defaults_to_highest_limit() {
        let editor = LimitEditor::new();
        for supply in Supply::ALL {
            assert_eq!(editor.accepted(supply).limit_ma(), 1000);
            assert_eq!(editor.adjusted(supply).limit_ma(), 1000);
        }
    }

    #[test]
    fn test_accept_and_reject() {
        let mut editor = LimitEditor::new();
        editor.select(Supply::B);
        editor.decrement();
        editor.decrement();
        assert_eq!(editor.adjusted(Supply::B).limit_ma(), 600);
        assert_eq!(editor.accepted(Supply::B).limit_ma(), 1000);

        editor.accept();
        assert_eq!(editor.accepted(Supply::B).limit_ma(), 600);

        editor.increment();
        editor.reject();
        assert_eq!(editor.adjusted(Supply::B).limit_ma(), 600);
        assert_eq!(editor.adjusted(Supply::A).limit_ma(), 1000);
    }
}
