use super::op::{MenuOp, StateId};

/// Reason a menu table was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TableError {
    /// The last entry is not `End`, or the table is empty
    MissingEnd,
    /// Interpretation could fall through into `End`
    FallsIntoEnd,
    /// `End` appears before the last entry
    EarlyEnd(usize),
    DuplicateState(StateId),
    MissingInitialState,
    UndeclaredTarget(StateId),
    /// Declared but never jumped to
    OrphanState(StateId),
}

const STATE_SLOTS: usize = StateId::MAX as usize + 1;

/// Checks a table. Usable in const context so a broken table fails the build.
pub const fn validate<A>(ops: &[MenuOp<A>]) -> Result<(), TableError> {
    let len = ops.len();
    if len == 0 || !matches!(ops[len - 1], MenuOp::End) {
        return Err(TableError::MissingEnd);
    }
    if len < 2 || !matches!(ops[len - 2], MenuOp::Goto(_) | MenuOp::Buttons(_)) {
        return Err(TableError::FallsIntoEnd);
    }

    let mut declared = [false; STATE_SLOTS];
    let mut referenced = [false; STATE_SLOTS];
    let mut i = 0;
    while i < len {
        match &ops[i] {
            MenuOp::State(id) => {
                if declared[*id as usize] {
                    return Err(TableError::DuplicateState(*id));
                }
                declared[*id as usize] = true;
            }
            MenuOp::End if i != len - 1 => return Err(TableError::EarlyEnd(i)),
            op => {
                let mut n = 0;
                while n < op.target_count() {
                    if let Some(target) = op.target(n) {
                        referenced[target as usize] = true;
                    }
                    n += 1;
                }
            }
        }
        i += 1;
    }

    if !declared[0] {
        return Err(TableError::MissingInitialState);
    }
    let mut id = 0;
    while id < STATE_SLOTS {
        if referenced[id] && !declared[id] {
            return Err(TableError::UndeclaredTarget(id as StateId));
        }
        if id != 0 && declared[id] && !referenced[id] {
            return Err(TableError::OrphanState(id as StateId));
        }
        id += 1;
    }
    Ok(())
}

/// A validated menu table.
#[derive(Debug)]
pub struct MenuTable<A: 'static> {
    ops: &'static [MenuOp<A>],
}

impl<A> Clone for MenuTable<A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A> Copy for MenuTable<A> {}

impl<A: 'static> MenuTable<A> {
    pub const fn new(ops: &'static [MenuOp<A>]) -> Result<Self, TableError> {
        match validate(ops) {
            Ok(()) => Ok(Self { ops }),
            Err(e) => Err(e),
        }
    }

    /// Skips validation so the interpreter's own fault handling can be exercised.
    #[cfg(test)]
    pub(crate) const fn new_unchecked(ops: &'static [MenuOp<A>]) -> Self {
        Self { ops }
    }

    pub const fn ops(&self) -> &'static [MenuOp<A>] {
        self.ops
    }

    pub fn get(&self, pc: usize) -> Option<&'static MenuOp<A>> {
        self.ops.get(pc)
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Index of the `State(id)` entry.
    pub fn position_of(&self, id: StateId) -> Option<usize> {
        self.ops
            .iter()
            .position(|op| matches!(op, MenuOp::State(s) if *s == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Millis;

    type Op = MenuOp<u8>;

    #[test]
    fn test_minimal_table_is_valid() {
        const OPS: &[Op] = &[MenuOp::State(0), MenuOp::Execute(1), MenuOp::Goto(0), MenuOp::End];
        assert!(MenuTable::new(OPS).is_ok());
    }

    #[test]
    fn test_missing_end() {
        const OPS: &[Op] = &[MenuOp::State(0), MenuOp::Goto(0)];
        assert_eq!(validate(OPS), Err(TableError::MissingEnd));
        assert_eq!(validate::<u8>(&[]), Err(TableError::MissingEnd));
    }

    #[test]
    fn test_fall_through_into_end() {
        const OPS: &[Op] = &[MenuOp::State(0), MenuOp::Pause(Millis(10)), MenuOp::End];
        assert_eq!(validate(OPS), Err(TableError::FallsIntoEnd));
    }

    #[test]
    fn test_early_end() {
        const OPS: &[Op] = &[MenuOp::State(0), MenuOp::End, MenuOp::Goto(0), MenuOp::End];
        assert_eq!(validate(OPS), Err(TableError::EarlyEnd(1)));
    }

    #[test]
    fn test_undeclared_target() {
        const OPS: &[Op] = &[MenuOp::State(0), MenuOp::Buttons([0, 0, 9]), MenuOp::End];
        assert_eq!(validate(OPS), Err(TableError::UndeclaredTarget(9)));
    }

    #[test]
    fn test_duplicate_state() {
        const OPS: &[Op] = &[
            MenuOp::State(0),
            MenuOp::Goto(1),
            MenuOp::State(1),
            MenuOp::State(1),
            MenuOp::Goto(0),
            MenuOp::End,
        ];
        assert_eq!(validate(OPS), Err(TableError::DuplicateState(1)));
    }

    #[test]
    fn test_initial_state_required() {
        const OPS: &[Op] = &[MenuOp::State(1), MenuOp::Goto(1), MenuOp::End];
        assert_eq!(validate(OPS), Err(TableError::MissingInitialState));
    }

    #[test]
    fn test_orphan_state() {
        const OPS: &[Op] = &[
            MenuOp::State(0),
            MenuOp::Goto(0),
            MenuOp::State(2),
            MenuOp::Goto(0),
            MenuOp::End,
        ];
        assert_eq!(validate(OPS), Err(TableError::OrphanState(2)));
    }

    #[test]
    fn test_position_of() {
        const OPS: &[Op] = &[
            MenuOp::Show("hi"),
            MenuOp::State(0),
            MenuOp::Buttons([1, 0, 0]),
            MenuOp::State(1),
            MenuOp::Goto(0),
            MenuOp::End,
        ];
        let table = MenuTable::new(OPS).unwrap();
        assert_eq!(table.position_of(0), Some(1));
        assert_eq!(table.position_of(1), Some(3));
        assert_eq!(table.position_of(5), None);
    }
}
