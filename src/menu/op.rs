use crate::units::Millis;

pub type StateId = u8;

/// One entry of a menu table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOp<A> {
    /// Take over the display and print the text
    Show(&'static str),
    /// Stop interpreting for the given time without blocking the loop
    Pause(Millis),
    /// Declare the state that starts here
    State(StateId),
    Execute(A),
    /// Wait for a button, then jump to the state listed for it
    Buttons([StateId; 3]),
    Goto(StateId),
    /// Terminates the table, never executed in a valid table
    End,
}

impl<A> MenuOp<A> {
    /// Number of jump targets of the op.
    pub const fn target_count(&self) -> usize {
        match self {
            MenuOp::Buttons(_) => 3,
            MenuOp::Goto(_) => 1,
            _ => 0,
        }
    }

    /// Jump target `n`, see [`MenuOp::target_count`].
    pub const fn target(&self, n: usize) -> Option<StateId> {
        match self {
            MenuOp::Buttons(targets) if n < 3 => Some(targets[n]),
            MenuOp::Goto(target) if n == 0 => Some(*target),
            _ => None,
        }
    }
}
