use defmt_or_log as log;

use super::op::{MenuOp, StateId};
use super::table::MenuTable;
use crate::input::Button;
use crate::units::Millis;

/// Side effects of the menu.
pub trait MenuContext<A> {
    /// The menu takes over the display and prints `text`.
    fn show(&mut self, text: &'static str);
    fn execute(&mut self, action: A);
}

/// Interpreter fault. Any of these stops the menu for good.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuError {
    /// Interpretation ran into `End` or off the table
    ReachedEnd,
    /// More jumps than table entries without waiting for input
    Livelock,
    UnknownState(StateId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wait {
    Running,
    Buttons([StateId; 3]),
    Paused { until: Millis },
    Stopped,
}

/// Program counter driven interpreter over a [`MenuTable`].
#[derive(Debug)]
pub struct MenuEngine<A: 'static> {
    table: MenuTable<A>,
    pc: usize,
    state: Option<StateId>,
    wait: Wait,
}

impl<A: Copy + 'static> MenuEngine<A> {
    pub const fn new(table: MenuTable<A>) -> Self {
        Self {
            table,
            pc: 0,
            state: None,
            wait: Wait::Running,
        }
    }

    /// Runs the table from the first entry up to the first wait.
    pub fn start<C: MenuContext<A>>(&mut self, ctx: &mut C, now: Millis) -> Result<(), MenuError> {
        self.pc = 0;
        self.wait = Wait::Running;
        self.run(ctx, now)
    }

    /// Delivers a fresh button press. Ignored unless the table waits for buttons.
    /// Returns `true` if the press was consumed.
    pub fn press<C: MenuContext<A>>(
        &mut self,
        button: Button,
        ctx: &mut C,
        now: Millis,
    ) -> Result<bool, MenuError> {
        let Wait::Buttons(targets) = self.wait else {
            return Ok(false);
        };
        let target = targets[button.index()];
        log::debug!("Menu: {:?} in state {} -> {}", button, self.state.unwrap_or(0), target);
        self.wait = Wait::Running;
        let jumped = self.jump(target);
        self.stop_on_error(jumped)?;
        self.run(ctx, now)?;
        Ok(true)
    }

    /// Resumes after a pause once its deadline passed. Called every idle tick.
    pub fn poll<C: MenuContext<A>>(&mut self, ctx: &mut C, now: Millis) -> Result<bool, MenuError> {
        match self.wait {
            Wait::Paused { until } if now >= until => {
                self.wait = Wait::Running;
                self.run(ctx, now)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Last declared state, `None` before the first `State` entry.
    pub fn state(&self) -> Option<StateId> {
        self.state
    }

    pub fn is_waiting_for_buttons(&self) -> bool {
        matches!(self.wait, Wait::Buttons(_))
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.wait, Wait::Paused { .. })
    }

    pub fn is_stopped(&self) -> bool {
        self.wait == Wait::Stopped
    }

    fn run<C: MenuContext<A>>(&mut self, ctx: &mut C, now: Millis) -> Result<(), MenuError> {
        let result = self.interpret(ctx, now);
        self.stop_on_error(result)
    }

    fn stop_on_error(&mut self, result: Result<(), MenuError>) -> Result<(), MenuError> {
        if result.is_err() {
            self.wait = Wait::Stopped;
        }
        result
    }

    fn interpret<C: MenuContext<A>>(&mut self, ctx: &mut C, now: Millis) -> Result<(), MenuError> {
        let mut jumps = 0;
        loop {
            let op = self.table.get(self.pc).ok_or(MenuError::ReachedEnd)?;
            match *op {
                MenuOp::Show(text) => {
                    ctx.show(text);
                    self.pc += 1;
                }
                MenuOp::Pause(duration) => {
                    self.pc += 1;
                    self.wait = Wait::Paused {
                        until: now + duration,
                    };
                    return Ok(());
                }
                MenuOp::State(id) => {
                    self.state = Some(id);
                    self.pc += 1;
                }
                MenuOp::Execute(action) => {
                    ctx.execute(action);
                    self.pc += 1;
                }
                MenuOp::Buttons(targets) => {
                    self.wait = Wait::Buttons(targets);
                    return Ok(());
                }
                MenuOp::Goto(target) => {
                    jumps += 1;
                    if jumps > self.table.len() {
                        log::error!("Menu: livelock in state {}", target);
                        return Err(MenuError::Livelock);
                    }
                    self.jump(target)?;
                }
                MenuOp::End => {
                    log::error!("Menu: reached end of table at {}", self.pc);
                    return Err(MenuError::ReachedEnd);
                }
            }
        }
    }

    fn jump(&mut self, target: StateId) -> Result<(), MenuError> {
        self.pc = self
            .table
            .position_of(target)
            .ok_or(MenuError::UnknownState(target))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    #[derive(Default)]
    struct Recorder {
        shown: Vec<&'static str>,
        actions: Vec<u8>,
    }

    impl MenuContext<u8> for Recorder {
        fn show(&mut self, text: &'static str) {
            self.shown.push(text);
        }

        fn execute(&mut self, action: u8) {
            self.actions.push(action);
        }
    }

    const OPS: &[MenuOp<u8>] = &[
        MenuOp::Show("hello"),
        MenuOp::Pause(Millis(500)),
        MenuOp::State(0),
        MenuOp::Execute(10),
        MenuOp::Buttons([1, 2, 0]),
        MenuOp::State(1),
        MenuOp::Execute(11),
        MenuOp::Goto(0),
        MenuOp::State(2),
        MenuOp::Show("two"),
        MenuOp::Buttons([0, 0, 0]),
        MenuOp::End,
    ];

    fn engine() -> MenuEngine<u8> {
        MenuEngine::new(MenuTable::new(OPS).unwrap())
    }

    #[test]
    fn test_pause_does_not_block() {
        let mut menu = engine();
        let mut ctx = Recorder::default();
        menu.start(&mut ctx, Millis(1_000)).unwrap();
        assert_eq!(ctx.shown, ["hello"]);
        assert!(menu.is_paused());
        assert_eq!(menu.state(), None);

        assert!(!menu.poll(&mut ctx, Millis(1_499)).unwrap());
        assert!(ctx.actions.is_empty());

        assert!(menu.poll(&mut ctx, Millis(1_500)).unwrap());
        assert_eq!(menu.state(), Some(0));
        assert_eq!(ctx.actions, [10]);
        assert!(menu.is_waiting_for_buttons());
    }

    #[test]
    fn test_presses_ignored_while_paused() {
        let mut menu = engine();
        let mut ctx = Recorder::default();
        menu.start(&mut ctx, Millis(0)).unwrap();
        assert!(!menu.press(Button::Up, &mut ctx, Millis(10)).unwrap());
        assert!(ctx.actions.is_empty());
    }

    #[test]
    fn test_buttons_follow_table() {
        let mut menu = engine();
        let mut ctx = Recorder::default();
        menu.start(&mut ctx, Millis(0)).unwrap();
        menu.poll(&mut ctx, Millis(500)).unwrap();

        // Up runs state 1 which jumps back to 0
        assert!(menu.press(Button::Up, &mut ctx, Millis(600)).unwrap());
        assert_eq!(ctx.actions, [10, 11, 10]);
        assert_eq!(menu.state(), Some(0));

        assert!(menu.press(Button::Down, &mut ctx, Millis(700)).unwrap());
        assert_eq!(menu.state(), Some(2));
        assert_eq!(ctx.shown, ["hello", "two"]);

        menu.press(Button::Select, &mut ctx, Millis(800)).unwrap();
        assert_eq!(menu.state(), Some(0));
    }

    #[test]
    fn test_livelock_is_detected() {
        const LOOP: &[MenuOp<u8>] = &[
            MenuOp::State(0),
            MenuOp::Goto(1),
            MenuOp::State(1),
            MenuOp::Goto(0),
            MenuOp::End,
        ];
        let mut menu = MenuEngine::new(MenuTable::new(LOOP).unwrap());
        let mut ctx = Recorder::default();
        assert_eq!(menu.start(&mut ctx, Millis(0)), Err(MenuError::Livelock));
        assert!(menu.is_stopped());
        assert!(!menu.press(Button::Up, &mut ctx, Millis(1)).unwrap());
    }

    #[test]
    fn test_press_to_unknown_state_stops() {
        const DANGLING: &[MenuOp<u8>] = &[
            MenuOp::State(0),
            MenuOp::Buttons([7, 0, 0]),
            MenuOp::End,
        ];
        let mut menu = MenuEngine::new(MenuTable::new_unchecked(DANGLING));
        let mut ctx = Recorder::default();
        menu.start(&mut ctx, Millis(0)).unwrap();
        assert!(menu.is_waiting_for_buttons());

        assert_eq!(
            menu.press(Button::Up, &mut ctx, Millis(1)),
            Err(MenuError::UnknownState(7))
        );
        assert!(menu.is_stopped());
        assert!(!menu.press(Button::Down, &mut ctx, Millis(2)).unwrap());
    }
}
