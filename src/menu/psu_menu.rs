use super::actions::Action;
use super::op::MenuOp::{self, *};
use super::table::MenuTable;
use crate::units::time::{BANNER_DURATION, CONFIRM_DURATION};

pub const BANNER: &str = "AVR Power Supply\n      v0.1";

// Buttons targets are listed as [Up, Down, Select]
pub const PSU_MENU: &[MenuOp<Action>] = &[
    Show(BANNER),
    Pause(BANNER_DURATION),
    // Telemetry
    State(0),
    Execute(Action::ShowTelemetry),
    Buttons([1, 2, 3]),
    State(1),
    Execute(Action::NextLine0),
    Goto(0),
    State(2),
    Execute(Action::NextLine1),
    Goto(0),
    // Current limit, pick a supply
    State(3),
    Show("Cur Limit"),
    Goto(4),
    State(4),
    Execute(Action::SelectSupplyA),
    Buttons([5, 6, 0]),
    State(5),
    Execute(Action::SelectSupplyB),
    Buttons([4, 6, 0]),
    // Edit the value
    State(6),
    Execute(Action::AdjustCurLimit),
    Buttons([7, 8, 9]),
    State(7),
    Execute(Action::IncCurLimit),
    Goto(6),
    State(8),
    Execute(Action::DecCurLimit),
    Goto(6),
    // Confirm
    State(9),
    Show("Save? (UP=YES)"),
    Execute(Action::ShowCurLimit),
    Buttons([10, 11, 11]),
    State(10),
    Show("Cur Limit Set"),
    Execute(Action::AcceptCurLimit),
    Pause(CONFIRM_DURATION),
    Goto(0),
    State(11),
    Execute(Action::RejectCurLimit),
    Goto(0),
    End,
];

/// The front panel menu. A broken table fails the build here.
pub const PSU_TABLE: MenuTable<Action> = match MenuTable::new(PSU_MENU) {
    Ok(table) => table,
    Err(_) => panic!("PSU_MENU is not a valid menu table"),
};
