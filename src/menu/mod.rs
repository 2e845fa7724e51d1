//! Table driven menu.
//!
//! The whole user interface flow is a flat list of [`MenuOp`]s interpreted by
//! [`MenuEngine`]. Side effects go through [`MenuContext`], which receives the
//! typed actions named in the table.
mod actions;
mod engine;
mod op;
mod psu_menu;
mod table;

pub use actions::Action;
pub use engine::{MenuContext, MenuEngine, MenuError};
pub use op::{MenuOp, StateId};
pub use psu_menu::{BANNER, PSU_MENU, PSU_TABLE};
pub use table::{MenuTable, TableError};
