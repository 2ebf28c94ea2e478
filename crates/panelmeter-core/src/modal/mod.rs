//! Blocking modal overlays: dialogs, list menus and the numeric keypad.
//!
//! Invoking one suspends the normal dispatch loop; the overlay polls the
//! shared touch provider itself until the user resolves it, and no other
//! widget sees a touch in the meantime. None of them time out.

pub mod dialog;
pub mod keypad;
pub mod menu;

pub use dialog::{DialogBox, DialogIcon};
pub use keypad::{KeypadEntry, NumericKeypad};
pub use menu::ModalMenu;
