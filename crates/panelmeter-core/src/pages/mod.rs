//! Page control: the instrument state ring and the group-mask widget
//! controller.

pub mod controller;
pub mod state;

pub use controller::{
    PageManager, WidgetId, MAX_WIDGETS, PAGE_ALL, PAGE_ALL_TABS, PAGE_EXTRAS, PAGE_MAIN,
    PAGE_OPTIONS, PAGE_SETUP,
};
pub use state::InstrState;
