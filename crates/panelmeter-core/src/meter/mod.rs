//! Measurement display widgets: analog meter, bargraphs and the scrolling
//! scope, plus the shared range table.
//!
//! These are not part of the generic widget list; they are owned directly
//! by the panel application, which drives them with fresh samples every
//! tick.

pub mod analog_meter;
pub mod bargraph;
pub mod ranges;
pub mod scope;

pub use analog_meter::AnalogMeter;
pub use bargraph::{Bargraph, Orientation};
pub use ranges::{range, MeterRange, Zone, METER_RANGES, RANGE_COUNT};
pub use scope::{ScrollingScope, NUM_TRACES, SCOPE_MAX_POINTS};
