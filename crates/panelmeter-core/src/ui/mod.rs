//! UI foundation: drawing surface, input, events, smoothing and the widget
//! contract.

pub mod event;
pub mod gfx;
pub mod input;
pub mod integrator;
pub mod palette;
pub mod widget;

pub use event::{EventQueue, UiEvent, WidgetTag};
pub use gfx::{alpha_blend, Datum, FontId, Gfx, Rect};
pub use input::{Clock, EncoderCounter, EncoderSampler, TouchDigitizer, TouchProvider, TouchSnapshot};
pub use integrator::{LevelIntegrator, PeakDecay, PeakIntegrator, LEVEL_ALPHA, PEAK_DECAY};
pub use widget::{Widget, WidgetColors, WidgetCore, MAX_GROUP_ITEMS, MAX_LABEL_LEN};

use crate::config::PanelConfig;

/// Display width in pixels (landscape).
pub const DISPLAY_WIDTH_PX: u16 = 320;
/// Display height in pixels (landscape).
pub const DISPLAY_HEIGHT_PX: u16 = 240;

/// The application context handed to every widget call.
///
/// Constructed once at startup and passed by `&mut` from the main loop
/// down; there is no global display, input or event state anywhere in the
/// core. Field access is deliberately public: widgets borrow `gfx`,
/// `touch` and `clock` disjointly inside their blocking sub-loops.
pub struct Ui<G: Gfx, T: TouchDigitizer, C: Clock> {
    pub gfx: G,
    pub touch: TouchProvider<T>,
    pub clock: C,
    pub events: EventQueue,
    pub config: PanelConfig,
}

impl<G: Gfx, T: TouchDigitizer, C: Clock> Ui<G, T, C> {
    pub fn new(gfx: G, touch: TouchProvider<T>, clock: C, config: PanelConfig) -> Self {
        Self {
            gfx,
            touch,
            clock,
            events: EventQueue::new(),
            config,
        }
    }
}
