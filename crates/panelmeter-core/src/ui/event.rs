//! Widget press events.
//!
//! Widgets do not hold callbacks. A qualifying press pushes a [`UiEvent`]
//! into the bounded queue, which the panel application drains after the
//! dispatch pass. Momentary widgets push exactly once per press; sliders
//! push continuously while dragged, so the queue drops its oldest entry
//! when full and the latest value always survives.

use heapless::Deque;

/// Identifies which control produced an event.
///
/// The panel wires each widget with one of these at init time, the Rust
/// equivalent of the old integer tag field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetTag {
    SetupBtn,
    SaveBtn,
    ExitBtn,
    OffsetBtn,
    LeftWipe,
    RightWipe,
    RangeSwitch,
    BeepCheckbox,
    SettingsRadio,
    OptionGroup,
    SetupTabs,
    Slider1,
    Slider2,
    EncoderEntry,
    NumericReadout,
    StatusLed,
    OverloadLed,
}

/// Event emitted by a widget press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiEvent {
    /// Momentary press (buttons, tapping the numeric readout).
    Pressed { tag: WidgetTag },
    /// Two-state widget changed (checkbox, slide switch).
    Toggled { tag: WidgetTag, on: bool },
    /// One-of-N selection changed (radio group, tab strip).
    ItemSelected { tag: WidgetTag, index: u8 },
    /// Checkbox-group member toggled.
    ItemToggled { tag: WidgetTag, index: u8, on: bool },
    /// Slider level, emitted on every drag iteration.
    LevelChanged { tag: WidgetTag, level: f32 },
    /// Encoder entry field committed a new value.
    ValueChanged { tag: WidgetTag, value: i32 },
}

pub const EVENT_QUEUE_DEPTH: usize = 16;

/// Bounded FIFO of pending widget events.
#[derive(Default)]
pub struct EventQueue {
    queue: Deque<UiEvent, EVENT_QUEUE_DEPTH>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            queue: Deque::new(),
        }
    }

    /// Enqueue an event, evicting the oldest entry when full.
    pub fn push(&mut self, event: UiEvent) {
        if self.queue.is_full() {
            self.queue.pop_front();
        }
        // cannot fail after the eviction above
        let _ = self.queue.push_back(event);
    }

    pub fn pop(&mut self) -> Option<UiEvent> {
        self.queue.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order() {
        let mut q = EventQueue::new();
        q.push(UiEvent::Pressed {
            tag: WidgetTag::SaveBtn,
        });
        q.push(UiEvent::Pressed {
            tag: WidgetTag::ExitBtn,
        });
        assert_eq!(
            q.pop(),
            Some(UiEvent::Pressed {
                tag: WidgetTag::SaveBtn
            })
        );
        assert_eq!(
            q.pop(),
            Some(UiEvent::Pressed {
                tag: WidgetTag::ExitBtn
            })
        );
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn overflow_drops_oldest() {
        let mut q = EventQueue::new();
        for i in 0..(EVENT_QUEUE_DEPTH as u8 + 4) {
            q.push(UiEvent::ItemSelected {
                tag: WidgetTag::SetupTabs,
                index: i,
            });
        }
        // first surviving entry is the fifth pushed
        assert_eq!(
            q.pop(),
            Some(UiEvent::ItemSelected {
                tag: WidgetTag::SetupTabs,
                index: 4
            })
        );
    }
}
