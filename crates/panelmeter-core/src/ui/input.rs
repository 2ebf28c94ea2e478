//! Shared touch and encoder input for all widgets.
//!
//! The digitizer is slow to read, so the provider performs exactly one
//! physical read per tick and hands the cached snapshot to every consumer.
//! Widgets do their own press-edge detection against the snapshot; the
//! provider only offers the raw pressed/coordinate state plus the blocking
//! `wait_released` primitive used for debounce.

use core::cell::Cell;

use critical_section::Mutex;

use super::gfx::Rect;

/// Millisecond clock with an injected sleep, so blocking poll loops are
/// deterministic under test and use the real timer on hardware.
pub trait Clock {
    fn now_ms(&self) -> u32;
    fn delay_ms(&self, ms: u32);
}

/// One physical read of the touch digitizer.
///
/// Returns the screen-space coordinates while touched, `None` otherwise.
/// A read error also maps to `None`: an unresponsive digitizer is
/// indistinguishable from "no finger" and must never take the UI down.
pub trait TouchDigitizer {
    fn read(&mut self) -> Option<(u16, u16)>;
}

/// Cached result of the last [`TouchProvider::poll`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TouchSnapshot {
    pub pressed: bool,
    pub x: i32,
    pub y: i32,
}

// ---------------------------------------------------------------------------
// Encoder
// ---------------------------------------------------------------------------

/// Accumulated encoder movement, written from the high-frequency timer
/// callback and consumed by the main loop.
///
/// This is the only state shared across execution contexts in the core, so
/// it lives behind a critical section.
pub struct EncoderCounter {
    delta: Mutex<Cell<i32>>,
}

impl EncoderCounter {
    pub const fn new() -> Self {
        Self {
            delta: Mutex::new(Cell::new(0)),
        }
    }

    /// Producer side: add ticks from the sampler.
    pub fn add(&self, ticks: i32) {
        critical_section::with(|cs| {
            let cell = self.delta.borrow(cs);
            cell.set(cell.get() + ticks);
        });
    }

    /// Consumer side: read the accumulated delta, resetting it unless a
    /// non-destructive peek is requested.
    pub fn take(&self, reset: bool) -> i32 {
        critical_section::with(|cs| {
            let cell = self.delta.borrow(cs);
            let d = cell.get();
            if reset {
                cell.set(0);
            }
            d
        })
    }

    pub fn reset(&self) {
        critical_section::with(|cs| self.delta.borrow(cs).set(0));
    }
}

impl Default for EncoderCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Quadrature decoder state machine, fed with raw A/B pin levels from a
/// ~2 ms timer callback.
///
/// A detent is armed when both lines go low and fires when both return
/// high. Fast rotation is accelerated: steps arriving within 20 ms count
/// triple, within 40 ms double.
#[derive(Debug, Default)]
pub struct EncoderSampler {
    a_old: bool,
    b_old: bool,
    armed: bool,
    last_step_ms: u32,
}

impl EncoderSampler {
    pub const fn new() -> Self {
        Self {
            a_old: false,
            b_old: false,
            armed: false,
            last_step_ms: 0,
        }
    }

    /// Feed one sample of the A/B lines. Returns the signed step produced
    /// by this sample, already accelerated; 0 most of the time.
    pub fn sample(&mut self, a: bool, b: bool, now_ms: u32) -> i32 {
        let mut step = 0;
        if a != self.a_old || b != self.b_old {
            if !a && !b {
                self.armed = true;
            }
            if a && b && self.armed {
                let interval = now_ms.wrapping_sub(self.last_step_ms);
                self.last_step_ms = now_ms;
                let magnitude = if interval < 20 {
                    3
                } else if interval < 40 {
                    2
                } else {
                    1
                };
                if !self.a_old {
                    step += magnitude;
                }
                if !self.b_old {
                    step -= magnitude;
                }
                self.armed = false;
            }
        }
        self.a_old = a;
        self.b_old = b;
        step
    }
}

// ---------------------------------------------------------------------------
// TouchProvider
// ---------------------------------------------------------------------------

/// Owner of the per-tick input snapshot.
pub struct TouchProvider<T: TouchDigitizer> {
    digitizer: T,
    snapshot: TouchSnapshot,
    encoder: &'static EncoderCounter,
}

impl<T: TouchDigitizer> TouchProvider<T> {
    pub fn new(digitizer: T, encoder: &'static EncoderCounter) -> Self {
        Self {
            digitizer,
            snapshot: TouchSnapshot::default(),
            encoder,
        }
    }

    /// Perform the single physical read for this tick and cache the result.
    pub fn poll(&mut self) -> TouchSnapshot {
        self.snapshot = match self.digitizer.read() {
            Some((x, y)) => TouchSnapshot {
                pressed: true,
                x: x as i32,
                y: y as i32,
            },
            None => TouchSnapshot::default(),
        };
        self.snapshot
    }

    /// Last polled state, without touching the hardware.
    pub fn snapshot(&self) -> TouchSnapshot {
        self.snapshot
    }

    /// Block until the finger lifts, re-polling with a short sleep.
    pub fn wait_released(&mut self, clock: &impl Clock) {
        while self.poll().pressed {
            clock.delay_ms(10);
        }
    }

    /// Containment test against the cached snapshot.
    pub fn is_pressed_within(&self, rect: Rect) -> bool {
        self.snapshot.pressed && rect.contains(self.snapshot.x, self.snapshot.y)
    }

    /// Fresh poll combined with a containment test, for modal loops that
    /// gate on a region without being full widgets.
    pub fn check_within(&mut self, rect: Rect) -> bool {
        self.poll();
        self.is_pressed_within(rect)
    }

    /// Encoder movement since the last call. Resets the counter unless
    /// `peek` is requested.
    pub fn enc_delta(&mut self, peek: bool) -> i32 {
        self.encoder.take(!peek)
    }

    pub fn reset_enc_delta(&mut self) {
        self.encoder.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter() -> &'static EncoderCounter {
        // Leak one counter per test; fine for the handful of tests here.
        alloc::boxed::Box::leak(alloc::boxed::Box::new(EncoderCounter::new()))
    }

    struct Script {
        samples: alloc::vec::Vec<Option<(u16, u16)>>,
        pos: usize,
    }

    impl TouchDigitizer for Script {
        fn read(&mut self) -> Option<(u16, u16)> {
            let s = self.samples.get(self.pos).copied().flatten();
            self.pos += 1;
            s
        }
    }

    struct NoSleep;
    impl Clock for NoSleep {
        fn now_ms(&self) -> u32 {
            0
        }
        fn delay_ms(&self, _ms: u32) {}
    }

    #[test]
    fn poll_caches_snapshot() {
        let mut tp = TouchProvider::new(
            Script {
                samples: alloc::vec![Some((5, 7)), None],
                pos: 0,
            },
            counter(),
        );
        let s = tp.poll();
        assert!(s.pressed);
        assert_eq!((s.x, s.y), (5, 7));
        // snapshot() must not consume another read
        assert_eq!(tp.snapshot(), s);
        assert!(!tp.poll().pressed);
    }

    #[test]
    fn wait_released_spins_until_up() {
        let mut tp = TouchProvider::new(
            Script {
                samples: alloc::vec![Some((1, 1)), Some((1, 1)), Some((1, 1)), None],
                pos: 0,
            },
            counter(),
        );
        tp.wait_released(&NoSleep);
        assert!(!tp.snapshot().pressed);
    }

    #[test]
    fn encoder_take_and_peek() {
        let enc = counter();
        enc.add(3);
        let mut tp = TouchProvider::new(
            Script {
                samples: alloc::vec![],
                pos: 0,
            },
            enc,
        );
        assert_eq!(tp.enc_delta(true), 3);
        assert_eq!(tp.enc_delta(false), 3);
        assert_eq!(tp.enc_delta(false), 0);
    }

    #[test]
    fn quadrature_full_detent_steps_once() {
        let mut s = EncoderSampler::new();
        // idle high
        assert_eq!(s.sample(true, true, 0), 0);
        // A drops first, B is still low when the detent closes
        assert_eq!(s.sample(false, true, 100), 0);
        assert_eq!(s.sample(false, false, 110), 0); // armed
        assert_eq!(s.sample(true, false, 120), 0);
        let step = s.sample(true, true, 1000);
        assert_eq!(step, -1);
        // reverse rotation: B drops first
        assert_eq!(s.sample(true, false, 2000), 0);
        assert_eq!(s.sample(false, false, 2010), 0);
        assert_eq!(s.sample(false, true, 2020), 0);
        assert_eq!(s.sample(true, true, 3000), 1);
    }

    #[test]
    fn fast_detents_accelerate() {
        let mut s = EncoderSampler::new();
        s.sample(true, true, 0);
        s.sample(false, true, 1);
        s.sample(false, false, 2);
        s.sample(true, false, 3);
        assert_eq!(s.sample(true, true, 4).abs(), 3);
        s.sample(false, true, 10);
        s.sample(false, false, 11);
        s.sample(true, false, 12);
        // 25 ms after the previous step: double
        assert_eq!(s.sample(true, true, 29).abs(), 2);
    }
}
