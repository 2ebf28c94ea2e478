//! Top-level instrument state machine.
//!
//! Six states form the measurement ring cycled by wipe gestures or
//! encoder rotation: each page has an Init state that paints the static
//! chrome once and a steady state that only feeds samples. The setup
//! page sits outside the ring and is entered/left via buttons.

/// Instrument display state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrState {
    MeterInit,
    Meter,
    BargraphInit,
    Bargraph,
    ScopeInit,
    Scope,
    SetupInit,
    Setup,
}

impl InstrState {
    /// Position in the ordered state list. The measurement ring occupies
    /// indices 0..=5; setup states sit outside it.
    pub fn index(self) -> u8 {
        match self {
            InstrState::MeterInit => 0,
            InstrState::Meter => 1,
            InstrState::BargraphInit => 2,
            InstrState::Bargraph => 3,
            InstrState::ScopeInit => 4,
            InstrState::Scope => 5,
            InstrState::SetupInit => 6,
            InstrState::Setup => 7,
        }
    }

    /// Inverse of [`InstrState::index`] on the six-state ring.
    pub fn from_ring_index(idx: u8) -> Self {
        match idx % 6 {
            0 => InstrState::MeterInit,
            1 => InstrState::Meter,
            2 => InstrState::BargraphInit,
            3 => InstrState::Bargraph,
            4 => InstrState::ScopeInit,
            _ => InstrState::Scope,
        }
    }

    /// Next state in the ring, with wraparound.
    pub fn next(self) -> Self {
        Self::from_ring_index((self.index() + 1) % 6)
    }

    /// Previous state in the ring, with wraparound.
    pub fn prev(self) -> Self {
        Self::from_ring_index((self.index() + 5) % 6)
    }

    pub fn is_init(self) -> bool {
        matches!(
            self,
            InstrState::MeterInit
                | InstrState::BargraphInit
                | InstrState::ScopeInit
                | InstrState::SetupInit
        )
    }

    /// The steady state belonging to this page.
    pub fn steady(self) -> Self {
        match self {
            InstrState::MeterInit => InstrState::Meter,
            InstrState::BargraphInit => InstrState::Bargraph,
            InstrState::ScopeInit => InstrState::Scope,
            InstrState::SetupInit => InstrState::Setup,
            other => other,
        }
    }

    /// The Init state belonging to this page.
    pub fn init_state(self) -> Self {
        match self {
            InstrState::Meter => InstrState::MeterInit,
            InstrState::Bargraph => InstrState::BargraphInit,
            InstrState::Scope => InstrState::ScopeInit,
            InstrState::Setup => InstrState::SetupInit,
            other => other,
        }
    }

    pub fn is_setup(self) -> bool {
        matches!(self, InstrState::SetupInit | InstrState::Setup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_wraps_forward() {
        let mut s = InstrState::MeterInit;
        for _ in 0..6 {
            s = s.next();
        }
        assert_eq!(s, InstrState::MeterInit);
    }

    #[test]
    fn ring_wraps_backward() {
        assert_eq!(InstrState::MeterInit.prev(), InstrState::Scope);
        assert_eq!(InstrState::Scope.prev(), InstrState::ScopeInit);
    }

    #[test]
    fn four_forward_steps_from_meter_init() {
        let mut s = InstrState::MeterInit;
        for _ in 0..4 {
            s = s.next();
        }
        assert_eq!(s.index(), (InstrState::MeterInit.index() + 4) % 6);
        assert_eq!(s, InstrState::ScopeInit);
    }
}
