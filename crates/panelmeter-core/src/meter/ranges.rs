//! Measurement range table shared by the analog meter, bargraphs, scope
//! and numeric readout.
//!
//! Index 0..4 are current ranges, 5..9 voltage ranges. A range fixes the
//! full-scale value, the display unit, the number of decimals at various
//! label sizes and the colored warning zones on the analog scale.

/// Number of entries in the range table.
pub const RANGE_COUNT: usize = 10;

/// Colored zone on the analog scale, in percent of full deflection.
/// Drawn only when `end > start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Zone {
    pub start: i32,
    pub end: i32,
}

impl Zone {
    pub const fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub const NONE: Zone = Zone::new(0, 0);

    pub fn is_set(&self) -> bool {
        self.end > self.start
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MeterRange {
    /// Full-scale value in display units.
    pub max_val: f32,
    pub unit: &'static str,
    /// Decimals for the large value readout.
    pub val_decimals: usize,
    /// Decimals for scale endpoint labels.
    pub scale_decimals: usize,
    /// Decimals for the small scope axis labels.
    pub small_decimals: usize,
    pub green: Zone,
    pub orange: Zone,
    pub red: Zone,
}

/// The instrument's fixed range set.
pub const METER_RANGES: [MeterRange; RANGE_COUNT] = [
    // current
    MeterRange {
        max_val: 30.0,
        unit: "mA",
        val_decimals: 1,
        scale_decimals: 0,
        small_decimals: 0,
        green: Zone::new(0, 20),
        orange: Zone::NONE,
        red: Zone::new(90, 100),
    },
    MeterRange {
        max_val: 100.0,
        unit: "mA",
        val_decimals: 0,
        scale_decimals: 0,
        small_decimals: 0,
        green: Zone::new(0, 20),
        orange: Zone::NONE,
        red: Zone::new(90, 100),
    },
    MeterRange {
        max_val: 300.0,
        unit: "mA",
        val_decimals: 0,
        scale_decimals: 0,
        small_decimals: 0,
        green: Zone::new(0, 20),
        orange: Zone::NONE,
        red: Zone::new(90, 100),
    },
    MeterRange {
        max_val: 1.0,
        unit: "A",
        val_decimals: 2,
        scale_decimals: 2,
        small_decimals: 1,
        green: Zone::new(0, 20),
        orange: Zone::NONE,
        red: Zone::new(90, 100),
    },
    MeterRange {
        max_val: 3.0,
        unit: "A",
        val_decimals: 2,
        scale_decimals: 1,
        small_decimals: 1,
        green: Zone::NONE,
        orange: Zone::NONE,
        red: Zone::new(90, 100),
    },
    // voltage
    MeterRange {
        max_val: 1.0,
        unit: "V",
        val_decimals: 2,
        scale_decimals: 2,
        small_decimals: 2,
        green: Zone::NONE,
        orange: Zone::NONE,
        red: Zone::NONE,
    },
    MeterRange {
        max_val: 3.0,
        unit: "V",
        val_decimals: 2,
        scale_decimals: 2,
        small_decimals: 1,
        green: Zone::NONE,
        orange: Zone::NONE,
        red: Zone::NONE,
    },
    MeterRange {
        max_val: 10.0,
        unit: "V",
        val_decimals: 2,
        scale_decimals: 1,
        small_decimals: 0,
        green: Zone::new(45, 55),
        orange: Zone::new(75, 90),
        red: Zone::new(90, 100),
    },
    MeterRange {
        max_val: 30.0,
        unit: "V",
        val_decimals: 1,
        scale_decimals: 0,
        small_decimals: 0,
        green: Zone::NONE,
        orange: Zone::NONE,
        red: Zone::NONE,
    },
    MeterRange {
        max_val: 100.0,
        unit: "V",
        val_decimals: 1,
        scale_decimals: 0,
        small_decimals: 0,
        green: Zone::NONE,
        orange: Zone::NONE,
        red: Zone::NONE,
    },
];

/// Range lookup with a defensive clamp; a stray index falls back to the
/// last entry instead of panicking.
pub fn range(idx: usize) -> &'static MeterRange {
    METER_RANGES.get(idx).unwrap_or(&METER_RANGES[RANGE_COUNT - 1])
}
