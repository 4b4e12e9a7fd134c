//! Composite output voltages and the amplitude lookup table built from them.

use crate::types::SignalFloat;

/// Index of the low half of a square wave in [`CompositeOutputLevel`] and [`SignalLevelLut`].
pub const LOW: usize = 0;
/// Index of the high half of a square wave.
pub const HIGH: usize = 1;

/// Sync (low) and blank (high) live after the 64 palette entries.
pub const SYNC_INDEX: usize = 0x40;
/// Colorburst low/high.
pub const COLORBURST_INDEX: usize = 0x41;
/// Palette entries plus the two reference levels.
pub const LUT_COLORS: usize = 0x42;

/// Composite output levels of a PPU, in volts.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeOutputLevel {
    /// `[sync, blank]`.
    pub sync: [f64; 2],
    /// `[low, high]`.
    pub colorburst: [f64; 2],
    /// Indexed by luma (`$0x`-`$3x`), then `[LOW]` (the `$xD` level) / `[HIGH]` (the `$x0`
    /// level), then emphasis off/on.
    pub signal: [[[f64; 2]; 2]; 4],
}

impl CompositeOutputLevel {
    /// lidnariq's measurements of an NESCPU-07 2C02G in an NES-001.
    /// <https://forums.nesdev.org/viewtopic.php?p=159266#p159266>
    pub const RP2C02: CompositeOutputLevel = CompositeOutputLevel {
        sync: [0.048, 0.312],
        colorburst: [0.148, 0.524],
        signal: [
            [[0.228, 0.192], [0.616, 0.500]],
            [[0.312, 0.256], [0.840, 0.676]],
            [[0.552, 0.448], [1.100, 0.896]],
            [[0.880, 0.712], [1.100, 0.896]],
        ],
    };

    // No separate measurements of the PAL chips; they share the 2C02G DAC levels.
    pub const RP2C07: CompositeOutputLevel = Self::RP2C02;
    pub const UA6538: CompositeOutputLevel = Self::RP2C02;

    pub const fn sync_level(&self) -> f64 {
        self.sync[0]
    }

    /// Blanking, which doubles as the black reference.
    pub const fn blank_level(&self) -> f64 {
        self.sync[1]
    }

    /// The `$20` level, the white reference.
    pub const fn white_level(&self) -> f64 {
        self.signal[2][HIGH][0]
    }
}

/// Normalized signal amplitudes, indexed by `[LOW|HIGH][emphasis][color]`.
///
/// Colors 0x00-0x3F are the palette. [`SYNC_INDEX`] holds sync in its low half and blank in its
/// high half, [`COLORBURST_INDEX`] the two colorburst levels, so every raster cell is a single
/// lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalLevelLut {
    levels: [[[SignalFloat; LUT_COLORS]; 2]; 2],
}

impl SignalLevelLut {
    /// Build the table, mapping blank to 0.0 and `$20` to 1.0 before contrast and brightness.
    pub fn new(voltages: &CompositeOutputLevel, brightness: f32, contrast: f32) -> Self {
        let black = voltages.blank_level();
        let white = voltages.white_level();
        let normalize = |volts: f64| -> SignalFloat {
            ((volts - black) / (white - black) * (1.0 + f64::from(contrast)) + f64::from(brightness))
                as SignalFloat
        };

        let mut levels = [[[0.0; LUT_COLORS]; 2]; 2];
        for emphasis in 0..2 {
            for color in 0..0x40 {
                let hue = color & 0x0F;
                let luma = (color >> 4) & 0x03;
                let mut high = voltages.signal[luma][HIGH][emphasis];
                let mut low = voltages.signal[luma][LOW][emphasis];

                if hue == 0x00 {
                    low = high;
                } else if hue == 0x0D {
                    high = low;
                } else if hue >= 0x0E {
                    high = voltages.blank_level();
                    low = high;
                }

                levels[HIGH][emphasis][color] = normalize(high);
                levels[LOW][emphasis][color] = normalize(low);
            }

            levels[LOW][emphasis][SYNC_INDEX] = normalize(voltages.sync_level());
            levels[HIGH][emphasis][SYNC_INDEX] = normalize(voltages.blank_level());
            levels[LOW][emphasis][COLORBURST_INDEX] = normalize(voltages.colorburst[LOW]);
            levels[HIGH][emphasis][COLORBURST_INDEX] = normalize(voltages.colorburst[HIGH]);
        }

        Self { levels }
    }

    /// Look up a level. `color` must be below [`LUT_COLORS`].
    #[inline]
    pub fn level(&self, high: bool, emphasis: bool, color: usize) -> SignalFloat {
        self.levels[usize::from(high)][usize::from(emphasis)][color]
    }

    pub fn sync_level(&self) -> SignalFloat {
        self.level(false, false, SYNC_INDEX)
    }

    pub fn blank_level(&self) -> SignalFloat {
        self.level(true, false, SYNC_INDEX)
    }

    /// Every entry in the table.
    pub fn iter(&self) -> impl Iterator<Item = SignalFloat> + '_ {
        self.levels.iter().flatten().flatten().copied()
    }
}
