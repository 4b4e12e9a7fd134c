mod timings;
mod voltages;

pub use timings::*;
pub use voltages::*;

use std::fmt;
use std::str::FromStr;

use crate::error::FilterError;

/// The NTSC master crystal frequency in hz. The 2C02 dot clock is a quarter of this, and the
/// color subcarrier a sixth.
pub const NTSC_MASTER_CLOCK_HZ: u32 = 21_477_272;

/// The PAL master crystal frequency in hz. The 2C07 dot clock is a fifth of this, and the color
/// subcarrier a sixth.
pub const PAL_MASTER_CLOCK_HZ: u32 = 26_601_712;

/// The PPU chip whose composite output is being modelled.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PpuVariant {
    /// RP2C02, NTSC.
    #[default]
    Ntsc,
    /// RP2C07, PAL.
    Pal,
    /// UA6538, the PAL famiclone chip used in the Dendy.
    Dendy,
}

impl PpuVariant {
    pub const ALL: [PpuVariant; 3] = [PpuVariant::Ntsc, PpuVariant::Pal, PpuVariant::Dendy];

    /// Select a variant by the integer code used in configuration files: 0 = 2C02, 1 = 2C07,
    /// 2 = UA6538.
    pub fn from_index(index: u8) -> Result<Self, FilterError> {
        match index {
            0 => Ok(Self::Ntsc),
            1 => Ok(Self::Pal),
            2 => Ok(Self::Dendy),
            other => Err(FilterError::UnknownVariant(other)),
        }
    }

    /// Raster timings for this chip.
    pub const fn timings(self) -> &'static PpuTimings {
        match self {
            Self::Ntsc => &PpuTimings::RP2C02,
            Self::Pal => &PpuTimings::RP2C07,
            Self::Dendy => &PpuTimings::UA6538,
        }
    }

    /// Measured composite output voltages for this chip.
    pub const fn voltages(self) -> &'static CompositeOutputLevel {
        match self {
            Self::Ntsc => &CompositeOutputLevel::RP2C02,
            Self::Pal => &CompositeOutputLevel::RP2C07,
            Self::Dendy => &CompositeOutputLevel::UA6538,
        }
    }

    /// PAL chips invert the V component on alternate lines, which the PPU approximates by
    /// swinging the subcarrier phase on every other scanline.
    pub const fn alternates_line_phase(self) -> bool {
        matches!(self, Self::Pal | Self::Dendy)
    }

    pub const fn chip_name(self) -> &'static str {
        match self {
            Self::Ntsc => "2C02",
            Self::Pal => "2C07",
            Self::Dendy => "UA6538",
        }
    }
}

impl fmt::Display for PpuVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let region = match self {
            Self::Ntsc => "NTSC",
            Self::Pal => "PAL",
            Self::Dendy => "Dendy",
        };
        write!(f, "{region} ({})", self.chip_name())
    }
}

impl FromStr for PpuVariant {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ntsc" | "2c02" | "rp2c02" | "0" => Ok(Self::Ntsc),
            "pal" | "2c07" | "rp2c07" | "1" => Ok(Self::Pal),
            "dendy" | "ua6538" | "2" => Ok(Self::Dendy),
            _ => Err(FilterError::UnknownVariantName(s.to_string())),
        }
    }
}
