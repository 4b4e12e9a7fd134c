use std::fmt;

/// Everything that can go wrong configuring the filter or feeding it a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterError {
    /// Integer-coded PPU type outside 0 (2C02), 1 (2C07), 2 (UA6538).
    UnknownVariant(u8),
    /// Named PPU type that doesn't match any supported chip.
    UnknownVariantName(String),
    /// At least one worker is required.
    InvalidThreadCount(usize),
    /// Palette unscramble revisions run from 0 to 4.
    InvalidPaletteRevision(u8),
    /// Brightness, contrast, hue or saturation out of range.
    InvalidAdjustment { name: &'static str, value: f32 },
    /// Pixel buffer doesn't match the configured input dimensions.
    InputLength { expected: usize, actual: usize },
    /// A raw field built for a different raster than the one it is merged into.
    FieldSize {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    /// A scanline's segments don't add up to the field width.
    ScanlineLength { line: usize, expected: usize, actual: usize },
    /// The worker pool could not be started.
    ThreadPool(String),
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownVariant(index) => {
                write!(f, "unknown PPU type {index} (expected 0 = 2C02, 1 = 2C07, 2 = UA6538)")
            }
            Self::UnknownVariantName(name) => write!(f, "unknown PPU type \"{name}\""),
            Self::InvalidThreadCount(count) => {
                write!(f, "invalid worker thread count {count} (need at least 1)")
            }
            Self::InvalidPaletteRevision(revision) => {
                write!(f, "invalid palette unscramble revision {revision} (expected 0-4)")
            }
            Self::InvalidAdjustment { name, value } => write!(f, "invalid {name} adjustment: {value}"),
            Self::InputLength { expected, actual } => write!(
                f,
                "pixel buffer holds {actual} codes, expected {expected}"
            ),
            Self::FieldSize { expected, actual } => write!(
                f,
                "raw field is {}x{} dots, raster needs {}x{}",
                actual.0, actual.1, expected.0, expected.1
            ),
            Self::ScanlineLength {
                line,
                expected,
                actual,
            } => write!(
                f,
                "scanline {line} segments span {actual} dots, field width is {expected}"
            ),
            Self::ThreadPool(reason) => write!(f, "failed to start worker pool: {reason}"),
        }
    }
}

impl std::error::Error for FilterError {}
