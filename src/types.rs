/// The floating point type used for signal samples. Samples are normalized so that the blanking
/// level sits at 0.0 and the `$20` white level at 1.0, before brightness/contrast are applied.
pub type SignalFloat = f32;

/// Number of steps in one full color subcarrier cycle.
pub const PHASE_STEPS: u8 = 12;

/// Mask for a valid 9-bit PPU pixel code, "eeellcccc".
pub const PIXEL_CODE_MASK: u16 = 0x1FF;

/// A PPU output pixel: 3 emphasis bits, 2 luma bits and a 4 bit hue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelCode(u16);

impl PixelCode {
    /// Wrap a raw code, or `None` if it doesn't fit in 9 bits.
    pub const fn new(code: u16) -> Option<Self> {
        if code & !PIXEL_CODE_MASK == 0 {
            Some(Self(code))
        } else {
            None
        }
    }

    /// The raw 9-bit value.
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// The 6-bit palette index, "llcccc".
    pub const fn color(self) -> u8 {
        (self.0 & 0x3F) as u8
    }

    pub const fn hue(self) -> u8 {
        (self.0 & 0x0F) as u8
    }

    pub const fn luma(self) -> u8 {
        ((self.0 >> 4) & 0x03) as u8
    }

    /// The emphasis bits, red in bit 0, green in bit 1, blue in bit 2.
    pub const fn emphasis(self) -> u8 {
        (self.0 >> 6) as u8
    }
}

/// One cell of the raw field: either a pixel or one of the reference levels the PPU emits
/// outside the picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dot {
    Pixel(PixelCode),
    Sync,
    Blank,
    Colorburst,
}

impl Dot {
    /// Convert a caller supplied pixel code, clamping anything wider than 9 bits to blank.
    /// The second value reports whether the code had to be clamped.
    pub fn from_code(code: u16) -> (Self, bool) {
        match PixelCode::new(code) {
            Some(pixel) => (Dot::Pixel(pixel), false),
            None => (Dot::Blank, true),
        }
    }
}
