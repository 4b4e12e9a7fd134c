use super::filter::SignalField;
use crate::ppu::PpuTimings;
use crate::settings::FilterSettings;

/// What a decoder needs to know about the field it is handed.
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext<'a> {
    pub timings: &'a PpuTimings,
    pub settings: &'a FilterSettings,
    /// PPU dot phase the field was encoded with, 0-2.
    pub dot_phase: u8,
    /// Whether the field was encoded with the odd-frame dot skip.
    pub skip_dot: bool,
}

/// Turns a composite field back into pixels. This crate only produces the signal; decoding is
/// left to implementors of this trait, e.g. a YIQ demodulator or a comb filter.
///
/// `rgb` is laid out like the raw field it came from, one `0x00RRGGBB` pixel per PPU dot.
/// Hue, saturation and the palette unscramble revision in [`FilterSettings`] are meant for the
/// decoder.
pub trait Decoder {
    type Error;

    fn decode(
        &mut self,
        signal: &SignalField,
        context: &DecodeContext<'_>,
        rgb: &mut [u32],
    ) -> Result<(), Self::Error>;
}
