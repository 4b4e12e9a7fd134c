use std::ops::Range;

use super::raster::RawField;
use crate::ppu::{PpuTimings, PpuVariant, SignalLevelLut, COLORBURST_INDEX, SYNC_INDEX};
use crate::types::{Dot, SignalFloat, PHASE_STEPS};

/// Hues whose square waves the red, green and blue emphasis bits follow.
const EMPHASIS_PHASES: [u8; 3] = [0x0C, 0x04, 0x08];

/// PAL chips swing odd scanlines this many steps ahead.
const PAL_LINE_SWING: u8 = 3;

/// Pixel column of scanline 0 where the dot skip shift is undone. Observed on hardware.
const DOT_SKIP_CORRECTION_COLUMN: usize = 63;

/// Whether a phase falls in the high half of a hue's square wave.
#[inline]
fn in_color_phase(hue: u8, phase: u8) -> bool {
    (hue + phase) % PHASE_STEPS < 6
}

/// Phase of the first sample of a scanline. A full scanline is a third of a subcarrier cycle
/// short of a whole number of cycles, so the start phase rotates through three values.
pub fn line_start_phase(dot_phase: u8, line: usize) -> u8 {
    (((usize::from(dot_phase) + line) % 3) * 4 % usize::from(PHASE_STEPS)) as u8
}

/// The subcarrier phase of every sample in one scanline, in order.
#[derive(Debug, Clone)]
pub struct LinePhases {
    phase: u8,
    sample: usize,
    /// Sample index and size of the pending dot skip reversal.
    correction: Option<(usize, u8)>,
}

impl LinePhases {
    pub fn new(
        timings: &PpuTimings,
        variant: PpuVariant,
        dot_phase: u8,
        line: usize,
        skip_dot: bool,
    ) -> Self {
        let mut phase = line_start_phase(dot_phase, line);

        // The swing only lives for this row; the next row starts from its own rotation.
        if variant.alternates_line_phase() && line % 2 == 1 {
            phase = (phase + PAL_LINE_SWING) % PHASE_STEPS;
        }

        let mut correction = None;
        if skip_dot && timings.dot_skip && line == 0 {
            let samples_per_pixel = usize::from(timings.samples_per_pixel);
            let shift = (samples_per_pixel % usize::from(PHASE_STEPS)) as u8;
            phase = (phase + shift) % PHASE_STEPS;
            correction = Some((DOT_SKIP_CORRECTION_COLUMN * samples_per_pixel, shift));
        }

        Self {
            phase,
            sample: 0,
            correction,
        }
    }
}

impl Iterator for LinePhases {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if let Some((at, shift)) = self.correction {
            if self.sample == at {
                self.phase = (self.phase + PHASE_STEPS - shift) % PHASE_STEPS;
                self.correction = None;
            }
        }

        let phase = self.phase;
        self.phase = (self.phase + 1) % PHASE_STEPS;
        self.sample += 1;
        Some(phase)
    }
}

/// Turns raw dots into composite samples, `samples_per_pixel` per dot.
#[derive(Debug, Clone, Copy)]
pub struct SubcarrierEncoder<'a> {
    variant: PpuVariant,
    timings: &'a PpuTimings,
    lut: &'a SignalLevelLut,
}

impl<'a> SubcarrierEncoder<'a> {
    pub fn new(variant: PpuVariant, lut: &'a SignalLevelLut) -> Self {
        Self {
            variant,
            timings: variant.timings(),
            lut,
        }
    }

    pub fn samples_per_pixel(&self) -> usize {
        usize::from(self.timings.samples_per_pixel)
    }

    /// Phase sequence used for a scanline.
    pub fn phases(&self, dot_phase: u8, line: usize, skip_dot: bool) -> LinePhases {
        LinePhases::new(self.timings, self.variant, dot_phase, line, skip_dot)
    }

    /// Encode one scanline. `out` holds `samples_per_pixel` samples per dot.
    pub fn encode_line(
        &self,
        dots: &[Dot],
        line: usize,
        dot_phase: u8,
        skip_dot: bool,
        out: &mut [SignalFloat],
    ) {
        let samples_per_pixel = self.samples_per_pixel();
        debug_assert_eq!(out.len(), dots.len() * samples_per_pixel);

        let mut phases = self.phases(dot_phase, line, skip_dot);
        for (&dot, samples) in dots.iter().zip(out.chunks_exact_mut(samples_per_pixel)) {
            for (sample, phase) in samples.iter_mut().zip(&mut phases) {
                *sample = self.sample(dot, phase);
            }
        }
    }

    /// Encode a contiguous range of scanlines into `out`, which starts at the first of them.
    pub fn encode_lines(
        &self,
        field: &RawField,
        lines: Range<usize>,
        dot_phase: u8,
        skip_dot: bool,
        out: &mut [SignalFloat],
    ) {
        let row_len = field.width() * self.samples_per_pixel();
        debug_assert_eq!(out.len(), lines.len() * row_len);

        for (line, row) in lines.zip(out.chunks_exact_mut(row_len)) {
            self.encode_line(field.row(line), line, dot_phase, skip_dot, row);
        }
    }

    /// Signal level of a dot at a given phase.
    #[inline]
    pub fn sample(&self, dot: Dot, phase: u8) -> SignalFloat {
        match dot {
            Dot::Sync => self.lut.level(false, false, SYNC_INDEX),
            Dot::Blank => self.lut.level(true, false, SYNC_INDEX),
            Dot::Colorburst => self.lut.level(
                in_color_phase(self.timings.colorburst_phase, phase),
                false,
                COLORBURST_INDEX,
            ),
            Dot::Pixel(pixel) => {
                let emphasis = pixel.emphasis();
                let attenuated = EMPHASIS_PHASES
                    .iter()
                    .enumerate()
                    .any(|(bit, &hue)| emphasis & (1 << bit) != 0 && in_color_phase(hue, phase));
                self.lut.level(
                    in_color_phase(pixel.hue(), phase),
                    attenuated,
                    usize::from(pixel.color()),
                )
            }
        }
    }
}
