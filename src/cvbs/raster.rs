//! The raw field: one [`Dot`] per PPU dot of the whole raster.
//!
//! The shell (sync, porches, colorburst, borders) only depends on the configuration and is laid
//! out once. Each frame the caller's pixels are merged into the active window on top of it.

use crate::error::FilterError;
use crate::ppu::{PpuTimings, ScanlineRegion};
use crate::types::Dot;

/// A run of identical dots within a scanline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub dot: Dot,
    pub len: u16,
}

impl Segment {
    const fn new(dot: Dot, len: u16) -> Self {
        Self { dot, len }
    }
}

/// Width × height grid of dots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawField {
    width: usize,
    height: usize,
    dots: Vec<Dot>,
}

impl RawField {
    /// A field filled with blank.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            dots: vec![Dot::Blank; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn row(&self, line: usize) -> &[Dot] {
        &self.dots[line * self.width..(line + 1) * self.width]
    }

    fn row_mut(&mut self, line: usize) -> &mut [Dot] {
        &mut self.dots[line * self.width..(line + 1) * self.width]
    }

    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }
}

/// Lays out the raster shell and merges pixel data into it.
#[derive(Debug, Clone, Copy)]
pub struct FieldRasterBuilder<'a> {
    timings: &'a PpuTimings,
    sync_enable: bool,
    full_frame: bool,
}

impl<'a> FieldRasterBuilder<'a> {
    pub fn new(timings: &'a PpuTimings, sync_enable: bool, full_frame: bool) -> Self {
        Self {
            timings,
            sync_enable,
            full_frame,
        }
    }

    /// `(width, height)` of the field this builder produces.
    pub fn field_size(&self) -> (usize, usize) {
        self.timings.field_size(self.sync_enable)
    }

    /// The ordered segments making up a scanline of the shell.
    pub fn segments(&self, line: usize) -> Vec<Segment> {
        let t = self.timings;
        let region = self.timings.region(line, self.sync_enable);
        let mut segments = Vec::with_capacity(10);

        // Vertical sync overwrites the hsync, porch and colorburst bracket.
        if self.sync_enable && region != Some(ScanlineRegion::VerticalSync) {
            segments.extend([
                Segment::new(Dot::Sync, t.horizontal_sync),
                Segment::new(Dot::Blank, t.back_porch_first),
                Segment::new(Dot::Colorburst, t.colorburst),
                Segment::new(Dot::Blank, t.back_porch_second),
            ]);
        }

        match region {
            // TODO: gray pulse and border color emulation; both sit at blank for now.
            Some(ScanlineRegion::Active) => segments.extend([
                Segment::new(Dot::Blank, t.gray_pulse),
                Segment::new(Dot::Blank, t.border_left),
                Segment::new(Dot::Blank, t.active_pixels),
                Segment::new(Dot::Blank, t.border_right),
            ]),
            Some(ScanlineRegion::Postrender) => segments.extend([
                Segment::new(Dot::Blank, t.gray_pulse),
                Segment::new(Dot::Blank, t.border_bottom),
            ]),
            Some(ScanlineRegion::PostrenderBlank | ScanlineRegion::PrerenderBlank) => {
                segments.push(Segment::new(Dot::Blank, t.vblank));
            }
            Some(ScanlineRegion::VerticalSync) => segments.extend([
                Segment::new(Dot::Sync, t.vsync_pulse),
                Segment::new(Dot::Blank, t.sync_separator),
            ]),
            None => {}
        }

        if self.sync_enable {
            segments.push(Segment::new(Dot::Blank, t.front_porch));
        }

        segments
    }

    /// Shell pass: lay out every scanline from its segments.
    pub fn build_shell(&self) -> Result<RawField, FilterError> {
        let (width, height) = self.field_size();
        let mut field = RawField::new(width, height);

        for line in 0..height {
            let row = field.row_mut(line);
            let mut cursor = 0;
            for segment in self.segments(line) {
                let end = cursor + segment.len as usize;
                if end > width {
                    return Err(FilterError::ScanlineLength {
                        line,
                        expected: width,
                        actual: end,
                    });
                }
                row[cursor..end].fill(segment.dot);
                cursor = end;
            }
            if cursor != width {
                return Err(FilterError::ScanlineLength {
                    line,
                    expected: width,
                    actual: cursor,
                });
            }
        }

        log::debug!("laid out {width}x{height} raster shell");
        Ok(field)
    }

    /// Merge pass: overwrite the active window with `pixels`, in raster order. Codes wider than
    /// 9 bits become blank; the number of such codes is returned. `field` must come from a
    /// builder with the same raster.
    pub fn merge(&self, field: &mut RawField, pixels: &[u16]) -> Result<usize, FilterError> {
        let expected = self.field_size();
        let actual = (field.width(), field.height());
        if actual != expected {
            return Err(FilterError::FieldSize { expected, actual });
        }

        let (input_width, input_height) = self.timings.input_size(self.full_frame);
        let expected = input_width * input_height;
        if pixels.len() != expected {
            return Err(FilterError::InputLength {
                expected,
                actual: pixels.len(),
            });
        }

        let column = if self.full_frame {
            self.timings.visible_column(self.sync_enable)
        } else {
            self.timings.active_column(self.sync_enable)
        };

        let mut cursor = 0;
        let mut clamped = 0;
        for line in 0..input_height {
            let window = &mut field.row_mut(line)[column..column + input_width];
            for cell in window {
                let (dot, was_clamped) = Dot::from_code(pixels[cursor]);
                *cell = dot;
                clamped += usize::from(was_clamped);
                cursor += 1;
            }
        }

        if clamped > 0 {
            log::warn!("{clamped} pixel codes wider than 9 bits clamped to blank");
        }
        Ok(clamped)
    }
}
