//! Scanline and frame timings, in PPU dots and scanlines.
//!
//! <https://www.nesdev.org/wiki/NTSC_video#Scanline_Timing>
//! <https://www.nesdev.org/wiki/File:Ppu.svg>

use super::{NTSC_MASTER_CLOCK_HZ, PAL_MASTER_CLOCK_HZ};

/// Segment lengths of the composite raster for one PPU chip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PpuTimings {
    pub field_width: u16,
    pub field_height: u16,
    pub visible_width: u16,
    pub visible_height: u16,

    // Common to every scanline outside vertical sync.
    pub horizontal_sync: u16,
    pub back_porch_first: u16,
    pub colorburst: u16,
    pub back_porch_second: u16,
    pub front_porch: u16,

    // Visible scanlines.
    pub active_scanlines: u16,
    pub gray_pulse: u16,
    pub border_left: u16,
    pub active_pixels: u16,
    pub border_right: u16,

    // Post-render scanlines, bottom border only.
    pub postrender_scanlines: u16,
    pub border_bottom: u16,

    // Post-render blanking.
    pub postrender_blank_scanlines: u16,
    pub vblank: u16,

    // Vertical sync.
    pub vertical_sync_scanlines: u16,
    pub vsync_pulse: u16,
    pub sync_separator: u16,

    // Pre-render blanking, same layout as post-render blanking.
    pub prerender_blank_scanlines: u16,

    /// Odd frames drop a dot at the end of the pre-render line.
    pub dot_skip: bool,

    /// Signal samples per PPU dot: twice the master clock over the dot clock.
    pub samples_per_pixel: u16,
    /// Hue whose square wave matches the colorburst.
    pub colorburst_phase: u8,
}

impl PpuTimings {
    pub const RP2C02: PpuTimings = PpuTimings {
        field_width: 341,
        field_height: 262,
        visible_width: 283,
        visible_height: 242,

        horizontal_sync: 25,
        back_porch_first: 4,
        colorburst: 15,
        back_porch_second: 5,
        front_porch: 9,

        active_scanlines: 240,
        gray_pulse: 1,
        border_left: 15,
        active_pixels: 256,
        border_right: 11,

        postrender_scanlines: 2,
        border_bottom: 282,

        postrender_blank_scanlines: 3,
        vblank: 283,

        vertical_sync_scanlines: 3,
        vsync_pulse: 318,
        sync_separator: 14,

        prerender_blank_scanlines: 14,

        dot_skip: true,
        samples_per_pixel: ((NTSC_MASTER_CLOCK_HZ * 2) / (NTSC_MASTER_CLOCK_HZ / 4)) as u16,
        colorburst_phase: 0x08,
    };

    pub const RP2C07: PpuTimings = PpuTimings {
        field_width: 341,
        field_height: 312,
        visible_width: 283,
        visible_height: 240,

        horizontal_sync: 25,
        back_porch_first: 4,
        colorburst: 15,
        back_porch_second: 5,
        front_porch: 9,

        active_scanlines: 240,
        gray_pulse: 0,
        border_left: 18,
        active_pixels: 256,
        border_right: 9,

        // The 2C07 goes straight from picture to blanking.
        postrender_scanlines: 0,
        border_bottom: 283,

        postrender_blank_scanlines: 30,
        vblank: 283,

        vertical_sync_scanlines: 3,
        vsync_pulse: 320,
        sync_separator: 12,

        prerender_blank_scanlines: 39,

        dot_skip: false,
        samples_per_pixel: ((PAL_MASTER_CLOCK_HZ * 2) / (PAL_MASTER_CLOCK_HZ / 5)) as u16,
        colorburst_phase: 0x07,
    };

    /// The UA6538 raster matches the 2C07.
    pub const UA6538: PpuTimings = Self::RP2C07;

    /// Width of the hsync, back porch and colorburst bracket that opens a scanline.
    pub const fn line_prefix(&self) -> u16 {
        self.horizontal_sync + self.back_porch_first + self.colorburst + self.back_porch_second
    }

    /// Raw field dimensions in dots, `(width, height)`. Without sync the field is just the
    /// visible window.
    pub const fn field_size(&self, sync_enable: bool) -> (usize, usize) {
        if sync_enable {
            (self.field_width as usize, self.field_height as usize)
        } else {
            (self.visible_width as usize, self.visible_height as usize)
        }
    }

    /// Expected pixel buffer dimensions, `(width, height)`. Full-frame input includes the gray
    /// pulse, borders and post-render rows.
    pub const fn input_size(&self, full_frame: bool) -> (usize, usize) {
        if full_frame {
            (self.visible_width as usize, self.visible_height as usize)
        } else {
            (self.active_pixels as usize, self.active_scanlines as usize)
        }
    }

    /// First column of the visible window (gray pulse onwards).
    pub const fn visible_column(&self, sync_enable: bool) -> usize {
        if sync_enable {
            self.line_prefix() as usize
        } else {
            0
        }
    }

    /// First column of the active picture.
    pub const fn active_column(&self, sync_enable: bool) -> usize {
        self.visible_column(sync_enable) + (self.gray_pulse + self.border_left) as usize
    }

    /// Which vertical region a scanline falls in. Without sync only the active and post-render
    /// regions exist.
    pub fn region(&self, line: usize, sync_enable: bool) -> Option<ScanlineRegion> {
        let regions: &[(ScanlineRegion, u16)] = &[
            (ScanlineRegion::Active, self.active_scanlines),
            (ScanlineRegion::Postrender, self.postrender_scanlines),
            (ScanlineRegion::PostrenderBlank, self.postrender_blank_scanlines),
            (ScanlineRegion::VerticalSync, self.vertical_sync_scanlines),
            (ScanlineRegion::PrerenderBlank, self.prerender_blank_scanlines),
        ];

        let mut threshold = 0;
        for &(region, count) in regions {
            if !sync_enable && region.is_blanking() {
                break;
            }
            threshold += count as usize;
            if line < threshold {
                return Some(region);
            }
        }
        None
    }
}

/// The vertical parts of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanlineRegion {
    Active,
    Postrender,
    PostrenderBlank,
    VerticalSync,
    PrerenderBlank,
}

impl ScanlineRegion {
    /// Regions that only exist when sync is emitted.
    pub const fn is_blanking(self) -> bool {
        matches!(
            self,
            Self::PostrenderBlank | Self::VerticalSync | Self::PrerenderBlank
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all() -> [&'static PpuTimings; 3] {
        [&PpuTimings::RP2C02, &PpuTimings::RP2C07, &PpuTimings::UA6538]
    }

    #[test]
    fn samples_per_pixel() {
        assert_eq!(PpuTimings::RP2C02.samples_per_pixel, 8);
        assert_eq!(PpuTimings::RP2C07.samples_per_pixel, 10);
    }

    #[test]
    fn scanline_counts_fill_the_field() {
        for t in all() {
            let total = t.active_scanlines
                + t.postrender_scanlines
                + t.postrender_blank_scanlines
                + t.vertical_sync_scanlines
                + t.prerender_blank_scanlines;
            assert_eq!(total, t.field_height);
            assert_eq!(t.active_scanlines + t.postrender_scanlines, t.visible_height);
        }
    }

    #[test]
    fn visible_window_fits_between_porches() {
        for t in all() {
            let visible = t.gray_pulse + t.border_left + t.active_pixels + t.border_right;
            assert_eq!(visible, t.visible_width);
            assert_eq!(t.line_prefix() + t.visible_width + t.front_porch, t.field_width);
            assert_eq!(t.vsync_pulse + t.sync_separator, t.line_prefix() + t.vblank);
        }
    }

    #[test]
    fn ntsc_regions() {
        let t = &PpuTimings::RP2C02;
        assert_eq!(t.region(0, true), Some(ScanlineRegion::Active));
        assert_eq!(t.region(239, true), Some(ScanlineRegion::Active));
        assert_eq!(t.region(240, true), Some(ScanlineRegion::Postrender));
        assert_eq!(t.region(242, true), Some(ScanlineRegion::PostrenderBlank));
        assert_eq!(t.region(245, true), Some(ScanlineRegion::VerticalSync));
        assert_eq!(t.region(247, true), Some(ScanlineRegion::VerticalSync));
        assert_eq!(t.region(248, true), Some(ScanlineRegion::PrerenderBlank));
        assert_eq!(t.region(261, true), Some(ScanlineRegion::PrerenderBlank));
        assert_eq!(t.region(262, true), None);
    }

    #[test]
    fn pal_skips_postrender() {
        let t = &PpuTimings::RP2C07;
        assert_eq!(t.region(240, true), Some(ScanlineRegion::PostrenderBlank));
        assert_eq!(t.region(270, true), Some(ScanlineRegion::VerticalSync));
        assert_eq!(t.region(273, true), Some(ScanlineRegion::PrerenderBlank));
        assert_eq!(t.region(240, false), None);
    }

    #[test]
    fn blanking_regions_vanish_without_sync() {
        let t = &PpuTimings::RP2C02;
        assert_eq!(t.region(241, false), Some(ScanlineRegion::Postrender));
        assert_eq!(t.region(242, false), None);
        assert_eq!(t.field_size(false), (283, 242));
        assert_eq!(t.field_size(true), (341, 262));
    }

    #[test]
    fn active_column_skips_gray_pulse_and_border() {
        let t = &PpuTimings::RP2C02;
        assert_eq!(t.active_column(true), 65);
        assert_eq!(t.active_column(false), 16);
        assert_eq!(PpuTimings::RP2C07.active_column(false), 18);
    }
}
