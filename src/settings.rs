use crate::error::FilterError;
use crate::ppu::PpuVariant;

/// Highest palette unscramble revision (2C04-0004).
pub const MAX_PALETTE_REVISION: u8 = 4;

/// Filter configuration, supplied at construction and reapplied with
/// [`FrameFilter::apply_settings`](crate::FrameFilter::apply_settings).
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSettings {
    pub variant: PpuVariant,
    /// Which 2C04 palette unscramble table a decoder should use, 0 for none. The encoder never
    /// looks at it.
    pub palette_revision: u8,
    /// Emit hsync, colorburst and the blanking scanlines. When off, the field is just the
    /// visible window.
    pub sync_enable: bool,
    /// Input already contains the gray pulse, borders and post-render scanlines.
    pub full_frame: bool,
    /// Worker threads used to encode a field.
    pub threads: usize,
    pub brightness: f32,
    /// Scale applied around the black level; must stay above -1.
    pub contrast: f32,
    /// Decoder hue rotation, in degrees.
    pub hue: f32,
    /// Decoder chroma gain delta.
    pub saturation: f32,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            variant: PpuVariant::Ntsc,
            palette_revision: 0,
            sync_enable: true,
            full_frame: false,
            threads: 1,
            brightness: 0.0,
            contrast: 0.0,
            hue: 0.0,
            saturation: 0.0,
        }
    }
}

impl FilterSettings {
    /// Default settings for a particular chip.
    pub fn for_variant(variant: PpuVariant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    /// Reject settings the filter can't honour.
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.threads == 0 {
            return Err(FilterError::InvalidThreadCount(self.threads));
        }
        if self.palette_revision > MAX_PALETTE_REVISION {
            return Err(FilterError::InvalidPaletteRevision(self.palette_revision));
        }

        let adjustments = [
            ("brightness", self.brightness),
            ("contrast", self.contrast),
            ("hue", self.hue),
            ("saturation", self.saturation),
        ];
        if let Some(&(name, value)) = adjustments.iter().find(|(_, value)| !value.is_finite()) {
            return Err(FilterError::InvalidAdjustment { name, value });
        }
        // At -1 every level collapses onto the black level.
        if self.contrast <= -1.0 {
            return Err(FilterError::InvalidAdjustment {
                name: "contrast",
                value: self.contrast,
            });
        }

        Ok(())
    }
}
