use std::ops::Range;

use super::decoder::{DecodeContext, Decoder};
use super::encoder::SubcarrierEncoder;
use super::raster::{FieldRasterBuilder, RawField};
use crate::error::FilterError;
use crate::ppu::{PpuTimings, SignalLevelLut};
use crate::settings::FilterSettings;
use crate::types::SignalFloat;

/// The encoded composite signal of one field.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalField {
    width: usize,
    height: usize,
    samples: Vec<SignalFloat>,
}

impl SignalField {
    /// A field of `width` samples per scanline, all at 0.0.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            samples: vec![0.0; width * height],
        }
    }

    /// Samples per scanline.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn row(&self, line: usize) -> &[SignalFloat] {
        &self.samples[line * self.width..(line + 1) * self.width]
    }

    pub fn samples(&self) -> &[SignalFloat] {
        &self.samples
    }
}

/// Split `height` scanlines into `threads` contiguous chunks. The last chunk takes the
/// remainder; there are never more chunks than scanlines.
pub fn scanline_chunks(height: usize, threads: usize) -> Vec<Range<usize>> {
    let chunks = threads.clamp(1, height.max(1));
    let chunk_len = height / chunks;
    (0..chunks)
        .map(|i| {
            let start = i * chunk_len;
            let end = if i + 1 == chunks { height } else { start + chunk_len };
            start..end
        })
        .collect()
}

/// Configuration is validated and every table derived from it is built up front, so each
/// frame is just a merge and an encode.
struct Configuration {
    settings: FilterSettings,
    lut: SignalLevelLut,
    pool: Option<rayon::ThreadPool>,
}

impl Configuration {
    /// Validate `settings` and build everything derived from them, including the raster shell.
    fn new(settings: FilterSettings) -> Result<(Self, RawField), FilterError> {
        settings.validate()?;

        let variant = settings.variant;
        let voltages = variant.voltages();
        let lut = SignalLevelLut::new(voltages, settings.brightness, settings.contrast);

        let builder =
            FieldRasterBuilder::new(variant.timings(), settings.sync_enable, settings.full_frame);
        let shell = builder.build_shell()?;

        let pool = if settings.threads > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(settings.threads)
                .thread_name(|i| format!("cvbs-encode-{i}"))
                .build()
                .map_err(|e| FilterError::ThreadPool(e.to_string()))?;
            Some(pool)
        } else {
            None
        };

        Ok((
            Self {
                settings,
                lut,
                pool,
            },
            shell,
        ))
    }
}

/// Composite video filter: owns the configuration, the raw field and the signal buffer, and
/// encodes one frame of PPU output per [`filter_frame`](Self::filter_frame) call.
pub struct FrameFilter {
    config: Configuration,
    raw: RawField,
    signal: SignalField,
    last_frame: (u8, bool),
}

impl FrameFilter {
    pub fn new(settings: FilterSettings) -> Result<Self, FilterError> {
        let (config, raw) = Configuration::new(settings)?;
        let signal = Self::signal_buffer(&config, &raw);
        let filter = Self {
            config,
            raw,
            signal,
            last_frame: (0, false),
        };
        filter.log_configuration();
        Ok(filter)
    }

    /// Replace the configuration. Rebuilds the tables, the worker pool and both buffers. On
    /// error the previous configuration stays in place.
    pub fn apply_settings(&mut self, settings: FilterSettings) -> Result<(), FilterError> {
        let (config, raw) = Configuration::new(settings)?;
        self.signal = Self::signal_buffer(&config, &raw);
        self.raw = raw;
        self.config = config;
        self.last_frame = (0, false);
        self.log_configuration();
        Ok(())
    }

    fn signal_buffer(config: &Configuration, raw: &RawField) -> SignalField {
        let timings = config.settings.variant.timings();
        let samples_per_pixel = usize::from(timings.samples_per_pixel);
        SignalField::new(raw.width() * samples_per_pixel, raw.height())
    }

    fn log_configuration(&self) {
        let settings = &self.config.settings;
        log::info!(
            "configured {} filter: {}x{} field, {} samples per dot, sync {}, {} worker(s)",
            settings.variant,
            self.raw.width(),
            self.raw.height(),
            self.timings().samples_per_pixel,
            if settings.sync_enable { "on" } else { "off" },
            settings.threads,
        );
    }

    /// Encode one frame of PPU output.
    ///
    /// `pixels` holds 9-bit "eeellcccc" codes in raster order: 256×240 of them, or the whole
    /// visible window in full-frame mode. `dot_phase` is the PPU/master clock alignment (any
    /// value, taken mod 3). `skip_dot` requests the odd-frame dot skip; chips without one
    /// ignore it.
    pub fn filter_frame(
        &mut self,
        pixels: &[u16],
        dot_phase: u8,
        skip_dot: bool,
    ) -> Result<&SignalField, FilterError> {
        let Self {
            config,
            raw,
            signal,
            last_frame,
        } = self;
        let settings = &config.settings;
        let variant = settings.variant;

        let builder =
            FieldRasterBuilder::new(variant.timings(), settings.sync_enable, settings.full_frame);
        builder.merge(raw, pixels)?;

        if skip_dot && !variant.timings().dot_skip {
            log::trace!("{variant} has no dot skip, ignoring request");
        }

        let encoder = SubcarrierEncoder::new(variant, &config.lut);
        let chunks = scanline_chunks(raw.height(), settings.threads);
        let row_len = signal.width;

        let mut slices = Vec::with_capacity(chunks.len());
        let mut rest = signal.samples.as_mut_slice();
        for lines in chunks {
            let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(lines.len() * row_len);
            slices.push((lines, chunk));
            rest = tail;
        }

        let raw = &*raw;
        let encoder = &encoder;
        match &config.pool {
            Some(pool) => pool.scope(|scope| {
                for (lines, out) in slices {
                    scope.spawn(move |_| {
                        log::trace!("encoding scanlines {lines:?}");
                        encoder.encode_lines(raw, lines, dot_phase, skip_dot, out);
                    });
                }
            }),
            None => {
                for (lines, out) in slices {
                    encoder.encode_lines(raw, lines, dot_phase, skip_dot, out);
                }
            }
        }

        *last_frame = (dot_phase, skip_dot);
        Ok(&*signal)
    }

    /// Hand the most recent field to a decoder.
    pub fn decode_frame<D: Decoder>(&self, decoder: &mut D, rgb: &mut [u32]) -> Result<(), D::Error> {
        let (dot_phase, skip_dot) = self.last_frame;
        let context = DecodeContext {
            timings: self.timings(),
            settings: &self.config.settings,
            dot_phase,
            skip_dot,
        };
        decoder.decode(&self.signal, &context, rgb)
    }

    pub fn settings(&self) -> &FilterSettings {
        &self.config.settings
    }

    pub fn timings(&self) -> &'static PpuTimings {
        self.config.settings.variant.timings()
    }

    pub fn lut(&self) -> &SignalLevelLut {
        &self.config.lut
    }

    /// The raw field of the last frame (or the bare shell before the first one).
    pub fn raw_field(&self) -> &RawField {
        &self.raw
    }

    /// The signal of the last frame.
    pub fn signal(&self) -> &SignalField {
        &self.signal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ppu::PpuVariant;

    #[test]
    fn chunks_cover_every_scanline() {
        assert_eq!(scanline_chunks(262, 1), vec![0..262]);
        assert_eq!(scanline_chunks(262, 4), vec![0..65, 65..130, 130..195, 195..262]);
        assert_eq!(scanline_chunks(3, 8), vec![0..1, 1..2, 2..3]);
        assert_eq!(scanline_chunks(240, 240).len(), 240);
    }

    #[test]
    fn buffers_match_the_configuration() {
        for variant in PpuVariant::ALL {
            for sync_enable in [false, true] {
                let settings = FilterSettings {
                    variant,
                    sync_enable,
                    ..FilterSettings::default()
                };
                let filter = FrameFilter::new(settings).unwrap();
                let timings = variant.timings();
                let (width, height) = timings.field_size(sync_enable);
                assert_eq!(filter.raw_field().width(), width);
                assert_eq!(filter.raw_field().height(), height);
                assert_eq!(
                    filter.signal().len(),
                    width * usize::from(timings.samples_per_pixel) * height
                );
            }
        }
    }

    #[test]
    fn failed_reconfiguration_keeps_previous_settings() {
        let mut filter = FrameFilter::new(FilterSettings::for_variant(PpuVariant::Pal)).unwrap();
        let bad = FilterSettings {
            threads: 0,
            ..FilterSettings::default()
        };
        assert_eq!(filter.apply_settings(bad), Err(FilterError::InvalidThreadCount(0)));
        assert_eq!(filter.settings().variant, PpuVariant::Pal);
        assert_eq!(filter.signal().height(), 312);
    }

    #[test]
    fn reconfiguration_resizes_buffers() {
        let mut filter = FrameFilter::new(FilterSettings::default()).unwrap();
        let settings = FilterSettings {
            variant: PpuVariant::Dendy,
            sync_enable: false,
            threads: 2,
            ..FilterSettings::default()
        };
        filter.apply_settings(settings).unwrap();
        assert_eq!(filter.signal().width(), 283 * 10);
        assert_eq!(filter.signal().height(), 240);
        assert!(filter.filter_frame(&[0x0F; 256 * 240], 0, false).is_ok());
    }
}
