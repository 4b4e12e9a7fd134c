use std::error::Error;
use std::path::Path;

use image::{ImageBuffer, Luma};
use nes_cvbs::{FilterSettings, FrameFilter, PpuVariant, SignalField, SignalFloat};

/// Width of each palette bar in the test pattern.
const BAR_WIDTH: usize = 4;

/// Scanlines per emphasis band in the test pattern.
const BAND_HEIGHT: usize = 30;

/// Test pattern: all 64 colors as vertical bars, with the emphasis bits counting up in
/// horizontal bands.
fn color_bars() -> Vec<u16> {
    let mut pixels = Vec::with_capacity(256 * 240);
    for y in 0..240 {
        let emphasis = (y / BAND_HEIGHT) as u16;
        for x in 0..256 {
            let color = (x / BAR_WIDTH) as u16;
            pixels.push(emphasis << 6 | color);
        }
    }
    pixels
}

/// Save a field as a 16-bit grayscale PNG, one pixel per sample. `floor` maps to black and
/// `peak` to white.
fn export_png(
    path: &Path,
    signal: &SignalField,
    floor: SignalFloat,
    peak: SignalFloat,
) -> Result<(), Box<dyn Error>> {
    let quantize = |sample: SignalFloat| {
        let level = ((sample - floor) / (peak - floor)).clamp(0.0, 1.0);
        (level * SignalFloat::from(u16::MAX)).round() as u16
    };

    let width = u32::try_from(signal.width())?;
    let height = u32::try_from(signal.height())?;
    let image = ImageBuffer::<Luma<u16>, Vec<u16>>::from_fn(width, height, |x, y| {
        Luma([quantize(signal.row(y as usize)[x as usize])])
    });
    image.save(path)?;

    log::info!("wrote {}x{} field to {}", width, height, path.display());
    Ok(())
}

/// Demo program: encodes a test pattern for the chip named on the command line (NTSC by
/// default) and dumps an odd and an even field.
fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging.
    env_logger::init();

    // Pick the PPU.
    let variant = match std::env::args().nth(1) {
        Some(name) => name.parse()?,
        None => PpuVariant::Ntsc,
    };
    let threads = std::thread::available_parallelism().map_or(1, |n| n.get());

    // Create the filter.
    let mut filter = FrameFilter::new(FilterSettings {
        threads,
        ..FilterSettings::for_variant(variant)
    })?;
    let floor = filter.lut().sync_level();
    let peak = filter.lut().iter().fold(SignalFloat::MIN, SignalFloat::max);

    // The PPU comes out of reset in a random alignment with the master clock.
    let dot_phase = rand::random::<u8>() % 3;
    let pixels = color_bars();

    let signal = filter.filter_frame(&pixels, dot_phase, true)?;
    export_png(Path::new("test_odd.png"), signal, floor, peak)?;

    let signal = filter.filter_frame(&pixels, (dot_phase + 1) % 3, false)?;
    export_png(Path::new("test_even.png"), signal, floor, peak)?;

    Ok(())
}
