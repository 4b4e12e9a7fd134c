//! Composite video (CVBS) synthesis for the NES PPU.
//!
//! Takes a frame of 9-bit PPU pixel codes and produces the waveform the console puts on its
//! video output: hsync, colorburst, porches and vertical sync around the picture, with every
//! pixel encoded as a square wave on the color subcarrier. The signal is sampled at twice the
//! master clock, 12 samples per subcarrier cycle, so one PPU dot is 8 samples on the 2C02 and
//! 10 on the 2C07.
//!
//! ```no_run
//! use nes_cvbs::{FilterSettings, FrameFilter};
//!
//! let mut filter = FrameFilter::new(FilterSettings::default())?;
//! let pixels = vec![0x0Fu16; 256 * 240];
//! let signal = filter.filter_frame(&pixels, 0, false)?;
//! assert_eq!(signal.len(), 341 * 8 * 262);
//! # Ok::<(), nes_cvbs::FilterError>(())
//! ```

pub mod cvbs;
pub mod error;
pub mod ppu;
pub mod settings;
pub mod types;

pub use cvbs::{DecodeContext, Decoder, FrameFilter, SignalField};
pub use error::FilterError;
pub use ppu::PpuVariant;
pub use settings::FilterSettings;
pub use types::{Dot, PixelCode, SignalFloat};
