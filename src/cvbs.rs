mod decoder;
mod encoder;
mod filter;
mod raster;

pub use decoder::*;
pub use encoder::*;
pub use filter::*;
pub use raster::*;
