// Candle series storage
pub mod candle_buffer;

pub use candle_buffer::{BufferUpdate, SeriesBuffer};
