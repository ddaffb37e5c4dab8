pub mod analysis;
pub mod candle;
pub mod profile;
pub mod swing;
pub mod ticker;
