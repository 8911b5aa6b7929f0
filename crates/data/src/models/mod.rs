pub mod analytics;
pub mod candle;
pub mod marketcap;
pub mod venue;
