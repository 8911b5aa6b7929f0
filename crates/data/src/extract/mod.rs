//! Per-source metric extractors.
//!
//! Each extractor turns one source's already-fetched raw records into a
//! [`hl_screen_core::MetricTable`] keyed by canonical coin. Extractors emit
//! a metric only when it was genuinely computed; the merge pass owns the
//! zero-fill for everything else.

pub mod analytics;
pub mod marketcap;
pub mod reference;
pub mod venue;
