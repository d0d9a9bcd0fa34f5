//! Summary image adapters: PNG rendering with `plotters` and an on-disk
//! cache keyed by data version.

mod file_cache;
mod plotters_renderer;

pub use file_cache::FileSummaryImageCache;
pub use plotters_renderer::PlottersSummaryRenderer;
