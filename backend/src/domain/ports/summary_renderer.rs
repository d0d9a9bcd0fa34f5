//! Driven port for drawing the summary image.
//!
//! Rendering is CPU-bound and synchronous; callers move it onto a blocking
//! thread.

use crate::domain::CountrySummary;

use super::define_port_error;

define_port_error! {
    /// Errors raised while drawing or encoding the image.
    pub enum SummaryRendererError {
        /// Drawing primitives failed.
        Draw { message: String } =>
            "summary image drawing failed: {message}",
        /// The encoded image could not be produced or read back.
        Encode { message: String } =>
            "summary image encoding failed: {message}",
    }
}

/// Port turning a [`CountrySummary`] into PNG bytes.
///
/// An empty summary yields a placeholder image rather than an error.
#[cfg_attr(test, mockall::automock)]
pub trait SummaryRenderer: Send + Sync {
    fn render(&self, summary: &CountrySummary) -> Result<Vec<u8>, SummaryRendererError>;
}
